//! Enemy behavior: patrol, chase, attack, hurt, dead
//!
//! One brain serves every archetype; only the [`Archetype`] data differs.
//! The brain never touches the world directly. Each frame it reads an
//! [`EnemyFrame`] built from the frame-start snapshot and answers with a
//! [`BrainOutput`] the driver applies through locomotion and combat.

use rand::Rng;
use rising_combat::AttackDescriptor;
use rising_core::AgentId;
use rising_math::{horizontal_direction, horizontal_distance, Vec3};
use serde::{Deserialize, Serialize};

use crate::archetype::Archetype;
use crate::perception::{DetectionConfig, Perception};
use crate::state_machine::{State, StateChange, StateMachine};
use crate::steering::{arrive, pick_wander_target, sample_interval, seek, separation, SteeringOutput};

/// Behavioral state of an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyState {
    Patrol,
    Chase,
    Attack,
    Hurt,
    Dead,
}

impl State for EnemyState {
    fn name(&self) -> &'static str {
        match self {
            Self::Patrol => "patrol",
            Self::Chase => "chase",
            Self::Attack => "attack",
            Self::Hurt => "hurt",
            Self::Dead => "dead",
        }
    }
}

impl EnemyState {
    /// Animation clip played while in this state
    pub fn clip(&self) -> &'static str {
        match self {
            Self::Patrol => "walk",
            Self::Chase => "run",
            Self::Attack => "attack",
            Self::Hurt => "hit",
            Self::Dead => "death",
        }
    }

    /// Whether the clip plays once instead of looping
    pub fn plays_once(&self) -> bool {
        matches!(self, Self::Attack | Self::Hurt | Self::Dead)
    }
}

/// Tuning shared by all enemies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyAiConfig {
    pub wander_interval_min: f32,
    pub wander_interval_max: f32,
    /// Wander targets stay within this distance of the spawn point
    pub wander_radius: f32,
    /// Fraction of chase speed used while patrolling
    pub patrol_speed_factor: f32,
    pub arrive_threshold: f32,
    pub detection: DetectionConfig,
    /// A chasing enemy stops closing in at this fraction of its attack range
    pub chase_hold_fraction: f32,
    pub hurt_duration: f32,
    /// Time a corpse stays before removal
    pub death_duration: f32,
    pub flash_duration: f32,
    pub separation_distance: f32,
    pub separation_speed: f32,
    /// Radians per second
    pub turn_speed: f32,
}

impl Default for EnemyAiConfig {
    fn default() -> Self {
        Self {
            wander_interval_min: 2.0,
            wander_interval_max: 5.0,
            wander_radius: 4.0,
            patrol_speed_factor: 0.5,
            arrive_threshold: 0.3,
            detection: DetectionConfig::default(),
            chase_hold_fraction: 0.8,
            hurt_duration: 0.4,
            death_duration: 2.0,
            flash_duration: 0.1,
            separation_distance: 1.2,
            separation_speed: 3.0,
            turn_speed: 10.0,
        }
    }
}

/// Facts the transition table is evaluated against
#[derive(Debug, Clone, Copy)]
pub struct BrainContext {
    pub dead: bool,
    pub player_alive: bool,
    pub detected: bool,
    pub lost: bool,
    pub in_attack_range: bool,
    pub cooldown_ready: bool,
    pub attack_finished: bool,
    pub hurt_expired: bool,
}

/// What one enemy sees this frame
#[derive(Debug, Clone, Copy)]
pub struct EnemyFrame<'a> {
    pub id: AgentId,
    pub position: Vec3,
    pub facing: Vec3,
    /// Health has reached zero
    pub dead: bool,
    /// Player position, None once the player is dead
    pub player: Option<Vec3>,
    /// Sight line to the player; pass true when it was not tested
    pub player_visible: bool,
    /// Active agents to keep apart from, the player included
    pub neighbors: &'a [(AgentId, Vec3)],
}

/// What the brain wants done this frame
#[derive(Debug, Clone, Default)]
pub struct BrainOutput {
    /// Desired ground velocity, separation included
    pub velocity: Vec3,
    /// Direction to face
    pub face_toward: Option<Vec3>,
    /// Face immediately instead of turning gradually
    pub snap_facing: bool,
    pub attack: Option<AttackDescriptor>,
    pub change: Option<StateChange<EnemyState>>,
    /// The corpse timer ran out; remove the agent
    pub remove: bool,
}

/// Behavior of one enemy
pub struct EnemyBrain {
    fsm: StateMachine<EnemyState, BrainContext>,
    archetype: Archetype,
    config: EnemyAiConfig,
    perception: Perception,
    anchor: Vec3,
    wander_target: Option<Vec3>,
    wander_timer: f32,
    attack_cooldown: f32,
    windup: Option<f32>,
    attack_timer: f32,
    hurt_timer: f32,
    death_timer: f32,
    flash_timer: f32,
    animation_finished: bool,
    removal_requested: bool,
}

impl EnemyBrain {
    /// Create a brain in Patrol around `anchor`
    pub fn new<R: Rng + ?Sized>(
        archetype: Archetype,
        config: EnemyAiConfig,
        anchor: Vec3,
        rng: &mut R,
    ) -> Self {
        let wander_timer = sample_interval(config.wander_interval_min, config.wander_interval_max, rng);
        Self {
            fsm: Self::build_fsm(),
            perception: Perception::new(config.detection.clone()),
            archetype,
            config,
            anchor,
            wander_target: None,
            wander_timer,
            attack_cooldown: 0.0,
            windup: None,
            attack_timer: 0.0,
            hurt_timer: 0.0,
            death_timer: 0.0,
            flash_timer: 0.0,
            animation_finished: false,
            removal_requested: false,
        }
    }

    fn build_fsm() -> StateMachine<EnemyState, BrainContext> {
        use EnemyState::*;

        let mut fsm: StateMachine<EnemyState, BrainContext> = StateMachine::new(Patrol);
        fsm.add_global_transition(Dead, |ctx| ctx.dead);
        fsm.add_terminal(Dead);

        fsm.add_transition(Patrol, Chase, |ctx| ctx.player_alive && ctx.detected);

        fsm.add_transition_priority(Chase, Attack, |ctx| ctx.in_attack_range && ctx.cooldown_ready, 2);
        fsm.add_transition_priority(Chase, Patrol, |ctx| !ctx.player_alive || ctx.lost, 1);

        fsm.add_transition(Attack, Chase, |ctx| ctx.attack_finished);

        fsm.add_transition_priority(
            Hurt,
            Attack,
            |ctx| ctx.hurt_expired && ctx.player_alive && ctx.in_attack_range && ctx.cooldown_ready,
            3,
        );
        fsm.add_transition_priority(Hurt, Chase, |ctx| ctx.hurt_expired && ctx.player_alive && !ctx.lost, 2);
        fsm.add_transition_priority(Hurt, Patrol, |ctx| ctx.hurt_expired, 1);
        fsm
    }

    pub fn state(&self) -> EnemyState {
        *self.fsm.current()
    }

    pub fn archetype(&self) -> &Archetype {
        &self.archetype
    }

    pub fn perception(&self) -> &Perception {
        &self.perception
    }

    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    pub fn wander_target(&self) -> Option<Vec3> {
        self.wander_target
    }

    pub fn attack_cooldown(&self) -> f32 {
        self.attack_cooldown
    }

    pub fn is_winding_up(&self) -> bool {
        self.windup.is_some()
    }

    /// Hurt-flash is showing
    pub fn is_flashing(&self) -> bool {
        self.flash_timer > 0.0
    }

    /// Whether the driver should test the sight line to a player at `distance`
    pub fn wants_line_of_sight(&self, distance: f32) -> bool {
        self.state() == EnemyState::Patrol && self.perception.needs_line_of_sight(distance)
    }

    /// The current state's one-shot clip has finished
    pub fn notify_animation_finished(&mut self) {
        self.animation_finished = true;
    }

    /// React to damage that was applied to this enemy
    pub fn on_damaged(&mut self, died: bool) -> Option<StateChange<EnemyState>> {
        self.flash_timer = self.config.flash_duration;
        let target = if died { EnemyState::Dead } else { EnemyState::Hurt };
        let change = self.fsm.force_transition(target)?;
        self.enter(target);
        Some(change)
    }

    fn enter(&mut self, state: EnemyState) {
        self.animation_finished = false;
        match state {
            EnemyState::Patrol => {
                self.wander_target = None;
            }
            EnemyState::Chase => {}
            EnemyState::Attack => {
                self.windup = Some(self.archetype.windup.max(0.0));
                self.attack_timer = 0.0;
            }
            EnemyState::Hurt => {
                self.windup = None;
                self.hurt_timer = self.config.hurt_duration;
            }
            EnemyState::Dead => {
                self.windup = None;
                self.death_timer = self.config.death_duration;
            }
        }
    }

    /// Advance one frame
    pub fn update<R: Rng + ?Sized>(&mut self, frame: &EnemyFrame<'_>, delta_time: f32, rng: &mut R) -> BrainOutput {
        self.attack_cooldown = (self.attack_cooldown - delta_time).max(0.0);
        self.flash_timer = (self.flash_timer - delta_time).max(0.0);
        match self.state() {
            EnemyState::Attack => self.attack_timer += delta_time,
            EnemyState::Hurt => self.hurt_timer -= delta_time,
            _ => {}
        }

        let distance = frame
            .player
            .map(|player| horizontal_distance(frame.position, player))
            .unwrap_or(f32::INFINITY);
        let context = BrainContext {
            dead: frame.dead,
            player_alive: frame.player.is_some(),
            detected: self.perception.can_detect(distance, frame.player_visible),
            lost: self.perception.has_lost(distance),
            in_attack_range: distance <= self.archetype.attack_range,
            cooldown_ready: self.attack_cooldown <= 0.0,
            attack_finished: self.windup.is_none()
                && (self.animation_finished || self.attack_timer >= self.archetype.attack_duration),
            hurt_expired: self.hurt_timer <= 0.0,
        };

        let mut output = BrainOutput::default();
        if let Some(change) = self.fsm.update(&context, delta_time) {
            log::debug!(
                "Enemy {} {} -> {}",
                frame.id,
                change.0.name(),
                change.1.name()
            );
            self.enter(change.1);
            output.change = Some(change);
        }

        let to_player = frame
            .player
            .and_then(|player| horizontal_direction(frame.position, player));

        match self.state() {
            EnemyState::Patrol => self.patrol(frame, delta_time, rng, &mut output),
            EnemyState::Chase => {
                if let Some(player) = frame.player {
                    output.face_toward = to_player;
                    let hold = self.archetype.attack_range * self.config.chase_hold_fraction;
                    if distance > hold {
                        output.velocity = seek(frame.position, player, self.archetype.speed).linear;
                    }
                }
            }
            EnemyState::Attack => {
                output.face_toward = to_player;
                output.snap_facing = true;
                if let Some(remaining) = self.windup {
                    let remaining = remaining - delta_time;
                    if remaining <= 0.0 {
                        self.windup = None;
                        self.attack_cooldown = self.archetype.attack_cooldown;
                        let forward = to_player.unwrap_or(frame.facing);
                        output.attack = Some(
                            AttackDescriptor::new(
                                frame.id,
                                frame.position,
                                forward,
                                self.archetype.attack_range,
                                self.archetype.attack_damage,
                            )
                            .with_backstab(self.archetype.backstab_eligible),
                        );
                    } else {
                        self.windup = Some(remaining);
                    }
                }
            }
            EnemyState::Hurt => {}
            EnemyState::Dead => {
                self.death_timer -= delta_time;
                if self.death_timer <= 0.0 && !self.removal_requested {
                    self.removal_requested = true;
                    output.remove = true;
                }
            }
        }

        if self.state() != EnemyState::Dead {
            let push = separation(
                frame.id,
                frame.position,
                frame.neighbors,
                self.config.separation_distance,
                self.config.separation_speed,
            );
            let mut steer = SteeringOutput::from_velocity(output.velocity);
            steer.add(&push);
            output.velocity = steer.linear;
        } else {
            output.velocity = Vec3::ZERO;
        }

        output
    }

    fn patrol<R: Rng + ?Sized>(&mut self, frame: &EnemyFrame<'_>, delta_time: f32, rng: &mut R, output: &mut BrainOutput) {
        self.wander_timer -= delta_time;
        if self.wander_timer <= 0.0 {
            self.wander_target = Some(pick_wander_target(self.anchor, self.config.wander_radius, rng));
            self.wander_timer = sample_interval(
                self.config.wander_interval_min,
                self.config.wander_interval_max,
                rng,
            );
        }

        let Some(target) = self.wander_target else {
            return;
        };
        let speed = self.archetype.speed * self.config.patrol_speed_factor;
        let steer = arrive(frame.position, target, speed, self.config.arrive_threshold);
        if steer.is_zero() {
            self.wander_target = None;
        } else {
            output.face_toward = horizontal_direction(frame.position, target);
            output.velocity = steer.linear;
        }
    }
}
