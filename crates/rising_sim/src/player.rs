//! Player controller
//!
//! Input-driven states: Idle/Move, Attack (combo swings with a lunge),
//! Block, Dodge (invulnerable roll) and Dead. Lunge and dodge impulses decay
//! with friction normalized to 60 Hz and are moved through locomotion one
//! axis at a time, so they never pass through walls.

use rising_ai::{State, StateChange};
use rising_combat::{AttackDescriptor, ComboConfig, ComboTracker};
use rising_core::AgentKind;
use rising_math::{horizontal_direction, Vec3};
use rising_physics::{move_and_slide, CollisionWorld};
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentSnapshot, PLAYER_ID};
use crate::collab::{InputSnapshot, PlayOptions};

/// Player behavioral state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerState {
    Idle,
    Move,
    Attack,
    Block,
    Dodge,
    Dead,
}

impl State for PlayerState {
    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Move => "move",
            Self::Attack => "attack",
            Self::Block => "block",
            Self::Dodge => "dodge",
            Self::Dead => "dead",
        }
    }
}

/// Player tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub health: i32,
    pub speed: f32,
    /// Radians per second
    pub turn_speed: f32,
    pub radius: f32,
    pub attack_range: f32,
    pub attack_damage: i32,
    pub combo: ComboConfig,
    pub dodge_speed: f32,
    pub dodge_duration: f32,
    /// Invulnerability window opened by a dodge
    pub invulnerability: f32,
    /// Fraction of impulse kept per 1/60 s
    pub impulse_friction: f32,
    /// Impulses slower than this stop
    pub impulse_cutoff: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            health: 10,
            speed: 5.0,
            turn_speed: 12.0,
            radius: 0.5,
            attack_range: 2.0,
            attack_damage: 1,
            combo: ComboConfig::default(),
            dodge_speed: 12.0,
            dodge_duration: 0.5,
            invulnerability: 0.3,
            impulse_friction: 0.85,
            impulse_cutoff: 0.05,
        }
    }
}

/// What the player did this frame
#[derive(Debug, Clone, Default)]
pub struct PlayerOutput {
    pub change: Option<StateChange<PlayerState>>,
    /// Combo step of a swing that started this frame
    pub swing: Option<usize>,
    pub attack: Option<AttackDescriptor>,
}

/// The player agent and its state
pub struct PlayerController {
    agent: Agent,
    config: PlayerConfig,
    state: PlayerState,
    state_timer: f32,
    combo: ComboTracker,
    swing_step: usize,
    pending_hit: Option<f32>,
    impulse: Vec3,
    animation_finished: bool,
}

impl PlayerController {
    pub fn new(position: Vec3, config: PlayerConfig) -> Self {
        let agent = Agent::new(PLAYER_ID, AgentKind::Player, position.flat(), config.health)
            .with_radius(config.radius)
            .with_speed(config.speed)
            .with_attack_range(config.attack_range);
        Self {
            agent,
            config,
            state: PlayerState::Idle,
            state_timer: 0.0,
            combo: ComboTracker::new(),
            swing_step: 0,
            pending_hit: None,
            impulse: Vec3::ZERO,
            animation_finished: false,
        }
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut Agent {
        &mut self.agent
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn is_blocking(&self) -> bool {
        self.state == PlayerState::Block
    }

    pub fn impulse(&self) -> Vec3 {
        self.impulse
    }

    pub fn combo(&self) -> &ComboTracker {
        &self.combo
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot::capture(&self.agent, self.is_blocking())
    }

    /// Clip and playback options for the current state
    pub fn clip(&self) -> (&str, PlayOptions) {
        match self.state {
            PlayerState::Idle => ("idle", PlayOptions::looping()),
            PlayerState::Move => ("run", PlayOptions::looping()),
            PlayerState::Attack => (
                self.config.combo.clip(self.swing_step),
                PlayOptions::once().with_time_scale(self.config.combo.time_scale),
            ),
            PlayerState::Block => ("block", PlayOptions::looping()),
            PlayerState::Dodge => ("dodge", PlayOptions::once()),
            PlayerState::Dead => ("death", PlayOptions::once()),
        }
    }

    /// The current one-shot clip finished
    pub fn notify_animation_finished(&mut self) {
        self.animation_finished = true;
    }

    /// React to applied damage
    pub fn on_damaged(&mut self, died: bool) -> Option<StateChange<PlayerState>> {
        if died {
            self.die()
        } else {
            None
        }
    }

    fn die(&mut self) -> Option<StateChange<PlayerState>> {
        self.pending_hit = None;
        self.impulse = Vec3::ZERO;
        self.enter(PlayerState::Dead)
    }

    fn enter(&mut self, state: PlayerState) -> Option<StateChange<PlayerState>> {
        if self.state == state || self.state == PlayerState::Dead {
            return None;
        }
        let from = std::mem::replace(&mut self.state, state);
        self.state_timer = 0.0;
        self.animation_finished = false;
        log::debug!("Player {} -> {}", from.name(), state.name());
        Some((from, state))
    }

    /// Advance one frame
    pub fn update(&mut self, input: &InputSnapshot, delta_time: f32, world: &CollisionWorld) -> PlayerOutput {
        let mut output = PlayerOutput::default();
        if self.state == PlayerState::Dead {
            return output;
        }
        if self.agent.health.is_dead() {
            output.change = self.die();
            return output;
        }

        self.state_timer += delta_time;
        if self.state != PlayerState::Attack {
            self.combo.update(delta_time, &self.config.combo);
        }

        match self.state {
            PlayerState::Idle | PlayerState::Move => {
                if input.dodge_pressed {
                    self.start_dodge(input, &mut output);
                } else if input.attack_pressed {
                    self.start_swing(input, &mut output);
                } else if input.block_held {
                    output.change = self.enter(PlayerState::Block);
                    self.face_cursor(input, delta_time);
                } else if let Some(direction) = input.move_direction() {
                    self.agent
                        .turn_towards(direction, self.config.turn_speed * delta_time);
                    let moved = move_and_slide(
                        self.agent.position,
                        self.agent.radius,
                        direction * self.agent.speed * delta_time,
                        world,
                        self.agent.id,
                    );
                    self.agent.position = moved.position;
                    output.change = self.enter(PlayerState::Move);
                } else {
                    output.change = self.enter(PlayerState::Idle);
                }
            }
            PlayerState::Block => {
                if input.dodge_pressed {
                    self.start_dodge(input, &mut output);
                } else if !input.block_held {
                    output.change = self.enter(PlayerState::Idle);
                } else {
                    self.face_cursor(input, delta_time);
                }
            }
            PlayerState::Attack => {
                if let Some(remaining) = self.pending_hit {
                    let remaining = remaining - delta_time;
                    if remaining <= 0.0 {
                        self.pending_hit = None;
                        output.attack = Some(self.swing_descriptor());
                    } else {
                        self.pending_hit = Some(remaining);
                    }
                }
                let finished =
                    self.animation_finished || self.state_timer >= self.config.combo.attack_duration;
                if self.pending_hit.is_none() && finished {
                    output.change = self.enter(PlayerState::Idle);
                }
            }
            PlayerState::Dodge => {
                if self.animation_finished || self.state_timer >= self.config.dodge_duration {
                    output.change = self.enter(PlayerState::Idle);
                }
            }
            PlayerState::Dead => {}
        }

        self.apply_impulse(delta_time, world);
        output
    }

    fn face_cursor(&mut self, input: &InputSnapshot, delta_time: f32) {
        let direction = input
            .cursor_world_point
            .and_then(|point| horizontal_direction(self.agent.position, point));
        if let Some(direction) = direction {
            self.agent
                .turn_towards(direction, self.config.turn_speed * delta_time);
        }
    }

    fn start_swing(&mut self, input: &InputSnapshot, output: &mut PlayerOutput) {
        let step = self.combo.begin(&self.config.combo);
        self.swing_step = step;
        if let Some(direction) = input
            .cursor_world_point
            .and_then(|point| horizontal_direction(self.agent.position, point))
        {
            self.agent.set_facing(direction);
        }
        self.impulse = self.agent.facing() * self.config.combo.lunge_speed;
        output.change = self.enter(PlayerState::Attack);
        output.swing = Some(step);

        if self.config.combo.hit_delay <= 0.0 {
            output.attack = Some(self.swing_descriptor());
        } else {
            self.pending_hit = Some(self.config.combo.hit_delay);
        }
    }

    fn swing_descriptor(&self) -> AttackDescriptor {
        AttackDescriptor::new(
            self.agent.id,
            self.agent.position,
            self.agent.facing(),
            self.agent.attack_range,
            self.config.attack_damage,
        )
        .with_backstab(true)
    }

    fn start_dodge(&mut self, input: &InputSnapshot, output: &mut PlayerOutput) {
        let direction = input.move_direction().unwrap_or_else(|| self.agent.facing());
        self.agent.set_facing(direction);
        self.impulse = self.agent.facing() * self.config.dodge_speed;
        self.agent
            .health
            .grant_invulnerability(self.config.invulnerability);
        output.change = self.enter(PlayerState::Dodge);
    }

    fn apply_impulse(&mut self, delta_time: f32, world: &CollisionWorld) {
        if self.impulse == Vec3::ZERO {
            return;
        }
        let moved = move_and_slide(
            self.agent.position,
            self.agent.radius,
            self.impulse * delta_time,
            world,
            self.agent.id,
        );
        self.agent.position = moved.position;
        if moved.blocked_x {
            self.impulse.x = 0.0;
        }
        if moved.blocked_z {
            self.impulse.z = 0.0;
        }

        self.impulse *= self.config.impulse_friction.clamp(0.0, 1.0).powf(delta_time * 60.0);
        if self.impulse.length() < self.config.impulse_cutoff {
            self.impulse = Vec3::ZERO;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rising_math::AABB;
    use rising_physics::{CollisionVolume, LocomotionConfig};

    const DT: f32 = 1.0 / 60.0;

    fn player() -> PlayerController {
        PlayerController::new(Vec3::ZERO, PlayerConfig::default())
    }

    fn open() -> CollisionWorld {
        CollisionWorld::empty()
    }

    #[test]
    fn test_diagonal_not_faster() {
        let mut player = player();
        let output = player.update(&InputSnapshot::moving(1.0, 1.0), DT, &open());
        assert_eq!(output.change, Some((PlayerState::Idle, PlayerState::Move)));
        let travelled = player.agent().position.length();
        assert!((travelled - 5.0 * DT).abs() < 1e-5);
    }

    #[test]
    fn test_turns_toward_movement() {
        let mut player = player();
        player.update(&InputSnapshot::moving(0.0, -1.0), DT, &open());
        // At most turn_speed * dt radians per frame
        let facing = player.agent().facing();
        assert!((facing.z - (12.0 * DT).cos()).abs() < 1e-4);

        for _ in 0..30 {
            player.update(&InputSnapshot::moving(0.0, -1.0), DT, &open());
        }
        assert!((player.agent().facing().z + 1.0).abs() < 1e-4);

        let output = player.update(&InputSnapshot::idle(), DT, &open());
        assert_eq!(output.change, Some((PlayerState::Move, PlayerState::Idle)));
    }

    #[test]
    fn test_swing_emits_after_hit_delay() {
        let mut player = player();
        let output = player.update(&InputSnapshot::idle().with_attack(), DT, &open());
        assert_eq!(output.swing, Some(0));
        assert_eq!(output.change, Some((PlayerState::Idle, PlayerState::Attack)));
        assert!(output.attack.is_none());
        assert!(player.impulse().z > 0.0);

        let mut attacks = Vec::new();
        for _ in 0..10 {
            attacks.extend(player.update(&InputSnapshot::idle().with_attack(), DT, &open()).attack);
        }
        assert_eq!(attacks.len(), 1);
        assert_eq!(attacks[0].owner, PLAYER_ID);
        assert!(attacks[0].backstab_eligible);
        assert_eq!(player.state(), PlayerState::Attack);
    }

    #[test]
    fn test_combo_cycles_and_resets() {
        let mut player = player();
        let world = open();
        let swing = InputSnapshot::idle().with_attack();

        assert_eq!(player.update(&swing, DT, &world).swing, Some(0));
        player.notify_animation_finished();
        for _ in 0..10 {
            player.update(&InputSnapshot::idle(), DT, &world);
        }
        assert_eq!(player.state(), PlayerState::Idle);
        assert_eq!(player.update(&swing, DT, &world).swing, Some(1));
        assert_eq!(player.clip().0, "attack_2");

        // Wait out the combo window
        player.notify_animation_finished();
        for _ in 0..60 {
            player.update(&InputSnapshot::idle(), DT, &world);
        }
        assert_eq!(player.update(&swing, DT, &world).swing, Some(0));
    }

    #[test]
    fn test_swing_faces_cursor() {
        let mut player = player();
        let input = InputSnapshot::idle()
            .with_attack()
            .with_cursor(Vec3::ground(3.0, 0.0));
        player.update(&input, DT, &open());
        assert!((player.agent().facing() - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_dodge_window() {
        let mut player = player();
        let world = open();
        let output = player.update(&InputSnapshot::moving(-1.0, 0.0).with_dodge(), DT, &world);
        assert_eq!(output.change, Some((PlayerState::Idle, PlayerState::Dodge)));
        assert!(player.agent().health.is_invulnerable());
        assert!(player.agent().position.x < 0.0);

        // Not re-triggerable mid-dodge
        let output = player.update(&InputSnapshot::idle().with_dodge(), DT, &world);
        assert!(output.change.is_none());

        for _ in 0..40 {
            player.update(&InputSnapshot::idle(), DT, &world);
        }
        assert_eq!(player.state(), PlayerState::Idle);
    }

    #[test]
    fn test_block_does_not_translate() {
        let mut player = player();
        let world = open();
        let blocking = InputSnapshot::moving(1.0, 0.0)
            .with_block()
            .with_cursor(Vec3::ground(-5.0, 0.0));
        let output = player.update(&blocking, DT, &world);
        assert_eq!(output.change, Some((PlayerState::Idle, PlayerState::Block)));
        for _ in 0..30 {
            player.update(&blocking, DT, &world);
        }
        assert_eq!(player.agent().position, Vec3::ZERO);
        assert!(player.is_blocking());
        // Rotated toward the cursor
        assert!(player.agent().facing().x < -0.99);

        player.update(&InputSnapshot::idle(), DT, &world);
        assert_eq!(player.state(), PlayerState::Idle);
    }

    #[test]
    fn test_lunge_stops_at_wall() {
        let wall = CollisionVolume::wall(AABB::new(
            Vec3::new(-2.0, 0.0, 0.7),
            Vec3::new(2.0, 3.0, 1.0),
        ));
        let world = CollisionWorld::new(vec![wall], LocomotionConfig::default()).unwrap();
        let mut player = player();

        player.update(&InputSnapshot::idle().with_dodge(), DT, &world);
        for _ in 0..30 {
            player.update(&InputSnapshot::idle(), DT, &world);
        }
        let position = player.agent().position;
        assert!(position.z <= 0.2 + 1e-3);
        assert_eq!(player.impulse(), Vec3::ZERO);
    }

    #[test]
    fn test_dead_ignores_input() {
        let mut player = player();
        player.agent_mut().health.take_damage(100);
        let output = player.update(&InputSnapshot::moving(1.0, 0.0), DT, &open());
        assert_eq!(output.change, Some((PlayerState::Idle, PlayerState::Dead)));

        let output = player.update(&InputSnapshot::idle().with_attack(), DT, &open());
        assert!(output.change.is_none() && output.attack.is_none());
        assert_eq!(player.agent().position, Vec3::ZERO);
        assert_eq!(player.on_damaged(true), None);
    }
}
