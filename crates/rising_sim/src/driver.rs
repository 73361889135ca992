//! Frame driver
//!
//! One [`Simulation::tick`] runs, in order:
//!
//! 1. clamp the delta (non-positive or NaN deltas skip the frame)
//! 2. snapshot every live agent and rebuild the collision proxies
//! 3. player update, locomotion, and its swing against the enemies
//! 4. each enemy brain against the snapshot, locomotion, and its attack
//!    against the player
//! 5. countdowns
//! 6. sweep agents marked for removal
//!
//! Agents never disappear mid-frame; removal is only marked until step 6.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rising_ai::{EnemyBrain, EnemyFrame, EnemyState, State};
use rising_combat::{resolve_attack, resolve_attack_all, AttackDescriptor, DamageResult, HitOutcome, HitTier};
use rising_core::{AgentArena, AgentId, AgentKind, Diagnostics, ResourceKind, SimError};
use rising_math::{horizontal_distance, Vec3};
use rising_physics::{depenetrate, move_and_slide, CollisionWorld};

use crate::agent::{Agent, AgentSnapshot, EnemyAgent, PLAYER_ID};
use crate::collab::{AnimationDriver, HealthObserver, Headless, InputSnapshot, LevelSource, PlayOptions, FALLBACK_CLIP};
use crate::config::{Result, SimConfig};
use crate::events::{FrameReport, SimEvent};
use crate::player::PlayerController;

/// The combat and enemy-AI simulation
pub struct Simulation {
    config: SimConfig,
    world: CollisionWorld,
    player: PlayerController,
    enemies: AgentArena<EnemyAgent>,
    rng: StdRng,
    diagnostics: Diagnostics,
    animator: Box<dyn AnimationDriver>,
    observer: Box<dyn HealthObserver>,
    frame: u64,
    elapsed: f64,
    /// Events raised outside a tick, flushed with the next report
    pending_events: Vec<SimEvent>,
}

impl Simulation {
    /// Build a simulation for a level, spawning its player and enemies
    pub fn new(config: SimConfig, level: &dyn LevelSource) -> Result<Self> {
        config.validate()?;
        let world = CollisionWorld::new(level.static_volumes(), config.locomotion.clone())?;

        let mut spawn = level.player_spawn().flat();
        let radius = config.player.radius;
        let placed = depenetrate(spawn, radius, &world);
        let embedded_spawn = placed.still_embedded.then(|| {
            SimError::InvalidGeometry(format!("player spawn ({:.2}, {:.2}) is inside level geometry", spawn.x, spawn.z))
        });
        spawn = placed.position;

        let player = PlayerController::new(spawn, config.player.clone());
        let rng = StdRng::seed_from_u64(config.seed);

        let mut simulation = Self {
            config,
            world,
            player,
            enemies: AgentArena::new(),
            rng,
            diagnostics: Diagnostics::new(),
            animator: Box::new(Headless),
            observer: Box::new(Headless),
            frame: 0,
            elapsed: 0.0,
            pending_events: Vec::new(),
        };
        if let Some(err) = embedded_spawn {
            simulation.diagnostics.report(&err);
        }
        simulation.pending_events.push(SimEvent::Spawned {
            agent: PLAYER_ID,
            kind: AgentKind::Player,
            archetype: None,
            position: spawn,
        });

        for (tag, point) in level.enemy_spawns() {
            simulation.spawn_enemy(&tag, point);
        }
        log::info!(
            "Simulation ready: {} enemies, {} static volumes",
            simulation.enemies.len(),
            simulation.world.static_volumes().len()
        );
        Ok(simulation)
    }

    pub fn with_animation_driver(mut self, animator: impl AnimationDriver + 'static) -> Self {
        self.animator = Box::new(animator);
        let (clip, options) = self.player.clip();
        let clip = clip.to_string();
        self.play(PLAYER_ID, &clip, options);
        let enemies: Vec<(AgentId, EnemyState)> = self
            .enemies
            .iter()
            .map(|(id, enemy)| (id, enemy.brain.state()))
            .collect();
        for (id, state) in enemies {
            self.play_enemy_state(id, state);
        }
        self
    }

    pub fn with_health_observer(mut self, observer: impl HealthObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Add an enemy; unknown archetype tags fall back to the default one
    pub fn spawn_enemy(&mut self, tag: &str, point: Vec3) -> AgentId {
        let (tag, archetype) = self.config.archetypes.resolve(tag, &mut self.diagnostics);
        let radius = archetype.collision_radius(self.config.base_radius);
        let placed = depenetrate(point.flat(), radius, &self.world);
        if placed.still_embedded {
            self.diagnostics.report(&SimError::InvalidGeometry(format!(
                "'{}' spawn ({:.2}, {:.2}) is inside level geometry",
                tag, point.x, point.z
            )));
        }
        let position = placed.position;
        let brain = EnemyBrain::new(archetype.clone(), self.config.enemy.clone(), position, &mut self.rng);

        let id = self.enemies.insert_with(|id| EnemyAgent {
            agent: Agent::new(id, AgentKind::Enemy, position, archetype.health)
                .with_radius(radius)
                .with_speed(archetype.speed)
                .with_attack_range(archetype.attack_range),
            tag: tag.clone(),
            brain,
        });
        log::info!("Spawned {} {} at ({:.2}, {:.2})", tag, id, position.x, position.z);

        self.pending_events.push(SimEvent::Spawned {
            agent: id,
            kind: AgentKind::Enemy,
            archetype: Some(tag),
            position,
        });
        self.play_enemy_state(id, EnemyState::Patrol);
        id
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn world(&self) -> &CollisionWorld {
        &self.world
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerController {
        &mut self.player
    }

    pub fn enemy(&self, id: AgentId) -> Option<&EnemyAgent> {
        self.enemies.get(id)
    }

    pub fn enemy_mut(&mut self, id: AgentId) -> Option<&mut EnemyAgent> {
        self.enemies.get_mut(id)
    }

    pub fn enemy_ids(&self) -> Vec<AgentId> {
        self.enemies.ids()
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Simulated seconds so far
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Point an agent somewhere; returns false for unknown ids
    pub fn set_facing(&mut self, id: AgentId, facing: Vec3) -> bool {
        if id == PLAYER_ID {
            self.player.agent_mut().set_facing(facing);
            return true;
        }
        match self.enemies.get_mut(id) {
            Some(enemy) => {
                enemy.agent.set_facing(facing);
                true
            }
            None => false,
        }
    }

    /// Frozen view of every agent in the arena, player first
    pub fn snapshot(&self) -> Vec<AgentSnapshot> {
        std::iter::once(self.player.snapshot())
            .chain(self.enemies.iter().map(|(_, enemy)| enemy.snapshot()))
            .collect()
    }

    /// The animation collaborator finished an agent's one-shot clip
    ///
    /// Returns false if the agent no longer exists.
    pub fn notify_animation_finished(&mut self, id: AgentId) -> bool {
        if id == PLAYER_ID {
            self.player.notify_animation_finished();
            return true;
        }
        match self.enemies.get_mut(id) {
            Some(enemy) => {
                enemy.brain.notify_animation_finished();
                true
            }
            None => {
                log::debug!("{}", SimError::StaleReference(id));
                false
            }
        }
    }

    /// Advance the simulation by one frame
    pub fn tick(&mut self, delta_time: f32, input: &InputSnapshot) -> FrameReport {
        let mut events = std::mem::take(&mut self.pending_events);
        if !(delta_time > 0.0) {
            log::debug!("Skipping frame with delta {}", delta_time);
            return FrameReport {
                frame: self.frame,
                delta: 0.0,
                events,
            };
        }
        let dt = delta_time.min(self.config.max_delta);
        self.frame += 1;
        self.elapsed += dt as f64;

        let snapshot = self.snapshot();
        self.world.set_agents(
            std::iter::once(self.player.agent())
                .chain(self.enemies.iter().map(|(_, enemy)| &enemy.agent))
                .filter(|agent| agent.is_alive())
                .map(Agent::proxy),
        );

        self.update_player(input, dt, &snapshot, &mut events);
        self.update_enemies(dt, &snapshot, &mut events);

        self.player.agent_mut().health.update(dt);
        for (_, enemy) in self.enemies.iter_mut() {
            enemy.agent.health.update(dt);
        }

        for (id, enemy) in self.enemies.sweep() {
            log::info!("Removed {} {}", enemy.tag, id);
            events.push(SimEvent::Removed { agent: id });
        }

        FrameReport {
            frame: self.frame,
            delta: dt,
            events,
        }
    }

    fn update_player(&mut self, input: &InputSnapshot, dt: f32, snapshot: &[AgentSnapshot], events: &mut Vec<SimEvent>) {
        let output = self.player.update(input, dt, &self.world);
        if self.player.agent().is_alive() {
            let position = self.player.agent().position;
            if let Err(err) = self.world.update_agent(PLAYER_ID, position) {
                log::debug!("{}", err);
            }
        }

        if let Some((from, to)) = output.change {
            events.push(SimEvent::StateChanged {
                agent: PLAYER_ID,
                from: from.name().to_string(),
                to: to.name().to_string(),
            });
            let (clip, options) = self.player.clip();
            let clip = clip.to_string();
            self.play(PLAYER_ID, &clip, options);
        }
        if let Some(step) = output.swing {
            events.push(SimEvent::AttackStarted {
                agent: PLAYER_ID,
                clip: self.config.player.combo.clip(step).to_string(),
            });
        }

        if let Some(attack) = output.attack {
            let targets: Vec<_> = snapshot
                .iter()
                .filter(|agent| agent.kind == AgentKind::Enemy)
                .map(AgentSnapshot::target)
                .collect();
            for outcome in resolve_attack_all(&attack, &targets, &self.config.rules) {
                self.apply_hit(&outcome, events);
            }
        }
    }

    fn update_enemies(&mut self, dt: f32, snapshot: &[AgentSnapshot], events: &mut Vec<SimEvent>) {
        // Frame-start positions, minus anyone killed earlier this frame
        let mut neighbors: Vec<(AgentId, Vec3)> = snapshot
            .iter()
            .filter(|agent| agent.alive && self.world.agent(agent.id).is_ok())
            .map(|agent| (agent.id, agent.position))
            .collect();
        let mut player_position = snapshot
            .iter()
            .find(|agent| agent.id == PLAYER_ID && agent.alive)
            .map(|agent| agent.position);
        let turn_speed = self.config.enemy.turn_speed;

        for id in self.enemies.ids() {
            let Some(enemy) = self.enemies.get_mut(id) else {
                continue;
            };

            let position = enemy.agent.position;
            let player_visible = match player_position {
                Some(player) => {
                    let distance = horizontal_distance(position, player);
                    !enemy.brain.wants_line_of_sight(distance) || self.world.line_of_sight(position, player)
                }
                None => false,
            };
            let frame = EnemyFrame {
                id,
                position,
                facing: enemy.agent.facing(),
                dead: enemy.agent.health.is_dead(),
                player: player_position,
                player_visible,
                neighbors: &neighbors,
            };
            let output = enemy.brain.update(&frame, dt, &mut self.rng);

            if let Some(direction) = output.face_toward {
                if output.snap_facing {
                    enemy.agent.set_facing(direction);
                } else {
                    enemy.agent.turn_towards(direction, turn_speed * dt);
                }
            }
            if enemy.agent.is_alive() && output.velocity != Vec3::ZERO {
                let moved = move_and_slide(position, enemy.agent.radius, output.velocity * dt, &self.world, id);
                enemy.agent.position = moved.position;
                if let Err(err) = self.world.update_agent(id, moved.position) {
                    log::debug!("{}", err);
                }
            }

            if output.remove {
                self.enemies.mark_for_removal(id);
            }
            if let Some((from, to)) = output.change {
                events.push(SimEvent::StateChanged {
                    agent: id,
                    from: from.name().to_string(),
                    to: to.name().to_string(),
                });
                if to == EnemyState::Attack {
                    events.push(SimEvent::AttackStarted {
                        agent: id,
                        clip: to.clip().to_string(),
                    });
                }
                self.play_enemy_state(id, to);
            }
            if let Some(attack) = output.attack {
                self.resolve_enemy_attack(&attack, events);
                if player_position.is_some() && !self.player.agent().is_alive() {
                    player_position = None;
                    neighbors.retain(|(other, _)| *other != PLAYER_ID);
                }
            }
        }
    }

    fn resolve_enemy_attack(&mut self, attack: &AttackDescriptor, events: &mut Vec<SimEvent>) {
        let target = self.player.snapshot().target();
        if let Some(outcome) = resolve_attack(attack, &target, &self.config.rules) {
            self.apply_hit(&outcome, events);
        }
    }

    fn apply_hit(&mut self, outcome: &HitOutcome, events: &mut Vec<SimEvent>) {
        if outcome.tier == HitTier::Evaded {
            events.push(SimEvent::Evaded {
                attacker: outcome.attacker,
                target: outcome.target,
            });
            return;
        }

        let result = if outcome.target == PLAYER_ID {
            self.player.agent_mut().health.take_damage(outcome.damage)
        } else {
            match self.enemies.get_mut(outcome.target) {
                Some(enemy) => enemy.agent.health.take_damage(outcome.damage),
                None => {
                    self.diagnostics.report(&SimError::StaleReference(outcome.target));
                    return;
                }
            }
        };

        let (dealt, remaining, died) = match result {
            DamageResult::Applied { dealt, remaining, died } => (dealt, remaining, died),
            DamageResult::Ignored(reason) => {
                log::debug!("Hit on {} ignored: {:?}", outcome.target, reason);
                if matches!(reason, rising_combat::IgnoreReason::Invulnerable) {
                    events.push(SimEvent::Evaded {
                        attacker: outcome.attacker,
                        target: outcome.target,
                    });
                }
                return;
            }
        };

        events.push(if outcome.tier == HitTier::Blocked {
            SimEvent::Blocked {
                attacker: outcome.attacker,
                target: outcome.target,
                damage: dealt,
                remaining,
            }
        } else {
            SimEvent::Hit {
                attacker: outcome.attacker,
                target: outcome.target,
                damage: dealt,
                tier: outcome.tier,
                remaining,
            }
        });

        if died {
            self.world.remove_agent(outcome.target);
        }
        if outcome.target == PLAYER_ID {
            self.player_damaged(remaining, died, outcome.tier == HitTier::Blocked, events);
        } else {
            self.enemy_damaged(outcome.target, remaining, died, events);
        }
    }

    fn player_damaged(&mut self, remaining: i32, died: bool, blocked: bool, events: &mut Vec<SimEvent>) {
        let max = self.player.agent().health.max();
        self.observer.health_changed(PLAYER_ID, remaining, max);
        if blocked {
            self.play(PLAYER_ID, "block_hit", PlayOptions::once());
        } else {
            self.observer.hurt_flash(PLAYER_ID, self.config.enemy.flash_duration);
        }

        if let Some((from, to)) = self.player.on_damaged(died) {
            log::info!("Player died");
            events.push(SimEvent::StateChanged {
                agent: PLAYER_ID,
                from: from.name().to_string(),
                to: to.name().to_string(),
            });
            events.push(SimEvent::Died {
                agent: PLAYER_ID,
                kind: AgentKind::Player,
            });
            let (clip, options) = self.player.clip();
            let clip = clip.to_string();
            self.play(PLAYER_ID, &clip, options);
        }
    }

    fn enemy_damaged(&mut self, id: AgentId, remaining: i32, died: bool, events: &mut Vec<SimEvent>) {
        let Some(enemy) = self.enemies.get_mut(id) else {
            return;
        };
        let max = enemy.agent.health.max();
        let change = enemy.brain.on_damaged(died);
        let tag = enemy.tag.clone();

        self.observer.health_changed(id, remaining, max);
        self.observer.hurt_flash(id, self.config.enemy.flash_duration);

        if let Some((from, to)) = change {
            events.push(SimEvent::StateChanged {
                agent: id,
                from: from.name().to_string(),
                to: to.name().to_string(),
            });
            if to == EnemyState::Dead {
                log::info!("{} {} died", tag, id);
                events.push(SimEvent::Died {
                    agent: id,
                    kind: AgentKind::Enemy,
                });
            }
            self.play_enemy_state(id, to);
        }
    }

    fn play_enemy_state(&mut self, id: AgentId, state: EnemyState) {
        let options = if state.plays_once() {
            PlayOptions::once()
        } else {
            PlayOptions::looping().with_fade(self.config.fade_time)
        };
        self.play(id, state.clip(), options);
    }

    /// Play a clip, substituting the fallback clip when the model lacks it
    fn play(&mut self, agent: AgentId, clip: &str, options: PlayOptions) {
        if self.animator.has_clip(agent, clip) {
            self.animator.play_state(agent, clip, options);
            return;
        }
        self.diagnostics.report(&SimError::MissingResource {
            kind: ResourceKind::AnimationClip,
            name: clip.to_string(),
            fallback: FALLBACK_CLIP.to_string(),
        });
        self.animator.play_state(agent, FALLBACK_CLIP, options);
    }
}
