//! Collaborator interfaces
//!
//! The simulation owns no rendering, animation or input code. It reads an
//! [`InputSnapshot`] each frame and reports outward through these traits.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use rising_core::AgentId;
use rising_level::{CellType, GridLevel};
use rising_math::Vec3;
use rising_physics::CollisionVolume;
use serde::{Deserialize, Serialize};

/// Clip substituted when a requested one does not exist
pub const FALLBACK_CLIP: &str = "idle";

/// Player input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSnapshot {
    /// Desired movement on the ground plane, x and z in [-1, 1]
    pub move_axes: [f32; 2],
    pub attack_pressed: bool,
    pub block_held: bool,
    pub dodge_pressed: bool,
    /// Cursor projected onto the ground
    pub cursor_world_point: Option<Vec3>,
}

impl InputSnapshot {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn moving(x: f32, z: f32) -> Self {
        Self {
            move_axes: [x, z],
            ..Default::default()
        }
    }

    pub fn with_attack(mut self) -> Self {
        self.attack_pressed = true;
        self
    }

    pub fn with_block(mut self) -> Self {
        self.block_held = true;
        self
    }

    pub fn with_dodge(mut self) -> Self {
        self.dodge_pressed = true;
        self
    }

    pub fn with_cursor(mut self, point: Vec3) -> Self {
        self.cursor_world_point = Some(point);
        self
    }

    /// Movement direction, normalized so diagonals are not faster
    pub fn move_direction(&self) -> Option<Vec3> {
        let [x, z] = self.move_axes;
        let direction = Vec3::ground(x, z);
        if !direction.is_finite() || direction.length_squared() < 1e-6 {
            return None;
        }
        Some(direction.normalize_or_zero())
    }
}

/// How a clip should be played
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayOptions {
    /// Play once and hold, instead of looping
    pub once: bool,
    pub fade_time: f32,
    pub time_scale: f32,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            once: false,
            fade_time: 0.2,
            time_scale: 1.0,
        }
    }
}

impl PlayOptions {
    pub fn looping() -> Self {
        Self::default()
    }

    pub fn once() -> Self {
        Self {
            once: true,
            ..Default::default()
        }
    }

    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn with_fade(mut self, fade_time: f32) -> Self {
        self.fade_time = fade_time;
        self
    }
}

/// Animation playback
///
/// One-shot clips report completion back through
/// `Simulation::notify_animation_finished`.
pub trait AnimationDriver {
    /// Whether the agent's model has this clip
    fn has_clip(&self, _agent: AgentId, _clip: &str) -> bool {
        true
    }

    /// Play the clip for an agent's new state
    fn play_state(&mut self, agent: AgentId, clip: &str, options: PlayOptions);
}

/// Health bar and hit-flash display
pub trait HealthObserver {
    fn health_changed(&mut self, agent: AgentId, current: i32, max: i32);

    /// The agent was hurt and should flash for `duration`
    fn hurt_flash(&mut self, _agent: AgentId, _duration: f32) {}
}

/// Where the level comes from
pub trait LevelSource {
    /// Static collision geometry, built once
    fn static_volumes(&self) -> Vec<CollisionVolume>;

    fn player_spawn(&self) -> Vec3;

    /// Enemy spawns as `(archetype tag, point)`
    fn enemy_spawns(&self) -> Vec<(String, Vec3)>;

    /// Cell at grid coordinates, None for sources without a grid
    fn cell_at(&self, _x: usize, _z: usize) -> Option<CellType> {
        None
    }

    /// Grid coordinates of a world point, None outside the grid
    fn world_to_grid(&self, _point: Vec3) -> Option<(usize, usize)> {
        None
    }
}

impl LevelSource for GridLevel {
    fn static_volumes(&self) -> Vec<CollisionVolume> {
        GridLevel::static_volumes(self)
    }

    fn player_spawn(&self) -> Vec3 {
        self.spawn_point()
    }

    fn enemy_spawns(&self) -> Vec<(String, Vec3)> {
        GridLevel::enemy_spawns(self)
    }

    fn cell_at(&self, x: usize, z: usize) -> Option<CellType> {
        GridLevel::cell_at(self, x, z).cloned()
    }

    fn world_to_grid(&self, point: Vec3) -> Option<(usize, usize)> {
        GridLevel::world_to_grid(self, point)
    }
}

/// Level with no geometry and no enemies
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenField {
    pub spawn: Vec3,
}

impl LevelSource for OpenField {
    fn static_volumes(&self) -> Vec<CollisionVolume> {
        Vec::new()
    }

    fn player_spawn(&self) -> Vec3 {
        self.spawn
    }

    fn enemy_spawns(&self) -> Vec<(String, Vec3)> {
        Vec::new()
    }
}

/// Collaborator that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl AnimationDriver for Headless {
    fn play_state(&mut self, _agent: AgentId, _clip: &str, _options: PlayOptions) {}
}

impl HealthObserver for Headless {
    fn health_changed(&mut self, _agent: AgentId, _current: i32, _max: i32) {}
}

/// One recorded clip request
#[derive(Debug, Clone, PartialEq)]
pub struct PlayRecord {
    pub agent: AgentId,
    pub clip: String,
    pub options: PlayOptions,
}

/// Animation driver that records every request
///
/// Clones share the same log, so a host can keep one handle and give the
/// other to the simulation.
#[derive(Debug, Clone, Default)]
pub struct AnimationRecorder {
    log: Arc<Mutex<Vec<PlayRecord>>>,
    /// Clips the model has, all clips when None
    clips: Option<Arc<HashSet<String>>>,
}

impl AnimationRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only report the listed clips as present
    pub fn with_clips<I, S>(mut self, clips: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clips = Some(Arc::new(clips.into_iter().map(Into::into).collect()));
        self
    }

    pub fn records(&self) -> Vec<PlayRecord> {
        self.log.lock().clone()
    }

    /// Clips played for one agent, in order
    pub fn clips_for(&self, agent: AgentId) -> Vec<String> {
        self.log
            .lock()
            .iter()
            .filter(|record| record.agent == agent)
            .map(|record| record.clip.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.log.lock().clear();
    }
}

impl AnimationDriver for AnimationRecorder {
    fn has_clip(&self, _agent: AgentId, clip: &str) -> bool {
        self.clips
            .as_ref()
            .map_or(true, |clips| clips.contains(clip))
    }

    fn play_state(&mut self, agent: AgentId, clip: &str, options: PlayOptions) {
        self.log.lock().push(PlayRecord {
            agent,
            clip: clip.to_string(),
            options,
        });
    }
}

/// Health observer that records every update
#[derive(Debug, Clone, Default)]
pub struct HealthRecorder {
    changes: Arc<Mutex<Vec<(AgentId, i32, i32)>>>,
    flashes: Arc<Mutex<Vec<AgentId>>>,
}

impl HealthRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(agent, current, max)` in arrival order
    pub fn changes(&self) -> Vec<(AgentId, i32, i32)> {
        self.changes.lock().clone()
    }

    pub fn flashes(&self) -> Vec<AgentId> {
        self.flashes.lock().clone()
    }
}

impl HealthObserver for HealthRecorder {
    fn health_changed(&mut self, agent: AgentId, current: i32, max: i32) {
        self.changes.lock().push((agent, current, max));
    }

    fn hurt_flash(&mut self, agent: AgentId, _duration: f32) {
        self.flashes.lock().push(agent);
    }
}
