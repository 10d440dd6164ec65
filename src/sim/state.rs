//! Game state and session lifecycle
//!
//! Everything a tick reads or writes lives in [`GameState`]. Rendering and UI
//! poll the read accessors once per frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::avatar::Avatar;
use super::collision::CollisionConfig;
use super::effects::Score;
use super::hitmask::{HitMaskCache, MaskSource, VisualId};
use super::item::{Item, ItemKind};
use super::particles::ParticlePool;
use super::spawner::Spawner;
use crate::settings::{Settings, SettingsError};
use crate::ticks_to_secs;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Score target reached; waiting for restart
    Victory,
    /// Time ran out; waiting for restart
    GameOver,
}

/// Things that happened during the last tick, for sound/UI hooks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Collected {
        kind: ItemKind,
        pos: Vec2,
        delta: i64,
    },
    FreezeStarted,
    SlowStarted,
    SlowEnded,
    Victory,
    GameOver,
    Restarted,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for item and particle randomness
    pub seed: u64,
    pub settings: Settings,
    pub phase: GamePhase,
    pub avatar: Avatar,
    pub spawner: Spawner,
    /// Feedback sparkles (not gameplay-affecting)
    pub particles: ParticlePool,
    /// Hit-masks, filled once before the first tick
    pub masks: HitMaskCache,
    pub collision: CollisionConfig,
    pub score: Score,
    /// Ticks of slow debuff left, if slowed
    pub slow_ticks: Option<f32>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Frame-scaled time played this session
    pub elapsed: f32,
    /// Movement time since the last trail sparkle
    pub trail_timer: f32,
    /// Bumped on restart; only items of the current generation collide
    pub generation: u32,
    /// Events of the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session with validated settings
    pub fn new(seed: u64, settings: Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self::build(seed, settings))
    }

    /// Create a session with default settings
    pub fn with_seed(seed: u64) -> Self {
        Self::build(seed, Settings::default())
    }

    fn build(seed: u64, settings: Settings) -> Self {
        Self {
            seed,
            phase: GamePhase::Playing,
            avatar: Avatar::new(&settings),
            spawner: Spawner::new(&settings, seed),
            particles: ParticlePool::new(
                settings.effective_max_particles(),
                seed.wrapping_add(1),
            ),
            masks: HitMaskCache::new(),
            collision: CollisionConfig::from(&settings),
            score: Score::new(),
            slow_ticks: None,
            time_ticks: 0,
            elapsed: 0.0,
            trail_timer: 0.0,
            generation: 0,
            events: Vec::new(),
            settings,
        }
    }

    /// Build hit-masks for every game visual. Call once after assets load,
    /// before the first tick. Returns how many visuals got a mask.
    pub fn load_hit_masks(&mut self, source: &dyn MaskSource) -> usize {
        let count = self.masks.generate_all(VisualId::ALL, source);
        log::info!(
            "Hit-masks ready: {}/{} visuals",
            count,
            VisualId::ALL.len()
        );
        count
    }

    /// Reset score, timers, avatar and difficulty for a new session.
    ///
    /// Items in flight keep moving and stay visible but no longer collide;
    /// their slots are recycled normally. A running freeze is cancelled.
    pub fn restart(&mut self) {
        self.score.reset();
        self.avatar.reset(&self.settings);
        self.spawner.set_spawn_multiplier(1.0);
        self.spawner.unfreeze();
        self.particles.clear();
        self.slow_ticks = None;
        self.elapsed = 0.0;
        self.trail_timer = 0.0;
        self.generation = self.generation.wrapping_add(1);
        self.spawner.set_generation(self.generation);
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::Restarted);
        log::info!("Session restarted (generation {})", self.generation);
    }

    pub fn score(&self) -> u32 {
        self.score.value()
    }

    pub fn is_victory(&self) -> bool {
        self.phase == GamePhase::Victory
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Seconds of item freeze left, if frozen
    pub fn freeze_remaining_secs(&self) -> Option<f32> {
        self.spawner.freeze_remaining().map(ticks_to_secs)
    }

    /// Seconds of slow debuff left, if slowed
    pub fn slow_remaining_secs(&self) -> Option<f32> {
        self.slow_ticks.map(ticks_to_secs)
    }

    /// Seconds left under the session time limit, if one is set
    pub fn time_remaining_secs(&self) -> Option<f32> {
        self.settings
            .time_limit_secs
            .map(|limit| (limit - ticks_to_secs(self.elapsed)).max(0.0))
    }

    /// Every pooled item (inactive ones must not be drawn)
    pub fn items(&self) -> &[Item] {
        self.spawner.items()
    }

    /// Whether an item currently takes part in collisions
    pub fn is_collidable(&self, item: &Item) -> bool {
        item.active && item.generation == self.generation
    }
}
