//! Item pool and spawn cadence
//!
//! The spawner owns every item slot. Slots are created lazily up to the
//! active-item cap and recycled first-fit. A freeze suspends both the spawn
//! timer and item motion until its countdown runs out.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::item::{Item, ItemKind};
use crate::settings::Settings;

/// Spawner phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnerState {
    /// Spawning and moving items
    Normal,
    /// Everything holds still for `remaining` more ticks
    Frozen { remaining: f32 },
}

/// Field edge an item enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnEdge {
    Top,
    Bottom,
    Left,
    Right,
}

impl SpawnEdge {
    /// Map a uniform roll in [0, 1) to an edge, 25% each
    pub fn from_roll(roll: f32) -> Self {
        if roll < 0.25 {
            SpawnEdge::Top
        } else if roll < 0.5 {
            SpawnEdge::Bottom
        } else if roll < 0.75 {
            SpawnEdge::Left
        } else {
            SpawnEdge::Right
        }
    }

    /// Start point just outside this edge; `along` in [0, 1) picks the spot on it
    pub fn start_point(self, along: f32, settings: &Settings) -> Vec2 {
        let (w, h) = (settings.field_width, settings.field_height);
        let inset = settings.spawn_edge_inset;
        let margin = settings.spawn_margin;
        let across_x = along * (w - 2.0 * inset).max(0.0) + inset;
        let across_y = along * (h - 2.0 * inset).max(0.0) + inset;
        match self {
            SpawnEdge::Top => Vec2::new(across_x, -margin),
            SpawnEdge::Bottom => Vec2::new(across_x, h + margin),
            SpawnEdge::Left => Vec2::new(-margin, across_y),
            SpawnEdge::Right => Vec2::new(w + margin, across_y),
        }
    }
}

/// Item pool manager and difficulty driver
#[derive(Debug, Clone)]
pub struct Spawner {
    items: Vec<Item>,
    state: SpawnerState,
    spawn_timer: f32,
    base_interval: f32,
    spawn_interval: f32,
    multiplier: f32,
    max_items: usize,
    generation: u32,
    rng: Pcg32,
}

impl Spawner {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        Self {
            items: Vec::with_capacity(settings.max_items),
            state: SpawnerState::Normal,
            spawn_timer: 0.0,
            base_interval: settings.base_spawn_interval,
            spawn_interval: settings.base_spawn_interval,
            multiplier: 1.0,
            max_items: settings.max_items,
            generation: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Advance one tick of `delta` frames
    pub fn update(&mut self, delta: f32, settings: &Settings) {
        if let SpawnerState::Frozen { remaining } = self.state {
            let remaining = remaining - delta;
            self.state = if remaining <= 0.0 {
                log::debug!("Item freeze ended");
                SpawnerState::Normal
            } else {
                SpawnerState::Frozen { remaining }
            };
            return;
        }

        self.spawn_timer += delta;
        if self.spawn_timer >= self.spawn_interval {
            self.spawn_timer = 0.0;
            self.spawn_item(settings);
        }

        for item in &mut self.items {
            item.update(delta, settings);
        }
    }

    /// Hold every item (and the spawn timer) still for `duration` ticks
    pub fn freeze(&mut self, duration: f32) {
        log::debug!("Items frozen for {duration} ticks");
        self.state = SpawnerState::Frozen {
            remaining: duration,
        };
    }

    /// Drop any running freeze; items resume on the next update
    pub fn unfreeze(&mut self) {
        self.state = SpawnerState::Normal;
    }

    /// One spawn attempt. Skipped (returns None) when the active cap is reached.
    pub fn spawn_item(&mut self, settings: &Settings) -> Option<usize> {
        if self.active_count() >= self.max_items {
            return None;
        }

        let kind = ItemKind::from_roll(self.rng.random::<f32>(), settings);
        let slot = self.acquire(kind, settings);

        let edge = SpawnEdge::from_roll(self.rng.random::<f32>());
        let start = edge.start_point(self.rng.random::<f32>(), settings);
        let generation = self.generation;
        self.items[slot].spawn(start.x, start.y, generation, &mut self.rng, settings);
        Some(slot)
    }

    /// First inactive slot, or a new one at the end of the pool
    fn acquire(&mut self, kind: ItemKind, settings: &Settings) -> usize {
        if let Some(item) = self.items.iter_mut().find(|i| !i.active) {
            item.reset_type(kind);
            return item.slot;
        }
        let slot = self.items.len();
        self.items.push(Item::new(slot, kind, settings));
        slot
    }

    /// Spawn interval becomes base / multiplier. Non-positive or non-finite values are ignored.
    pub fn set_spawn_multiplier(&mut self, multiplier: f32) {
        if !(multiplier.is_finite() && multiplier > 0.0) {
            log::warn!("Ignoring invalid spawn multiplier {multiplier}");
            return;
        }
        self.multiplier = multiplier;
        self.spawn_interval = self.base_interval / multiplier;
    }

    pub fn spawn_multiplier(&self) -> f32 {
        self.multiplier
    }

    pub fn spawn_interval(&self) -> f32 {
        self.spawn_interval
    }

    pub fn spawn_timer(&self) -> f32 {
        self.spawn_timer
    }

    pub fn state(&self) -> SpawnerState {
        self.state
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self.state, SpawnerState::Frozen { .. })
    }

    /// Ticks of freeze left, if frozen
    pub fn freeze_remaining(&self) -> Option<f32> {
        match self.state {
            SpawnerState::Frozen { remaining } => Some(remaining),
            SpawnerState::Normal => None,
        }
    }

    /// Items spawned from now on belong to `generation`
    pub fn set_generation(&mut self, generation: u32) {
        self.generation = generation;
    }

    /// Every pooled item, active or not
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [Item] {
        &mut self.items
    }

    pub fn active_items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|i| i.active)
    }

    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|i| i.active).count()
    }

    pub fn pool_size(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawner() -> (Spawner, Settings) {
        let settings = Settings::default();
        (Spawner::new(&settings, 42), settings)
    }

    #[test]
    fn test_spawns_on_interval() {
        let (mut spawner, settings) = spawner();
        for _ in 0..29 {
            spawner.update(1.0, &settings);
        }
        assert_eq!(spawner.active_count(), 0);
        spawner.update(1.0, &settings);
        assert_eq!(spawner.active_count(), 1);
        assert_eq!(spawner.spawn_timer(), 0.0);
    }

    #[test]
    fn test_spawned_items_start_off_field() {
        let (mut spawner, settings) = spawner();
        for _ in 0..20 {
            let slot = spawner.spawn_item(&settings).unwrap();
            let item = &spawner.items()[slot];
            let outside = item.base.x < 0.0
                || item.base.x > settings.field_width
                || item.base.y < 0.0
                || item.base.y > settings.field_height;
            assert!(outside, "item {slot} spawned inside at {:?}", item.base);
            assert!((item.vel.x == 0.0) != (item.vel.y == 0.0));
        }
    }

    #[test]
    fn test_cap_blocks_spawn() {
        let (mut spawner, settings) = spawner();
        for _ in 0..settings.max_items {
            assert!(spawner.spawn_item(&settings).is_some());
        }
        assert_eq!(spawner.active_count(), 25);
        assert!(spawner.spawn_item(&settings).is_none());
        assert_eq!(spawner.active_count(), 25);
        assert_eq!(spawner.pool_size(), 25);
    }

    #[test]
    fn test_pool_reuses_inactive_slots() {
        let (mut spawner, settings) = spawner();
        for n in 1..=settings.max_items {
            for _ in 0..n {
                spawner.spawn_item(&settings);
            }
            let pool = spawner.pool_size();
            for item in spawner.items_mut() {
                item.deactivate();
            }
            let slot = spawner.spawn_item(&settings).unwrap();
            assert_eq!(spawner.pool_size(), pool);
            assert_eq!(slot, 0, "first-fit picks the lowest free slot");
            spawner.items_mut()[0].deactivate();
        }
        assert_eq!(spawner.pool_size(), settings.max_items);
    }

    #[test]
    fn test_freeze_holds_items_and_timer() {
        let (mut spawner, settings) = spawner();
        let slot = spawner.spawn_item(&settings).unwrap();
        for _ in 0..7 {
            spawner.update(1.0, &settings);
        }
        let timer = spawner.spawn_timer();
        let pos = spawner.items()[slot].pos;

        spawner.freeze(180.0);
        for _ in 0..180 {
            spawner.update(1.0, &settings);
            assert_eq!(spawner.items()[slot].pos, pos);
        }
        assert_eq!(spawner.state(), SpawnerState::Normal);
        assert_eq!(spawner.spawn_timer(), timer);
        assert_eq!(spawner.active_count(), 1);

        spawner.update(1.0, &settings);
        assert_eq!(spawner.spawn_timer(), timer + 1.0);
        assert_ne!(spawner.items()[slot].pos, pos);
    }

    #[test]
    fn test_freeze_remaining_counts_down() {
        let (mut spawner, settings) = spawner();
        assert_eq!(spawner.freeze_remaining(), None);
        spawner.freeze(180.0);
        spawner.update(30.0, &settings);
        assert_eq!(spawner.freeze_remaining(), Some(150.0));
        assert!(spawner.is_frozen());
    }

    #[test]
    fn test_unfreeze_resumes_immediately() {
        let (mut spawner, settings) = spawner();
        spawner.freeze(180.0);
        spawner.unfreeze();
        assert_eq!(spawner.state(), SpawnerState::Normal);
        assert_eq!(spawner.freeze_remaining(), None);
        spawner.update(1.0, &settings);
        assert_eq!(spawner.spawn_timer(), 1.0);
    }

    #[test]
    fn test_spawn_multiplier_shortens_interval() {
        let (mut spawner, _) = spawner();
        assert_eq!(spawner.spawn_interval(), 30.0);
        spawner.set_spawn_multiplier(2.0);
        assert_eq!(spawner.spawn_interval(), 15.0);
        let mut last = spawner.spawn_interval();
        for m in [3.0, 10.0, 1000.0, 1e30] {
            spawner.set_spawn_multiplier(m);
            assert!(spawner.spawn_interval() < last);
            assert!(spawner.spawn_interval() > 0.0);
            last = spawner.spawn_interval();
        }
    }

    #[test]
    fn test_invalid_multiplier_ignored() {
        let (mut spawner, _) = spawner();
        spawner.set_spawn_multiplier(2.0);
        for m in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            spawner.set_spawn_multiplier(m);
            assert_eq!(spawner.spawn_interval(), 15.0);
        }
    }

    #[test]
    fn test_edge_rolls() {
        assert_eq!(SpawnEdge::from_roll(0.1), SpawnEdge::Top);
        assert_eq!(SpawnEdge::from_roll(0.3), SpawnEdge::Bottom);
        assert_eq!(SpawnEdge::from_roll(0.6), SpawnEdge::Left);
        assert_eq!(SpawnEdge::from_roll(0.9), SpawnEdge::Right);

        let settings = Settings::default();
        assert_eq!(
            SpawnEdge::Right.start_point(0.0, &settings),
            Vec2::new(660.0, 20.0)
        );
        assert_eq!(
            SpawnEdge::Top.start_point(0.5, &settings),
            Vec2::new(300.0, -60.0)
        );
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let settings = Settings::default();
        let mut a = Spawner::new(&settings, 5);
        let mut b = Spawner::new(&settings, 5);
        for _ in 0..10 {
            a.spawn_item(&settings);
            b.spawn_item(&settings);
        }
        for (x, y) in a.items().iter().zip(b.items()) {
            assert_eq!(x.kind, y.kind);
            assert_eq!(x.base, y.base);
            assert_eq!(x.vel, y.vel);
        }
    }
}
