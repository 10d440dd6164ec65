//! Drifting items
//!
//! Items are pooled: a slot is spawned, travels across the field along one
//! axis while waving sideways, and is deactivated (never freed) once it
//! leaves through the edge it was heading for.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Collider, SpritePlacement};
use super::geometry::Aabb;
use super::hitmask::VisualId;
use crate::consts::ITEM_EXIT_MARGIN;
use crate::settings::Settings;

/// Maximum visual tilt while waving (radians)
const WAVE_TILT: f32 = 0.25;

/// Item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Collect for points
    Beneficial,
    /// Costs points and slows the avatar
    Harmful,
    /// Freezes every item in place for a while
    Freeze,
}

impl ItemKind {
    /// Map a uniform roll in [0, 1) to a kind using the configured thresholds
    pub fn from_roll(roll: f32, settings: &Settings) -> Self {
        if roll >= settings.freeze_threshold {
            ItemKind::Freeze
        } else if roll < settings.harmful_threshold {
            ItemKind::Harmful
        } else {
            ItemKind::Beneficial
        }
    }

    /// Texture this kind is drawn with
    pub fn visual(self) -> VisualId {
        match self {
            ItemKind::Beneficial => VisualId::ItemBeneficial,
            ItemKind::Harmful => VisualId::ItemHarmful,
            ItemKind::Freeze => VisualId::ItemFreeze,
        }
    }
}

/// Direction of travel, fixed at spawn from the entry edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    Down,
    Up,
    Right,
    Left,
}

impl Heading {
    /// Entry above the field heads down, below heads up, and so on.
    /// A point inside the field heads down.
    pub fn from_entry(pos: Vec2, field: Vec2) -> Self {
        if pos.y < 0.0 {
            Heading::Down
        } else if pos.y > field.y {
            Heading::Up
        } else if pos.x < 0.0 {
            Heading::Right
        } else if pos.x > field.x {
            Heading::Left
        } else {
            Heading::Down
        }
    }

    #[inline]
    pub fn unit(self) -> Vec2 {
        match self {
            Heading::Down => Vec2::Y,
            Heading::Up => Vec2::NEG_Y,
            Heading::Right => Vec2::X,
            Heading::Left => Vec2::NEG_X,
        }
    }

    /// Axis the wave is applied on (perpendicular to travel)
    #[inline]
    pub fn wave_axis(self) -> Vec2 {
        match self {
            Heading::Down | Heading::Up => Vec2::X,
            Heading::Right | Heading::Left => Vec2::Y,
        }
    }

    /// Whether `base` is past the exit edge for this heading
    pub fn has_exited(self, base: Vec2, field: Vec2) -> bool {
        match self {
            Heading::Down => base.y > field.y + ITEM_EXIT_MARGIN,
            Heading::Up => base.y < -ITEM_EXIT_MARGIN,
            Heading::Right => base.x > field.x + ITEM_EXIT_MARGIN,
            Heading::Left => base.x < -ITEM_EXIT_MARGIN,
        }
    }
}

/// A pooled item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Pool slot index
    pub slot: usize,
    pub kind: ItemKind,
    pub active: bool,
    /// Unwaved anchor position
    pub base: Vec2,
    /// Drawn position (base + wave offset)
    pub pos: Vec2,
    /// Exactly one axis is nonzero while active
    pub vel: Vec2,
    pub heading: Heading,
    /// Wave phase, radians; only ever increases
    pub phase: f32,
    /// Session generation this item was spawned in
    pub generation: u32,
    box_size: f32,
}

impl Item {
    /// An inactive item for slot `slot`
    pub fn new(slot: usize, kind: ItemKind, settings: &Settings) -> Self {
        Self {
            slot,
            kind,
            active: false,
            base: Vec2::ZERO,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            heading: Heading::Down,
            phase: 0.0,
            generation: 0,
            box_size: settings.item_box,
        }
    }

    /// Activate at `(x, y)` with a random speed and wave phase
    pub fn spawn<R: Rng>(
        &mut self,
        x: f32,
        y: f32,
        generation: u32,
        rng: &mut R,
        settings: &Settings,
    ) {
        let field = Vec2::new(settings.field_width, settings.field_height);
        let speed = rng.random_range(settings.item_min_speed..=settings.item_max_speed);

        self.base = Vec2::new(x, y);
        self.heading = Heading::from_entry(self.base, field);
        self.vel = self.heading.unit() * speed;
        self.phase = rng.random_range(0.0..TAU);
        self.generation = generation;
        self.active = true;
        self.apply_wave(settings);
    }

    /// Swap the kind of a recycled slot
    pub fn reset_type(&mut self, kind: ItemKind) {
        self.kind = kind;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Advance one tick of `delta` frames
    pub fn update(&mut self, delta: f32, settings: &Settings) {
        if !self.active {
            return;
        }

        self.base += self.vel * delta;
        self.phase += settings.wave_frequency * delta;
        self.apply_wave(settings);

        let field = Vec2::new(settings.field_width, settings.field_height);
        if self.heading.has_exited(self.base, field) {
            self.deactivate();
        }
    }

    /// Current lateral offset from the base path
    pub fn wave_offset(&self, settings: &Settings) -> f32 {
        self.phase.sin() * settings.wave_amplitude
    }

    /// Tilt for drawing, follows the wave's slope
    pub fn wave_rotation(&self) -> f32 {
        self.phase.cos() * WAVE_TILT
    }

    fn apply_wave(&mut self, settings: &Settings) {
        self.pos = self.base + self.heading.wave_axis() * self.wave_offset(settings);
    }
}

impl Collider for Item {
    fn bounding_box(&self) -> Aabb {
        Aabb::centered(self.pos, Vec2::splat(self.box_size))
    }

    fn sprite(&self) -> Option<SpritePlacement> {
        Some(SpritePlacement {
            rotation: self.wave_rotation(),
            ..SpritePlacement::centered(self.kind.visual(), self.pos)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn spawned_at(x: f32, y: f32) -> (Item, Settings) {
        let settings = Settings::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut item = Item::new(0, ItemKind::Beneficial, &settings);
        item.spawn(x, y, 0, &mut rng, &settings);
        (item, settings)
    }

    #[test]
    fn test_spawn_above_moves_down() {
        let (item, _) = spawned_at(300.0, -60.0);
        assert!(item.active);
        assert_eq!(item.heading, Heading::Down);
        assert!(item.vel.y > 0.0);
        assert_eq!(item.vel.x, 0.0);
        assert!((4.0..=8.0).contains(&item.vel.y));
    }

    #[test]
    fn test_spawn_right_moves_left() {
        let (item, _) = spawned_at(660.0, 400.0);
        assert_eq!(item.heading, Heading::Left);
        assert!(item.vel.x < 0.0);
        assert_eq!(item.vel.y, 0.0);
    }

    #[test]
    fn test_spawn_below_and_left() {
        let (item, _) = spawned_at(300.0, 1126.0);
        assert!(item.vel.y < 0.0 && item.vel.x == 0.0);
        let (item, _) = spawned_at(-60.0, 500.0);
        assert!(item.vel.x > 0.0 && item.vel.y == 0.0);
    }

    #[test]
    fn test_wave_is_perpendicular_to_travel() {
        let (mut item, settings) = spawned_at(300.0, -60.0);
        for _ in 0..10 {
            item.update(1.0, &settings);
            assert_eq!(item.pos.y, item.base.y);
            assert!((item.pos.x - item.base.x).abs() <= settings.wave_amplitude + 1e-4);
        }

        let (mut item, settings) = spawned_at(-60.0, 500.0);
        item.update(1.0, &settings);
        assert_eq!(item.pos.x, item.base.x);
        assert_eq!(item.base.y, 500.0);
    }

    #[test]
    fn test_phase_advances_by_frequency() {
        let (mut item, settings) = spawned_at(300.0, -60.0);
        let phase = item.phase;
        item.update(2.0, &settings);
        assert!((item.phase - (phase + 0.1)).abs() < 1e-5);
    }

    #[test]
    fn test_deactivates_past_exit_edge_only() {
        let (mut item, settings) = spawned_at(300.0, -60.0);
        item.vel = Vec2::new(0.0, 8.0);
        let mut ticks = 0;
        while item.active {
            item.update(1.0, &settings);
            ticks += 1;
            assert!(ticks < 1000);
        }
        assert!(item.base.y > 1066.0 + 100.0);
        assert!(item.base.y <= 1066.0 + 100.0 + 8.0);
    }

    #[test]
    fn test_lateral_drift_does_not_deactivate() {
        let (mut item, settings) = spawned_at(300.0, -60.0);
        // Far off the left edge sideways, still travelling down inside the field
        item.base = Vec2::new(-500.0, 400.0);
        item.update(1.0, &settings);
        assert!(item.active);

        // Heading up: only the top edge counts
        let (mut item, settings) = spawned_at(300.0, 1126.0);
        item.base = Vec2::new(300.0, 1400.0);
        item.update(1.0, &settings);
        assert!(item.active);
        item.base = Vec2::new(300.0, -95.0);
        item.vel = Vec2::new(0.0, -6.0);
        item.update(1.0, &settings);
        assert!(!item.active);
    }

    #[test]
    fn test_horizontal_travel_exits_on_its_own_edge() {
        // Entering from the left heads right
        let (mut item, settings) = spawned_at(-60.0, 500.0);
        assert_eq!(item.heading, Heading::Right);
        item.vel = Vec2::new(5.0, 0.0);
        item.base = Vec2::new(699.0, 500.0);
        item.update(1.0, &settings);
        assert!(!item.active, "right exit is past field_width + 100");

        // Entering from the right heads left
        let (mut item, settings) = spawned_at(660.0, 500.0);
        assert_eq!(item.heading, Heading::Left);
        item.vel = Vec2::new(-5.0, 0.0);
        item.base = Vec2::new(-97.0, 500.0);
        item.update(1.0, &settings);
        assert!(!item.active, "left exit is below -100");
    }

    #[test]
    fn test_vertical_overrun_does_not_end_horizontal_travel() {
        let (mut item, settings) = spawned_at(-60.0, 500.0);
        item.base = Vec2::new(300.0, 1066.0 + 400.0);
        item.update(1.0, &settings);
        assert!(item.active);
        item.base = Vec2::new(300.0, -400.0);
        item.update(1.0, &settings);
        assert!(item.active);

        let (mut item, settings) = spawned_at(660.0, 500.0);
        item.base = Vec2::new(300.0, -400.0);
        item.update(1.0, &settings);
        assert!(item.active);
    }

    #[test]
    fn test_inactive_item_does_not_move() {
        let (mut item, settings) = spawned_at(300.0, -60.0);
        item.deactivate();
        let (base, phase) = (item.base, item.phase);
        item.update(1.0, &settings);
        assert_eq!(item.base, base);
        assert_eq!(item.phase, phase);
    }

    #[test]
    fn test_kind_from_roll_thresholds() {
        let settings = Settings::default();
        assert_eq!(ItemKind::from_roll(0.0, &settings), ItemKind::Harmful);
        assert_eq!(ItemKind::from_roll(0.284, &settings), ItemKind::Harmful);
        assert_eq!(ItemKind::from_roll(0.285, &settings), ItemKind::Beneficial);
        assert_eq!(ItemKind::from_roll(0.949, &settings), ItemKind::Beneficial);
        assert_eq!(ItemKind::from_roll(0.95, &settings), ItemKind::Freeze);
        assert_eq!(ItemKind::from_roll(0.999, &settings), ItemKind::Freeze);
    }

    #[test]
    fn test_reset_type_keeps_slot() {
        let (mut item, _) = spawned_at(300.0, -60.0);
        item.reset_type(ItemKind::Freeze);
        assert_eq!(item.kind, ItemKind::Freeze);
        assert_eq!(item.slot, 0);
        assert_eq!(item.sprite().map(|s| s.visual), Some(VisualId::ItemFreeze));
    }
}
