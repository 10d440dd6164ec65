//! Score and pickup effects
//!
//! All score changes go through [`Score::apply_effect`], which keeps the
//! zero floor in one place. Timed effects are only named here; the tick
//! decides what a named effect does to the world.

use serde::{Deserialize, Serialize};

use super::item::ItemKind;
use crate::consts::*;

/// Named effect triggered by a pickup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Avatar moves at reduced speed for a while
    Slow,
    /// Items and spawning pause for a while
    Freeze,
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Slow => "slow",
            Effect::Freeze => "freeze",
        }
    }
}

/// What collecting one item did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectOutcome {
    /// Score change actually applied (after the zero floor)
    pub delta: i64,
    pub effect: Option<Effect>,
}

/// Session score, never negative
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    value: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Apply the score change for a collected item and name its effect
    pub fn apply_effect(&mut self, kind: ItemKind) -> EffectOutcome {
        let before = self.value;
        let effect = match kind {
            ItemKind::Beneficial => {
                self.value = self.value.saturating_add(BENEFICIAL_SCORE);
                None
            }
            ItemKind::Harmful => {
                self.value = self.value.saturating_sub(HARMFUL_PENALTY);
                Some(Effect::Slow)
            }
            ItemKind::Freeze => Some(Effect::Freeze),
        };
        EffectOutcome {
            delta: i64::from(self.value) - i64::from(before),
            effect,
        }
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }
}

/// Spawn-rate multiplier for the difficulty tier a score falls in
pub fn spawn_multiplier_for(score: u32) -> f32 {
    if score >= FAST_SPAWN_SCORE {
        FAST_SPAWN_MULTIPLIER
    } else {
        1.0
    }
}

/// Whether a score ends the session in victory
pub fn is_victory_score(score: u32) -> bool {
    score >= VICTORY_SCORE
}
