//! Game settings and balance tuning
//!
//! Every tunable constant of the simulation lives here so a session can be
//! configured from JSON without recompiling. Defaults match the shipped game.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("unknown quality preset `{0}`")]
    UnknownPreset(String),
}

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Particle pool size for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 10,
            QualityPreset::Medium => 30,
            QualityPreset::High => 60,
        }
    }

    /// Whether per-pixel collision is attempted at all
    pub fn pixel_perfect(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }

    /// Pixel stride of the fine collision phase (higher = faster, coarser)
    pub fn sample_stride(&self) -> u32 {
        match self {
            QualityPreset::Low | QualityPreset::Medium => 6,
            QualityPreset::High => 3,
        }
    }
}

impl FromStr for QualityPreset {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(QualityPreset::Low),
            "medium" | "med" => Ok(QualityPreset::Medium),
            "high" => Ok(QualityPreset::High),
            _ => Err(SettingsError::UnknownPreset(s.to_string())),
        }
    }
}

/// Game settings and balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Collision / effects quality preset
    pub quality: QualityPreset,

    // === Play field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Avatar ===
    /// Inset used when clamping the avatar to the field
    pub avatar_radius: f32,
    /// Side of the avatar's square collision box
    pub avatar_box: f32,
    /// Keyboard acceleration per tick
    pub avatar_acceleration: f32,
    /// Velocity retained per tick with no keyboard input
    pub avatar_friction: f32,
    /// Top speed in units per tick (before the slow multiplier)
    pub avatar_max_speed: f32,
    /// Fraction of the remaining pointer distance covered per tick
    pub pointer_lerp: f32,

    // === Items ===
    /// Side of an item's square collision box
    pub item_box: f32,
    pub item_min_speed: f32,
    pub item_max_speed: f32,
    /// Lateral wave amplitude in units
    pub wave_amplitude: f32,
    /// Wave phase advance in radians per tick
    pub wave_frequency: f32,
    /// How far outside the field new items appear
    pub spawn_margin: f32,
    /// Keeps spawn coordinates away from the field corners
    pub spawn_edge_inset: f32,

    // === Spawner ===
    /// Ticks between spawn attempts at multiplier 1
    pub base_spawn_interval: f32,
    /// Cap on concurrently active items (and on pool size)
    pub max_items: usize,
    /// Rolls at or above this are FREEZE items
    pub freeze_threshold: f32,
    /// Rolls below this are HARMFUL items; the rest are BENEFICIAL
    pub harmful_threshold: f32,

    // === Collision ===
    /// Attempt per-pixel tests when both sides have hit-masks
    pub pixel_perfect: bool,
    pub sample_stride: u32,
    /// Fraction of each box's width removed from both sides in the broad phase
    pub broad_phase_shrink: f32,

    // === Feedback ===
    pub particles: bool,
    pub max_particles: usize,

    // === Session ===
    /// Optional time limit; running out ends the game
    pub time_limit_secs: Option<f32>,
}

impl Default for Settings {
    fn default() -> Self {
        let quality = QualityPreset::Medium;
        Self {
            quality,

            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            avatar_radius: 30.0,
            avatar_box: 60.0,
            avatar_acceleration: 0.8,
            avatar_friction: 0.92,
            avatar_max_speed: 12.0,
            pointer_lerp: 0.04,

            item_box: 40.0,
            item_min_speed: 4.0,
            item_max_speed: 8.0,
            wave_amplitude: 30.0,
            wave_frequency: 0.05,
            spawn_margin: 60.0,
            spawn_edge_inset: 20.0,

            base_spawn_interval: 30.0,
            max_items: 25,
            freeze_threshold: 0.95,
            harmful_threshold: 0.285,

            pixel_perfect: quality.pixel_perfect(),
            sample_stride: quality.sample_stride(),
            broad_phase_shrink: 0.2,

            particles: true,
            max_particles: quality.max_particles(),

            time_limit_secs: None,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        self.pixel_perfect = preset.pixel_perfect();
        self.sample_stride = preset.sample_stride();
        self.max_particles = preset.max_particles();
    }

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> SettingsError {
            SettingsError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if !(self.field_width > 0.0 && self.field_height > 0.0) {
            return Err(invalid("field_width", "field dimensions must be positive"));
        }
        let shortest_side = self.field_width.min(self.field_height);
        if self.avatar_radius < 0.0 || 2.0 * self.avatar_radius > shortest_side {
            return Err(invalid("avatar_radius", "avatar must fit inside the field"));
        }
        if !(self.avatar_max_speed > 0.0) {
            return Err(invalid("avatar_max_speed", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.avatar_friction) {
            return Err(invalid("avatar_friction", "must be within [0, 1]"));
        }
        if !(self.item_min_speed > 0.0 && self.item_min_speed <= self.item_max_speed) {
            return Err(invalid(
                "item_min_speed",
                format!(
                    "speed range [{}, {}] is empty or non-positive",
                    self.item_min_speed, self.item_max_speed
                ),
            ));
        }
        if !(self.base_spawn_interval > 0.0) {
            return Err(invalid("base_spawn_interval", "must be positive"));
        }
        if self.max_items == 0 {
            return Err(invalid("max_items", "must allow at least one item"));
        }
        if !(0.0 <= self.harmful_threshold
            && self.harmful_threshold <= self.freeze_threshold
            && self.freeze_threshold <= 1.0)
        {
            return Err(invalid(
                "freeze_threshold",
                "thresholds must satisfy 0 <= harmful <= freeze <= 1",
            ));
        }
        if self.sample_stride == 0 {
            return Err(invalid("sample_stride", "must be at least 1"));
        }
        if !(0.0..0.5).contains(&self.broad_phase_shrink) {
            return Err(invalid("broad_phase_shrink", "must be within [0, 0.5)"));
        }
        if let Some(limit) = self.time_limit_secs {
            if !(limit > 0.0) {
                return Err(invalid("time_limit_secs", "must be positive when set"));
            }
        }
        Ok(())
    }

    /// Effective particle pool size
    pub fn effective_max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.max_particles
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.field_width, 600.0);
        assert_eq!(settings.field_height, 1066.0);
        assert_eq!(settings.max_items, 25);
    }

    #[test]
    fn test_from_json_partial_uses_defaults() {
        let settings = Settings::from_json(r#"{ "max_items": 5, "quality": "High" }"#).unwrap();
        assert_eq!(settings.max_items, 5);
        assert_eq!(settings.quality, QualityPreset::High);
        assert_eq!(settings.avatar_max_speed, 12.0);
    }

    #[test]
    fn test_from_json_rejects_inverted_speed_range() {
        let err = Settings::from_json(r#"{ "item_min_speed": 9.0, "item_max_speed": 3.0 }"#)
            .unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "item_min_speed", .. }));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = Settings::from_json("not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_validate_rejects_zero_stride_and_bad_shrink() {
        let mut settings = Settings::default();
        settings.sample_stride = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.broad_phase_shrink = 0.5;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_low_preset_disables_pixel_collision() {
        let settings = Settings::from_preset(QualityPreset::Low);
        assert!(!settings.pixel_perfect);
        assert_eq!(settings.max_particles, 10);

        let settings = Settings::from_preset(QualityPreset::High);
        assert!(settings.pixel_perfect);
        assert_eq!(settings.sample_stride, 3);
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!("med".parse::<QualityPreset>().unwrap(), QualityPreset::Medium);
        assert_eq!("HIGH".parse::<QualityPreset>().unwrap(), QualityPreset::High);
        assert!("ultra".parse::<QualityPreset>().is_err());
    }

    #[test]
    fn test_particles_toggle() {
        let mut settings = Settings::default();
        assert_eq!(settings.effective_max_particles(), 30);
        settings.particles = false;
        assert_eq!(settings.effective_max_particles(), 0);
    }
}
