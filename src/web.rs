//! Browser bindings
//!
//! The JS renderer owns the canvas and the frame loop. It forwards input
//! events here, calls `tick` once per animation frame and reads positions
//! back for drawing.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, InputState, Key, ShapeRasterizer, tick};

/// Largest frame delta accepted from the browser (tab switches etc.)
const MAX_FRAME_DELTA: f32 = 3.0;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Fairy Drift starting...");
}

/// Game instance handed to JS
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    input: InputState,
}

#[wasm_bindgen]
impl WebGame {
    /// New session; `settings_json` may be empty for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, settings_json: &str) -> Result<WebGame, JsError> {
        let settings = if settings_json.trim().is_empty() {
            Settings::default()
        } else {
            Settings::from_json(settings_json)?
        };
        let home = Vec2::new(settings.field_width / 2.0, settings.field_height / 2.0);
        let state = GameState::new(seed, settings)?;
        Ok(Self {
            state,
            input: InputState::new(home),
        })
    }

    /// Build hit-masks from the placeholder shapes. Returns how many loaded.
    pub fn load_placeholder_masks(&mut self) -> usize {
        let source = ShapeRasterizer::placeholders(
            self.state.settings.avatar_box,
            self.state.settings.item_box,
        );
        self.state.load_hit_masks(&source)
    }

    /// Advance one animation frame; `delta` is in 60 Hz frames
    pub fn tick(&mut self, delta: f32) {
        let input = self.input.take_tick_input();
        tick(&mut self.state, &input, delta.min(MAX_FRAME_DELTA));
    }

    pub fn key_down(&mut self, code: &str) {
        if let Some(key) = Key::from_code(code) {
            self.input.key_down(key);
        } else if code == "Space" || code == "Enter" {
            self.input.request_restart();
        }
    }

    pub fn key_up(&mut self, code: &str) {
        if let Some(key) = Key::from_code(code) {
            self.input.key_up(key);
        }
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.input.pointer_down(Vec2::new(x, y));
        if self.state.phase != GamePhase::Playing {
            self.input.request_restart();
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.input.pointer_move(Vec2::new(x, y));
    }

    pub fn pointer_up(&mut self) {
        self.input.pointer_up();
    }

    pub fn restart(&mut self) {
        self.state.restart();
    }

    pub fn score(&self) -> u32 {
        self.state.score()
    }

    pub fn is_victory(&self) -> bool {
        self.state.is_victory()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn avatar_x(&self) -> f32 {
        self.state.avatar.pos.x
    }

    pub fn avatar_y(&self) -> f32 {
        self.state.avatar.pos.y
    }

    pub fn avatar_vx(&self) -> f32 {
        self.state.avatar.vel.x
    }

    pub fn avatar_vy(&self) -> f32 {
        self.state.avatar.vel.y
    }

    /// Whether the avatar should be drawn dimmed
    pub fn avatar_impaired(&self) -> bool {
        self.state.avatar.is_impaired()
    }

    /// Seconds of item freeze left, or -1 when not frozen
    pub fn freeze_remaining(&self) -> f32 {
        self.state.freeze_remaining_secs().unwrap_or(-1.0)
    }

    /// Seconds of slow debuff left, or -1 when not slowed
    pub fn slow_remaining(&self) -> f32 {
        self.state.slow_remaining_secs().unwrap_or(-1.0)
    }

    /// Seconds left on the session clock, or -1 without a limit
    pub fn time_remaining(&self) -> f32 {
        self.state.time_remaining_secs().unwrap_or(-1.0)
    }

    /// Flattened `[x, y, rotation, kind]` per active item
    pub fn items(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.state.settings.max_items * 4);
        for item in self.state.spawner.active_items() {
            out.extend_from_slice(&[
                item.pos.x,
                item.pos.y,
                item.wave_rotation(),
                item.kind as u8 as f32,
            ]);
        }
        out
    }

    /// Flattened `[x, y, rotation, scale, alpha]` per live sparkle
    pub fn particles(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.state.particles.capacity() * 5);
        for p in self.state.particles.iter_active() {
            out.extend_from_slice(&[p.pos.x, p.pos.y, p.rotation, p.scale, p.alpha()]);
        }
        out
    }

    pub fn field_width(&self) -> f32 {
        self.state.settings.field_width
    }

    pub fn field_height(&self) -> f32 {
        self.state.settings.field_height
    }

    pub fn victory_score(&self) -> u32 {
        VICTORY_SCORE
    }
}
