//! Fairy Drift entry point
//!
//! Native builds run a headless scripted session and log a summary; the
//! browser build is driven from JS through `fairy_drift::web`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::Path;

    use fairy_drift::Settings;
    use fairy_drift::consts::*;
    use fairy_drift::sim::{
        GameEvent, GamePhase, GameState, InputState, ItemKind, Key, ShapeRasterizer, tick,
    };
    use glam::Vec2;

    /// Ticks in the scripted session (two minutes at 60 Hz)
    const SESSION_TICKS: u64 = 7200;

    #[derive(Debug, Default)]
    struct Tally {
        beneficial: u32,
        harmful: u32,
        freeze: u32,
        sparkles: usize,
    }

    fn load_settings(path: Option<&str>) -> Settings {
        let Some(path) = path else {
            return Settings::default();
        };
        match std::fs::read_to_string(Path::new(path)) {
            Ok(json) => match Settings::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {path}");
                    settings
                }
                Err(e) => {
                    log::error!("Invalid settings in {path}: {e}");
                    Settings::default()
                }
            },
            Err(e) => {
                log::error!("Failed to read {path}: {e}");
                Settings::default()
            }
        }
    }

    /// Weave left and right, occasionally chasing a pointer target
    fn script_input(input: &mut InputState, n: u64, field: Vec2) {
        match (n / 90) % 4 {
            0 => {
                input.key_up(Key::ArrowLeft);
                input.key_down(Key::ArrowRight);
            }
            1 => {
                input.key_up(Key::ArrowRight);
                input.key_down(Key::ArrowLeft);
            }
            2 => {
                input.key_up(Key::ArrowLeft);
                let target = Vec2::new(field.x * 0.25, field.y * 0.3);
                if n % 90 == 0 {
                    input.pointer_down(target);
                } else {
                    input.pointer_move(target);
                }
            }
            _ => input.pointer_up(),
        }
    }

    pub fn run(settings_path: Option<&str>, seed: u64) {
        let settings = load_settings(settings_path);
        let field = Vec2::new(settings.field_width, settings.field_height);
        let mut state = match GameState::new(seed, settings) {
            Ok(state) => state,
            Err(e) => {
                log::error!("Cannot start session: {e}");
                return;
            }
        };

        let source =
            ShapeRasterizer::placeholders(state.settings.avatar_box, state.settings.item_box);
        state.load_hit_masks(&source);

        let mut input = InputState::new(field / 2.0);
        let mut tally = Tally::default();

        for n in 0..SESSION_TICKS {
            script_input(&mut input, n, field);
            if state.phase != GamePhase::Playing {
                break;
            }
            let frame = input.take_tick_input();
            let before = state.particles.active_count();
            tick(&mut state, &frame, 1.0);
            tally.sparkles += state.particles.active_count().saturating_sub(before);

            for event in &state.events {
                match event {
                    GameEvent::Collected { kind, delta, .. } => {
                        match kind {
                            ItemKind::Beneficial => tally.beneficial += 1,
                            ItemKind::Harmful => tally.harmful += 1,
                            ItemKind::Freeze => tally.freeze += 1,
                        }
                        log::debug!("tick {n}: collected {kind:?} ({delta:+})");
                    }
                    GameEvent::FreezeStarted => log::info!("tick {n}: items frozen"),
                    GameEvent::SlowStarted => log::info!("tick {n}: avatar slowed"),
                    _ => {}
                }
            }
        }

        log::info!(
            "Session over after {} ticks ({:.1}s): phase {:?}, score {}/{}",
            state.time_ticks,
            state.time_ticks as f32 / TARGET_FPS,
            state.phase,
            state.score(),
            VICTORY_SCORE
        );
        log::info!(
            "Collected {} good, {} bad, {} freeze; {} sparkles; pool size {}",
            tally.beneficial,
            tally.harmful,
            tally.freeze,
            tally.sparkles,
            state.spawner.pool_size()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Fairy Drift (native) starting...");
    log::info!("Native mode runs a headless session - use the web build to play");

    let mut args = std::env::args().skip(1);
    let settings_path = args.next();
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);
    headless::run(settings_path.as_deref(), seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is fairy_drift::web::wasm_start, this is just to satisfy the compiler
}
