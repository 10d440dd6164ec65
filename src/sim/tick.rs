//! Per-frame simulation tick
//!
//! Fixed update order: avatar, spawner, particles, collision sweep, effects,
//! score thresholds, slow countdown, session clock.

use glam::Vec2;

use super::collision::collides;
use super::effects::{Effect, is_victory_score, spawn_multiplier_for};
use super::input::TickInput;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Advance the game by one frame of `delta` (1.0 = one frame at 60 Hz)
pub fn tick(state: &mut GameState, input: &TickInput, delta: f32) {
    state.events.clear();

    if state.phase != GamePhase::Playing {
        if input.restart {
            state.restart();
        }
        return;
    }

    if !delta.is_finite() || delta < 0.0 {
        log::warn!("Skipping tick with invalid delta {delta}");
        return;
    }

    state.time_ticks += 1;

    // Avatar
    let prev_pos = state.avatar.pos;
    state.avatar.update(input, delta, &state.settings);

    // Items
    state.spawner.update(delta, &state.settings);

    // Feedback sparkles
    state.particles.update(delta);
    let moved = state.avatar.pos != prev_pos;
    if moved && (state.avatar.speed() > TRAIL_MIN_SPEED || input.pointer.down) {
        state.trail_timer += delta;
        if state.trail_timer >= TRAIL_INTERVAL_TICKS {
            state.trail_timer = 0.0;
            let behind = Vec2::new(0.0, state.avatar.radius * 0.5);
            state.particles.spawn_star(state.avatar.pos + behind);
        }
    }

    // Collisions
    let mut slowed = false;
    let mut frozen = false;
    for item in state.spawner.items_mut() {
        if !item.active || item.generation != state.generation {
            continue;
        }
        if !collides(&state.collision, &state.masks, &state.avatar, &*item) {
            continue;
        }

        let outcome = state.score.apply_effect(item.kind);
        item.deactivate();
        state.events.push(GameEvent::Collected {
            kind: item.kind,
            pos: item.pos,
            delta: outcome.delta,
        });
        match outcome.effect {
            Some(Effect::Slow) => slowed = true,
            Some(Effect::Freeze) => frozen = true,
            None => {}
        }
    }

    if frozen {
        state.spawner.freeze(FREEZE_DURATION_TICKS);
        state.events.push(GameEvent::FreezeStarted);
    }

    // Score thresholds
    let score = state.score.value();
    if is_victory_score(score) {
        state.phase = GamePhase::Victory;
        state.events.push(GameEvent::Victory);
        log::info!("Victory with score {score}");
    } else {
        let multiplier = spawn_multiplier_for(score);
        if multiplier != state.spawner.spawn_multiplier() {
            log::debug!("Spawn multiplier -> {multiplier} at score {score}");
            state.spawner.set_spawn_multiplier(multiplier);
        }
    }

    // Slow debuff
    if slowed {
        state.avatar.speed_multiplier = SLOW_MULTIPLIER;
        state.slow_ticks = Some(SLOW_DURATION_TICKS);
        state.events.push(GameEvent::SlowStarted);
        log::debug!("Avatar slowed for {SLOW_DURATION_TICKS} ticks");
    } else if let Some(remaining) = state.slow_ticks {
        let remaining = remaining - delta;
        if remaining <= 0.0 {
            state.avatar.speed_multiplier = 1.0;
            state.slow_ticks = None;
            state.events.push(GameEvent::SlowEnded);
        } else {
            state.slow_ticks = Some(remaining);
        }
    }

    // Session clock
    state.elapsed += delta;
    if state.phase == GamePhase::Playing && state.time_remaining_secs() == Some(0.0) {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver);
        log::info!("Time up with score {score}");
    }
}
