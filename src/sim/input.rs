//! Player input state
//!
//! One explicit `InputState` is owned by the platform layer, fed raw key and
//! pointer events, and snapshotted into a [`TickInput`] once per frame.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Keys that steer the avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    W,
    A,
    S,
    D,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code` / `key` value to a steering key
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowDown" => Some(Key::ArrowDown),
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "KeyW" | "w" | "W" => Some(Key::W),
            "KeyA" | "a" | "A" => Some(Key::A),
            "KeyS" | "s" | "S" => Some(Key::S),
            "KeyD" | "d" | "D" => Some(Key::D),
            _ => None,
        }
    }
}

/// Pointer (mouse / touch) state in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerState {
    pub down: bool,
    pub position: Vec2,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Resolved direction, each axis in {-1, 0, 1}
    pub direction: Vec2,
    pub pointer: PointerState,
    /// Restart request from the end screen
    pub restart: bool,
}

/// Accumulates raw input events between ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pressed: HashSet<Key>,
    pointer: PointerState,
    restart: bool,
}

impl InputState {
    /// Pointer starts at `pointer_home` (usually the field center)
    pub fn new(pointer_home: Vec2) -> Self {
        Self {
            pointer: PointerState {
                down: false,
                position: pointer_home,
            },
            ..Default::default()
        }
    }

    pub fn key_down(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn pointer_down(&mut self, position: Vec2) {
        self.pointer.down = true;
        self.pointer.position = position;
    }

    /// Moves only register while the pointer is held
    pub fn pointer_move(&mut self, position: Vec2) {
        if self.pointer.down {
            self.pointer.position = position;
        }
    }

    pub fn pointer_up(&mut self) {
        self.pointer.down = false;
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    /// Queue a restart for the next tick
    pub fn request_restart(&mut self) {
        self.restart = true;
    }

    /// Direction from held keys. Down and right win when both keys of an axis are held.
    pub fn direction(&self) -> Vec2 {
        let held = |a: Key, b: Key| self.is_pressed(a) || self.is_pressed(b);
        let mut dir = Vec2::ZERO;
        if held(Key::ArrowUp, Key::W) {
            dir.y = -1.0;
        }
        if held(Key::ArrowDown, Key::S) {
            dir.y = 1.0;
        }
        if held(Key::ArrowLeft, Key::A) {
            dir.x = -1.0;
        }
        if held(Key::ArrowRight, Key::D) {
            dir.x = 1.0;
        }
        dir
    }

    /// Snapshot for the next tick; clears one-shot requests
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            direction: self.direction(),
            pointer: self.pointer,
            restart: self.restart,
        };
        self.restart = false;
        input
    }
}
