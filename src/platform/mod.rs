//! Platform glue
//!
//! Hosts feed raw key events and frame timestamps into the simulation:
//! - `KeyState`: pressed-key set, turned into `MoveKeys` each frame
//! - `web`: wasm-bindgen entry for the browser host

use std::collections::BTreeSet;

use crate::sim::MoveKeys;

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Currently pressed keys, by `KeyboardEvent.key` name
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    pressed: BTreeSet<String>,
}

impl KeyState {
    pub fn key_down(&mut self, key: &str) {
        self.pressed.insert(key.to_string());
    }

    pub fn key_up(&mut self, key: &str) {
        self.pressed.remove(key);
    }

    /// Release everything (focus lost)
    pub fn clear(&mut self) {
        self.pressed.clear();
    }

    pub fn is_pressed(&self, key: &str) -> bool {
        self.pressed.contains(key)
    }

    pub fn move_keys(&self) -> MoveKeys {
        MoveKeys::from_pressed(self.pressed.iter().map(String::as_str))
    }
}
