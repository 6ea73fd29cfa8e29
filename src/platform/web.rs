//! Browser entry point
//!
//! The page owns the canvas, the keyboard listeners and the
//! `requestAnimationFrame` loop. Each frame it calls `frame(now)`, then
//! uploads `vertices()` and writes `hud_json()` into its HUD elements.

use wasm_bindgen::prelude::*;

use super::KeyState;
use crate::hud::HudSnapshot;
use crate::renderer::VertexCanvas;
use crate::sim::{Arena, GamePhase, GameState, TickInput, draw_world, tick};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Game instance driven by the page
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    keys: KeyState,
    input: TickInput,
    canvas: VertexCanvas,
}

#[wasm_bindgen]
impl WebGame {
    /// `seed` of 0 picks one from the clock
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, seed: u64, tuning_json: Option<String>) -> Self {
        let seed = if seed == 0 {
            js_sys::Date::now() as u64
        } else {
            seed
        };
        let tuning = match tuning_json.as_deref().map(Tuning::from_json) {
            Some(Ok(tuning)) => tuning,
            Some(Err(err)) => {
                log::warn!("{err}, using default tuning");
                Tuning::default()
            }
            None => Tuning::default(),
        };
        log::info!("Deadline Dread initialized with seed: {seed}");
        Self {
            state: GameState::new(seed, Arena::new(width, height), tuning),
            keys: KeyState::default(),
            input: TickInput::default(),
            canvas: VertexCanvas::new(),
        }
    }

    pub fn key_down(&mut self, key: &str) {
        self.keys.key_down(key);
    }

    pub fn key_up(&mut self, key: &str) {
        self.keys.key_up(key);
    }

    /// Window lost focus
    pub fn blur(&mut self) {
        self.keys.clear();
    }

    pub fn start(&mut self) {
        self.input.start = true;
    }

    pub fn choose_upgrade(&mut self, index: usize) {
        self.input.choose_upgrade = Some(index);
    }

    /// Run one frame at `requestAnimationFrame` time `now_ms`
    pub fn frame(&mut self, now_ms: f64) {
        self.input.keys = self.keys.move_keys();
        tick(&mut self.state, &self.input, now_ms);
        self.input.start = false;
        self.input.choose_upgrade = None;

        self.canvas.clear();
        draw_world(&self.state, &mut self.canvas);
    }

    /// Whether the page should keep scheduling frames that advance play
    pub fn is_playing(&self) -> bool {
        self.state.phase == GamePhase::Playing
    }

    /// Interleaved `[x, y, r, g, b, a]` triangle-list vertices
    pub fn vertices(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(self.canvas.as_bytes())
    }

    pub fn hud_json(&self) -> String {
        serde_json::to_string(&HudSnapshot::capture(&self.state)).unwrap_or_default()
    }
}
