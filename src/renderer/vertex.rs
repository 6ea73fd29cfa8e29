//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Byte stride of one vertex in an upload buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.07, 0.07, 0.1, 1.0];
    pub const PLAYER: [f32; 4] = [0.0, 1.0, 1.0, 1.0]; // Cyan
    pub const HEALTH_BAR_BACK: [f32; 4] = [0.33, 0.33, 0.33, 1.0];
    pub const HEALTH_HIGH: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const HEALTH_MID: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const HEALTH_LOW: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const ENEMY_BAR_BACK: [f32; 4] = [0.27, 0.0, 0.0, 1.0];
    pub const ENEMY_BAR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    pub const ENEMY_STANDARD: [f32; 4] = [1.0, 0.39, 0.28, 1.0]; // Tomato
    pub const ENEMY_MUTATED: [f32; 4] = [0.86, 0.08, 0.24, 1.0]; // Crimson
    pub const ENEMY_CREEP: [f32; 4] = [1.0, 0.65, 0.0, 1.0];
    pub const ENEMY_TANK: [f32; 4] = [0.54, 0.17, 0.89, 1.0];
    pub const BLOB_LARGE: [f32; 4] = [0.42, 0.35, 0.8, 1.0];
    pub const BLOB_MEDIUM: [f32; 4] = [0.2, 0.8, 0.2, 1.0];
    pub const BLOB_SMALL: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const BLOB_FACE: [f32; 4] = [0.13, 0.13, 0.13, 1.0];
    pub const BUFFER_OVERFLOW: [f32; 4] = [1.0, 0.27, 0.0, 1.0];
    pub const FRAGMENT: [f32; 4] = [1.0, 0.39, 0.28, 1.0];

    pub const XP_ORB: [f32; 4] = [0.46, 0.78, 0.75, 1.0];
    pub const HOMING_BOLT: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const SHIELD_ORB: [f32; 4] = [0.68, 0.85, 0.9, 1.0];
    pub const PULSE_RING: [f32; 4] = [1.0, 0.0, 1.0, 0.3];
    pub const CODESPRAY_BOLT: [f32; 4] = [0.0, 0.75, 1.0, 1.0];
    pub const SHOCKWAVE: [f32; 4] = [1.0, 0.55, 0.2, 1.0];
}
