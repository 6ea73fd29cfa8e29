//! Deadline Dread - A bullet-heaven survival arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, weapons, spawning, upgrades)
//! - `renderer`: Draw contract and vertex tessellation for the host surface
//! - `hud`: Formatted HUD text
//! - `tuning`: Data-driven game balance
//! - `settings`: Run configuration
//! - `platform`: Key state and the browser entry point

pub mod error;
pub mod hud;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::SimError;
pub use hud::HudSnapshot;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Player movement per frame at speed multiplier 1.0
    pub const PLAYER_BASE_SPEED: f32 = 2.1;
    pub const PLAYER_SIZE: f32 = 20.0;
    pub const INITIAL_PLAYER_HEALTH: f32 = 100.0;
    /// Invulnerability window after a successful hit (ms)
    pub const PLAYER_DAMAGE_COOLDOWN_MS: f64 = 700.0;

    /// Enemy defaults
    pub const ENEMY_BASE_SPEED: f32 = 1.0;
    pub const ENEMY_BASE_SIZE: f32 = 18.0;
    pub const BASE_ENEMY_HEALTH: f32 = 20.0;
    pub const ENEMY_SPAWN_INTERVAL_MS: f64 = 1000.0;

    /// XP
    pub const XP_ORB_SIZE: f32 = 5.0;
    pub const XP_ORB_BASE_VALUE: f32 = 30.0;
    pub const XP_PER_LEVEL_BASE: f32 = 90.0;
    /// Threshold growth per level
    pub const XP_LEVEL_GROWTH: f32 = 1.15;
    /// Extra pickup reach beyond player + orb radius
    pub const XP_PICKUP_PADDING: f32 = 15.0;

    /// Projectiles
    pub const PROJECTILE_BASE_SIZE: f32 = 5.0;
    pub const PROJECTILE_BASE_SPEED: f32 = 5.0;
    pub const PROJECTILE_BASE_DAMAGE: f32 = 10.0;
    /// Projectiles this far outside the arena are culled
    pub const PROJECTILE_CULL_MARGIN: f32 = 10.0;

    /// Homing weapon
    pub const HOMING_BASE_COOLDOWN_MS: f64 = 500.0;
    pub const MAX_HOMING_PROJECTILES: u32 = 8;
    pub const HOMING_PROJECTILE_SPREAD_ANGLE: f32 = std::f32::consts::PI / 18.0;
    /// Radians per frame
    pub const HOMING_TURN_RATE: f32 = 0.12;

    /// Orbiting shield
    pub const SHIELD_BASE_ORB_COUNT: u32 = 1;
    pub const SHIELD_BASE_ORBIT_RADIUS: f32 = 50.0;
    /// Radians per frame
    pub const SHIELD_BASE_ORBIT_SPEED: f32 = 0.05;
    pub const SHIELD_BASE_DAMAGE: f32 = 15.0;
    pub const SHIELD_ORB_SIZE: f32 = 8.0;
    pub const SHIELD_HIT_COOLDOWN_MS: f64 = 500.0;
    pub const MAX_SHIELD_ORBS: u32 = 6;

    /// Pulse
    pub const PULSE_BASE_MAX_RADIUS: f32 = 75.0;
    pub const PULSE_BASE_DAMAGE: f32 = 25.0;
    pub const PULSE_BASE_COOLDOWN_MS: f64 = 3000.0;
    pub const PULSE_DURATION_MS: f64 = 300.0;

    /// Code spray
    pub const CODESPRAY_BASE_DAMAGE: f32 = 4.0;
    pub const CODESPRAY_BASE_PROJECTILES: u32 = 6;
    pub const CODESPRAY_BASE_SPREAD_DEG: f32 = 45.0;
    pub const CODESPRAY_BASE_COOLDOWN_MS: f64 = 1000.0;
    pub const CODESPRAY_BASE_RANGE: f32 = 150.0;
    pub const CODESPRAY_PROJECTILE_SPEED: f32 = 14.0;

    /// Visual effect caps
    pub const MAX_PARTICLES: usize = 256;
    pub const MAX_SHOCKWAVES: usize = 32;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Bearing (radians) from `from` toward `to`
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-5);
        // 3π lands on the ±π seam; only the direction is stable in f32
        let wrapped = normalize_angle(3.0 * PI);
        assert!(wrapped.abs() <= PI + 1e-5);
        assert!((wrapped.cos() - (3.0 * PI).cos()).abs() < 1e-5);
        assert!((normalize_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
        assert_eq!(normalize_angle(0.5), 0.5);
    }

    #[test]
    fn test_bearing() {
        let b = bearing(Vec2::ZERO, Vec2::new(0.0, 10.0));
        assert!((b - PI / 2.0).abs() < 1e-6);
    }
}
