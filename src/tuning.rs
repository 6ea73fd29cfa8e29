//! Data-driven game balance
//!
//! Enemy and weapon stat tables plus spawn escalation curves. `Default`
//! reproduces the shipped balance; a JSON file may override any subset.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;
use crate::renderer::colors;
use crate::sim::{BlobSize, EnemyKind};

/// Base stats for one enemy kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyStats {
    pub color: [f32; 4],
    /// Diameter in pixels
    pub size: f32,
    pub base_health: f32,
    /// Pixels per frame
    pub speed: f32,
    pub xp_multiplier: f32,
    /// Contact damage dealt to the player
    pub damage: f32,
    /// Blob variants split on their own after this long (ms)
    #[serde(default)]
    pub split_timeout_ms: Option<f64>,
}

/// BufferOverflow overflow behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverflowTuning {
    pub max_overflows: u32,
    /// Health fractions, descending
    pub thresholds: Vec<f32>,
    pub knockback_immune: bool,
}

impl Default for OverflowTuning {
    fn default() -> Self {
        Self {
            max_overflows: 3,
            thresholds: vec![0.75, 0.5, 0.25],
            knockback_immune: true,
        }
    }
}

/// Stat table keyed by enemy kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTable {
    pub standard: EnemyStats,
    pub creep: EnemyStats,
    pub tank: EnemyStats,
    pub blob_large: EnemyStats,
    pub blob_medium: EnemyStats,
    pub blob_small: EnemyStats,
    pub buffer_overflow: EnemyStats,
    pub fragment: EnemyStats,
    pub overflow: OverflowTuning,
    /// Pixels of per-frame random velocity added to creeps
    pub creep_jitter: f32,
}

impl Default for EnemyTable {
    fn default() -> Self {
        Self {
            standard: EnemyStats {
                color: colors::ENEMY_STANDARD,
                size: ENEMY_BASE_SIZE,
                base_health: BASE_ENEMY_HEALTH,
                speed: ENEMY_BASE_SPEED * 0.85,
                xp_multiplier: 1.0,
                damage: 14.0,
                split_timeout_ms: None,
            },
            creep: EnemyStats {
                color: colors::ENEMY_CREEP,
                size: ENEMY_BASE_SIZE * 0.75,
                base_health: BASE_ENEMY_HEALTH * 0.6,
                speed: ENEMY_BASE_SPEED * 1.3 * 0.85,
                xp_multiplier: 0.8,
                damage: 10.0,
                split_timeout_ms: None,
            },
            tank: EnemyStats {
                color: colors::ENEMY_TANK,
                size: ENEMY_BASE_SIZE * 1.4,
                base_health: BASE_ENEMY_HEALTH * 3.5,
                speed: ENEMY_BASE_SPEED * 0.5,
                xp_multiplier: 1.5,
                damage: 28.0,
                split_timeout_ms: None,
            },
            blob_large: EnemyStats {
                color: colors::BLOB_LARGE,
                size: ENEMY_BASE_SIZE * 1.5,
                base_health: 30.0,
                speed: ENEMY_BASE_SPEED * 0.7,
                xp_multiplier: 1.5,
                damage: 22.0,
                split_timeout_ms: Some(8000.0),
            },
            blob_medium: EnemyStats {
                color: colors::BLOB_MEDIUM,
                size: ENEMY_BASE_SIZE,
                base_health: 15.0,
                speed: ENEMY_BASE_SPEED * 1.1,
                xp_multiplier: 1.0,
                damage: 14.0,
                split_timeout_ms: Some(6000.0),
            },
            blob_small: EnemyStats {
                color: colors::BLOB_SMALL,
                size: ENEMY_BASE_SIZE * 0.6,
                base_health: 7.0,
                speed: ENEMY_BASE_SPEED * 1.6,
                xp_multiplier: 0.7,
                damage: 8.0,
                split_timeout_ms: None,
            },
            buffer_overflow: EnemyStats {
                color: colors::BUFFER_OVERFLOW,
                size: ENEMY_BASE_SIZE * 1.2,
                base_health: BASE_ENEMY_HEALTH * 4.0,
                speed: ENEMY_BASE_SPEED * 1.4,
                xp_multiplier: 1.8,
                damage: 18.0,
                split_timeout_ms: None,
            },
            fragment: EnemyStats {
                color: colors::FRAGMENT,
                size: ENEMY_BASE_SIZE * 0.6,
                base_health: BASE_ENEMY_HEALTH * 0.4,
                speed: ENEMY_BASE_SPEED * 1.8,
                xp_multiplier: 0.5,
                damage: 8.0,
                split_timeout_ms: None,
            },
            overflow: OverflowTuning::default(),
            creep_jitter: 0.6,
        }
    }
}

impl EnemyTable {
    /// Look up the stat row for a kind
    pub fn stats(&self, kind: EnemyKind) -> &EnemyStats {
        match kind {
            EnemyKind::Standard => &self.standard,
            EnemyKind::Creep => &self.creep,
            EnemyKind::Tank => &self.tank,
            EnemyKind::ScopeCreepBlob(BlobSize::Large) => &self.blob_large,
            EnemyKind::ScopeCreepBlob(BlobSize::Medium) => &self.blob_medium,
            EnemyKind::ScopeCreepBlob(BlobSize::Small) => &self.blob_small,
            EnemyKind::BufferOverflow => &self.buffer_overflow,
            EnemyKind::BufferOverflowFragment => &self.fragment,
        }
    }
}

/// Fixed weapon parameters (per-player tunables live in the stat records)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTable {
    pub homing_damage: f32,
    pub homing_cooldown_ms: f64,
    pub homing_projectile_speed: f32,
    pub homing_spread_angle: f32,
    pub homing_turn_rate: f32,
    pub homing_color: [f32; 4],

    pub shield_damage: f32,
    pub shield_orbit_radius: f32,
    pub shield_orbit_speed: f32,
    pub shield_orb_size: f32,
    pub shield_hit_cooldown_ms: f64,
    pub shield_color: [f32; 4],

    pub pulse_damage: f32,
    pub pulse_max_radius: f32,
    pub pulse_cooldown_ms: f64,
    pub pulse_duration_ms: f64,
    pub pulse_color: [f32; 4],

    pub codespray_projectile_speed: f32,
    pub codespray_color: [f32; 4],
}

impl Default for WeaponTable {
    fn default() -> Self {
        Self {
            homing_damage: PROJECTILE_BASE_DAMAGE,
            homing_cooldown_ms: HOMING_BASE_COOLDOWN_MS,
            homing_projectile_speed: PROJECTILE_BASE_SPEED * 0.7,
            homing_spread_angle: HOMING_PROJECTILE_SPREAD_ANGLE,
            homing_turn_rate: HOMING_TURN_RATE,
            homing_color: colors::HOMING_BOLT,

            shield_damage: SHIELD_BASE_DAMAGE,
            shield_orbit_radius: SHIELD_BASE_ORBIT_RADIUS,
            shield_orbit_speed: SHIELD_BASE_ORBIT_SPEED,
            shield_orb_size: SHIELD_ORB_SIZE,
            shield_hit_cooldown_ms: SHIELD_HIT_COOLDOWN_MS,
            shield_color: colors::SHIELD_ORB,

            pulse_damage: PULSE_BASE_DAMAGE,
            pulse_max_radius: PULSE_BASE_MAX_RADIUS,
            pulse_cooldown_ms: PULSE_BASE_COOLDOWN_MS,
            pulse_duration_ms: PULSE_DURATION_MS,
            pulse_color: colors::PULSE_RING,

            codespray_projectile_speed: CODESPRAY_PROJECTILE_SPEED,
            codespray_color: colors::CODESPRAY_BOLT,
        }
    }
}

/// Linear escalation curve: `base + elapsed / divisor`, locked before `unlock_secs`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpawnCurve {
    pub base: f32,
    pub divisor: f32,
    pub unlock_secs: f32,
}

impl SpawnCurve {
    pub const fn new(base: f32, divisor: f32, unlock_secs: f32) -> Self {
        Self {
            base,
            divisor,
            unlock_secs,
        }
    }

    /// Probability at the given elapsed time (0 while locked)
    pub fn chance(&self, elapsed_secs: f32) -> f32 {
        if elapsed_secs < self.unlock_secs {
            return 0.0;
        }
        (self.base + elapsed_secs / self.divisor).max(0.0)
    }
}

/// Spawner escalation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub interval_ms: f64,
    /// Spawn distance outside the arena, in multiples of the base enemy size
    pub edge_margin_factor: f32,
    pub scope_creep: SpawnCurve,
    pub buffer_overflow: SpawnCurve,
    pub tank: SpawnCurve,
    pub creep: SpawnCurve,
    /// Tanks stop being rolled while this many are alive
    pub max_tanks: usize,
    pub creep_batch_min: u32,
    /// Exclusive upper bound of the random extra creeps
    pub creep_batch_random: u32,
    pub creep_levels_per_extra: u32,
    pub standard_levels_per_extra: u32,
    /// Batch members scatter within this box around the edge point
    pub batch_jitter: f32,
    pub mutation_base_chance: f32,
    pub mutation_chance_per_level: f32,
    pub mutation_max_chance: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            interval_ms: ENEMY_SPAWN_INTERVAL_MS,
            edge_margin_factor: 1.5,
            scope_creep: SpawnCurve::new(0.07, 500.0, 20.0),
            buffer_overflow: SpawnCurve::new(0.03, 800.0, 45.0),
            tank: SpawnCurve::new(0.05, 600.0, 30.0),
            creep: SpawnCurve::new(0.15, 300.0, 0.0),
            max_tanks: 6,
            creep_batch_min: 2,
            creep_batch_random: 3,
            creep_levels_per_extra: 7,
            standard_levels_per_extra: 10,
            batch_jitter: 30.0,
            mutation_base_chance: 0.05,
            mutation_chance_per_level: 0.01,
            mutation_max_chance: 0.35,
        }
    }
}

/// Complete balance data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub enemies: EnemyTable,
    pub weapons: WeaponTable,
    pub spawn: SpawnTuning,
}

impl Tuning {
    /// Parse tuning overrides; missing sections keep their defaults
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject tables the simulation cannot run with
    pub fn validate(&self) -> Result<(), SimError> {
        let thresholds = &self.enemies.overflow.thresholds;
        if thresholds.windows(2).any(|w| w[0] <= w[1]) {
            return Err(SimError::Config {
                source: "overflow thresholds must be strictly descending".to_string(),
            });
        }
        let jitter = self.enemies.creep_jitter;
        if !jitter.is_finite() || jitter < 0.0 {
            return Err(SimError::Config {
                source: format!("creep jitter must be finite and non-negative, got {jitter}"),
            });
        }
        if self.weapons.pulse_duration_ms <= 0.0 {
            return Err(SimError::Config {
                source: format!(
                    "pulse duration must be positive, got {}",
                    self.weapons.pulse_duration_ms
                ),
            });
        }
        if self.spawn.interval_ms <= 0.0 {
            return Err(SimError::Config {
                source: format!("spawn interval must be positive, got {}", self.spawn.interval_ms),
            });
        }
        for curve in [
            &self.spawn.scope_creep,
            &self.spawn.buffer_overflow,
            &self.spawn.tank,
            &self.spawn.creep,
        ] {
            if curve.divisor <= 0.0 {
                return Err(SimError::Config {
                    source: "spawn curve divisor must be positive".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_curve_locked_until_unlock() {
        let curve = SpawnCurve::new(0.05, 600.0, 30.0);
        assert_eq!(curve.chance(10.0), 0.0);
        assert!((curve.chance(60.0) - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "spawn": { "max_tanks": 2 } }"#).unwrap();
        assert_eq!(tuning.spawn.max_tanks, 2);
        assert_eq!(tuning.spawn.interval_ms, ENEMY_SPAWN_INTERVAL_MS);
        assert_eq!(tuning.enemies.standard.damage, 14.0);
    }

    #[test]
    fn test_rejects_ascending_thresholds() {
        let json = r#"{ "enemies": { "overflow": {
            "max_overflows": 3, "thresholds": [0.25, 0.5], "knockback_immune": true } } }"#;
        assert!(Tuning::from_json(json).is_err());
    }

    #[test]
    fn test_rejects_zero_pulse_duration() {
        let json = r#"{ "weapons": { "pulse_duration_ms": 0.0 } }"#;
        assert!(matches!(Tuning::from_json(json), Err(SimError::Config { .. })));
    }

    #[test]
    fn test_rejects_bad_creep_jitter() {
        let mut tuning = Tuning::default();
        tuning.enemies.creep_jitter = f32::NAN;
        assert!(tuning.validate().is_err());
        tuning.enemies.creep_jitter = f32::INFINITY;
        assert!(tuning.validate().is_err());
        tuning.enemies.creep_jitter = -1.0;
        assert!(tuning.validate().is_err());
        tuning.enemies.creep_jitter = 0.0;
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_blob_table_lookup() {
        let table = EnemyTable::default();
        let large = table.stats(EnemyKind::ScopeCreepBlob(BlobSize::Large));
        assert_eq!(large.split_timeout_ms, Some(8000.0));
        let small = table.stats(EnemyKind::ScopeCreepBlob(BlobSize::Small));
        assert_eq!(small.split_timeout_ms, None);
    }
}
