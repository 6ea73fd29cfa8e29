//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time arrives as an explicit timestamp, never read from a wall clock
//! - Seeded RNG only
//! - Collections are owned by `GameState` and passed down as handles
//! - No rendering or platform dependencies beyond the `Canvas` trait

pub mod collision;
pub mod combat;
pub mod enemy;
pub mod entities;
pub mod player;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod upgrades;
pub mod weapons;

pub use collision::{ContactReport, circles_overlap, collect_xp_orbs, resolve_player_contacts};
pub use combat::{Combat, HitResult};
pub use enemy::{BlobSize, DamageOutcome, Enemy, EnemyKind, OverflowState};
pub use entities::{Effects, Particle, Projectile, Shockwave, XpOrb};
pub use player::{DamageResult, MoveKeys, Player};
pub use spawner::{SpawnRequest, pick_kind, spawn_wave};
pub use state::{Arena, EntityIds, GameClock, GamePhase, GameState, RunSummary};
pub use tick::{TickInput, choose_upgrade, draw_world, tick};
pub use upgrades::{CATALOG, MaxCheck, Upgrade, UpgradeEffect, apply_upgrade, roll_offer};
pub use weapons::{
    CodeSprayStats, HomingStats, OrbitingStats, PulseStats, Weapon, WeaponKind, WeaponLoadout,
    nearest_enemy,
};
