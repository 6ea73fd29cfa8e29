//! Upgrade catalog and level-up offers
//!
//! Upgrades are plain data. `apply_upgrade` is the single interpreter that
//! turns an `UpgradeEffect` into player and weapon record mutations.

use log::{debug, warn};
use rand::Rng;
use rand::seq::SliceRandom;

use super::player::Player;
use super::weapons::WeaponKind;
use crate::consts::{MAX_HOMING_PROJECTILES, MAX_SHIELD_ORBS};
use crate::error::SimError;

/// Upgrades shown per level-up
pub const OFFER_SIZE: usize = 3;
/// Offered when nothing else is eligible
pub const FALLBACK_UPGRADE: &str = "hp_up";

/// Stops an upgrade from being offered once its stat has capped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxCheck {
    HomingProjectiles,
    ShieldOrbs,
    DoubleBarrel,
}

impl MaxCheck {
    pub fn is_maxed(&self, player: &Player) -> bool {
        let loadout = &player.loadout;
        match self {
            MaxCheck::HomingProjectiles => loadout
                .homing
                .as_ref()
                .is_some_and(|s| s.projectile_count >= MAX_HOMING_PROJECTILES),
            MaxCheck::ShieldOrbs => loadout
                .orbiting
                .as_ref()
                .is_some_and(|s| s.orb_count >= MAX_SHIELD_ORBS),
            MaxCheck::DoubleBarrel => loadout.codespray.as_ref().is_some_and(|s| s.double_barrel),
        }
    }
}

/// What an upgrade does when chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpgradeEffect {
    /// Raise max health and heal by the same amount
    MaxHealth(f32),
    SpeedMultiplier(f32),
    GlobalDamageMultiplier(f32),
    XpGainMultiplier(f32),
    PickupRadiusMultiplier(f32),
    UnlockWeapon(WeaponKind),
    HomingProjectiles(u32),
    HomingDamage(f32),
    HomingProjectileSpeed(f32),
    HomingAttackSpeed(f32),
    ShieldOrbs(u32),
    ShieldDamage(f32),
    ShieldOrbitRadius(f32),
    ShieldOrbitSpeed(f32),
    PulseDamage(f32),
    PulseRadius(f32),
    PulseCooldown(f32),
    CodeSprayProjectiles(u32),
    CodeSprayDoubleBarrel,
    /// Degrees added to the fan
    CodeSpraySpread(f32),
    CodeSprayDamage(f32),
    CodeSprayRange(f32),
}

/// A catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct Upgrade {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Only offered once this weapon's record exists with level >= 1
    pub requires_weapon: Option<WeaponKind>,
    /// Not offered once the granted weapon is owned, or once the max check holds
    pub unique: bool,
    pub grants_weapon: Option<WeaponKind>,
    pub max_check: Option<MaxCheck>,
    /// Copies placed in the offer pool
    pub weight: u32,
    pub effect: UpgradeEffect,
}

impl Upgrade {
    const fn general(id: &'static str, name: &'static str, description: &'static str, effect: UpgradeEffect) -> Self {
        Self {
            id,
            name,
            description,
            requires_weapon: None,
            unique: false,
            grants_weapon: None,
            max_check: None,
            weight: 1,
            effect,
        }
    }

    const fn unlock(id: &'static str, name: &'static str, description: &'static str, kind: WeaponKind) -> Self {
        Self {
            id,
            name,
            description,
            requires_weapon: None,
            unique: true,
            grants_weapon: Some(kind),
            max_check: None,
            weight: 2,
            effect: UpgradeEffect::UnlockWeapon(kind),
        }
    }

    const fn weapon(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        kind: WeaponKind,
        effect: UpgradeEffect,
    ) -> Self {
        Self {
            id,
            name,
            description,
            requires_weapon: Some(kind),
            unique: false,
            grants_weapon: None,
            max_check: None,
            weight: 1,
            effect,
        }
    }

    const fn capped(mut self, check: MaxCheck) -> Self {
        self.max_check = Some(check);
        self
    }

    const fn once(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Whether `player` may be offered this upgrade
    pub fn is_eligible(&self, player: &Player) -> bool {
        let owned = self.grants_weapon.is_some_and(|kind| player.has_weapon(kind));
        if self.unique && owned {
            return false;
        }
        let unlocked = self
            .requires_weapon
            .is_none_or(|kind| player.loadout.level(kind).is_some_and(|level| level >= 1));
        unlocked && !self.max_check.is_some_and(|check| check.is_maxed(player))
    }
}

use UpgradeEffect as E;
use WeaponKind as W;

/// Every upgrade in the game
pub static CATALOG: &[Upgrade] = &[
    Upgrade::general("hp_up", "Robust Health", "+20 Max Health, Heal 20", E::MaxHealth(20.0)),
    Upgrade::general("speed_up", "Agile Agility", "+10% Movement Speed", E::SpeedMultiplier(1.1)),
    Upgrade::general("global_damage_up", "Refactor Ray", "+15% Global Damage", E::GlobalDamageMultiplier(1.15)),
    Upgrade::general("xp_gain_up", "Fast Learner", "+10% XP Gain", E::XpGainMultiplier(1.1)),
    Upgrade::general("pickup_radius_up", "Wider Net", "+20% XP Orb Pickup Radius", E::PickupRadiusMultiplier(1.2)),
    Upgrade::unlock("get_shield", "CSS Flexbox Shield", "Gain orbiting shields", W::Orbiting),
    Upgrade::unlock("get_pulse", "Automated Linter", "Gain an AoE pulse weapon", W::Pulse),
    Upgrade::unlock("get_codespray", "Code Spray", "Gain a shotgun-style code spray weapon", W::CodeSpray),
    Upgrade::weapon("homing_add_projectile", "+1 Homing Bolt", "Fire an additional homing bolt (Max 8)", W::Homing, E::HomingProjectiles(1))
        .capped(MaxCheck::HomingProjectiles),
    Upgrade::weapon("homing_damage_up", "Sharper Bolts", "+10% Homing Damage", W::Homing, E::HomingDamage(1.1)),
    Upgrade::weapon("homing_speed_up", "Faster Bolts", "+10% Homing Projectile Speed", W::Homing, E::HomingProjectileSpeed(1.1)),
    Upgrade::weapon("homing_attack_speed_up", "Rapid Fire", "+10% Homing Attack Speed", W::Homing, E::HomingAttackSpeed(0.9)),
    Upgrade::weapon("shield_add_orb", "+1 Shield Orb", "Gain an additional shield orb (Max 6)", W::Orbiting, E::ShieldOrbs(1))
        .capped(MaxCheck::ShieldOrbs),
    Upgrade::weapon("shield_damage_up", "Sharper Shields", "+10% Shield Damage", W::Orbiting, E::ShieldDamage(1.1)),
    Upgrade::weapon("shield_radius_up", "Wider Orbit", "+10% Shield Orbit Radius", W::Orbiting, E::ShieldOrbitRadius(1.1)),
    Upgrade::weapon("shield_orbit_speed_up", "Faster Orbit", "+10% Shield Orbit Speed", W::Orbiting, E::ShieldOrbitSpeed(1.1)),
    Upgrade::weapon("pulse_damage_up", "Pulse Power", "+10% Pulse Damage", W::Pulse, E::PulseDamage(1.1)),
    Upgrade::weapon("pulse_radius_up", "Pulse Range", "+10% Pulse Radius", W::Pulse, E::PulseRadius(1.1)),
    Upgrade::weapon("pulse_cooldown_up", "Pulse Cooldown", "-10% Pulse Cooldown", W::Pulse, E::PulseCooldown(0.9)),
    Upgrade::weapon("codespray_projectile_count", "More Spray", "+1 Code Spray Projectile", W::CodeSpray, E::CodeSprayProjectiles(1)),
    Upgrade::weapon("codespray_double_barrel", "Double Barrel", "Double the number of Code Spray projectiles", W::CodeSpray, E::CodeSprayDoubleBarrel)
        .once()
        .capped(MaxCheck::DoubleBarrel),
    Upgrade::weapon("codespray_spread", "Wider Spray", "+10° Code Spray Spread", W::CodeSpray, E::CodeSpraySpread(10.0)),
    Upgrade::weapon("codespray_damage", "Sharper Spray", "+2 Code Spray Damage", W::CodeSpray, E::CodeSprayDamage(2.0)),
    Upgrade::weapon("codespray_range", "Longer Spray", "+30 Code Spray Range", W::CodeSpray, E::CodeSprayRange(30.0)),
];

/// Roll up to `OFFER_SIZE` distinct eligible upgrades.
///
/// Falls back to `FALLBACK_UPGRADE` when nothing is eligible.
pub fn roll_offer(
    catalog: &'static [Upgrade],
    player: &Player,
    rng: &mut impl Rng,
) -> Result<Vec<&'static Upgrade>, SimError> {
    if catalog.is_empty() {
        return Err(SimError::EmptyUpgradeCatalog);
    }

    let mut pool: Vec<&'static Upgrade> = catalog
        .iter()
        .filter(|u| u.is_eligible(player))
        .flat_map(|u| std::iter::repeat_n(u, u.weight.max(1) as usize))
        .collect();
    pool.shuffle(rng);

    let mut offer: Vec<&'static Upgrade> = Vec::with_capacity(OFFER_SIZE);
    for upgrade in pool {
        if offer.len() == OFFER_SIZE {
            break;
        }
        if !offer.iter().any(|o| o.id == upgrade.id) {
            offer.push(upgrade);
        }
    }

    if offer.is_empty() {
        warn!("No eligible upgrades, offering fallback");
        let fallback = catalog
            .iter()
            .find(|u| u.id == FALLBACK_UPGRADE)
            .ok_or(SimError::MissingFallbackUpgrade {
                id: FALLBACK_UPGRADE,
            })?;
        offer.push(fallback);
    }
    Ok(offer)
}

/// Interpret an upgrade against the player
pub fn apply_upgrade(player: &mut Player, upgrade: &Upgrade, now_ms: f64) {
    debug!("Applying upgrade {}", upgrade.id);
    let loadout = &mut player.loadout;
    match upgrade.effect {
        E::MaxHealth(amount) => {
            player.max_health += amount;
            player.heal(amount);
        }
        E::SpeedMultiplier(f) => player.speed_multiplier *= f,
        E::GlobalDamageMultiplier(f) => player.global_damage_multiplier *= f,
        E::XpGainMultiplier(f) => player.xp_gain_multiplier *= f,
        E::PickupRadiusMultiplier(f) => player.pickup_radius_multiplier *= f,
        E::UnlockWeapon(kind) => player.add_weapon(kind, now_ms),
        E::HomingProjectiles(n) => {
            if let Some(s) = loadout.homing.as_mut() {
                s.projectile_count = (s.projectile_count + n).min(MAX_HOMING_PROJECTILES);
            }
        }
        E::HomingDamage(f) => {
            if let Some(s) = loadout.homing.as_mut() {
                s.damage_multiplier *= f;
            }
        }
        E::HomingProjectileSpeed(f) => {
            if let Some(s) = loadout.homing.as_mut() {
                s.projectile_speed_multiplier *= f;
            }
        }
        E::HomingAttackSpeed(f) => {
            if let Some(s) = loadout.homing.as_mut() {
                s.attack_speed_multiplier *= f;
            }
        }
        E::ShieldOrbs(n) => {
            if let Some(s) = loadout.orbiting.as_mut() {
                s.orb_count = (s.orb_count + n).min(MAX_SHIELD_ORBS);
            }
        }
        E::ShieldDamage(f) => {
            if let Some(s) = loadout.orbiting.as_mut() {
                s.damage_multiplier *= f;
            }
        }
        E::ShieldOrbitRadius(f) => {
            if let Some(s) = loadout.orbiting.as_mut() {
                s.orbit_radius_multiplier *= f;
            }
        }
        E::ShieldOrbitSpeed(f) => {
            if let Some(s) = loadout.orbiting.as_mut() {
                s.orbit_speed_multiplier *= f;
            }
        }
        E::PulseDamage(f) => {
            if let Some(s) = loadout.pulse.as_mut() {
                s.damage_multiplier *= f;
            }
        }
        E::PulseRadius(f) => {
            if let Some(s) = loadout.pulse.as_mut() {
                s.radius_multiplier *= f;
            }
        }
        E::PulseCooldown(f) => {
            if let Some(s) = loadout.pulse.as_mut() {
                s.cooldown_multiplier *= f;
            }
        }
        E::CodeSprayProjectiles(n) => {
            if let Some(s) = loadout.codespray.as_mut() {
                s.projectile_count += n;
            }
        }
        E::CodeSprayDoubleBarrel => {
            if let Some(s) = loadout.codespray.as_mut().filter(|s| !s.double_barrel) {
                s.projectile_count *= 2;
                s.double_barrel = true;
            }
        }
        E::CodeSpraySpread(deg) => {
            if let Some(s) = loadout.codespray.as_mut() {
                s.spread += deg.to_radians();
            }
        }
        E::CodeSprayDamage(amount) => {
            if let Some(s) = loadout.codespray.as_mut() {
                s.damage += amount;
            }
        }
        E::CodeSprayRange(amount) => {
            if let Some(s) = loadout.codespray.as_mut() {
                s.projectile_range += amount;
            }
        }
    }
}

/// Look up a catalog entry by id
pub fn find(id: &str) -> Option<&'static Upgrade> {
    CATALOG.iter().find(|u| u.id == id)
}
