//! Player weapons
//!
//! Each weapon kind has a per-player stat record (mutated by upgrades) and a
//! behaviour value holding its runtime state. Behaviours gate themselves on
//! their own cooldowns against the simulation clock passed in `Combat`.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::combat::Combat;
use super::enemy::Enemy;
use super::entities::Projectile;
use crate::consts::*;
use crate::error::SimError;
use crate::renderer::Canvas;
use crate::tuning::WeaponTable;
use crate::{bearing, polar_to_cartesian};

/// Weapon kinds, keyed the same way as their stat records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Homing,
    Orbiting,
    Pulse,
    CodeSpray,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 4] = [
        WeaponKind::Homing,
        WeaponKind::Orbiting,
        WeaponKind::Pulse,
        WeaponKind::CodeSpray,
    ];

    /// Stable stat-record key
    pub fn key(&self) -> &'static str {
        match self {
            WeaponKind::Homing => "homing",
            WeaponKind::Orbiting => "orbiting",
            WeaponKind::Pulse => "pulse",
            WeaponKind::CodeSpray => "codespray",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomingStats {
    pub level: u32,
    pub projectile_count: u32,
    pub damage_multiplier: f32,
    /// Scales the cooldown (lower is faster)
    pub attack_speed_multiplier: f32,
    pub projectile_speed_multiplier: f32,
}

impl Default for HomingStats {
    fn default() -> Self {
        Self {
            level: 0,
            projectile_count: 1,
            damage_multiplier: 1.0,
            attack_speed_multiplier: 1.0,
            projectile_speed_multiplier: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitingStats {
    pub level: u32,
    pub orb_count: u32,
    pub damage_multiplier: f32,
    pub orbit_speed_multiplier: f32,
    pub orbit_radius_multiplier: f32,
}

impl Default for OrbitingStats {
    fn default() -> Self {
        Self {
            level: 0,
            orb_count: SHIELD_BASE_ORB_COUNT,
            damage_multiplier: 1.0,
            orbit_speed_multiplier: 1.0,
            orbit_radius_multiplier: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PulseStats {
    pub level: u32,
    pub damage_multiplier: f32,
    pub cooldown_multiplier: f32,
    pub radius_multiplier: f32,
}

impl Default for PulseStats {
    fn default() -> Self {
        Self {
            level: 0,
            damage_multiplier: 1.0,
            cooldown_multiplier: 1.0,
            radius_multiplier: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSprayStats {
    pub level: u32,
    pub projectile_count: u32,
    pub damage: f32,
    pub damage_multiplier: f32,
    pub cooldown_ms: f64,
    pub projectile_range: f32,
    /// Total fan width (radians)
    pub spread: f32,
    pub double_barrel: bool,
}

impl Default for CodeSprayStats {
    fn default() -> Self {
        Self {
            level: 0,
            projectile_count: CODESPRAY_BASE_PROJECTILES,
            damage: CODESPRAY_BASE_DAMAGE,
            damage_multiplier: 1.0,
            cooldown_ms: CODESPRAY_BASE_COOLDOWN_MS,
            projectile_range: CODESPRAY_BASE_RANGE,
            spread: CODESPRAY_BASE_SPREAD_DEG.to_radians(),
            double_barrel: false,
        }
    }
}

/// Per-player weapon stat records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaponLoadout {
    pub homing: Option<HomingStats>,
    pub orbiting: Option<OrbitingStats>,
    pub pulse: Option<PulseStats>,
    pub codespray: Option<CodeSprayStats>,
}

impl WeaponLoadout {
    /// Unlock level of a weapon (None if no record exists)
    pub fn level(&self, kind: WeaponKind) -> Option<u32> {
        match kind {
            WeaponKind::Homing => self.homing.as_ref().map(|s| s.level),
            WeaponKind::Orbiting => self.orbiting.as_ref().map(|s| s.level),
            WeaponKind::Pulse => self.pulse.as_ref().map(|s| s.level),
            WeaponKind::CodeSpray => self.codespray.as_ref().map(|s| s.level),
        }
    }

    pub fn has(&self, kind: WeaponKind) -> bool {
        self.level(kind).is_some()
    }

    /// Create the default record if missing, then bump its level.
    /// Returns true if the record was newly created.
    pub fn unlock(&mut self, kind: WeaponKind) -> bool {
        let created = !self.has(kind);
        let level = match kind {
            WeaponKind::Homing => &mut self.homing.get_or_insert_with(HomingStats::default).level,
            WeaponKind::Orbiting => {
                &mut self
                    .orbiting
                    .get_or_insert_with(OrbitingStats::default)
                    .level
            }
            WeaponKind::Pulse => &mut self.pulse.get_or_insert_with(PulseStats::default).level,
            WeaponKind::CodeSpray => {
                &mut self
                    .codespray
                    .get_or_insert_with(CodeSprayStats::default)
                    .level
            }
        };
        *level += 1;
        created
    }
}

/// Player state a weapon reads while firing
#[derive(Debug, Clone, Copy)]
pub struct Shooter {
    pub pos: Vec2,
    pub global_damage_multiplier: f32,
    /// Heading of the last movement input (radians)
    pub last_move_angle: Option<f32>,
}

/// Index of the enemy nearest to `pos`, optionally within `max_dist`
pub fn nearest_enemy(pos: Vec2, enemies: &[Enemy], max_dist: Option<f32>) -> Option<usize> {
    enemies
        .iter()
        .enumerate()
        .map(|(i, e)| (i, e.pos.distance(pos)))
        .filter(|(_, d)| max_dist.is_none_or(|max| *d <= max))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

#[derive(Debug, Clone, Default)]
pub struct HomingWeapon {
    pub last_attack_ms: f64,
}

impl HomingWeapon {
    fn update(
        &mut self,
        shooter: &Shooter,
        stats: &HomingStats,
        enemies: &[Enemy],
        combat: &mut Combat,
    ) {
        let table = &combat.tuning.weapons;
        let cooldown = table.homing_cooldown_ms * stats.attack_speed_multiplier as f64;
        if combat.now_ms - self.last_attack_ms < cooldown {
            return;
        }
        self.last_attack_ms = combat.now_ms;

        let Some(target) = nearest_enemy(shooter.pos, enemies, None) else {
            return;
        };
        let base_angle = bearing(shooter.pos, enemies[target].pos);
        let damage =
            table.homing_damage * shooter.global_damage_multiplier * stats.damage_multiplier;
        let speed = table.homing_projectile_speed * stats.projectile_speed_multiplier;

        let count = stats.projectile_count.max(1);
        let step = if count > 1 {
            table.homing_spread_angle
        } else {
            0.0
        };
        let start = base_angle - step * (count - 1) as f32 / 2.0;

        for i in 0..count {
            let angle = start + i as f32 * step;
            let projectile = Projectile::new(
                combat.ids.allocate(),
                shooter.pos,
                angle,
                speed,
                PROJECTILE_BASE_SIZE,
                damage,
                table.homing_color,
            )
            .with_homing(table.homing_turn_rate);
            combat.projectiles.push(projectile);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrbitingWeapon {
    /// Rotation of the first orb (radians)
    pub angle: f32,
    /// Orb positions from the latest update
    pub orbs: Vec<Vec2>,
    /// Enemy id -> time of the last hit
    pub last_hits: HashMap<u32, f64>,
}

impl OrbitingWeapon {
    fn update(
        &mut self,
        shooter: &Shooter,
        stats: &OrbitingStats,
        enemies: &mut Vec<Enemy>,
        combat: &mut Combat,
    ) {
        let table = &combat.tuning.weapons;
        let orb_size = table.shield_orb_size;
        let hit_cooldown = table.shield_hit_cooldown_ms;
        let damage =
            table.shield_damage * shooter.global_damage_multiplier * stats.damage_multiplier;
        let orbit_radius = table.shield_orbit_radius * stats.orbit_radius_multiplier;

        self.angle += table.shield_orbit_speed * stats.orbit_speed_multiplier;
        self.orbs.clear();
        if stats.orb_count == 0 {
            return;
        }

        let increment = std::f32::consts::TAU / stats.orb_count as f32;
        self.orbs.extend(
            (0..stats.orb_count)
                .map(|i| shooter.pos + polar_to_cartesian(orbit_radius, self.angle + i as f32 * increment)),
        );

        let now = combat.now_ms;
        for orb in self.orbs.clone() {
            for i in (0..enemies.len()).rev() {
                let Some(enemy) = enemies.get(i) else {
                    continue;
                };
                if orb.distance(enemy.pos) >= orb_size + enemy.radius {
                    continue;
                }
                let ready = self
                    .last_hits
                    .get(&enemy.id)
                    .is_none_or(|last| now - last >= hit_cooldown);
                if ready {
                    let id = enemy.id;
                    self.last_hits.insert(id, now);
                    if combat.damage_enemy(enemies, i, damage).removed() {
                        self.last_hits.remove(&id);
                    }
                }
            }
        }

        // Prune entries for enemies that no longer exist
        let stale_after = hit_cooldown + 100.0;
        self.last_hits.retain(|id, last| {
            now - *last <= stale_after || enemies.iter().any(|e| e.id == *id)
        });
    }

    fn draw(&self, canvas: &mut impl Canvas, table: &WeaponTable) {
        for orb in &self.orbs {
            canvas.fill_circle(*orb, table.shield_orb_size, table.shield_color);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PulseWeapon {
    pub last_attack_ms: f64,
    pub pulsing: bool,
    pub pulse_start_ms: f64,
    pub visual_radius: f32,
    pub center: Vec2,
    /// Enemy ids already damaged by the current pulse
    pub hit_this_pulse: HashSet<u32>,
}

impl PulseWeapon {
    fn update(
        &mut self,
        shooter: &Shooter,
        stats: &PulseStats,
        enemies: &mut Vec<Enemy>,
        combat: &mut Combat,
    ) {
        let table = &combat.tuning.weapons;
        let cooldown = table.pulse_cooldown_ms * stats.cooldown_multiplier as f64;
        let max_radius = table.pulse_max_radius * stats.radius_multiplier;
        let duration = table.pulse_duration_ms;
        let damage =
            table.pulse_damage * shooter.global_damage_multiplier * stats.damage_multiplier;
        let now = combat.now_ms;
        self.center = shooter.pos;

        if self.pulsing {
            let progress = ((now - self.pulse_start_ms) / duration) as f32;
            if progress >= 1.0 {
                self.pulsing = false;
                self.visual_radius = 0.0;
                return;
            }
            self.visual_radius = max_radius * progress;

            for i in (0..enemies.len()).rev() {
                let Some(enemy) = enemies.get(i) else {
                    continue;
                };
                if self.hit_this_pulse.contains(&enemy.id)
                    || shooter.pos.distance(enemy.pos) > self.visual_radius
                {
                    continue;
                }
                self.hit_this_pulse.insert(enemy.id);
                combat.damage_enemy(enemies, i, damage);
            }
        } else if now - self.last_attack_ms >= cooldown {
            self.pulsing = true;
            self.last_attack_ms = now;
            self.pulse_start_ms = now;
            self.visual_radius = 0.0;
            self.hit_this_pulse.clear();
        }
    }

    fn draw(&self, canvas: &mut impl Canvas, table: &WeaponTable) {
        if self.pulsing && self.visual_radius > 0.0 {
            canvas.fill_circle(self.center, self.visual_radius, table.pulse_color);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CodeSprayWeapon {
    pub last_attack_ms: f64,
}

impl CodeSprayWeapon {
    fn update(
        &mut self,
        shooter: &Shooter,
        stats: &CodeSprayStats,
        enemies: &[Enemy],
        combat: &mut Combat,
    ) {
        let range = stats.projectile_range;
        let in_range = enemies.iter().any(|e| shooter.pos.distance(e.pos) <= range);
        if !in_range || combat.now_ms - self.last_attack_ms < stats.cooldown_ms {
            return;
        }
        self.last_attack_ms = combat.now_ms;

        // An enemy sitting exactly on the range edge triggers a volley but
        // is not aimed at
        let target = nearest_enemy(shooter.pos, enemies, Some(range))
            .filter(|&i| shooter.pos.distance(enemies[i].pos) < range);
        let table = &combat.tuning.weapons;
        let angle = target
            .map(|i| bearing(shooter.pos, enemies[i].pos))
            .or(shooter.last_move_angle)
            .unwrap_or(0.0);
        let damage = stats.damage * shooter.global_damage_multiplier * stats.damage_multiplier;
        let count = stats.projectile_count.max(1);
        let start = angle - stats.spread / 2.0;

        for i in 0..count {
            let theta = if count > 1 {
                start + stats.spread * i as f32 / (count - 1) as f32
            } else {
                angle
            };
            let projectile = Projectile::new(
                combat.ids.allocate(),
                shooter.pos,
                theta,
                table.codespray_projectile_speed,
                PROJECTILE_BASE_SIZE,
                damage,
                table.codespray_color,
            )
            .with_range(range);
            combat.projectiles.push(projectile);
        }
    }
}

/// A weapon behaviour bound to one player
#[derive(Debug, Clone)]
pub enum Weapon {
    Homing(HomingWeapon),
    Orbiting(OrbitingWeapon),
    Pulse(PulseWeapon),
    CodeSpray(CodeSprayWeapon),
}

impl Weapon {
    /// New behaviour whose first cooldown starts at `now_ms`
    pub fn new(kind: WeaponKind, now_ms: f64) -> Self {
        match kind {
            WeaponKind::Homing => Weapon::Homing(HomingWeapon {
                last_attack_ms: now_ms,
            }),
            WeaponKind::Orbiting => Weapon::Orbiting(OrbitingWeapon::default()),
            WeaponKind::Pulse => Weapon::Pulse(PulseWeapon {
                last_attack_ms: now_ms,
                ..Default::default()
            }),
            WeaponKind::CodeSpray => Weapon::CodeSpray(CodeSprayWeapon {
                last_attack_ms: now_ms,
            }),
        }
    }

    pub fn kind(&self) -> WeaponKind {
        match self {
            Weapon::Homing(_) => WeaponKind::Homing,
            Weapon::Orbiting(_) => WeaponKind::Orbiting,
            Weapon::Pulse(_) => WeaponKind::Pulse,
            Weapon::CodeSpray(_) => WeaponKind::CodeSpray,
        }
    }

    /// Run one frame of this weapon. Fails only when the stat record is missing.
    pub fn update(
        &mut self,
        shooter: &Shooter,
        loadout: &WeaponLoadout,
        enemies: &mut Vec<Enemy>,
        combat: &mut Combat,
    ) -> Result<(), SimError> {
        let weapon = self.kind();
        let missing = move || SimError::MissingWeaponStats { weapon };
        match self {
            Weapon::Homing(w) => {
                let stats = loadout.homing.as_ref().ok_or_else(missing)?;
                w.update(shooter, stats, enemies, combat);
            }
            Weapon::Orbiting(w) => {
                let stats = loadout.orbiting.as_ref().ok_or_else(missing)?;
                w.update(shooter, stats, enemies, combat);
            }
            Weapon::Pulse(w) => {
                let stats = loadout.pulse.as_ref().ok_or_else(missing)?;
                w.update(shooter, stats, enemies, combat);
            }
            Weapon::CodeSpray(w) => {
                let stats = loadout.codespray.as_ref().ok_or_else(missing)?;
                w.update(shooter, stats, enemies, combat);
            }
        }
        Ok(())
    }

    /// Draw persistent visuals (orbs, pulse ring)
    pub fn draw(&self, canvas: &mut impl Canvas, table: &WeaponTable) {
        match self {
            Weapon::Orbiting(w) => w.draw(canvas, table),
            Weapon::Pulse(w) => w.draw(canvas, table),
            Weapon::Homing(_) | Weapon::CodeSpray(_) => {}
        }
    }
}
