//! The player character: movement, health, leveling and owned weapons

use glam::Vec2;
use log::{error, info};
use serde::{Deserialize, Serialize};

use super::combat::Combat;
use super::enemy::Enemy;
use super::state::Arena;
use super::weapons::{Shooter, Weapon, WeaponKind, WeaponLoadout};
use crate::consts::*;
use crate::renderer::{Canvas, colors};
use crate::tuning::WeaponTable;

/// Directional key state for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveKeys {
    /// Build from the names of currently pressed keys (WASD or arrows)
    pub fn from_pressed<'a>(pressed: impl IntoIterator<Item = &'a str>) -> Self {
        let mut keys = Self::default();
        for key in pressed {
            match key {
                "w" | "W" | "ArrowUp" => keys.up = true,
                "s" | "S" | "ArrowDown" => keys.down = true,
                "a" | "A" | "ArrowLeft" => keys.left = true,
                "d" | "D" | "ArrowRight" => keys.right = true,
                _ => {}
            }
        }
        keys
    }

    /// Unnormalised movement direction (y grows downward)
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Result of a contact hit on the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageResult {
    /// Inside the i-frame window
    Ignored,
    Hurt,
    Died,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    pub xp: f32,
    pub xp_to_next_level: f32,
    pub level: u32,
    pub speed_multiplier: f32,
    pub global_damage_multiplier: f32,
    pub xp_gain_multiplier: f32,
    pub pickup_radius_multiplier: f32,
    pub loadout: WeaponLoadout,
    pub weapons: Vec<Weapon>,
    pub last_damaged_ms: f64,
    pub damage_cooldown_ms: f64,
    /// Heading of the last movement input (radians)
    pub last_move_angle: Option<f32>,
}

impl Player {
    /// Fresh player holding a level 1 homing weapon
    pub fn new(pos: Vec2, now_ms: f64) -> Self {
        let mut player = Self {
            pos,
            radius: PLAYER_SIZE / 2.0,
            health: INITIAL_PLAYER_HEALTH,
            max_health: INITIAL_PLAYER_HEALTH,
            xp: 0.0,
            xp_to_next_level: XP_PER_LEVEL_BASE,
            level: 1,
            speed_multiplier: 1.0,
            global_damage_multiplier: 1.0,
            xp_gain_multiplier: 1.0,
            pickup_radius_multiplier: 1.0,
            loadout: WeaponLoadout::default(),
            weapons: Vec::new(),
            last_damaged_ms: f64::NEG_INFINITY,
            damage_cooldown_ms: PLAYER_DAMAGE_COOLDOWN_MS,
            last_move_angle: None,
        };
        player.add_weapon(WeaponKind::Homing, now_ms);
        player
    }

    pub fn has_weapon(&self, kind: WeaponKind) -> bool {
        self.weapons.iter().any(|w| w.kind() == kind)
    }

    /// Unlock a weapon or level it up.
    ///
    /// The behaviour is only created once; the record level always increments.
    pub fn add_weapon(&mut self, kind: WeaponKind, now_ms: f64) {
        self.loadout.unlock(kind);
        if !self.has_weapon(kind) {
            self.weapons.push(Weapon::new(kind, now_ms));
        }
    }

    /// Move, then run every weapon against the enemy list
    pub fn update(
        &mut self,
        keys: &MoveKeys,
        arena: &Arena,
        enemies: &mut Vec<Enemy>,
        combat: &mut Combat,
    ) {
        let dir = keys.direction();
        if dir != Vec2::ZERO {
            let dir = dir.normalize();
            self.pos += dir * PLAYER_BASE_SPEED * self.speed_multiplier;
            self.last_move_angle = Some(dir.y.atan2(dir.x));
        }
        self.pos = arena.clamp(self.pos, self.radius);

        let shooter = Shooter {
            pos: self.pos,
            global_damage_multiplier: self.global_damage_multiplier,
            last_move_angle: self.last_move_angle,
        };
        for weapon in self.weapons.iter_mut() {
            if let Err(err) = weapon.update(&shooter, &self.loadout, enemies, combat) {
                error!("{err}, skipping this frame");
            }
        }
    }

    /// Apply contact damage unless still inside the i-frame window
    pub fn take_damage(&mut self, amount: f32, now_ms: f64) -> DamageResult {
        if now_ms - self.last_damaged_ms < self.damage_cooldown_ms {
            return DamageResult::Ignored;
        }
        self.last_damaged_ms = now_ms;
        self.health = (self.health - amount.max(0.0)).max(0.0);
        if self.health <= 0.0 {
            DamageResult::Died
        } else {
            DamageResult::Hurt
        }
    }

    /// Restore health up to the maximum
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Add scaled XP. Returns the number of levels gained.
    pub fn gain_xp(&mut self, amount: f32) -> u32 {
        self.xp += amount * self.xp_gain_multiplier;
        let mut levels = 0;
        while self.xp >= self.xp_to_next_level {
            self.xp -= self.xp_to_next_level;
            self.level += 1;
            self.xp_to_next_level = (self.xp_to_next_level * XP_LEVEL_GROWTH).floor();
            levels += 1;
            info!(
                "Level up: {} (next at {} xp)",
                self.level, self.xp_to_next_level
            );
        }
        levels
    }

    pub fn xp_fraction(&self) -> f32 {
        if self.xp_to_next_level <= 0.0 {
            return 0.0;
        }
        (self.xp / self.xp_to_next_level).clamp(0.0, 1.0)
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    /// Health bar fill: high above 1/2, mid above 1/5, low otherwise
    pub fn health_color(&self) -> [f32; 4] {
        match self.health_fraction() {
            f if f > 0.5 => colors::HEALTH_HIGH,
            f if f > 0.2 => colors::HEALTH_MID,
            _ => colors::HEALTH_LOW,
        }
    }

    pub fn draw(&self, canvas: &mut impl Canvas, table: &WeaponTable) {
        for weapon in &self.weapons {
            weapon.draw(canvas, table);
        }
        canvas.fill_circle(self.pos, self.radius, colors::PLAYER);

        let bar_size = Vec2::new(PLAYER_SIZE * 1.5, 8.0);
        let bar_origin = self.pos - Vec2::new(bar_size.x / 2.0, self.radius + bar_size.y + 5.0);
        canvas.fill_bar(
            bar_origin,
            bar_size,
            self.health_fraction(),
            colors::HEALTH_BAR_BACK,
            self.health_color(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(Vec2::new(100.0, 100.0), 0.0)
    }

    #[test]
    fn test_starts_with_homing() {
        let p = player();
        assert_eq!(p.weapons.len(), 1);
        assert_eq!(p.loadout.level(WeaponKind::Homing), Some(1));
        assert!(!p.loadout.has(WeaponKind::Pulse));
    }

    #[test]
    fn test_add_weapon_is_idempotent() {
        let mut p = player();
        p.add_weapon(WeaponKind::Pulse, 0.0);
        p.add_weapon(WeaponKind::Pulse, 10.0);
        assert_eq!(p.weapons.len(), 2);
        assert_eq!(p.loadout.level(WeaponKind::Pulse), Some(2));
    }

    #[test]
    fn test_damage_cooldown() {
        let mut p = player();
        assert_eq!(p.take_damage(14.0, 1000.0), DamageResult::Hurt);
        assert_eq!(p.health, 86.0);
        assert_eq!(p.take_damage(14.0, 1100.0), DamageResult::Ignored);
        assert_eq!(p.health, 86.0);
        assert_eq!(p.take_damage(14.0, 1700.0), DamageResult::Hurt);
        assert_eq!(p.health, 72.0);
    }

    #[test]
    fn test_death_clamps_health() {
        let mut p = player();
        assert_eq!(p.take_damage(500.0, 0.0), DamageResult::Died);
        assert_eq!(p.health, 0.0);
    }

    #[test]
    fn test_multi_level_gain() {
        let mut p = player();
        // 90 then floor(90 * 1.15) = 103
        assert_eq!(p.gain_xp(200.0), 2);
        assert_eq!(p.level, 3);
        assert_eq!(p.xp_to_next_level, 118.0);
        assert!((p.xp - 7.0).abs() < 1e-4);
    }

    #[test]
    fn test_xp_gain_multiplier() {
        let mut p = player();
        p.xp_gain_multiplier = 2.0;
        assert_eq!(p.gain_xp(45.0), 1);
        assert_eq!(p.xp, 0.0);
    }

    #[test]
    fn test_radius_is_half_size_and_clamps_to_arena() {
        let mut p = player();
        assert_eq!(p.radius, PLAYER_SIZE / 2.0);
        p.pos = Vec2::new(-50.0, 700.0);
        p.pos = Arena::default().clamp(p.pos, p.radius);
        assert_eq!(p.pos, Vec2::new(10.0, 590.0));
    }

    #[test]
    fn test_health_bar_color_cutoffs() {
        let mut p = player();
        assert_eq!(p.health_color(), colors::HEALTH_HIGH);
        p.health = 50.0;
        assert_eq!(p.health_color(), colors::HEALTH_MID);
        p.health = 20.0;
        assert_eq!(p.health_color(), colors::HEALTH_LOW);
    }

    #[test]
    fn test_draw_includes_health_bar() {
        let p = player();
        let mut canvas = crate::renderer::VertexCanvas::new();
        p.draw(&mut canvas, &WeaponTable::default());
        let vertices = &canvas.vertices;
        assert!(vertices.iter().any(|v| v.color == colors::HEALTH_BAR_BACK));
        assert!(vertices.iter().any(|v| v.color == colors::HEALTH_HIGH));
    }

    #[test]
    fn test_move_keys_mapping() {
        let keys = MoveKeys::from_pressed(["W", "ArrowRight", "x"]);
        assert!(keys.up && keys.right && !keys.down && !keys.left);
        assert_eq!(keys.direction(), Vec2::new(1.0, -1.0));
    }
}
