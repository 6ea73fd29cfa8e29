//! Circle overlap tests and per-frame collision resolution
//!
//! Everything in the arena is a circle, so each pass is a linear scan with a
//! distance check. Passes iterate in reverse so removals keep indices valid.

use glam::Vec2;
use log::{debug, info};

use super::combat::Combat;
use super::enemy::Enemy;
use super::entities::XpOrb;
use super::player::{DamageResult, Player};
use crate::consts::XP_PICKUP_PADDING;

/// Strict overlap of two circles
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) < a_radius + b_radius
}

/// Each projectile damages one overlapping enemy and is consumed
pub fn resolve_projectile_hits(enemies: &mut Vec<Enemy>, combat: &mut Combat) {
    for p in (0..combat.projectiles.len()).rev() {
        let Some(projectile) = combat.projectiles.get(p) else {
            continue;
        };
        let target = enemies
            .iter()
            .rposition(|e| circles_overlap(projectile.pos, projectile.radius, e.pos, e.radius));
        if let Some(index) = target {
            let projectile = combat.projectiles.remove(p);
            combat.damage_enemy(enemies, index, projectile.damage);
        }
    }
}

/// Outcome of the enemy/player contact pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactReport {
    /// Enemies that touched the player (all removed)
    pub contacts: u32,
    /// Hits that got through the i-frame window
    pub hits: u32,
    pub died: bool,
}

/// Enemies touching the player deal their contact damage and are removed.
///
/// Damage is still gated by the player's i-frame window.
pub fn resolve_player_contacts(player: &mut Player, enemies: &mut Vec<Enemy>, now_ms: f64) -> ContactReport {
    let mut report = ContactReport::default();
    for i in (0..enemies.len()).rev() {
        if !circles_overlap(player.pos, player.radius, enemies[i].pos, enemies[i].radius) {
            continue;
        }
        let enemy = enemies.remove(i);
        report.contacts += 1;
        match player.take_damage(enemy.damage, now_ms) {
            DamageResult::Ignored => {}
            DamageResult::Hurt => {
                report.hits += 1;
                debug!(
                    "Player hit by {:?} for {}, health {}",
                    enemy.kind, enemy.damage, player.health
                );
            }
            DamageResult::Died => {
                report.hits += 1;
                report.died = true;
                info!("Player killed by {:?}", enemy.kind);
            }
        }
    }
    report
}

/// Pickup radius for XP orbs, scaled by the player's multiplier
pub fn pickup_radius(player: &Player, orb_radius: f32) -> f32 {
    (player.radius + orb_radius + XP_PICKUP_PADDING) * player.pickup_radius_multiplier
}

/// Collect every orb inside the pickup radius. Returns levels gained.
pub fn collect_xp_orbs(player: &mut Player, orbs: &mut Vec<XpOrb>) -> u32 {
    let mut levels = 0;
    orbs.retain(|orb| {
        if player.pos.distance(orb.pos) < pickup_radius(player, orb.radius) {
            levels += player.gain_xp(orb.value);
            false
        } else {
            true
        }
    });
    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::EnemyKind;
    use crate::tuning::EnemyTable;

    fn standard(id: u32, pos: Vec2) -> Enemy {
        Enemy::new(id, pos, EnemyKind::Standard, 0.0, &EnemyTable::default())
    }

    #[test]
    fn test_circles_overlap_is_strict() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(9.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
    }

    #[test]
    fn test_contact_removes_enemy_and_respects_iframes() {
        let mut player = Player::new(Vec2::new(100.0, 100.0), 0.0);
        let mut enemies = vec![standard(1, Vec2::new(105.0, 100.0))];
        let report = resolve_player_contacts(&mut player, &mut enemies, 1000.0);
        assert_eq!(report.contacts, 1);
        assert_eq!(report.hits, 1);
        assert!(enemies.is_empty());
        let after_first = player.health;

        enemies.push(standard(2, Vec2::new(95.0, 100.0)));
        let report = resolve_player_contacts(&mut player, &mut enemies, 1100.0);
        assert_eq!(report.contacts, 1);
        assert_eq!(report.hits, 0);
        assert_eq!(player.health, after_first);
    }

    #[test]
    fn test_contact_uses_half_size_player_radius() {
        let mut player = Player::new(Vec2::new(100.0, 100.0), 0.0);
        assert_eq!(player.radius, 10.0);

        // Standard radius 9: contact only closer than 19 px
        let mut enemies = vec![standard(1, Vec2::new(125.0, 100.0))];
        let report = resolve_player_contacts(&mut player, &mut enemies, 1000.0);
        assert_eq!(report, ContactReport::default());
        assert_eq!(player.health, 100.0);

        enemies[0].pos = Vec2::new(118.0, 100.0);
        let report = resolve_player_contacts(&mut player, &mut enemies, 1000.0);
        assert_eq!(report.contacts, 1);
    }

    #[test]
    fn test_far_enemy_untouched() {
        let mut player = Player::new(Vec2::new(100.0, 100.0), 0.0);
        let mut enemies = vec![standard(1, Vec2::new(300.0, 100.0))];
        let report = resolve_player_contacts(&mut player, &mut enemies, 0.0);
        assert_eq!(report, ContactReport::default());
        assert_eq!(enemies.len(), 1);
    }

    #[test]
    fn test_xp_pickup_radius() {
        let mut player = Player::new(Vec2::ZERO, 0.0);
        // (10 + 5 + 15) * 1.0 = 30
        let mut orbs = vec![
            XpOrb::new(Vec2::new(29.0, 0.0), 10.0),
            XpOrb::new(Vec2::new(31.0, 0.0), 10.0),
        ];
        assert_eq!(collect_xp_orbs(&mut player, &mut orbs), 0);
        assert_eq!(orbs.len(), 1);
        assert_eq!(player.xp, 10.0);

        // 30 * 1.2 = 36
        player.pickup_radius_multiplier = 1.2;
        orbs.push(XpOrb::new(Vec2::new(0.0, 35.0), 100.0));
        assert_eq!(collect_xp_orbs(&mut player, &mut orbs), 1);
        assert!(orbs.is_empty());
    }
}
