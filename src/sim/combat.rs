//! Damage resolution shared by every weapon and projectile
//!
//! `Combat` bundles the collections a hit can touch (XP drops, split
//! children, overflow fragments, effects) so systems receive explicit handles
//! instead of reaching into global state.

use log::{debug, warn};
use rand_pcg::Pcg32;

use super::enemy::Enemy;
use super::entities::{Effects, Projectile, XpOrb};
use super::state::EntityIds;
use crate::consts::XP_ORB_BASE_VALUE;
use crate::error::SimError;
use crate::renderer::colors;
use crate::tuning::Tuning;

/// Particles per kill
const KILL_BURST: usize = 8;
/// Particles per blob split
const SPLIT_BURST: usize = 12;

/// What happened to the enemy that was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitResult {
    Survived,
    Killed,
    /// Replaced by its children
    Split,
}

impl HitResult {
    /// The enemy at the hit index is gone
    pub fn removed(&self) -> bool {
        !matches!(self, HitResult::Survived)
    }
}

/// Mutable world handles for one frame's damage pass
pub struct Combat<'a> {
    /// Simulation time of the current frame
    pub now_ms: f64,
    pub ids: &'a mut EntityIds,
    pub rng: &'a mut Pcg32,
    pub tuning: &'a Tuning,
    pub projectiles: &'a mut Vec<Projectile>,
    pub xp_orbs: &'a mut Vec<XpOrb>,
    pub effects: &'a mut Effects,
    pub kills: &'a mut u32,
}

impl Combat<'_> {
    /// Damage `enemies[index]`, resolving overflows, splits and kills.
    ///
    /// New enemies are appended, so callers iterating in reverse stay valid.
    pub fn damage_enemy(&mut self, enemies: &mut Vec<Enemy>, index: usize, amount: f32) -> HitResult {
        let Some(enemy) = enemies.get_mut(index) else {
            warn!("{}", SimError::StaleEntity { index, context: "damage" });
            return HitResult::Survived;
        };

        let outcome = enemy.take_damage(amount);

        let mut fragments = Vec::new();
        for _ in 0..outcome.overflows {
            let burst = enemy.overflow(self.ids, self.now_ms, &self.tuning.enemies);
            if !burst.is_empty() {
                debug!("Enemy {} overflowed into {} fragments", enemy.id, burst.len());
                self.effects
                    .shockwave(enemy.pos, enemy.radius * 3.0, colors::SHOCKWAVE);
            }
            fragments.extend(burst);
        }

        let result = if outcome.split {
            self.split_enemy(enemies, index);
            HitResult::Split
        } else if outcome.dead {
            let dead = enemies.remove(index);
            self.xp_orbs
                .push(XpOrb::new(dead.pos, XP_ORB_BASE_VALUE * dead.xp_multiplier));
            self.effects.burst(self.rng, dead.pos, dead.color, KILL_BURST);
            *self.kills += 1;
            HitResult::Killed
        } else {
            HitResult::Survived
        };

        enemies.extend(fragments);
        result
    }

    /// Replace `enemies[index]` with its split children (no XP drop)
    pub fn split_enemy(&mut self, enemies: &mut Vec<Enemy>, index: usize) {
        if index >= enemies.len() {
            warn!("{}", SimError::StaleEntity { index, context: "split" });
            return;
        }
        let mut parent = enemies.remove(index);
        let children = parent.split(self.ids, self.rng, self.now_ms, &self.tuning.enemies);
        debug!(
            "Blob {} split into {} children",
            parent.id,
            children.len()
        );
        self.effects
            .burst(self.rng, parent.pos, parent.color, SPLIT_BURST);
        enemies.extend(children);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BlobSize, EnemyKind};
    use glam::Vec2;
    use rand::SeedableRng;

    struct Fixture {
        ids: EntityIds,
        rng: Pcg32,
        tuning: Tuning,
        projectiles: Vec<Projectile>,
        xp_orbs: Vec<XpOrb>,
        effects: Effects,
        kills: u32,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                ids: EntityIds::default(),
                rng: Pcg32::seed_from_u64(11),
                tuning: Tuning::default(),
                projectiles: Vec::new(),
                xp_orbs: Vec::new(),
                effects: Effects::default(),
                kills: 0,
            }
        }

        fn combat(&mut self) -> Combat<'_> {
            Combat {
                now_ms: 0.0,
                ids: &mut self.ids,
                rng: &mut self.rng,
                tuning: &self.tuning,
                projectiles: &mut self.projectiles,
                xp_orbs: &mut self.xp_orbs,
                effects: &mut self.effects,
                kills: &mut self.kills,
            }
        }
    }

    fn enemy(fx: &mut Fixture, kind: EnemyKind) -> Enemy {
        let id = fx.ids.allocate();
        Enemy::new(id, Vec2::new(10.0, 10.0), kind, 0.0, &fx.tuning.enemies)
    }

    #[test]
    fn test_kill_drops_scaled_xp() {
        let mut fx = Fixture::new();
        let mut enemies = vec![enemy(&mut fx, EnemyKind::Tank)];
        let result = fx.combat().damage_enemy(&mut enemies, 0, 1000.0);
        assert_eq!(result, HitResult::Killed);
        assert!(enemies.is_empty());
        assert_eq!(fx.xp_orbs.len(), 1);
        assert!((fx.xp_orbs[0].value - XP_ORB_BASE_VALUE * 1.5).abs() < 1e-4);
        assert_eq!(fx.kills, 1);
    }

    #[test]
    fn test_blob_death_redirects_to_split() {
        let mut fx = Fixture::new();
        let mut enemies = vec![enemy(&mut fx, EnemyKind::ScopeCreepBlob(BlobSize::Large))];
        let result = fx.combat().damage_enemy(&mut enemies, 0, 1000.0);
        assert_eq!(result, HitResult::Split);
        assert_eq!(enemies.len(), 2);
        assert!(fx.xp_orbs.is_empty());
        assert_eq!(fx.kills, 0);
    }

    #[test]
    fn test_overflow_appends_fragments_and_survives() {
        let mut fx = Fixture::new();
        let mut enemies = vec![enemy(&mut fx, EnemyKind::BufferOverflow)];
        let max = enemies[0].max_health;
        let result = fx.combat().damage_enemy(&mut enemies, 0, max * 0.3);
        assert_eq!(result, HitResult::Survived);
        assert_eq!(enemies[0].kind, EnemyKind::BufferOverflow);
        assert_eq!(enemies.len(), 1 + 3);
        assert_eq!(fx.effects.shockwaves.len(), 1);
    }

    #[test]
    fn test_missing_index_is_ignored() {
        let mut fx = Fixture::new();
        let mut enemies: Vec<Enemy> = Vec::new();
        assert_eq!(fx.combat().damage_enemy(&mut enemies, 3, 10.0), HitResult::Survived);
    }
}
