//! Enemy entities
//!
//! Enemies walk straight at the player. Two kinds carry extra state:
//! scope-creep blobs split into smaller blobs (on death or on a timer), and
//! buffer overflows burst fragments as their health crosses thresholds.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::EntityIds;
use crate::renderer::{Canvas, colors};
use crate::tuning::EnemyTable;

/// Scope-creep blob size tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlobSize {
    Large,
    Medium,
    Small,
}

impl BlobSize {
    /// Tier produced by splitting (None for the smallest tier)
    pub fn smaller(self) -> Option<BlobSize> {
        match self {
            BlobSize::Large => Some(BlobSize::Medium),
            BlobSize::Medium => Some(BlobSize::Small),
            BlobSize::Small => None,
        }
    }

    /// Width of the box children scatter in when this tier splits
    fn split_scatter(self) -> f32 {
        match self {
            BlobSize::Large => 30.0,
            BlobSize::Medium => 20.0,
            BlobSize::Small => 0.0,
        }
    }
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Standard,
    Creep,
    Tank,
    ScopeCreepBlob(BlobSize),
    BufferOverflow,
    BufferOverflowFragment,
}

impl EnemyKind {
    pub fn is_blob(&self) -> bool {
        matches!(self, EnemyKind::ScopeCreepBlob(_))
    }
}

/// Overflow bookkeeping for `EnemyKind::BufferOverflow`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverflowState {
    pub count: u32,
    pub max_overflows: u32,
    /// Health fractions, descending
    pub thresholds: Vec<f32>,
    /// Index of the next unconsumed threshold
    pub next_threshold: usize,
    pub knockback_immune: bool,
}

/// What a single `take_damage` call did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageOutcome {
    /// Remove the enemy and drop XP
    pub dead: bool,
    /// The enemy must split instead of dying (caller removes it)
    pub split: bool,
    /// Overflow bursts to perform
    pub overflows: u32,
}

/// A hostile entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub kind: EnemyKind,
    /// Diameter
    pub size: f32,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    /// Pixels per frame
    pub speed: f32,
    /// Contact damage
    pub damage: f32,
    pub xp_multiplier: f32,
    pub color: [f32; 4],
    /// Rolled the spawner's mutation buff
    pub mutated: bool,
    /// Simulation time the split timer started
    pub spawned_at_ms: f64,
    pub split_timeout_ms: Option<f64>,
    pub has_split: bool,
    pub overflow: Option<OverflowState>,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, kind: EnemyKind, now_ms: f64, table: &EnemyTable) -> Self {
        let stats = table.stats(kind);
        let overflow = (kind == EnemyKind::BufferOverflow).then(|| OverflowState {
            count: 0,
            max_overflows: table.overflow.max_overflows,
            thresholds: table.overflow.thresholds.clone(),
            next_threshold: 0,
            knockback_immune: table.overflow.knockback_immune,
        });

        Self {
            id,
            pos,
            kind,
            size: stats.size,
            radius: stats.size / 2.0,
            health: stats.base_health,
            max_health: stats.base_health,
            speed: stats.speed,
            damage: stats.damage,
            xp_multiplier: stats.xp_multiplier,
            color: stats.color,
            mutated: false,
            spawned_at_ms: now_ms,
            split_timeout_ms: if kind.is_blob() {
                stats.split_timeout_ms
            } else {
                None
            },
            has_split: false,
            overflow,
        }
    }

    /// Apply the spawner's mutation buff
    pub fn mutate(&mut self) {
        if self.mutated {
            return;
        }
        self.mutated = true;
        self.size *= 1.3;
        self.radius = self.size / 2.0;
        self.max_health *= 1.5;
        self.health = self.max_health;
        self.speed *= 1.2;
        self.damage *= 1.25;
        self.xp_multiplier *= 1.5;
        self.color = colors::ENEMY_MUTATED;
    }

    /// Health fraction in [0, 1]
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    /// Whether a blob split is still available
    pub fn can_split(&self) -> bool {
        match self.kind {
            EnemyKind::ScopeCreepBlob(size) => !self.has_split && size.smaller().is_some(),
            _ => false,
        }
    }

    /// Advance one frame toward `target`.
    ///
    /// Returns true when a blob's split timer has run out; the caller performs
    /// the split and removes this enemy.
    pub fn update(&mut self, target: Vec2, now_ms: f64, rng: &mut impl Rng, jitter: f32) -> bool {
        let to_target = target - self.pos;
        let distance = to_target.length();
        if distance > 0.0 {
            let mut vel = to_target / distance * self.speed;
            if self.kind == EnemyKind::Creep && jitter > 0.0 {
                vel += Vec2::new(
                    rng.random_range(-jitter..=jitter),
                    rng.random_range(-jitter..=jitter),
                );
            }
            self.pos += vel;
        }

        match self.split_timeout_ms {
            Some(timeout) if self.can_split() => now_ms - self.spawned_at_ms > timeout,
            _ => false,
        }
    }

    /// Subtract health and report what must happen next
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        self.health -= amount.max(0.0);
        let mut outcome = DamageOutcome::default();

        if let Some(overflow) = self.overflow.as_mut() {
            let fraction = if self.max_health > 0.0 {
                self.health / self.max_health
            } else {
                0.0
            };
            let mut budget = overflow.max_overflows.saturating_sub(overflow.count);
            while budget > 0
                && overflow.next_threshold < overflow.thresholds.len()
                && fraction <= overflow.thresholds[overflow.next_threshold]
            {
                overflow.next_threshold += 1;
                outcome.overflows += 1;
                budget -= 1;
            }
        }

        if self.health <= 0.0 && self.can_split() {
            outcome.split = true;
            return outcome;
        }

        outcome.dead = self.health <= 0.0;
        outcome
    }

    /// Produce two children of the next smaller tier. Second call yields nothing.
    pub fn split(
        &mut self,
        ids: &mut EntityIds,
        rng: &mut impl Rng,
        now_ms: f64,
        table: &EnemyTable,
    ) -> Vec<Enemy> {
        if self.has_split {
            return Vec::new();
        }
        self.has_split = true;

        let EnemyKind::ScopeCreepBlob(size) = self.kind else {
            return Vec::new();
        };
        let Some(child_size) = size.smaller() else {
            return Vec::new();
        };

        let scatter = size.split_scatter();
        (0..2)
            .map(|_| {
                let offset = Vec2::new(
                    (rng.random::<f32>() - 0.5) * scatter,
                    (rng.random::<f32>() - 0.5) * scatter,
                );
                Enemy::new(
                    ids.allocate(),
                    self.pos + offset,
                    EnemyKind::ScopeCreepBlob(child_size),
                    now_ms,
                    table,
                )
            })
            .collect()
    }

    /// Burst `2 + count` fragments on a ring around self. Self survives.
    pub fn overflow(&mut self, ids: &mut EntityIds, now_ms: f64, table: &EnemyTable) -> Vec<Enemy> {
        let Some(state) = self.overflow.as_mut() else {
            return Vec::new();
        };
        if state.count >= state.max_overflows {
            return Vec::new();
        }
        state.count += 1;

        let count = 2 + state.count;
        let ring = self.radius + 10.0;
        (0..count)
            .map(|i| {
                let theta = i as f32 / count as f32 * std::f32::consts::TAU;
                let pos = self.pos + Vec2::new(theta.cos(), theta.sin()) * ring;
                Enemy::new(ids.allocate(), pos, EnemyKind::BufferOverflowFragment, now_ms, table)
            })
            .collect()
    }

    pub fn draw(&self, canvas: &mut impl Canvas) {
        canvas.fill_circle(self.pos, self.radius, self.color);

        if self.kind.is_blob() {
            // Face: two eyes and a mouth
            let r = self.radius;
            canvas.fill_circle(self.pos + Vec2::new(-r / 3.0, -r / 4.0), r / 7.0, colors::BLOB_FACE);
            canvas.fill_circle(self.pos + Vec2::new(r / 3.0, -r / 4.0), r / 7.0, colors::BLOB_FACE);
            canvas.stroke_circle(self.pos + Vec2::new(0.0, r / 6.0), r / 4.0, 2.0, colors::BLOB_FACE);
        }

        let bar_size = Vec2::new(self.size * 1.2, 5.0);
        let bar_origin = self.pos - Vec2::new(bar_size.x / 2.0, self.radius + bar_size.y + 3.0);
        canvas.fill_bar(
            bar_origin,
            bar_size,
            self.health_fraction(),
            colors::ENEMY_BAR_BACK,
            colors::ENEMY_BAR,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn spawn(kind: EnemyKind) -> Enemy {
        Enemy::new(1, Vec2::ZERO, kind, 0.0, &EnemyTable::default())
    }

    #[test]
    fn test_moves_toward_target_at_speed() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut enemy = spawn(EnemyKind::Standard);
        enemy.update(Vec2::new(100.0, 0.0), 16.0, &mut rng, 0.0);
        assert!((enemy.pos.x - enemy.speed).abs() < 1e-6);
        assert_eq!(enemy.pos.y, 0.0);
    }

    #[test]
    fn test_no_move_when_on_target() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut enemy = spawn(EnemyKind::Creep);
        enemy.update(Vec2::ZERO, 16.0, &mut rng, 0.6);
        assert_eq!(enemy.pos, Vec2::ZERO);
    }

    #[test]
    fn test_creep_jitter_stays_bounded() {
        let mut rng = Pcg32::seed_from_u64(99);
        let jitter = 0.6;
        let mut creep = spawn(EnemyKind::Creep);
        let mut deviated = false;
        for _ in 0..200 {
            let before = creep.pos;
            creep.update(before + Vec2::new(1000.0, 0.0), 16.0, &mut rng, jitter);
            let step = creep.pos - before;
            assert!(step.length() <= creep.speed + jitter * 2f32.sqrt() + 1e-4);
            // Per-axis noise never exceeds the jitter bound
            assert!((step.x - creep.speed).abs() <= jitter + 1e-4);
            assert!(step.y.abs() <= jitter + 1e-4);
            deviated |= step.y != 0.0;
        }
        assert!(deviated);
    }

    #[test]
    fn test_standard_ignores_jitter() {
        let mut rng = Pcg32::seed_from_u64(99);
        let mut enemy = spawn(EnemyKind::Standard);
        for _ in 0..50 {
            let before = enemy.pos;
            enemy.update(before + Vec2::new(1000.0, 0.0), 16.0, &mut rng, 5.0);
            let step = enemy.pos - before;
            assert!((step.x - enemy.speed).abs() < 1e-4);
            assert_eq!(step.y, 0.0);
        }
    }

    #[test]
    fn test_large_blob_split_yields_two_medium_once() {
        let table = EnemyTable::default();
        let mut ids = EntityIds::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut blob = spawn(EnemyKind::ScopeCreepBlob(BlobSize::Large));

        let outcome = blob.take_damage(1000.0);
        assert!(outcome.split);
        assert!(!outcome.dead);

        let children = blob.split(&mut ids, &mut rng, 0.0, &table);
        assert_eq!(children.len(), 2);
        assert!(
            children
                .iter()
                .all(|c| c.kind == EnemyKind::ScopeCreepBlob(BlobSize::Medium))
        );
        assert!(children.iter().all(|c| (c.pos - blob.pos).abs().max_element() <= 15.0));

        assert!(blob.split(&mut ids, &mut rng, 0.0, &table).is_empty());
    }

    #[test]
    fn test_medium_splits_into_small_and_small_dies() {
        let table = EnemyTable::default();
        let mut ids = EntityIds::default();
        let mut rng = Pcg32::seed_from_u64(7);

        let mut medium = spawn(EnemyKind::ScopeCreepBlob(BlobSize::Medium));
        let children = medium.split(&mut ids, &mut rng, 0.0, &table);
        assert_eq!(children.len(), 2);
        assert!(
            children
                .iter()
                .all(|c| c.kind == EnemyKind::ScopeCreepBlob(BlobSize::Small))
        );

        let mut small = spawn(EnemyKind::ScopeCreepBlob(BlobSize::Small));
        assert!(!small.can_split());
        let outcome = small.take_damage(100.0);
        assert!(outcome.dead);
        assert!(!outcome.split);
    }

    #[test]
    fn test_split_timer() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut blob = spawn(EnemyKind::ScopeCreepBlob(BlobSize::Large));
        assert!(!blob.update(Vec2::new(500.0, 0.0), 8000.0, &mut rng, 0.0));
        assert!(blob.update(Vec2::new(500.0, 0.0), 8001.0, &mut rng, 0.0));

        let mut small = spawn(EnemyKind::ScopeCreepBlob(BlobSize::Small));
        assert!(!small.update(Vec2::new(500.0, 0.0), 1e9, &mut rng, 0.0));
    }

    #[test]
    fn test_overflow_thresholds_in_order() {
        let table = EnemyTable::default();
        let mut ids = EntityIds::default();
        let mut enemy = spawn(EnemyKind::BufferOverflow);
        let max = enemy.max_health;

        // 0.9 -> nothing
        assert_eq!(enemy.take_damage(max * 0.1).overflows, 0);
        // 0.7 -> crosses 0.75
        assert_eq!(enemy.take_damage(max * 0.2).overflows, 1);
        let frags = enemy.overflow(&mut ids, 0.0, &table);
        assert_eq!(frags.len(), 3);
        assert!(
            frags
                .iter()
                .all(|f| f.kind == EnemyKind::BufferOverflowFragment)
        );

        // 0.2 -> crosses 0.5 and 0.25 at once
        assert_eq!(enemy.take_damage(max * 0.5).overflows, 2);
        assert_eq!(enemy.overflow(&mut ids, 0.0, &table).len(), 4);
        assert_eq!(enemy.overflow(&mut ids, 0.0, &table).len(), 5);

        // Budget exhausted
        assert!(enemy.overflow(&mut ids, 0.0, &table).is_empty());
        assert_eq!(enemy.take_damage(1.0).overflows, 0);
    }

    #[test]
    fn test_mutation_buffs_once() {
        let mut enemy = spawn(EnemyKind::Standard);
        let base_health = enemy.max_health;
        enemy.mutate();
        enemy.mutate();
        assert!(enemy.mutated);
        assert!((enemy.max_health - base_health * 1.5).abs() < 1e-4);
        assert_eq!(enemy.color, colors::ENEMY_MUTATED);
    }

    #[test]
    fn test_negative_damage_never_heals() {
        let mut enemy = spawn(EnemyKind::Tank);
        let before = enemy.health;
        enemy.take_damage(-50.0);
        assert_eq!(enemy.health, before);
    }
}
