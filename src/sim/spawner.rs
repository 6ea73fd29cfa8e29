//! Enemy spawning and difficulty escalation
//!
//! Each spawn call rolls one enemy kind from time-scaled probabilities and
//! places a batch of it just outside a random arena edge.

use glam::Vec2;
use log::debug;
use rand::Rng;

use super::enemy::{BlobSize, Enemy, EnemyKind};
use super::state::{Arena, EntityIds};
use crate::consts::ENEMY_BASE_SIZE;
use crate::tuning::{SpawnTuning, Tuning};

/// Inputs to one spawn call
#[derive(Debug, Clone, Copy)]
pub struct SpawnRequest {
    pub elapsed_secs: f32,
    pub player_level: u32,
    pub tanks_alive: usize,
    pub now_ms: f64,
}

/// Pick a kind from a uniform `roll` in [0, 1).
///
/// Cumulative draw: scope creep, buffer overflow, tank, creep, then standard
/// as the remainder.
pub fn pick_kind(roll: f32, elapsed_secs: f32, tanks_alive: usize, tuning: &SpawnTuning) -> EnemyKind {
    let tank_chance = if tanks_alive < tuning.max_tanks {
        tuning.tank.chance(elapsed_secs)
    } else {
        0.0
    };
    let table = [
        (EnemyKind::ScopeCreepBlob(BlobSize::Large), tuning.scope_creep.chance(elapsed_secs)),
        (EnemyKind::BufferOverflow, tuning.buffer_overflow.chance(elapsed_secs)),
        (EnemyKind::Tank, tank_chance),
        (EnemyKind::Creep, tuning.creep.chance(elapsed_secs)),
    ];

    let mut cumulative = 0.0;
    for (kind, chance) in table {
        cumulative += chance;
        if roll < cumulative {
            return kind;
        }
    }
    EnemyKind::Standard
}

/// How many enemies of `kind` one spawn call places
pub fn batch_size(kind: EnemyKind, player_level: u32, rng: &mut impl Rng, tuning: &SpawnTuning) -> u32 {
    match kind {
        EnemyKind::Creep => {
            let extra = if tuning.creep_batch_random > 0 {
                rng.random_range(0..tuning.creep_batch_random)
            } else {
                0
            };
            extra + tuning.creep_batch_min + player_level / tuning.creep_levels_per_extra.max(1)
        }
        EnemyKind::Standard => 1 + player_level / tuning.standard_levels_per_extra.max(1),
        _ => 1,
    }
}

/// Mutation chance for standard enemies at a player level
pub fn mutation_chance(player_level: u32, tuning: &SpawnTuning) -> f32 {
    (tuning.mutation_base_chance + player_level as f32 * tuning.mutation_chance_per_level)
        .min(tuning.mutation_max_chance)
}

/// A point on a random edge, `margin` outside the arena
pub fn edge_point(rng: &mut impl Rng, arena: &Arena, margin: f32) -> Vec2 {
    match rng.random_range(0..4) {
        0 => Vec2::new(rng.random::<f32>() * arena.width, -margin),
        1 => Vec2::new(arena.width + margin, rng.random::<f32>() * arena.height),
        2 => Vec2::new(rng.random::<f32>() * arena.width, arena.height + margin),
        _ => Vec2::new(-margin, rng.random::<f32>() * arena.height),
    }
}

/// Roll and place one wave
pub fn spawn_wave(
    rng: &mut impl Rng,
    ids: &mut EntityIds,
    tuning: &Tuning,
    arena: &Arena,
    request: SpawnRequest,
) -> Vec<Enemy> {
    let spawn = &tuning.spawn;
    let kind = pick_kind(rng.random(), request.elapsed_secs, request.tanks_alive, spawn);
    let origin = edge_point(rng, arena, spawn.edge_margin_factor * ENEMY_BASE_SIZE);
    let count = batch_size(kind, request.player_level, rng, spawn);
    let mutate_chance = mutation_chance(request.player_level, spawn);

    let mut enemies = Vec::with_capacity(count as usize);
    for i in 0..count {
        let pos = if i == 0 {
            origin
        } else {
            origin
                + Vec2::new(
                    (rng.random::<f32>() - 0.5) * spawn.batch_jitter,
                    (rng.random::<f32>() - 0.5) * spawn.batch_jitter,
                )
        };
        let mut enemy = Enemy::new(ids.allocate(), pos, kind, request.now_ms, &tuning.enemies);
        if kind == EnemyKind::Standard && rng.random::<f32>() < mutate_chance {
            enemy.mutate();
        }
        enemies.push(enemy);
    }

    debug!(
        "Spawned {} x {:?} at ({:.0}, {:.0}), t={:.1}s",
        enemies.len(),
        kind,
        origin.x,
        origin.y,
        request.elapsed_secs
    );
    enemies
}
