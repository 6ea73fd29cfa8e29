//! Per-frame simulation step
//!
//! Drives the phase machine and the fixed per-frame order: spawn, player and
//! weapons, projectiles, enemies, collisions, effects.

use glam::Vec2;
use log::{error, info, warn};

use super::collision::{collect_xp_orbs, resolve_player_contacts, resolve_projectile_hits};
use super::combat::Combat;
use super::player::MoveKeys;
use super::spawner::{SpawnRequest, spawn_wave};
use super::state::{GamePhase, GameState};
use super::upgrades::{CATALOG, apply_upgrade, roll_offer};
use crate::consts::PROJECTILE_CULL_MARGIN;
use crate::error::SimError;
use crate::renderer::{Canvas, colors};

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Directional key state
    pub keys: MoveKeys,
    /// Start a run (from `Start` or `Over`)
    pub start: bool,
    /// Pick an entry of the open upgrade offer
    pub choose_upgrade: Option<usize>,
}

/// Advance the game by one host frame stamped `host_ms`
pub fn tick(state: &mut GameState, input: &TickInput, host_ms: f64) {
    match state.phase {
        GamePhase::Start | GamePhase::Over => {
            if input.start {
                state.start_session();
                state.clock.advance(host_ms);
                info!("Session started (seed {})", state.seed);
            }
            return;
        }
        GamePhase::LevelingUp => {
            if let Some(index) = input.choose_upgrade {
                choose_upgrade(state, index);
            }
            return;
        }
        GamePhase::Playing => {}
    }

    state.clock.advance(host_ms);
    let now = state.clock.sim_ms;

    if now - state.last_spawn_ms > state.tuning.spawn.interval_ms {
        let request = SpawnRequest {
            elapsed_secs: state.clock.elapsed_secs(),
            player_level: state.player.level,
            tanks_alive: state.tank_count(),
            now_ms: now,
        };
        let wave = spawn_wave(&mut state.rng, &mut state.ids, &state.tuning, &state.arena, request);
        state.enemies.extend(wave);
        state.last_spawn_ms = now;
    }

    let GameState {
        rng,
        tuning,
        arena,
        player,
        enemies,
        projectiles,
        xp_orbs,
        effects,
        ids,
        kills,
        ..
    } = state;
    let mut combat = Combat {
        now_ms: now,
        ids,
        rng,
        tuning,
        projectiles,
        xp_orbs,
        effects,
        kills,
    };

    player.update(&input.keys, arena, enemies, &mut combat);

    combat
        .projectiles
        .retain_mut(|p| !p.update(enemies) && arena.contains(p.pos, PROJECTILE_CULL_MARGIN));

    let jitter = combat.tuning.enemies.creep_jitter;
    for i in (0..enemies.len()).rev() {
        if enemies[i].update(player.pos, now, combat.rng, jitter) {
            combat.split_enemy(enemies, i);
        }
    }

    resolve_projectile_hits(enemies, &mut combat);
    let contact = resolve_player_contacts(player, enemies, now);
    let levels = collect_xp_orbs(player, combat.xp_orbs);
    combat.effects.update();

    if contact.died {
        let summary = state.run_summary();
        info!(
            "Run over: survived {:.1}s, level {}, {} kills",
            summary.time_survived_secs, summary.level, summary.kills
        );
        state.summary = Some(summary);
        state.phase = GamePhase::Over;
        return;
    }

    if levels > 0 {
        state.pending_level_ups += levels;
        open_level_up(state);
    }
}

/// Roll an offer for the next pending level-up and freeze the simulation
fn open_level_up(state: &mut GameState) {
    match roll_offer(CATALOG, &state.player, &mut state.rng) {
        Ok(offer) => {
            info!(
                "Level {} reached, offering: {}",
                state.player.level,
                offer.iter().map(|u| u.id).collect::<Vec<_>>().join(", ")
            );
            state.offer = offer;
            state.phase = GamePhase::LevelingUp;
        }
        Err(err) => {
            error!("{err}, resuming without an upgrade");
            state.pending_level_ups = 0;
            state.offer.clear();
            resume(state);
        }
    }
}

/// Apply the chosen offer entry, then open the next offer or resume play
pub fn choose_upgrade(state: &mut GameState, index: usize) {
    let Some(upgrade) = state.offer.get(index).copied() else {
        let err = SimError::InvalidUpgradeChoice {
            index,
            offered: state.offer.len(),
        };
        warn!("{err}");
        return;
    };

    apply_upgrade(&mut state.player, upgrade, state.clock.sim_ms);
    info!("Picked upgrade {}", upgrade.name);
    state.offer.clear();
    state.pending_level_ups = state.pending_level_ups.saturating_sub(1);

    if state.pending_level_ups > 0 {
        open_level_up(state);
    } else {
        resume(state);
    }
}

/// Back to `Playing` without charging the paused interval to the sim clock
fn resume(state: &mut GameState) {
    state.clock.resume();
    state.phase = GamePhase::Playing;
}

/// Draw every entity back to front
pub fn draw_world(state: &GameState, canvas: &mut impl Canvas) {
    canvas.fill_rect(
        Vec2::ZERO,
        Vec2::new(state.arena.width, state.arena.height),
        colors::BACKGROUND,
    );
    for orb in &state.xp_orbs {
        orb.draw(canvas);
    }
    for enemy in &state.enemies {
        enemy.draw(canvas);
    }
    for projectile in &state.projectiles {
        projectile.draw(canvas);
    }
    state.player.draw(canvas, &state.tuning.weapons);
    state.effects.draw(canvas);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{Projectile, XpOrb};
    use crate::sim::state::Arena;
    use crate::sim::{Enemy, EnemyKind};
    use crate::tuning::Tuning;

    const FRAME_MS: f64 = 16.0;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Arena::default(), Tuning::default());
        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.0);
        state
    }

    #[test]
    fn test_start_to_playing() {
        let mut state = GameState::new(1, Arena::default(), Tuning::default());
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.phase, GamePhase::Start);

        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_projectiles_culled_past_margin() {
        let mut state = playing(5);
        let id = state.ids.allocate();
        state.projectiles.push(Projectile::new(
            id,
            Vec2::new(795.0, 300.0),
            0.0,
            5.0,
            4.0,
            1.0,
            [1.0; 4],
        ));
        let id = state.ids.allocate();
        state.projectiles.push(Projectile::new(
            id,
            Vec2::new(400.0, 300.0),
            0.0,
            1.0,
            4.0,
            1.0,
            [1.0; 4],
        ));

        // 800, 805, 810: still within the 10 px margin
        for frame in 1..=3 {
            tick(&mut state, &TickInput::default(), frame as f64 * FRAME_MS);
        }
        assert_eq!(state.projectiles.len(), 2);

        tick(&mut state, &TickInput::default(), 4.0 * FRAME_MS);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].pos, Vec2::new(404.0, 300.0));
    }

    #[test]
    fn test_spawns_after_interval() {
        let mut state = playing(3);
        // 62 frames reach 992 ms, one short of the interval
        for frame in 1..=62 {
            tick(&mut state, &TickInput::default(), frame as f64 * FRAME_MS);
        }
        assert!(state.enemies.is_empty());
        tick(&mut state, &TickInput::default(), 63.0 * FRAME_MS);
        assert!(!state.enemies.is_empty());
    }

    #[test]
    fn test_level_up_freezes_clock() {
        let mut state = playing(5);
        state.player.xp = 89.0;
        state.xp_orbs.push(XpOrb::new(state.player.pos, 10.0));

        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.phase, GamePhase::LevelingUp);
        assert_eq!(state.offer.len(), 3);
        let frozen = state.clock.sim_ms;

        // Ten seconds on the level-up screen
        tick(&mut state, &TickInput::default(), 10_000.0);
        assert_eq!(state.clock.sim_ms, frozen);

        let pick = TickInput {
            choose_upgrade: Some(0),
            ..Default::default()
        };
        tick(&mut state, &pick, 10_000.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.offer.is_empty());

        tick(&mut state, &TickInput::default(), 10_000.0 + FRAME_MS);
        assert_eq!(state.clock.sim_ms, frozen);
        tick(&mut state, &TickInput::default(), 10_000.0 + 2.0 * FRAME_MS);
        assert_eq!(state.clock.sim_ms, frozen + FRAME_MS);
    }

    #[test]
    fn test_cascading_level_ups_offer_in_turn() {
        let mut state = playing(8);
        // 90 + 103 + 118 crosses three thresholds
        state.xp_orbs.push(XpOrb::new(state.player.pos, 320.0));
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.player.level, 4);
        assert_eq!(state.pending_level_ups, 3);

        let pick = TickInput {
            choose_upgrade: Some(0),
            ..Default::default()
        };
        for remaining in [2, 1, 0] {
            assert_eq!(state.phase, GamePhase::LevelingUp);
            tick(&mut state, &pick, FRAME_MS);
            assert_eq!(state.pending_level_ups, remaining);
        }
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_invalid_choice_keeps_offer() {
        let mut state = playing(5);
        state.xp_orbs.push(XpOrb::new(state.player.pos, 90.0));
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.phase, GamePhase::LevelingUp);

        let pick = TickInput {
            choose_upgrade: Some(7),
            ..Default::default()
        };
        tick(&mut state, &pick, 2.0 * FRAME_MS);
        assert_eq!(state.phase, GamePhase::LevelingUp);
        assert_eq!(state.offer.len(), 3);
    }

    #[test]
    fn test_death_ends_run() {
        let mut state = playing(2);
        state.player.health = 1.0;
        let id = state.ids.allocate();
        let enemy = Enemy::new(
            id,
            state.player.pos,
            EnemyKind::Standard,
            0.0,
            &state.tuning.enemies,
        );
        state.enemies.push(enemy);

        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.phase, GamePhase::Over);
        let summary = state.summary.expect("summary");
        assert_eq!(summary.level, 1);

        // Restart from Over
        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, 100.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.summary.is_none());
    }

    #[test]
    fn test_determinism() {
        let mut a = playing(99_999);
        let mut b = playing(99_999);
        let pick = TickInput {
            choose_upgrade: Some(0),
            ..Default::default()
        };

        for frame in 1..1500 {
            let input = TickInput {
                keys: MoveKeys {
                    left: frame % 400 < 200,
                    right: frame % 400 >= 200,
                    ..Default::default()
                },
                ..Default::default()
            };
            for state in [&mut a, &mut b] {
                let input = if state.phase == GamePhase::LevelingUp {
                    &pick
                } else {
                    &input
                };
                tick(state, input, frame as f64 * FRAME_MS);
            }
        }

        assert_eq!(a.clock.sim_ms, b.clock.sim_ms);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.kills, b.kills);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.player.level, b.player.level);
    }
}
