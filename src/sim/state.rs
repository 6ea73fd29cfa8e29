//! Game state and core simulation types
//!
//! Everything a session mutates lives in `GameState`; systems receive the
//! pieces they need as explicit handles.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::entities::{Effects, Projectile, XpOrb};
use super::player::Player;
use super::upgrades::Upgrade;
use crate::tuning::Tuning;

/// Longest frame delta the clock will accept (ms)
pub const MAX_FRAME_MS: f64 = 250.0;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start input
    Start,
    /// Active gameplay
    Playing,
    /// Simulation frozen while an upgrade offer is open
    LevelingUp,
    /// Run ended
    Over,
}

/// Rectangular playfield
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Inside the arena grown by `margin` on every side
    pub fn contains(&self, pos: Vec2, margin: f32) -> bool {
        pos.x >= -margin
            && pos.x <= self.width + margin
            && pos.y >= -margin
            && pos.y <= self.height + margin
    }

    /// Clamp a circle of `radius` so it stays fully inside
    pub fn clamp(&self, pos: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            pos.x.clamp(radius, (self.width - radius).max(radius)),
            pos.y.clamp(radius, (self.height - radius).max(radius)),
        )
    }
}

/// Monotonic entity id allocator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn allocate(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Simulation clock.
///
/// Host timestamps are turned into clamped deltas; sim time only advances
/// while the clock is running, so a paused interval costs no simulated time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameClock {
    /// Simulated milliseconds since the session started
    pub sim_ms: f64,
    last_host_ms: Option<f64>,
}

impl GameClock {
    /// Advance to the host timestamp. Returns the applied delta (ms).
    pub fn advance(&mut self, host_ms: f64) -> f64 {
        let dt = match self.last_host_ms {
            Some(last) => (host_ms - last).clamp(0.0, MAX_FRAME_MS),
            None => 0.0,
        };
        self.last_host_ms = Some(host_ms);
        self.sim_ms += dt;
        dt
    }

    /// Forget the last host timestamp so the next frame applies no delta
    pub fn resume(&mut self) {
        self.last_host_ms = None;
    }

    pub fn elapsed_secs(&self) -> f32 {
        (self.sim_ms / 1000.0) as f32
    }
}

/// Result of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub time_survived_secs: f32,
    pub level: u32,
    pub kills: u32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub arena: Arena,
    pub phase: GamePhase,
    pub clock: GameClock,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub xp_orbs: Vec<XpOrb>,
    /// Visual particles and shockwaves (not gameplay-affecting)
    pub effects: Effects,
    pub ids: EntityIds,
    pub last_spawn_ms: f64,
    /// Level-ups still waiting for an upgrade choice
    pub pending_level_ups: u32,
    /// Upgrades currently offered (empty unless `LevelingUp`)
    pub offer: Vec<&'static Upgrade>,
    pub kills: u32,
    pub summary: Option<RunSummary>,
}

impl GameState {
    /// Create a new game state waiting in `Start`
    pub fn new(seed: u64, arena: Arena, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            arena,
            phase: GamePhase::Start,
            clock: GameClock::default(),
            player: Player::new(arena.center(), 0.0),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            xp_orbs: Vec::new(),
            effects: Effects::default(),
            ids: EntityIds::default(),
            last_spawn_ms: 0.0,
            pending_level_ups: 0,
            offer: Vec::new(),
            kills: 0,
            summary: None,
        }
    }

    /// Reset every session collection and enter `Playing`.
    ///
    /// The RNG is reseeded so a session replays identically from its seed.
    pub fn start_session(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.clock = GameClock::default();
        self.player = Player::new(self.arena.center(), 0.0);
        self.enemies.clear();
        self.projectiles.clear();
        self.xp_orbs.clear();
        self.effects.clear();
        self.ids = EntityIds::default();
        self.last_spawn_ms = 0.0;
        self.pending_level_ups = 0;
        self.offer.clear();
        self.kills = 0;
        self.summary = None;
        self.phase = GamePhase::Playing;
    }

    pub fn tank_count(&self) -> usize {
        self.enemies
            .iter()
            .filter(|e| e.kind == super::EnemyKind::Tank)
            .count()
    }

    /// Snapshot of the current run
    pub fn run_summary(&self) -> RunSummary {
        RunSummary {
            time_survived_secs: self.clock.elapsed_secs(),
            level: self.player.level,
            kills: self.kills,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_clamps_and_resumes() {
        let mut clock = GameClock::default();
        assert_eq!(clock.advance(1000.0), 0.0);
        assert_eq!(clock.advance(1016.0), 16.0);
        assert_eq!(clock.advance(5000.0), MAX_FRAME_MS);
        let before = clock.sim_ms;

        // Paused for ten seconds of host time
        clock.resume();
        assert_eq!(clock.advance(15000.0), 0.0);
        assert_eq!(clock.sim_ms, before);
        assert_eq!(clock.advance(15010.0), 10.0);
    }

    #[test]
    fn test_clock_ignores_backwards_time() {
        let mut clock = GameClock::default();
        clock.advance(100.0);
        assert_eq!(clock.advance(50.0), 0.0);
    }

    #[test]
    fn test_arena_clamp() {
        let arena = Arena::new(200.0, 100.0);
        assert_eq!(arena.clamp(Vec2::new(-5.0, 500.0), 10.0), Vec2::new(10.0, 90.0));
        assert!(arena.contains(Vec2::new(-5.0, 50.0), 10.0));
        assert!(!arena.contains(Vec2::new(-15.0, 50.0), 10.0));
    }

    #[test]
    fn test_start_session_resets() {
        let mut state = GameState::new(7, Arena::default(), Tuning::default());
        assert_eq!(state.phase, GamePhase::Start);
        state.kills = 12;
        state.ids.allocate();
        state.start_session();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.kills, 0);
        assert_eq!(state.ids.allocate(), 1);
        assert_eq!(state.player.pos, state.arena.center());
    }
}
