//! HUD text
//!
//! The core only formats strings; the host owns the display elements.

use serde::Serialize;

use crate::sim::{GamePhase, GameState};

/// Everything the HUD shows for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    /// "cur / max", rounded up so a sliver of health never reads 0
    pub health: String,
    /// Survival time as "MM:SS"
    pub timer: String,
    pub level: u32,
    /// XP bar fill in [0, 1]
    pub xp_fraction: f32,
    pub phase: GamePhase,
    /// Names of the upgrades on offer (empty unless leveling up)
    pub offer: Vec<String>,
}

impl HudSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let player = &state.player;
        Self {
            health: format_health(player.health, player.max_health),
            timer: format_time(state.clock.elapsed_secs()),
            level: player.level,
            xp_fraction: player.xp_fraction(),
            phase: state.phase,
            offer: state
                .offer
                .iter()
                .map(|u| format!("{}: {}", u.name, u.description))
                .collect(),
        }
    }
}

pub fn format_health(health: f32, max_health: f32) -> String {
    format!("{} / {}", health.max(0.0).ceil(), max_health.ceil())
}

/// Whole seconds as "MM:SS" (minutes keep counting past 99)
pub fn format_time(secs: f32) -> String {
    let total = secs.max(0.0) as u32;
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Arena;
    use crate::tuning::Tuning;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(59.9), "00:59");
        assert_eq!(format_time(61.0), "01:01");
        assert_eq!(format_time(6000.0), "100:00");
        assert_eq!(format_time(-3.0), "00:00");
    }

    #[test]
    fn test_format_health_rounds_up() {
        assert_eq!(format_health(86.0, 100.0), "86 / 100");
        assert_eq!(format_health(0.4, 120.0), "1 / 120");
        assert_eq!(format_health(0.0, 100.0), "0 / 100");
    }

    #[test]
    fn test_capture() {
        let mut state = GameState::new(1, Arena::default(), Tuning::default());
        state.start_session();
        state.player.xp = 45.0;
        let hud = HudSnapshot::capture(&state);
        assert_eq!(hud.health, "100 / 100");
        assert_eq!(hud.timer, "00:00");
        assert_eq!(hud.level, 1);
        assert!((hud.xp_fraction - 0.5).abs() < 1e-6);
        assert!(hud.offer.is_empty());
    }
}
