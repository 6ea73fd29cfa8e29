//! Deadline Dread headless driver
//!
//! Runs a scripted session against the simulation and logs the outcome.
//! Usage: `deadline-dread [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    if let Err(err) = native::run(std::env::args().nth(1)) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser entry point is `platform::web::wasm_start`
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use deadline_dread::hud::HudSnapshot;
    use deadline_dread::platform::KeyState;
    use deadline_dread::sim::{GamePhase, GameState, TickInput, tick};
    use deadline_dread::{Settings, SimError};

    /// Keys held for each leg of the scripted walk
    const WALK: [&str; 4] = ["d", "s", "a", "w"];
    /// Frames per walk leg
    const LEG_FRAMES: u64 = 90;

    pub fn run(settings_path: Option<String>) -> Result<(), SimError> {
        let settings = match settings_path {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        let tuning = settings.tuning()?;
        log::info!(
            "Deadline Dread (native) starting: seed {}, {}s demo",
            settings.seed,
            settings.demo_seconds
        );

        let mut state = GameState::new(settings.seed, settings.arena(), tuning);
        let mut keys = KeyState::default();
        let mut now = 0.0;
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &start, now);

        let frames = (settings.demo_seconds * 1000.0 / settings.frame_ms) as u64;
        for frame in 0..frames {
            now += settings.frame_ms;

            let leg = WALK[(frame / LEG_FRAMES) as usize % WALK.len()];
            if !keys.is_pressed(leg) {
                keys.clear();
                keys.key_down(leg);
            }
            let mut input = TickInput {
                keys: keys.move_keys(),
                ..Default::default()
            };

            if state.phase == GamePhase::LevelingUp {
                if !settings.auto_pick_upgrades {
                    log::info!("Upgrade offer open and auto-pick disabled, stopping");
                    break;
                }
                input.choose_upgrade = Some(0);
            }

            tick(&mut state, &input, now);
            if state.phase == GamePhase::Over {
                break;
            }

            if frame % 600 == 0 {
                let hud = HudSnapshot::capture(&state);
                log::debug!(
                    "{} | hp {} | lvl {} | enemies {}",
                    hud.timer,
                    hud.health,
                    hud.level,
                    state.enemies.len()
                );
            }
        }

        let summary = state.summary.unwrap_or_else(|| state.run_summary());
        let hud = HudSnapshot::capture(&state);
        log::info!(
            "Finished ({:?}): survived {}, level {}, {} kills, health {}",
            state.phase,
            hud.timer,
            summary.level,
            summary.kills,
            hud.health
        );
        Ok(())
    }
}
