//! Orbit Brawl entry point
//!
//! Native builds run a scripted headless match and log what happens. The
//! web build exposes a `WebGame` handle that the page drives once per
//! animation frame.

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use wasm_bindgen::prelude::*;

    use orbit_brawl::platform::FixedStep;
    use orbit_brawl::platform::storage::default_store;
    use orbit_brawl::sim::{Game, GameSetup, TickInput};
    use orbit_brawl::{PlayerData, Tuning};

    /// Input bit layout shared with the page's key handler
    const THRUST_UP: u32 = 1 << 0;
    const THRUST_DOWN: u32 = 1 << 1;
    const THRUST_LEFT: u32 = 1 << 2;
    const THRUST_RIGHT: u32 = 1 << 3;
    const ROTATE_LEFT: u32 = 1 << 4;
    const ROTATE_RIGHT: u32 = 1 << 5;
    const PUNCH: u32 = 1 << 6;
    const CHARGED_SLAM: u32 = 1 << 7;
    const PAUSE: u32 = 1 << 8;

    fn decode(bits: u32) -> TickInput {
        TickInput {
            thrust_up: bits & THRUST_UP != 0,
            thrust_down: bits & THRUST_DOWN != 0,
            thrust_left: bits & THRUST_LEFT != 0,
            thrust_right: bits & THRUST_RIGHT != 0,
            rotate_left: bits & ROTATE_LEFT != 0,
            rotate_right: bits & ROTATE_RIGHT != 0,
            punch: bits & PUNCH != 0,
            charged_slam: bits & CHARGED_SLAM != 0,
            pause: bits & PAUSE != 0,
        }
    }

    #[wasm_bindgen]
    pub struct WebGame {
        game: Game,
        clock: FixedStep,
    }

    #[wasm_bindgen]
    impl WebGame {
        #[wasm_bindgen(constructor)]
        pub fn new(seed: u64) -> WebGame {
            let store = default_store();
            let profile = PlayerData::load(store.as_ref());
            let setup = GameSetup {
                seed,
                ..GameSetup::default()
            };
            WebGame {
                game: Game::new(setup, Tuning::default(), profile, store),
                clock: FixedStep::default(),
            }
        }

        pub fn start(&mut self) {
            self.game.start_match();
        }

        /// Advance by one frame and return the latest snapshot as JSON.
        /// One-shot inputs only apply to the first fixed step of the frame.
        pub fn frame(&mut self, dt_seconds: f32, input_bits: u32) -> String {
            let mut input = decode(input_bits);
            let steps = self.clock.advance(dt_seconds);
            let mut events = Vec::new();
            let mut snapshot = self.game.snapshot();
            for _ in 0..steps {
                snapshot = self.game.tick(&input, self.clock.step());
                events.append(&mut snapshot.events);
                input.punch = false;
                input.pause = false;
            }
            snapshot.events = events;
            serde_json::to_string(&snapshot).unwrap_or_default()
        }
    }

    pub fn init() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }
        log::info!("Orbit Brawl (wasm) ready");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::init();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Orbit Brawl (native) starting...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match load_tuning(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Bad tuning file {path}: {e}");
                std::process::exit(1);
            }
        },
        None => orbit_brawl::Tuning::default(),
    };

    demo::run(tuning);
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> Result<orbit_brawl::Tuning, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(orbit_brawl::Tuning::from_json(&json)?)
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use orbit_brawl::camera::ShakeTracker;
    use orbit_brawl::consts::SIM_DT;
    use orbit_brawl::platform::storage::default_store;
    use orbit_brawl::platform::rewards::DEFAULT_TIMEOUT;
    use orbit_brawl::platform::{FixedStep, RewardRequest, Standalone};
    use orbit_brawl::sim::{Game, GameMode, GameSetup, SimEvent, Snapshot, TickInput};
    use orbit_brawl::{PlayerData, Settings, Tuning};

    /// Give up after two minutes of match time
    const MAX_FRAMES: u32 = 60 * 120;

    /// Chase the enemy, punch in reach, slam every few seconds
    fn scripted_input(snap: &Snapshot, frame: u32) -> TickInput {
        let to_enemy = snap.enemy.position - snap.player.position;
        let close = to_enemy.length() < 3.0;
        let charging = frame % 240 < 45;
        TickInput {
            thrust_right: to_enemy.x > 0.5,
            thrust_left: to_enemy.x < -0.5,
            thrust_up: to_enemy.y > 0.5,
            thrust_down: to_enemy.y < -0.5,
            punch: close && frame % 20 == 0,
            charged_slam: charging && !close,
            ..TickInput::default()
        }
    }

    pub fn run(tuning: Tuning) {
        let store = default_store();
        let profile = PlayerData::load(store.as_ref());
        let settings = Settings::load(store.as_ref());
        let setup = GameSetup {
            mode: GameMode::Endless,
            seed: 42,
            ..GameSetup::default()
        };

        let mut game = Game::new(setup, tuning, profile, store);
        let mut clock = FixedStep::default();
        let mut shake = ShakeTracker::new(42);
        game.start_match();

        let mut snap = game.snapshot();
        for frame in 0..MAX_FRAMES {
            let input = scripted_input(&snap, frame);
            for _ in 0..clock.advance(SIM_DT) {
                snap = game.tick(&input, clock.step());
                shake.consume(&snap.events, &settings);
                for event in &snap.events {
                    log_event(event, &settings);
                }
            }
            shake.update(SIM_DT);
            if !game.state().is_active() {
                break;
            }
        }

        match snap.result {
            Some(result) => {
                log::info!(
                    "Demo over: {} at wave {} ({:.1}s), +{} stardust",
                    if result.victory { "victory" } else { "defeat" },
                    result.wave_reached,
                    snap.timer,
                    result.reward
                );
                let mut sdk = Standalone;
                let mut request = RewardRequest::start(&mut sdk, DEFAULT_TIMEOUT);
                if let Some(outcome) = request.poll(&mut sdk, SIM_DT) {
                    let bonus = game.claim_ad_bonus(outcome);
                    log::info!("Ad bonus: +{bonus} stardust");
                }
            }
            None => log::info!("Demo timed out at wave {}", snap.wave),
        }
        log::info!("Stardust balance: {}", game.profile().stardust);
    }

    fn log_event(event: &SimEvent, settings: &Settings) {
        match event {
            SimEvent::Hit {
                target,
                damage,
                intensity,
                ..
            } => log::info!(
                "{target:?} hit for {damage:.1} ({} particles, sfx volume {:.2})",
                settings.hit_particles(*intensity),
                settings.effective_sfx_volume()
            ),
            SimEvent::Eliminated { side, cause } => log::info!("{side:?} eliminated: {cause:?}"),
            SimEvent::WaveAdvanced { wave } => log::info!("Wave {wave}"),
            SimEvent::ChargeReleased { charge } => log::debug!("Slam at {charge:.0}% charge"),
            other => log::trace!("{other:?}"),
        }
    }
}
