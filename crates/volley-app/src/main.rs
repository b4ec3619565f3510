//! Headless VOLLEY runner.
//!
//! Starts a run, lets the hero auto-fire from where it stands, picks boosts
//! when asked and exits once the run completes, fails or times out.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::{info, warn};

use volley_app::control;
use volley_app::error::AppError;
use volley_app::state::AppState;
use volley_core::commands::PlayerCommand;
use volley_core::config::GameConfig;
use volley_core::enums::FlowPhase;
use volley_sim::engine::SimConfig;

/// How often the runner polls the latest snapshot.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run the VOLLEY arena simulation without a front end.
#[derive(Parser)]
#[command(name = "volley")]
struct Cli {
    /// RNG seed. Same seed, same run.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// JSON game config. Missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Boost to pick on every reward screen. Without it the auto-pick timer decides.
    #[arg(long)]
    boost: Option<String>,

    /// Give up after this many seconds of wall time.
    #[arg(long, default_value_t = 120)]
    max_secs: u64,
}

fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path),
        None => GameConfig::default(),
    };

    let state = AppState::new();
    control::start_simulation(
        &state,
        SimConfig {
            seed: cli.seed,
            config,
        },
    )?;
    control::send_command(&state, PlayerCommand::Tap)?;

    let deadline = Instant::now() + Duration::from_secs(cli.max_secs);
    let mut picked_for_wave = 0;
    loop {
        thread::sleep(POLL_INTERVAL);
        let Some(snapshot) = control::get_snapshot(&state)? else {
            continue;
        };

        match snapshot.phase {
            FlowPhase::ShowBoosts if snapshot.wave != picked_for_wave => {
                if let Some(key) = &cli.boost {
                    control::send_command(&state, PlayerCommand::SelectBoost { key: key.clone() })?;
                    picked_for_wave = snapshot.wave;
                }
            }
            FlowPhase::Complete => {
                info!(hp = snapshot.hero.hp, waves = snapshot.wave, "victory");
                break;
            }
            FlowPhase::Fail => {
                info!(wave = snapshot.wave, "defeat");
                break;
            }
            _ => {}
        }

        if Instant::now() >= deadline {
            warn!(
                tick = snapshot.time.tick,
                phase = ?snapshot.phase,
                "time limit reached"
            );
            break;
        }
    }

    control::stop_simulation(&state)
}

/// Read a config file, falling back to defaults on any error.
fn load_config(path: &Path) -> GameConfig {
    let parsed = std::fs::read_to_string(path)
        .map_err(AppError::from)
        .and_then(|json| GameConfig::from_json(&json).map_err(AppError::from));
    match parsed {
        Ok(config) => {
            info!(path = %path.display(), "loaded game config");
            config
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "using default game config");
            GameConfig::default()
        }
    }
}
