//! Game loop thread: runs the arena engine at the fixed tick rate.
//!
//! The engine is created inside this thread; its FSM states are not `Send`,
//! the config it is built from is. Commands arrive via an `mpsc` channel.
//! Snapshots are stored in shared state for polling and their events are
//! forwarded to the log.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use volley_core::constants::TICK_RATE;
use volley_core::events::GameEvent;
use volley_core::state::ArenaSnapshot;
use volley_sim::engine::{ArenaEngine, SimConfig};

use crate::error::AppError;
use crate::state::GameLoopCommand;

/// Duration of one tick.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread.
///
/// Returns the command sender for the control surface to use.
pub fn spawn_game_loop(
    config: SimConfig,
    latest_snapshot: Arc<Mutex<Option<ArenaSnapshot>>>,
) -> Result<mpsc::Sender<GameLoopCommand>, AppError> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    std::thread::Builder::new()
        .name("volley-game-loop".into())
        .spawn(move || {
            run_game_loop(config, cmd_rx, &latest_snapshot);
        })
        .map_err(AppError::Spawn)?;

    Ok(cmd_tx)
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    config: SimConfig,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<ArenaSnapshot>>,
) {
    info!(seed = config.seed, "game loop started");
    let mut engine = ArenaEngine::new(config);
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) => {
                    info!(tick = engine.time().tick, "game loop stopped");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Advance one tick
        let snapshot = engine.tick();

        // 3. Forward this tick's events
        for event in &snapshot.events {
            log_event(event);
        }

        // 4. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        // 5. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind, reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}

/// Presentation events go to the log: run milestones at info, the rest at debug.
fn log_event(event: &GameEvent) {
    match event {
        GameEvent::WaveStart { wave } => info!(wave, "wave started"),
        GameEvent::WaveCleared { wave } => info!(wave, "wave cleared"),
        GameEvent::ShowBoosts { wave } => info!(wave, "choose a boost"),
        GameEvent::BoostSelected { key } | GameEvent::BoostAutoselect { key } => {
            info!(%key, "boost picked")
        }
        GameEvent::PlayerDied => info!("hero down"),
        GameEvent::ShowFailUi => info!("run failed"),
        GameEvent::RunComplete => info!("run complete"),
        GameEvent::ShowDamageNumber { .. } => {}
        other => debug!(?other, "event"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volley_core::commands::PlayerCommand;
    use volley_core::enums::FlowPhase;

    #[test]
    fn test_command_channel_round_trip() {
        let (tx, rx) = mpsc::channel::<GameLoopCommand>();

        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::Tap))
            .unwrap();
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::SetMovement {
            speed: 3.0,
            facing: 0.0,
        }))
        .unwrap();
        tx.send(GameLoopCommand::Shutdown).unwrap();

        let mut commands = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            commands.push(cmd);
        }

        assert_eq!(commands.len(), 3);
        assert!(matches!(
            commands[0],
            GameLoopCommand::PlayerCommand(PlayerCommand::Tap)
        ));
        assert!(matches!(
            commands[1],
            GameLoopCommand::PlayerCommand(PlayerCommand::SetMovement { .. })
        ));
        assert!(matches!(commands[2], GameLoopCommand::Shutdown));
    }

    #[test]
    fn test_snapshot_serialization_under_3ms() {
        let mut engine = ArenaEngine::new(SimConfig::default());
        engine.queue_command(PlayerCommand::Tap);

        // Past the wave intro so enemies are on the field
        for _ in 0..100 {
            engine.tick();
        }

        let snapshot = engine.tick();
        assert!(!snapshot.enemies.is_empty());
        let start = Instant::now();
        let json = serde_json::to_string(&snapshot).unwrap();
        let elapsed = start.elapsed();

        assert!(
            elapsed < Duration::from_millis(3),
            "Snapshot serialization took {:?}, should be <3ms",
            elapsed
        );
        assert!(!json.is_empty());
    }

    #[test]
    fn test_loop_thread_ticks_and_shuts_down() {
        let latest = Arc::new(Mutex::new(None));
        let tx = spawn_game_loop(SimConfig::default(), latest.clone()).unwrap();
        tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::Tap))
            .unwrap();

        std::thread::sleep(Duration::from_millis(200));
        let snap = latest.lock().unwrap().clone().unwrap();
        assert!(snap.time.tick > 0);
        assert_eq!(snap.phase, FlowPhase::Wave);

        tx.send(GameLoopCommand::Shutdown).unwrap();
    }

    #[test]
    fn test_tick_duration_constant() {
        // 40Hz = 25ms per tick
        assert_eq!(TICK_DURATION, Duration::from_millis(25));
    }
}
