//! Control surface for a front end.
//!
//! These functions bridge front-end requests to the game loop thread via
//! channels. They never touch the engine directly.

use volley_core::commands::PlayerCommand;
use volley_core::state::ArenaSnapshot;
use volley_sim::engine::SimConfig;

use crate::error::AppError;
use crate::game_loop;
use crate::state::{AppState, GameLoopCommand};

/// Start the simulation. Spawns the game loop thread if not already running.
pub fn start_simulation(state: &AppState, config: SimConfig) -> Result<(), AppError> {
    let mut running = state.running.lock().map_err(|_| AppError::LockPoisoned)?;

    if *running {
        return Err(AppError::AlreadyRunning);
    }

    let cmd_tx = game_loop::spawn_game_loop(config, state.latest_snapshot.clone())?;

    let mut tx_lock = state.command_tx.lock().map_err(|_| AppError::LockPoisoned)?;
    *tx_lock = Some(cmd_tx);
    *running = true;

    Ok(())
}

/// Send a player command to the simulation.
pub fn send_command(state: &AppState, command: PlayerCommand) -> Result<(), AppError> {
    send(state, GameLoopCommand::PlayerCommand(command))
}

/// Ask the game loop to stop. The loop exits at its next tick boundary.
pub fn stop_simulation(state: &AppState) -> Result<(), AppError> {
    send(state, GameLoopCommand::Shutdown)?;
    let mut running = state.running.lock().map_err(|_| AppError::LockPoisoned)?;
    *running = false;
    let mut tx_lock = state.command_tx.lock().map_err(|_| AppError::LockPoisoned)?;
    *tx_lock = None;
    Ok(())
}

/// Get the latest snapshot (for polling / initial state).
pub fn get_snapshot(state: &AppState) -> Result<Option<ArenaSnapshot>, AppError> {
    let lock = state
        .latest_snapshot
        .lock()
        .map_err(|_| AppError::LockPoisoned)?;
    Ok(lock.clone())
}

fn send(state: &AppState, command: GameLoopCommand) -> Result<(), AppError> {
    let tx_lock = state.command_tx.lock().map_err(|_| AppError::LockPoisoned)?;
    match tx_lock.as_ref() {
        Some(tx) => tx.send(command).map_err(|_| AppError::ChannelClosed),
        None => Err(AppError::NotStarted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_before_start_fails() {
        let state = AppState::new();
        assert!(matches!(
            send_command(&state, PlayerCommand::Tap),
            Err(AppError::NotStarted)
        ));
        assert!(get_snapshot(&state).unwrap().is_none());
    }

    #[test]
    fn test_double_start_rejected() {
        let state = AppState::new();
        start_simulation(&state, SimConfig::default()).unwrap();
        assert!(matches!(
            start_simulation(&state, SimConfig::default()),
            Err(AppError::AlreadyRunning)
        ));
        stop_simulation(&state).unwrap();
        assert!(!*state.running.lock().unwrap());
    }
}
