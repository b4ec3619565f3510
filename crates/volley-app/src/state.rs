//! Application state shared between the control surface and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use volley_core::commands::PlayerCommand;
use volley_core::state::ArenaSnapshot;

/// Commands sent from the control surface to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Shared application state.
///
/// - `mpsc::Sender` is wrapped in a `Mutex` so the state is `Sync`
/// - `Mutex<Option<...>>` holds what only exists after `start_simulation`
/// - the latest snapshot is an `Arc<Mutex<...>>` shared with the loop thread
pub struct AppState {
    /// `None` before `start_simulation` is called.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Updated by the game loop thread after each tick.
    pub latest_snapshot: Arc<Mutex<Option<ArenaSnapshot>>>,
    pub running: Mutex<bool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            running: Mutex::new(false),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new();
        assert!(state.command_tx.lock().unwrap().is_none());
        assert!(state.latest_snapshot.lock().unwrap().is_none());
        assert!(!*state.running.lock().unwrap());
    }
}
