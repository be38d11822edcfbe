//! HTTP API over the optimizer.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/api/health` | Health check |
//! | GET | `/api/players` | Current player pool |
//! | PUT | `/api/players` | Replace the pool from a FanDuel CSV body |
//! | POST | `/api/optimize` | Ranked lineups for a JSON request |
//! | POST | `/api/optimize/export` | Same lineups as an upload CSV |
//!
//! Solves run on the blocking pool; each request works on the pool snapshot it started with.

use std::sync::{Arc, RwLock};

use tracing::info;

use crate::config::OptimizerConfig;
use crate::data::player::PlayerRecord;
use crate::optimizer::solver::{LineupSolver, MicroLpSolver};

pub mod api;
pub mod routes;

pub use routes::router;

pub const BIND_ADDR_ENV: &str = "LINEUP_OPTIMIZER_BIND";
pub const POOL_PATH_ENV: &str = "LINEUP_OPTIMIZER_POOL";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<OptimizerConfig>,
    pub solver: Arc<dyn LineupSolver>,
    players: Arc<RwLock<Arc<Vec<PlayerRecord>>>>,
}

impl AppState {
    pub fn new(config: OptimizerConfig, players: Vec<PlayerRecord>) -> Self {
        Self::with_solver(config, players, Arc::new(MicroLpSolver))
    }

    pub fn with_solver(
        config: OptimizerConfig,
        players: Vec<PlayerRecord>,
        solver: Arc<dyn LineupSolver>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            solver,
            players: Arc::new(RwLock::new(Arc::new(players))),
        }
    }

    /// The current pool. Later replacements do not affect the returned snapshot.
    pub fn players(&self) -> Arc<Vec<PlayerRecord>> {
        match self.players.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn replace_players(&self, players: Vec<PlayerRecord>) {
        let next = Arc::new(players);
        match self.players.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }
}

pub async fn serve(bind_addr: &str, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!(
        event = "server_listening",
        addr = %bind_addr,
        players = state.players().len()
    );
    axum::serve(listener, router(state)).await
}

pub fn run_server(bind_addr: &str, state: AppState) -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(bind_addr, state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::player::Position;

    #[test]
    fn snapshots_survive_replacement() {
        let state = AppState::new(
            OptimizerConfig::default(),
            vec![PlayerRecord::new("a", "A", vec![Position::Center], 1000)],
        );
        let before = state.players();
        state.replace_players(Vec::new());
        assert_eq!(before.len(), 1);
        assert!(state.players().is_empty());
    }
}
