//! Shared application state for Axum routers.

use std::sync::Arc;

use quorum_agents::Coordinator;
use quorum_board::TaskBoard;

/// Optional external task board. `None` when no board is configured.
pub type BoardHandle = Option<Arc<dyn TaskBoard>>;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
    pub board: BoardHandle,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(coordinator: Arc<Coordinator>, board: BoardHandle) -> Self {
        Self {
            coordinator,
            board,
            start_time: std::time::Instant::now(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("agents", &self.coordinator.agent_count())
            .field("board", &self.board.as_ref().map(|b| b.name().to_string()))
            .finish_non_exhaustive()
    }
}

macro_rules! impl_from_ref {
    ($type:ty, $field:ident) => {
        impl axum::extract::FromRef<AppState> for $type {
            fn from_ref(state: &AppState) -> Self {
                state.$field.clone()
            }
        }
    };
}

impl_from_ref!(Arc<Coordinator>, coordinator);
impl_from_ref!(BoardHandle, board);
impl_from_ref!(std::time::Instant, start_time);
