use seatplan_layout::LayoutSession;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handler state. Every request takes the session lock, so layout
/// operations run one at a time.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<LayoutSession>>,
}

impl AppState {
    pub fn new(session: LayoutSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }
}
