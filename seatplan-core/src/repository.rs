use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use crate::models::{Row, Seat};
use crate::{LayoutError, LayoutResult};

/// Rows and seats of one project, as read from storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutSnapshot {
    pub rows: Vec<Row>,
    pub seats: Vec<Seat>,
}

/// Identities the store assigned during a save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveReceipt {
    /// `(seat_uuid, participant_id)` for every occupant that had no id yet.
    pub assigned_participants: Vec<(Uuid, i64)>,
}

/// Persistence gateway for whole layouts.
#[async_trait]
pub trait LayoutRepository: Send + Sync {
    /// Ensure the schema exists. Safe to call on every startup.
    async fn initialize(&self) -> LayoutResult<()>;

    async fn load(&self, project_id: i64) -> LayoutResult<LayoutSnapshot>;

    /// Replace everything stored for the project with `rows` and `seats`,
    /// all or nothing.
    async fn save(&self, project_id: i64, rows: &[Row], seats: &[Seat]) -> LayoutResult<SaveReceipt>;
}

/// Process-local repository used by tests and by callers that do not need
/// durable storage.
#[derive(Debug)]
pub struct InMemoryLayoutRepository {
    projects: Mutex<HashMap<i64, LayoutSnapshot>>,
    next_participant_id: AtomicI64,
    failing: AtomicBool,
    saves: AtomicI64,
}

impl InMemoryLayoutRepository {
    pub fn new() -> Self {
        Self {
            projects: Mutex::new(HashMap::new()),
            next_participant_id: AtomicI64::new(1),
            failing: AtomicBool::new(false),
            saves: AtomicI64::new(0),
        }
    }

    /// Make every following save fail with `PersistenceFailure`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> i64 {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn stored(&self, project_id: i64) -> Option<LayoutSnapshot> {
        self.projects
            .lock()
            .ok()
            .and_then(|projects| projects.get(&project_id).cloned())
    }
}

impl Default for InMemoryLayoutRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LayoutRepository for InMemoryLayoutRepository {
    async fn initialize(&self) -> LayoutResult<()> {
        Ok(())
    }

    async fn load(&self, project_id: i64) -> LayoutResult<LayoutSnapshot> {
        Ok(self.stored(project_id).unwrap_or_default())
    }

    async fn save(&self, project_id: i64, rows: &[Row], seats: &[Seat]) -> LayoutResult<SaveReceipt> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(LayoutError::PersistenceFailure("store unavailable".to_string()));
        }

        let mut receipt = SaveReceipt::default();
        let mut stored_seats = seats.to_vec();
        for seat in stored_seats.iter_mut() {
            if let Some(person) = seat.person.as_mut() {
                if person.participant_id.is_none() {
                    let id = self.next_participant_id.fetch_add(1, Ordering::SeqCst);
                    person.participant_id = Some(id);
                    receipt.assigned_participants.push((seat.uuid(), id));
                }
            }
        }

        let mut projects = self
            .projects
            .lock()
            .map_err(|_| LayoutError::PersistenceFailure("store lock poisoned".to_string()))?;
        projects.insert(
            project_id,
            LayoutSnapshot {
                rows: rows.to_vec(),
                seats: stored_seats,
            },
        );
        self.saves.fetch_add(1, Ordering::SeqCst);

        Ok(receipt)
    }
}
