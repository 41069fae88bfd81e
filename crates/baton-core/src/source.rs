//! Collaborator traits over the systems that hold historical state.
//!
//! The resolution engine is written against these seams rather than any
//! concrete store, so tests can inject fixtures and failure modes without a
//! database. [`crate::db::SqliteStore`] implements all four.

use anyhow::Result;

use crate::model::actor::ActorId;
use crate::signal::record::{ActionRecord, AttachmentRecord};
use crate::signal::types::ActionType;

/// A profile as returned by the identity directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub email: String,
    /// Directory role, when the directory tracks one.
    pub role: Option<String>,
}

/// Task-level facts: who created it and where it currently sits.
pub trait TaskDirectory {
    /// The creator's actor id.
    fn creator(&self, task_id: &str) -> Result<ActorId>;

    /// The task's current stage label.
    fn current_stage(&self, task_id: &str) -> Result<String>;
}

/// Read access to the append-only action log.
pub trait ActionLog {
    /// All records for `task_id` whose action is one of `kinds`, newest
    /// first. Implementations must not assume the caller re-sorts.
    fn records(&self, task_id: &str, kinds: &[ActionType]) -> Result<Vec<ActionRecord>>;
}

/// Read access to the per-task attachment table.
pub trait AttachmentStore {
    /// All attachment records for `task_id`, in no guaranteed order.
    fn attachments(&self, task_id: &str) -> Result<Vec<AttachmentRecord>>;
}

/// The identity directory used to backfill display fields.
pub trait ProfileDirectory {
    /// Look up an actor's profile. `Ok(None)` means the directory answered
    /// and has no such actor; `Err` means the lookup itself failed.
    fn resolve(&self, actor_id: &ActorId) -> Result<Option<Profile>>;
}
