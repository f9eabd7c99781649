use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::EntityId;

/// An append-only audit entry: a person finished a session.
///
/// Recording the same person and session twice simply adds a second entry.
/// Entries are written for every role, but only practitioners gain progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub person_id: EntityId,
    pub session_id: EntityId,
    pub completed_at: DateTime<Utc>,
}
