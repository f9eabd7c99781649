use serde::{Deserialize, Serialize};

use super::Registry;
use crate::config::VERSION;
use crate::error::RegistryError;
use crate::models::{CompletionRecord, Person, PersonInfo, Session, SessionInfo};

/// Plain-record copy of a registry for a persistence layer to store however it likes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Crate version that produced the snapshot.
    pub version: String,
    pub sessions: Vec<SessionInfo>,
    pub people: Vec<PersonInfo>,
    #[serde(default)]
    pub completions: Vec<CompletionRecord>,
}

impl Registry {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: VERSION.to_string(),
            sessions: self.sessions.iter().map(Session::info).collect(),
            people: self.people.iter().map(Person::info).collect(),
            completions: self.completions.clone(),
        }
    }

    /// Adds everything in `snapshot`, revalidating every record and applying the usual
    /// capacity, id and email checks. On failure the registry is left as it was.
    pub fn load(&mut self, snapshot: &Snapshot) -> Result<(), RegistryError> {
        let sessions = self.sessions.len();
        let people = self.people.len();
        let completions = self.completions.len();

        let result = self.load_records(snapshot);
        if let Err(e) = &result {
            tracing::warn!("Snapshot load failed, rolling back: {}", e);
            self.sessions.truncate(sessions);
            self.people.truncate(people);
            self.completions.truncate(completions);
        } else {
            tracing::info!(
                "Loaded snapshot v{}: {} sessions, {} users, {} completions",
                snapshot.version,
                snapshot.sessions.len(),
                snapshot.people.len(),
                snapshot.completions.len()
            );
        }
        result
    }

    fn load_records(&mut self, snapshot: &Snapshot) -> Result<(), RegistryError> {
        for info in &snapshot.sessions {
            self.add_session(Session::restore(info)?)?;
        }
        for info in &snapshot.people {
            self.add_user(Person::restore(info)?)?;
        }
        self.completions.extend(snapshot.completions.iter().cloned());
        Ok(())
    }
}
