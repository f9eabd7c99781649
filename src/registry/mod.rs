//! The registry owns every session, person and completion record.
//!
//! It is the only entry point for changing the collections. Lookups hand out references to
//! individual entities (whose setters validate on their own); listings hand out snapshots
//! that cannot change the backing vectors.
//!
//! Failures that are part of normal operation (missing ids, full collections, taken emails)
//! come back as [`RegistryError`]. Input that breaks a field rule comes back as
//! [`RegistryError::Invalid`].

pub mod query;
mod shared;
mod snapshot;
mod stats;

pub use shared::SharedRegistry;
pub use snapshot::Snapshot;
pub use stats::RegistryStats;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::RegistryConfig;
use crate::error::{Collection, RegistryError};
use crate::ids::{IdSource, UuidIds};
use crate::models::*;
use crate::validation;

pub struct Registry {
    config: RegistryConfig,
    ids: Box<dyn IdSource>,
    sessions: Vec<Session>,
    people: Vec<Person>,
    completions: Vec<CompletionRecord>,
}

/// Input for updating a stored session. All fields are optional for partial updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSessionInput {
    pub location: Option<String>,
    pub duration: Option<f64>,
    pub difficulty: Option<String>,
    pub instructor: Option<String>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("sessions", &self.sessions.len())
            .field("people", &self.people.len())
            .field("completions", &self.completions.len())
            .finish()
    }
}

impl Registry {
    /// Default limits and random UUIDs.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self::with_id_source(config, UuidIds)
    }

    pub fn with_id_source(config: RegistryConfig, ids: impl IdSource + 'static) -> Self {
        Self {
            config,
            ids: Box::new(ids),
            sessions: Vec::new(),
            people: Vec::new(),
            completions: Vec::new(),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The id source new entities should be built with.
    pub fn ids(&self) -> &dyn IdSource {
        self.ids.as_ref()
    }

    // ============================================================
    // Session operations
    // ============================================================

    pub fn add_session(&mut self, session: Session) -> Result<&Session, RegistryError> {
        if self.sessions.len() >= self.config.max_sessions {
            tracing::warn!(
                "Rejected session {}: capacity of {} reached",
                session.id(),
                self.config.max_sessions
            );
            return Err(RegistryError::CapacityReached {
                collection: Collection::Sessions,
                limit: self.config.max_sessions,
            });
        }
        if self.find_session(session.id()).is_some() {
            tracing::warn!("Rejected session {}: id already present", session.id());
            return Err(RegistryError::DuplicateId {
                collection: Collection::Sessions,
                id: session.id().to_string(),
            });
        }

        tracing::debug!(
            "Added {} session {} ({})",
            session.session_type(),
            session.id(),
            session.name()
        );
        self.sessions.push(session);
        Ok(&self.sessions[self.sessions.len() - 1])
    }

    /// Removes and returns the session. Instructors keep the id in their teaching list.
    pub fn remove_session(&mut self, id: impl AsRef<str>) -> Result<Session, RegistryError> {
        let id = id.as_ref();
        let index = self.session_index(id)?;
        let removed = self.sessions.remove(index);
        tracing::debug!("Removed session {}", id);
        Ok(removed)
    }

    pub fn find_session(&self, id: impl AsRef<str>) -> Option<&Session> {
        let id = id.as_ref();
        self.sessions.iter().find(|s| s.id().as_str() == id)
    }

    pub fn find_session_mut(&mut self, id: impl AsRef<str>) -> Option<&mut Session> {
        let id = id.as_ref();
        self.sessions.iter_mut().find(|s| s.id().as_str() == id)
    }

    /// Snapshot of every session in insertion order.
    pub fn all_sessions(&self) -> Vec<&Session> {
        self.sessions.iter().collect()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Applies every provided field or none of them.
    pub fn update_session(
        &mut self,
        id: impl AsRef<str>,
        input: UpdateSessionInput,
    ) -> Result<&Session, RegistryError> {
        let index = self.session_index(id.as_ref())?;
        let mut updated = self.sessions[index].clone();

        if let Some(location) = &input.location {
            updated.set_location(location)?;
        }
        if let Some(duration) = input.duration {
            updated.set_duration(duration)?;
        }
        if let Some(difficulty) = &input.difficulty {
            updated.set_difficulty(difficulty)?;
        }
        if let Some(instructor) = &input.instructor {
            updated.set_instructor(instructor)?;
        }

        self.sessions[index] = updated;
        Ok(&self.sessions[index])
    }

    pub fn set_session_active(
        &mut self,
        id: impl AsRef<str>,
        active: bool,
    ) -> Result<ActionReport, RegistryError> {
        let index = self.session_index(id.as_ref())?;
        let session = &mut self.sessions[index];
        Ok(if active {
            session.activate()
        } else {
            session.deactivate()
        })
    }

    fn session_index(&self, id: &str) -> Result<usize, RegistryError> {
        self.sessions
            .iter()
            .position(|s| s.id().as_str() == id)
            .ok_or_else(|| {
                tracing::warn!("Session not found: {}", id);
                RegistryError::SessionNotFound(id.to_string())
            })
    }

    // ============================================================
    // User operations
    // ============================================================

    pub fn add_user(&mut self, person: Person) -> Result<&Person, RegistryError> {
        if self.people.len() >= self.config.max_users {
            tracing::warn!(
                "Rejected user {}: capacity of {} reached",
                person.id(),
                self.config.max_users
            );
            return Err(RegistryError::CapacityReached {
                collection: Collection::Users,
                limit: self.config.max_users,
            });
        }
        if self.find_user_by_email(person.email()).is_some() {
            tracing::warn!("Rejected user {}: email already registered", person.id());
            return Err(RegistryError::EmailTaken(person.email().to_string()));
        }
        if self.find_user(person.id()).is_some() {
            tracing::warn!("Rejected user {}: id already present", person.id());
            return Err(RegistryError::DuplicateId {
                collection: Collection::Users,
                id: person.id().to_string(),
            });
        }

        tracing::debug!("Added {} {}", person.role_name(), person.id());
        self.people.push(person);
        Ok(&self.people[self.people.len() - 1])
    }

    /// Completion records of the person stay in the audit log.
    pub fn remove_user(&mut self, id: impl AsRef<str>) -> Result<Person, RegistryError> {
        let id = id.as_ref();
        let index = self.person_index(id)?;
        let removed = self.people.remove(index);
        tracing::debug!("Removed user {}", id);
        Ok(removed)
    }

    pub fn find_user(&self, id: impl AsRef<str>) -> Option<&Person> {
        let id = id.as_ref();
        self.people.iter().find(|p| p.id().as_str() == id)
    }

    /// The email can only change through [`Registry::change_email`].
    pub fn find_user_mut(&mut self, id: impl AsRef<str>) -> Option<&mut Person> {
        let id = id.as_ref();
        self.people.iter_mut().find(|p| p.id().as_str() == id)
    }

    /// Emails are compared case-insensitively.
    pub fn find_user_by_email(&self, email: &str) -> Option<&Person> {
        let email = email.trim().to_lowercase();
        self.people.iter().find(|p| p.email() == email)
    }

    /// Snapshot of every person in insertion order.
    pub fn all_users(&self) -> Vec<&Person> {
        self.people.iter().collect()
    }

    pub fn user_count(&self) -> usize {
        self.people.len()
    }

    pub fn change_email(&mut self, id: impl AsRef<str>, email: &str) -> Result<(), RegistryError> {
        let index = self.person_index(id.as_ref())?;
        let email = validation::email(email)?;
        if let Some(owner) = self.find_user_by_email(&email) {
            if owner.id() != self.people[index].id() {
                tracing::warn!(
                    "Rejected email change for {}: email already registered",
                    self.people[index].id()
                );
                return Err(RegistryError::EmailTaken(email));
            }
        }
        self.people[index].set_email(&email)?;
        Ok(())
    }

    fn person_index(&self, id: &str) -> Result<usize, RegistryError> {
        self.people
            .iter()
            .position(|p| p.id().as_str() == id)
            .ok_or_else(|| {
                tracing::warn!("User not found: {}", id);
                RegistryError::PersonNotFound(id.to_string())
            })
    }

    // ============================================================
    // Relationships
    // ============================================================

    /// Puts the instructor's name on the session and the session id on the instructor.
    /// Fails with [`RegistryError::Invalid`] if the person is not an instructor.
    pub fn assign_instructor(
        &mut self,
        person_id: impl AsRef<str>,
        session_id: impl AsRef<str>,
    ) -> Result<(), RegistryError> {
        let person_index = self.person_index(person_id.as_ref())?;
        let session_index = self.session_index(session_id.as_ref())?;

        let person = &mut self.people[person_index];
        let session = &mut self.sessions[session_index];
        person.assign_session(session)?;

        tracing::debug!("Assigned {} to session {}", person.name(), session.id());
        Ok(())
    }

    /// Logs a completion. Practitioners also gain progress; other roles only get the log entry.
    pub fn record_completed_session(
        &mut self,
        person_id: impl AsRef<str>,
        session_id: impl AsRef<str>,
    ) -> Result<&CompletionRecord, RegistryError> {
        let person_index = self.person_index(person_id.as_ref())?;
        let session_index = self.session_index(session_id.as_ref())?;

        let session = &self.sessions[session_index];
        let person = &mut self.people[person_index];
        if let Some(practitioner) = person.as_practitioner_mut() {
            practitioner.complete_session(session);
        }

        self.completions.push(CompletionRecord {
            person_id: person.id().clone(),
            session_id: session.id().clone(),
            completed_at: Utc::now(),
        });
        tracing::debug!("Recorded completion of {} by {}", session.id(), person.id());
        Ok(&self.completions[self.completions.len() - 1])
    }

    pub fn completions(&self) -> &[CompletionRecord] {
        &self.completions
    }

    pub fn completions_for(&self, person_id: impl AsRef<str>) -> Vec<&CompletionRecord> {
        let person_id = person_id.as_ref();
        self.completions
            .iter()
            .filter(|c| c.person_id.as_str() == person_id)
            .collect()
    }

    /// Sessions an instructor teaches that are still in the registry. Ids of removed
    /// sessions are skipped.
    pub fn sessions_taught_by(
        &self,
        person_id: impl AsRef<str>,
    ) -> Result<Vec<&Session>, RegistryError> {
        let person = &self.people[self.person_index(person_id.as_ref())?];
        let Some(instructor) = person.as_instructor() else {
            return Ok(Vec::new());
        };
        Ok(instructor
            .sessions_teaching()
            .iter()
            .filter_map(|id| self.find_session(id))
            .collect())
    }
}
