//! Session filters.
//!
//! Each filter is one linear scan over a slice of session references and keeps the input
//! order. Filters compose by feeding one result into the next; there is no combined
//! predicate or index.
//!
//! ```ignore
//! let yoga = registry.filter_by_type(SessionType::YogaSession);
//! let short_active_yoga = query::by_duration(&query::by_status(&yoga, true), 0.0, 30.0);
//! ```

use crate::models::{Session, SessionType};

use super::Registry;

/// Case-insensitive substring match on the session name. An empty query matches everything.
pub fn by_name<'a>(sessions: &[&'a Session], query: &str) -> Vec<&'a Session> {
    let needle = query.trim().to_lowercase();
    sessions
        .iter()
        .copied()
        .filter(|s| s.name().to_lowercase().contains(&needle))
        .collect()
}

pub fn by_type<'a>(sessions: &[&'a Session], session_type: SessionType) -> Vec<&'a Session> {
    sessions
        .iter()
        .copied()
        .filter(|s| s.session_type() == session_type)
        .collect()
}

pub fn by_status<'a>(sessions: &[&'a Session], active: bool) -> Vec<&'a Session> {
    sessions
        .iter()
        .copied()
        .filter(|s| s.is_active() == active)
        .collect()
}

/// Exact match on the difficulty label.
pub fn by_difficulty<'a>(sessions: &[&'a Session], difficulty: &str) -> Vec<&'a Session> {
    let difficulty = difficulty.trim();
    sessions
        .iter()
        .copied()
        .filter(|s| s.difficulty() == difficulty)
        .collect()
}

/// Inclusive on both ends.
pub fn by_duration<'a>(sessions: &[&'a Session], min: f64, max: f64) -> Vec<&'a Session> {
    sessions
        .iter()
        .copied()
        .filter(|s| s.duration() >= min && s.duration() <= max)
        .collect()
}

pub fn by_instructor<'a>(sessions: &[&'a Session], instructor: &str) -> Vec<&'a Session> {
    sessions
        .iter()
        .copied()
        .filter(|s| s.instructor() == instructor)
        .collect()
}

impl Registry {
    pub fn search_by_name(&self, query: &str) -> Vec<&Session> {
        by_name(&self.all_sessions(), query)
    }

    pub fn filter_by_type(&self, session_type: SessionType) -> Vec<&Session> {
        by_type(&self.all_sessions(), session_type)
    }

    pub fn filter_by_status(&self, active: bool) -> Vec<&Session> {
        by_status(&self.all_sessions(), active)
    }

    pub fn filter_by_difficulty(&self, difficulty: &str) -> Vec<&Session> {
        by_difficulty(&self.all_sessions(), difficulty)
    }

    pub fn filter_by_duration(&self, min: f64, max: f64) -> Vec<&Session> {
        by_duration(&self.all_sessions(), min, max)
    }

    pub fn filter_by_instructor(&self, instructor: &str) -> Vec<&Session> {
        by_instructor(&self.all_sessions(), instructor)
    }
}
