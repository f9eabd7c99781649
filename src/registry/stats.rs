use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Registry;

/// Aggregate view of a registry, computed in one pass over the sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    /// Session count per variant tag.
    pub by_type: BTreeMap<String, usize>,
    /// Session count per difficulty label.
    pub by_difficulty: BTreeMap<String, usize>,
    pub total_minutes: f64,
    pub total_calories: f64,
    pub users: usize,
    pub completed_sessions: usize,
}

impl Registry {
    pub fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats {
            users: self.people.len(),
            completed_sessions: self.completions.len(),
            ..RegistryStats::default()
        };

        for session in &self.sessions {
            stats.total += 1;
            if session.is_active() {
                stats.active += 1;
            } else {
                stats.inactive += 1;
            }
            *stats
                .by_type
                .entry(session.session_type().as_str().to_string())
                .or_insert(0) += 1;
            *stats
                .by_difficulty
                .entry(session.difficulty().to_string())
                .or_insert(0) += 1;
            stats.total_minutes += session.duration();
            stats.total_calories += session.estimate_calories();
        }

        stats
    }
}
