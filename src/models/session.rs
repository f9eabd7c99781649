use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::variants::{
    BreathingExercise, BreathingExerciseInfo, GuidedMeditation, GuidedMeditationInfo,
    MindfulnessExercise, MindfulnessExerciseInfo, SessionVariant, YogaSession, YogaSessionInfo,
};
use crate::error::ValidationError;
use crate::ids::{EntityId, IdSource};
use crate::validation;

/// Minutes assigned when a session is created without a duration.
pub const DEFAULT_DURATION: f64 = 10.0;
pub const DEFAULT_DIFFICULTY: &str = "Principiante";
pub const UNASSIGNED_INSTRUCTOR: &str = "unassigned";

/// Conventional difficulty labels. Any non-empty text is accepted.
pub const DIFFICULTIES: [&str; 3] = ["Principiante", "Intermedio", "Avanzado"];

/// A practice session in the catalogue.
///
/// Every field is private. Setters validate before assigning, so a failed call leaves the
/// session untouched. `id`, `name` and `date_created` never change after construction; the
/// active flag only moves through [`Session::activate`] and [`Session::deactivate`].
#[derive(Debug, Clone)]
pub struct Session {
    id: EntityId,
    name: String,
    location: String,
    duration: f64,
    difficulty: String,
    active: bool,
    instructor: String,
    date_created: DateTime<Utc>,
    kind: SessionKind,
}

/// The concrete kind of a session together with its variant-specific fields.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionKind {
    GuidedMeditation(GuidedMeditation),
    BreathingExercise(BreathingExercise),
    YogaSession(YogaSession),
    MindfulnessExercise(MindfulnessExercise),
}

impl SessionKind {
    /// Shared dispatch to the per-variant behaviour.
    pub fn variant(&self) -> &dyn SessionVariant {
        match self {
            Self::GuidedMeditation(v) => v,
            Self::BreathingExercise(v) => v,
            Self::YogaSession(v) => v,
            Self::MindfulnessExercise(v) => v,
        }
    }

    pub fn session_type(&self) -> SessionType {
        self.variant().session_type()
    }

    fn from_details(details: &SessionDetails) -> Result<Self, ValidationError> {
        Ok(match details {
            SessionDetails::GuidedMeditation(info) => {
                Self::GuidedMeditation(GuidedMeditation::from_info(info)?)
            }
            SessionDetails::BreathingExercise(info) => {
                Self::BreathingExercise(BreathingExercise::from_info(info)?)
            }
            SessionDetails::YogaSession(info) => Self::YogaSession(YogaSession::from_info(info)?),
            SessionDetails::MindfulnessExercise(info) => {
                Self::MindfulnessExercise(MindfulnessExercise::from_info(info)?)
            }
        })
    }
}

impl From<GuidedMeditation> for SessionKind {
    fn from(v: GuidedMeditation) -> Self {
        Self::GuidedMeditation(v)
    }
}

impl From<BreathingExercise> for SessionKind {
    fn from(v: BreathingExercise) -> Self {
        Self::BreathingExercise(v)
    }
}

impl From<YogaSession> for SessionKind {
    fn from(v: YogaSession) -> Self {
        Self::YogaSession(v)
    }
}

impl From<MindfulnessExercise> for SessionKind {
    fn from(v: MindfulnessExercise) -> Self {
        Self::MindfulnessExercise(v)
    }
}

/// The variant tag of a session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SessionType {
    GuidedMeditation,
    BreathingExercise,
    YogaSession,
    MindfulnessExercise,
}

impl SessionType {
    pub const ALL: [SessionType; 4] = [
        Self::GuidedMeditation,
        Self::BreathingExercise,
        Self::YogaSession,
        Self::MindfulnessExercise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GuidedMeditation => "GuidedMeditation",
            Self::BreathingExercise => "BreathingExercise",
            Self::YogaSession => "YogaSession",
            Self::MindfulnessExercise => "MindfulnessExercise",
        }
    }
}

impl std::str::FromStr for SessionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(|t| t.as_str()).collect();
                ValidationError::not_in_set("type", &allowed, s)
            })
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for creating a session. `duration` and `difficulty` fall back to
/// [`DEFAULT_DURATION`] and [`DEFAULT_DIFFICULTY`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSessionInput {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl CreateSessionInput {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            duration: None,
            difficulty: None,
        }
    }

    pub fn duration(mut self, minutes: f64) -> Self {
        self.duration = Some(minutes);
        self
    }

    pub fn difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }
}

/// Result of an activate/deactivate request.
///
/// `success == false` means the session was already in the requested state; it is an
/// ordinary outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReport {
    pub success: bool,
    pub message: String,
}

impl ActionReport {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Read-only projection of a session: base fields, derived calories and the
/// variant's own fields under a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: EntityId,
    pub name: String,
    pub location: String,
    pub duration: f64,
    pub difficulty: String,
    pub active: bool,
    pub instructor: String,
    pub date_created: DateTime<Utc>,
    pub calories: f64,
    #[serde(flatten)]
    pub details: SessionDetails,
}

impl SessionInfo {
    pub fn session_type(&self) -> SessionType {
        self.details.session_type()
    }
}

/// Variant-specific part of a [`SessionInfo`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionDetails {
    GuidedMeditation(GuidedMeditationInfo),
    BreathingExercise(BreathingExerciseInfo),
    YogaSession(YogaSessionInfo),
    MindfulnessExercise(MindfulnessExerciseInfo),
}

impl SessionDetails {
    pub fn session_type(&self) -> SessionType {
        match self {
            Self::GuidedMeditation(_) => SessionType::GuidedMeditation,
            Self::BreathingExercise(_) => SessionType::BreathingExercise,
            Self::YogaSession(_) => SessionType::YogaSession,
            Self::MindfulnessExercise(_) => SessionType::MindfulnessExercise,
        }
    }
}

impl Session {
    pub fn new(
        ids: &dyn IdSource,
        input: CreateSessionInput,
        kind: impl Into<SessionKind>,
    ) -> Result<Self, ValidationError> {
        let name = validation::non_empty("name", &input.name)?;
        let location = validation::non_empty("location", &input.location)?;
        let duration = validation::positive("duration", input.duration.unwrap_or(DEFAULT_DURATION))?;
        let difficulty = match input.difficulty {
            Some(d) => validation::non_empty("difficulty", &d)?,
            None => DEFAULT_DIFFICULTY.to_string(),
        };

        Ok(Self {
            id: ids.next_id(),
            name,
            location,
            duration,
            difficulty,
            active: true,
            instructor: UNASSIGNED_INSTRUCTOR.to_string(),
            date_created: Utc::now(),
            kind: kind.into(),
        })
    }

    /// Builds a fresh session (new id, new creation time) carrying every other field of `info`.
    pub fn from_info(ids: &dyn IdSource, info: &SessionInfo) -> Result<Self, ValidationError> {
        Self::build(ids.next_id(), Utc::now(), info)
    }

    /// Rebuilds a previously saved session, keeping its id and creation time.
    pub fn restore(info: &SessionInfo) -> Result<Self, ValidationError> {
        Self::build(info.id.clone(), info.date_created, info)
    }

    fn build(
        id: EntityId,
        date_created: DateTime<Utc>,
        info: &SessionInfo,
    ) -> Result<Self, ValidationError> {
        if id.as_str().trim().is_empty() {
            return Err(ValidationError::empty_field("id"));
        }
        Ok(Self {
            id,
            name: validation::non_empty("name", &info.name)?,
            location: validation::non_empty("location", &info.location)?,
            duration: validation::positive("duration", info.duration)?,
            difficulty: validation::non_empty("difficulty", &info.difficulty)?,
            active: info.active,
            instructor: validation::non_empty("instructor", &info.instructor)?,
            date_created,
            kind: SessionKind::from_details(&info.details)?,
        })
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn set_location(&mut self, location: &str) -> Result<(), ValidationError> {
        self.location = validation::non_empty("location", location)?;
        Ok(())
    }

    /// Length in minutes, always greater than zero.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn set_duration(&mut self, minutes: f64) -> Result<(), ValidationError> {
        self.duration = validation::positive("duration", minutes)?;
        Ok(())
    }

    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: &str) -> Result<(), ValidationError> {
        self.difficulty = validation::non_empty("difficulty", difficulty)?;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn instructor(&self) -> &str {
        &self.instructor
    }

    pub fn set_instructor(&mut self, instructor: &str) -> Result<(), ValidationError> {
        self.instructor = validation::non_empty("instructor", instructor)?;
        Ok(())
    }

    pub fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }

    pub fn kind(&self) -> &SessionKind {
        &self.kind
    }

    // The variant is fixed at construction; only its fields can change.
    pub fn as_guided_mut(&mut self) -> Option<&mut GuidedMeditation> {
        match &mut self.kind {
            SessionKind::GuidedMeditation(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_breathing_mut(&mut self) -> Option<&mut BreathingExercise> {
        match &mut self.kind {
            SessionKind::BreathingExercise(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_yoga_mut(&mut self) -> Option<&mut YogaSession> {
        match &mut self.kind {
            SessionKind::YogaSession(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_mindfulness_mut(&mut self) -> Option<&mut MindfulnessExercise> {
        match &mut self.kind {
            SessionKind::MindfulnessExercise(v) => Some(v),
            _ => None,
        }
    }

    pub fn session_type(&self) -> SessionType {
        self.kind.session_type()
    }

    pub fn estimate_calories(&self) -> f64 {
        self.duration * self.kind.variant().calorie_rate()
    }

    pub fn activate(&mut self) -> ActionReport {
        if self.active {
            return ActionReport::rejected(format!("Session '{}' is already active", self.name));
        }
        self.active = true;
        ActionReport::ok(format!("Session '{}' activated", self.name))
    }

    pub fn deactivate(&mut self) -> ActionReport {
        if !self.active {
            return ActionReport::rejected(format!("Session '{}' is already inactive", self.name));
        }
        self.active = false;
        ActionReport::ok(format!("Session '{}' deactivated", self.name))
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            location: self.location.clone(),
            duration: self.duration,
            difficulty: self.difficulty.clone(),
            active: self.active,
            instructor: self.instructor.clone(),
            date_created: self.date_created,
            calories: self.estimate_calories(),
            details: self.kind.variant().details(),
        }
    }
}
