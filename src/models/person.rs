use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::session::{Session, SessionType};
use crate::error::ValidationError;
use crate::ids::{EntityId, IdSource};
use crate::validation;

pub const MAX_AGE: u32 = 120;
pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

/// A registered user: someone who practises or someone who teaches.
///
/// Contact fields are validated on every write. The role carries the progress or teaching
/// data and is only changed through the role-specific methods.
#[derive(Debug, Clone)]
pub struct Person {
    id: EntityId,
    name: String,
    email: String,
    age: Option<u32>,
    phone: Option<String>,
    registration_date: DateTime<Utc>,
    role: PersonRole,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PersonRole {
    Practitioner(Practitioner),
    Instructor(Instructor),
}

impl From<Practitioner> for PersonRole {
    fn from(p: Practitioner) -> Self {
        Self::Practitioner(p)
    }
}

impl From<Instructor> for PersonRole {
    fn from(i: Instructor) -> Self {
        Self::Instructor(i)
    }
}

/// Input for registering a person.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePersonInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl CreatePersonInput {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            age: None,
            phone: None,
        }
    }

    pub fn age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MembershipType {
    #[default]
    Basic,
    Premium,
    Elite,
}

impl MembershipType {
    pub const ALL: [MembershipType; 3] = [Self::Basic, Self::Premium, Self::Elite];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Premium => "Premium",
            Self::Elite => "Elite",
        }
    }
}

impl std::str::FromStr for MembershipType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(|m| m.as_str()).collect();
                ValidationError::not_in_set("membership_type", &allowed, s)
            })
    }
}

/// Practice level derived from accumulated minutes.
///
/// - `Novice`: under 100
/// - `Intermediate`: 100 to under 500
/// - `Advanced`: 500 to under 1000
/// - `Master`: 1000 and above
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Novice,
    Intermediate,
    Advanced,
    Master,
}

impl Level {
    pub fn from_minutes(minutes: f64) -> Self {
        if minutes < 100.0 {
            Self::Novice
        } else if minutes < 500.0 {
            Self::Intermediate
        } else if minutes < 1000.0 {
            Self::Advanced
        } else {
            Self::Master
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Novice => "Novice",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Master => "Master",
        }
    }
}

// ============================================================
// Practitioner
// ============================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Practitioner {
    membership_type: MembershipType,
    sessions_completed: u32,
    total_minutes: f64,
    favorite_type: Option<SessionType>,
    goals: Vec<String>,
}

impl Practitioner {
    pub fn new(membership_type: MembershipType) -> Self {
        Self {
            membership_type,
            ..Self::default()
        }
    }

    fn from_info(info: &PractitionerInfo) -> Result<Self, ValidationError> {
        if !info.total_minutes.is_finite() || info.total_minutes < 0.0 {
            return Err(ValidationError::out_of_range(
                "total_minutes",
                0.0,
                f64::MAX,
                info.total_minutes,
            ));
        }
        let mut practitioner = Self {
            membership_type: info.membership_type,
            sessions_completed: info.sessions_completed,
            total_minutes: info.total_minutes,
            favorite_type: info.favorite_type,
            goals: Vec::new(),
        };
        for goal in &info.goals {
            practitioner.add_goal(goal)?;
        }
        Ok(practitioner)
    }

    pub fn membership_type(&self) -> MembershipType {
        self.membership_type
    }

    pub fn set_membership_type(&mut self, membership: MembershipType) {
        self.membership_type = membership;
    }

    pub fn sessions_completed(&self) -> u32 {
        self.sessions_completed
    }

    pub fn total_minutes(&self) -> f64 {
        self.total_minutes
    }

    /// Type of the most recently completed session (last one wins, not the most frequent).
    pub fn favorite_type(&self) -> Option<SessionType> {
        self.favorite_type
    }

    pub fn goals(&self) -> &[String] {
        &self.goals
    }

    pub fn add_goal(&mut self, goal: &str) -> Result<(), ValidationError> {
        self.goals.push(validation::non_empty("goal", goal)?);
        Ok(())
    }

    pub fn complete_session(&mut self, session: &Session) {
        self.sessions_completed += 1;
        self.total_minutes += session.duration();
        self.favorite_type = Some(session.session_type());
    }

    pub fn level(&self) -> Level {
        Level::from_minutes(self.total_minutes)
    }
}

// ============================================================
// Instructor
// ============================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Instructor {
    specialty: String,
    certifications: Vec<String>,
    sessions_teaching: Vec<EntityId>,
    rating: Option<f64>,
    experience: u32,
}

impl Instructor {
    pub fn new(specialty: &str, experience: u32) -> Result<Self, ValidationError> {
        Ok(Self {
            specialty: validation::non_empty("specialty", specialty)?,
            certifications: Vec::new(),
            sessions_teaching: Vec::new(),
            rating: None,
            experience,
        })
    }

    fn from_info(info: &InstructorInfo) -> Result<Self, ValidationError> {
        let mut instructor = Self::new(&info.specialty, info.experience)?;
        for cert in &info.certifications {
            instructor.add_certification(cert)?;
        }
        if let Some(rating) = info.rating {
            instructor.update_rating(rating)?;
        }
        instructor.sessions_teaching = info.sessions_teaching.clone();
        Ok(instructor)
    }

    pub fn specialty(&self) -> &str {
        &self.specialty
    }

    pub fn set_specialty(&mut self, specialty: &str) -> Result<(), ValidationError> {
        self.specialty = validation::non_empty("specialty", specialty)?;
        Ok(())
    }

    pub fn certifications(&self) -> &[String] {
        &self.certifications
    }

    pub fn add_certification(&mut self, certification: &str) -> Result<(), ValidationError> {
        self.certifications
            .push(validation::non_empty("certification", certification)?);
        Ok(())
    }

    /// Ids of assigned sessions. May include ids of sessions since removed from the registry.
    pub fn sessions_teaching(&self) -> &[EntityId] {
        &self.sessions_teaching
    }

    pub fn rating(&self) -> Option<f64> {
        self.rating
    }

    /// Replaces the stored rating. There is no rating history, so no averaging.
    pub fn update_rating(&mut self, rating: f64) -> Result<(), ValidationError> {
        self.rating = Some(validation::in_range("rating", rating, MIN_RATING, MAX_RATING)?);
        Ok(())
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn set_experience(&mut self, years: u32) {
        self.experience = years;
    }

    fn take_session(&mut self, instructor_name: &str, session: &mut Session) -> Result<(), ValidationError> {
        session.set_instructor(instructor_name)?;
        if !self.sessions_teaching.contains(session.id()) {
            self.sessions_teaching.push(session.id().clone());
        }
        Ok(())
    }
}

// ============================================================
// Person
// ============================================================

/// Read-only projection of a person, with the role's fields under a `role` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonInfo {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub age: Option<u32>,
    pub phone: Option<String>,
    pub registration_date: DateTime<Utc>,
    #[serde(flatten)]
    pub role: RoleInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role")]
pub enum RoleInfo {
    Practitioner(PractitionerInfo),
    Instructor(InstructorInfo),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PractitionerInfo {
    pub membership_type: MembershipType,
    pub sessions_completed: u32,
    pub total_minutes: f64,
    pub favorite_type: Option<SessionType>,
    pub goals: Vec<String>,
    /// Derived; ignored when restoring.
    pub level: Level,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructorInfo {
    pub specialty: String,
    pub certifications: Vec<String>,
    pub sessions_teaching: Vec<EntityId>,
    pub rating: Option<f64>,
    pub experience: u32,
}

impl Person {
    pub fn new(
        ids: &dyn IdSource,
        input: CreatePersonInput,
        role: impl Into<PersonRole>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: ids.next_id(),
            name: validation::non_empty("name", &input.name)?,
            email: validation::email(&input.email)?,
            age: validate_age(input.age)?,
            phone: validation::phone(input.phone.as_deref()),
            registration_date: Utc::now(),
            role: role.into(),
        })
    }

    pub fn practitioner(
        ids: &dyn IdSource,
        input: CreatePersonInput,
        membership: MembershipType,
    ) -> Result<Self, ValidationError> {
        Self::new(ids, input, Practitioner::new(membership))
    }

    pub fn instructor(
        ids: &dyn IdSource,
        input: CreatePersonInput,
        specialty: &str,
        experience: u32,
    ) -> Result<Self, ValidationError> {
        Self::new(ids, input, Instructor::new(specialty, experience)?)
    }

    /// Rebuilds a saved person, keeping id, registration date and accumulated progress.
    pub fn restore(info: &PersonInfo) -> Result<Self, ValidationError> {
        if info.id.as_str().trim().is_empty() {
            return Err(ValidationError::empty_field("id"));
        }
        let role = match &info.role {
            RoleInfo::Practitioner(p) => PersonRole::Practitioner(Practitioner::from_info(p)?),
            RoleInfo::Instructor(i) => PersonRole::Instructor(Instructor::from_info(i)?),
        };
        Ok(Self {
            id: info.id.clone(),
            name: validation::non_empty("name", &info.name)?,
            email: validation::email(&info.email)?,
            age: validate_age(info.age)?,
            phone: validation::phone(info.phone.as_deref()),
            registration_date: info.registration_date,
            role,
        })
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = validation::non_empty("name", name)?;
        Ok(())
    }

    /// Always lowercase.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Format check only. Callers outside the crate go through
    /// [`Registry::change_email`](crate::registry::Registry::change_email), which also keeps
    /// emails unique.
    pub(crate) fn set_email(&mut self, email: &str) -> Result<(), ValidationError> {
        self.email = validation::email(email)?;
        Ok(())
    }

    pub fn age(&self) -> Option<u32> {
        self.age
    }

    pub fn set_age(&mut self, age: Option<u32>) -> Result<(), ValidationError> {
        self.age = validate_age(age)?;
        Ok(())
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn set_phone(&mut self, phone: Option<&str>) {
        self.phone = validation::phone(phone);
    }

    pub fn registration_date(&self) -> DateTime<Utc> {
        self.registration_date
    }

    pub fn role(&self) -> &PersonRole {
        &self.role
    }

    pub fn role_name(&self) -> &'static str {
        match self.role {
            PersonRole::Practitioner(_) => "Practitioner",
            PersonRole::Instructor(_) => "Instructor",
        }
    }

    pub fn as_practitioner(&self) -> Option<&Practitioner> {
        match &self.role {
            PersonRole::Practitioner(p) => Some(p),
            PersonRole::Instructor(_) => None,
        }
    }

    pub fn as_practitioner_mut(&mut self) -> Option<&mut Practitioner> {
        match &mut self.role {
            PersonRole::Practitioner(p) => Some(p),
            PersonRole::Instructor(_) => None,
        }
    }

    pub fn as_instructor(&self) -> Option<&Instructor> {
        match &self.role {
            PersonRole::Instructor(i) => Some(i),
            PersonRole::Practitioner(_) => None,
        }
    }

    pub fn as_instructor_mut(&mut self) -> Option<&mut Instructor> {
        match &mut self.role {
            PersonRole::Instructor(i) => Some(i),
            PersonRole::Practitioner(_) => None,
        }
    }

    /// Practitioners only.
    pub fn complete_session(&mut self, session: &Session) -> Result<(), ValidationError> {
        let practitioner = self.as_practitioner_mut().ok_or(ValidationError::WrongRole {
            operation: "complete_session",
            required: "Practitioner",
        })?;
        practitioner.complete_session(session);
        Ok(())
    }

    /// Instructors only. Records the session id and puts this person's name on the session.
    pub fn assign_session(&mut self, session: &mut Session) -> Result<(), ValidationError> {
        let name = self.name.clone();
        let instructor = self.as_instructor_mut().ok_or(ValidationError::WrongRole {
            operation: "assign_session",
            required: "Instructor",
        })?;
        instructor.take_session(&name, session)
    }

    pub fn info(&self) -> PersonInfo {
        let role = match &self.role {
            PersonRole::Practitioner(p) => RoleInfo::Practitioner(PractitionerInfo {
                membership_type: p.membership_type,
                sessions_completed: p.sessions_completed,
                total_minutes: p.total_minutes,
                favorite_type: p.favorite_type,
                goals: p.goals.clone(),
                level: p.level(),
            }),
            PersonRole::Instructor(i) => RoleInfo::Instructor(InstructorInfo {
                specialty: i.specialty.clone(),
                certifications: i.certifications.clone(),
                sessions_teaching: i.sessions_teaching.clone(),
                rating: i.rating,
                experience: i.experience,
            }),
        };
        PersonInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            age: self.age,
            phone: self.phone.clone(),
            registration_date: self.registration_date,
            role,
        }
    }
}

fn validate_age(age: Option<u32>) -> Result<Option<u32>, ValidationError> {
    match age {
        Some(a) if a > MAX_AGE => Err(ValidationError::out_of_range(
            "age",
            0.0,
            MAX_AGE as f64,
            a as f64,
        )),
        other => Ok(other),
    }
}
