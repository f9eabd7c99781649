//! The four concrete session kinds.
//!
//! Each kind implements [`SessionVariant`], which is where its type tag, calorie rate and
//! info projection live. Adding a kind means adding a struct here, an impl of the trait and
//! a case to [`SessionKind`](super::SessionKind); the compiler points at every match that
//! needs updating.

use serde::{Deserialize, Serialize};

use super::session::{SessionDetails, SessionType};
use crate::error::ValidationError;
use crate::validation;

/// Calories burned per minute unless a variant says otherwise.
pub const BASE_CALORIE_RATE: f64 = 3.0;
pub const YOGA_CALORIE_RATE: f64 = 5.0;
/// Upper bound for a single inhale, hold or exhale.
pub const MAX_PHASE_SECONDS: u32 = 3600;

/// Behaviour every session kind provides.
pub trait SessionVariant {
    fn session_type(&self) -> SessionType;

    /// kcal per minute.
    fn calorie_rate(&self) -> f64 {
        BASE_CALORIE_RATE
    }

    /// The kind's own fields, tagged with its type.
    fn details(&self) -> SessionDetails;
}

// ============================================================
// Guided meditation
// ============================================================

/// Theme of a guided meditation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MeditationTheme {
    #[default]
    Relaxation,
    Sleep,
    Anxiety,
    Focus,
    Gratitude,
    SelfCompassion,
}

impl MeditationTheme {
    pub const ALL: [MeditationTheme; 6] = [
        Self::Relaxation,
        Self::Sleep,
        Self::Anxiety,
        Self::Focus,
        Self::Gratitude,
        Self::SelfCompassion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relaxation => "Relaxation",
            Self::Sleep => "Sleep",
            Self::Anxiety => "Anxiety",
            Self::Focus => "Focus",
            Self::Gratitude => "Gratitude",
            Self::SelfCompassion => "SelfCompassion",
        }
    }
}

impl std::str::FromStr for MeditationTheme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(|t| t.as_str()).collect();
                ValidationError::not_in_set("theme", &allowed, s)
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GuidedMeditation {
    theme: MeditationTheme,
    voice_guide: String,
    background_music: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidedMeditationInfo {
    pub theme: MeditationTheme,
    pub voice_guide: String,
    pub background_music: bool,
}

impl Default for GuidedMeditation {
    fn default() -> Self {
        Self {
            theme: MeditationTheme::default(),
            voice_guide: "Neutral".to_string(),
            background_music: true,
        }
    }
}

impl GuidedMeditation {
    pub fn new(
        theme: &str,
        voice_guide: &str,
        background_music: bool,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            theme: theme.parse()?,
            voice_guide: validation::non_empty("voice_guide", voice_guide)?,
            background_music,
        })
    }

    pub(crate) fn from_info(info: &GuidedMeditationInfo) -> Result<Self, ValidationError> {
        Ok(Self {
            theme: info.theme,
            voice_guide: validation::non_empty("voice_guide", &info.voice_guide)?,
            background_music: info.background_music,
        })
    }

    pub fn theme(&self) -> MeditationTheme {
        self.theme
    }

    /// Accepts only the names in [`MeditationTheme::ALL`].
    pub fn set_theme(&mut self, theme: &str) -> Result<(), ValidationError> {
        self.theme = theme.parse()?;
        Ok(())
    }

    pub fn voice_guide(&self) -> &str {
        &self.voice_guide
    }

    pub fn set_voice_guide(&mut self, voice: &str) -> Result<(), ValidationError> {
        self.voice_guide = validation::non_empty("voice_guide", voice)?;
        Ok(())
    }

    pub fn background_music(&self) -> bool {
        self.background_music
    }

    pub fn set_background_music(&mut self, on: bool) {
        self.background_music = on;
    }
}

impl SessionVariant for GuidedMeditation {
    fn session_type(&self) -> SessionType {
        SessionType::GuidedMeditation
    }

    fn details(&self) -> SessionDetails {
        SessionDetails::GuidedMeditation(GuidedMeditationInfo {
            theme: self.theme,
            voice_guide: self.voice_guide.clone(),
            background_music: self.background_music,
        })
    }
}

// ============================================================
// Breathing exercise
// ============================================================

#[derive(Debug, Clone, PartialEq)]
pub struct BreathingExercise {
    technique: String,
    cycles: u32,
    inhale_seconds: u32,
    hold_seconds: u32,
    exhale_seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreathingExerciseInfo {
    pub technique: String,
    pub cycles: u32,
    pub inhale_seconds: u32,
    pub hold_seconds: u32,
    pub exhale_seconds: u32,
}

impl Default for BreathingExercise {
    fn default() -> Self {
        Self {
            technique: "Box breathing".to_string(),
            cycles: 4,
            inhale_seconds: 4,
            hold_seconds: 4,
            exhale_seconds: 4,
        }
    }
}

impl BreathingExercise {
    pub fn new(technique: &str, cycles: u32) -> Result<Self, ValidationError> {
        Ok(Self {
            technique: validation::non_empty("technique", technique)?,
            cycles: validation::positive_count("cycles", cycles)?,
            ..Self::default()
        })
    }

    pub(crate) fn from_info(info: &BreathingExerciseInfo) -> Result<Self, ValidationError> {
        let mut exercise = Self::new(&info.technique, info.cycles)?;
        exercise.set_timing(info.inhale_seconds, info.hold_seconds, info.exhale_seconds)?;
        Ok(exercise)
    }

    pub fn technique(&self) -> &str {
        &self.technique
    }

    pub fn set_technique(&mut self, technique: &str) -> Result<(), ValidationError> {
        self.technique = validation::non_empty("technique", technique)?;
        Ok(())
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn set_cycles(&mut self, cycles: u32) -> Result<(), ValidationError> {
        self.cycles = validation::positive_count("cycles", cycles)?;
        Ok(())
    }

    pub fn inhale_seconds(&self) -> u32 {
        self.inhale_seconds
    }

    pub fn hold_seconds(&self) -> u32 {
        self.hold_seconds
    }

    pub fn exhale_seconds(&self) -> u32 {
        self.exhale_seconds
    }

    /// Sets the whole breath pattern at once. Holding may be zero, inhaling and exhaling may not.
    /// No phase may exceed [`MAX_PHASE_SECONDS`].
    pub fn set_timing(&mut self, inhale: u32, hold: u32, exhale: u32) -> Result<(), ValidationError> {
        let inhale = validation::count_in_range("inhale_seconds", inhale, 1, MAX_PHASE_SECONDS)?;
        let hold = validation::count_in_range("hold_seconds", hold, 0, MAX_PHASE_SECONDS)?;
        let exhale = validation::count_in_range("exhale_seconds", exhale, 1, MAX_PHASE_SECONDS)?;
        self.inhale_seconds = inhale;
        self.hold_seconds = hold;
        self.exhale_seconds = exhale;
        Ok(())
    }

    pub fn cycle_seconds(&self) -> u32 {
        self.inhale_seconds + self.hold_seconds + self.exhale_seconds
    }

    /// e.g. `"4-7-8"`
    pub fn pattern(&self) -> String {
        format!(
            "{}-{}-{}",
            self.inhale_seconds, self.hold_seconds, self.exhale_seconds
        )
    }
}

impl SessionVariant for BreathingExercise {
    fn session_type(&self) -> SessionType {
        SessionType::BreathingExercise
    }

    fn details(&self) -> SessionDetails {
        SessionDetails::BreathingExercise(BreathingExerciseInfo {
            technique: self.technique.clone(),
            cycles: self.cycles,
            inhale_seconds: self.inhale_seconds,
            hold_seconds: self.hold_seconds,
            exhale_seconds: self.exhale_seconds,
        })
    }
}

// ============================================================
// Yoga
// ============================================================

/// Yoga burns more than seated practice, see [`YOGA_CALORIE_RATE`].
#[derive(Debug, Clone, PartialEq)]
pub struct YogaSession {
    style: String,
    poses: Vec<String>,
    focus_area: String,
    equipment: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YogaSessionInfo {
    pub style: String,
    pub poses: Vec<String>,
    pub focus_area: String,
    pub equipment: Vec<String>,
}

impl Default for YogaSession {
    fn default() -> Self {
        Self {
            style: "Hatha".to_string(),
            poses: Vec::new(),
            focus_area: "Full body".to_string(),
            equipment: Vec::new(),
        }
    }
}

impl YogaSession {
    pub fn new(style: &str, focus_area: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            style: validation::non_empty("style", style)?,
            poses: Vec::new(),
            focus_area: validation::non_empty("focus_area", focus_area)?,
            equipment: Vec::new(),
        })
    }

    pub(crate) fn from_info(info: &YogaSessionInfo) -> Result<Self, ValidationError> {
        let mut yoga = Self::new(&info.style, &info.focus_area)?;
        for pose in &info.poses {
            yoga.add_pose(pose)?;
        }
        for item in &info.equipment {
            yoga.add_equipment(item)?;
        }
        Ok(yoga)
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn set_style(&mut self, style: &str) -> Result<(), ValidationError> {
        self.style = validation::non_empty("style", style)?;
        Ok(())
    }

    /// Poses in the order they were added.
    pub fn poses(&self) -> &[String] {
        &self.poses
    }

    pub fn add_pose(&mut self, pose: &str) -> Result<(), ValidationError> {
        self.poses.push(validation::non_empty("pose", pose)?);
        Ok(())
    }

    pub fn focus_area(&self) -> &str {
        &self.focus_area
    }

    pub fn set_focus_area(&mut self, area: &str) -> Result<(), ValidationError> {
        self.focus_area = validation::non_empty("focus_area", area)?;
        Ok(())
    }

    pub fn equipment(&self) -> &[String] {
        &self.equipment
    }

    pub fn add_equipment(&mut self, item: &str) -> Result<(), ValidationError> {
        self.equipment.push(validation::non_empty("equipment", item)?);
        Ok(())
    }
}

impl SessionVariant for YogaSession {
    fn session_type(&self) -> SessionType {
        SessionType::YogaSession
    }

    fn calorie_rate(&self) -> f64 {
        YOGA_CALORIE_RATE
    }

    fn details(&self) -> SessionDetails {
        SessionDetails::YogaSession(YogaSessionInfo {
            style: self.style.clone(),
            poses: self.poses.clone(),
            focus_area: self.focus_area.clone(),
            equipment: self.equipment.clone(),
        })
    }
}

// ============================================================
// Mindfulness
// ============================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Sense {
    Sight,
    Hearing,
    Touch,
    Smell,
    Taste,
}

impl Sense {
    pub const ALL: [Sense; 5] = [
        Self::Sight,
        Self::Hearing,
        Self::Touch,
        Self::Smell,
        Self::Taste,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sight => "Sight",
            Self::Hearing => "Hearing",
            Self::Touch => "Touch",
            Self::Smell => "Smell",
            Self::Taste => "Taste",
        }
    }
}

impl std::str::FromStr for Sense {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sense| sense.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(|s| s.as_str()).collect();
                ValidationError::not_in_set("sense", &allowed, s)
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MindfulnessExercise {
    practice: String,
    senses_involved: Vec<Sense>,
    environment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindfulnessExerciseInfo {
    pub practice: String,
    pub senses_involved: Vec<Sense>,
    pub environment: String,
}

impl Default for MindfulnessExercise {
    fn default() -> Self {
        Self {
            practice: "Body scan".to_string(),
            senses_involved: Vec::new(),
            environment: "Indoor".to_string(),
        }
    }
}

impl MindfulnessExercise {
    pub fn new(practice: &str, environment: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            practice: validation::non_empty("practice", practice)?,
            senses_involved: Vec::new(),
            environment: validation::non_empty("environment", environment)?,
        })
    }

    pub(crate) fn from_info(info: &MindfulnessExerciseInfo) -> Result<Self, ValidationError> {
        let mut exercise = Self::new(&info.practice, &info.environment)?;
        for sense in &info.senses_involved {
            exercise.insert_sense(*sense);
        }
        Ok(exercise)
    }

    pub fn practice(&self) -> &str {
        &self.practice
    }

    pub fn set_practice(&mut self, practice: &str) -> Result<(), ValidationError> {
        self.practice = validation::non_empty("practice", practice)?;
        Ok(())
    }

    pub fn senses_involved(&self) -> &[Sense] {
        &self.senses_involved
    }

    /// Adds a sense by name. Unknown names fail; repeats are ignored.
    pub fn add_sense(&mut self, sense: &str) -> Result<(), ValidationError> {
        let sense: Sense = sense.parse()?;
        self.insert_sense(sense);
        Ok(())
    }

    fn insert_sense(&mut self, sense: Sense) {
        if !self.senses_involved.contains(&sense) {
            self.senses_involved.push(sense);
        }
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn set_environment(&mut self, environment: &str) -> Result<(), ValidationError> {
        self.environment = validation::non_empty("environment", environment)?;
        Ok(())
    }
}

impl SessionVariant for MindfulnessExercise {
    fn session_type(&self) -> SessionType {
        SessionType::MindfulnessExercise
    }

    fn details(&self) -> SessionDetails {
        SessionDetails::MindfulnessExercise(MindfulnessExerciseInfo {
            practice: self.practice.clone(),
            senses_involved: self.senses_involved.clone(),
            environment: self.environment.clone(),
        })
    }
}
