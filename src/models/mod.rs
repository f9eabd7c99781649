//! Domain models for mindtrack.
//!
//! # Sessions
//!
//! - [`Session`]: a practice session. Base fields are shared; the [`SessionKind`] carries one
//!   of [`GuidedMeditation`], [`BreathingExercise`], [`YogaSession`] or
//!   [`MindfulnessExercise`].
//! - [`SessionInfo`]: the serializable projection of a session, tagged by `type`.
//!
//! # People
//!
//! - [`Person`]: a registered user whose [`PersonRole`] is either a [`Practitioner`]
//!   (accumulates progress) or an [`Instructor`] (teaches sessions).
//! - [`PersonInfo`]: the serializable projection of a person, tagged by `role`.
//!
//! # Audit
//!
//! - [`CompletionRecord`]: append-only log of completed sessions.

mod completion;
mod person;
mod session;
mod variants;

pub use completion::*;
pub use person::*;
pub use session::*;
pub use variants::*;
