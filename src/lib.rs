//! In-memory registry for meditation and wellness sessions and the people who practise
//! and teach them.
//!
//! ```
//! use mindtrack::models::*;
//! use mindtrack::registry::Registry;
//!
//! let mut registry = Registry::new();
//! let session = Session::new(
//!     registry.ids(),
//!     CreateSessionInput::new("Morning calm", "Studio A").duration(20.0),
//!     GuidedMeditation::default(),
//! )?;
//! registry.add_session(session)?;
//!
//! let stats = registry.stats();
//! assert_eq!(stats.total_minutes, 20.0);
//! assert_eq!(stats.total_calories, 60.0);
//! # Ok::<(), mindtrack::error::RegistryError>(())
//! ```

pub mod config;
pub mod error;
pub mod ids;
pub mod models;
pub mod registry;
pub mod validation;
