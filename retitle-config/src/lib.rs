//! Configuration for the retitle engine.
//!
//! [`EngineConfig`] is what users write (TOML or JSON, legacy uppercase
//! keys accepted). It is resolved from an explicit path, the environment or a
//! default file, checked by [`EngineConfig::validate`], and finally turned
//! into the immutable [`retitle_core::EngineSettings`] the engine consumes.

pub mod models;
pub mod validation;

pub use models::{ConfigSource, EngineConfig};
pub use validation::{ConfigValidationError, ConfigWarning, ConfigWarnings};
