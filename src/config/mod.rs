//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProbeSettings (validated, immutable)
//!     → owned by one HttpHealthProbe
//! ```
//!
//! # Design Decisions
//! - Settings are immutable once validated; a probe never changes them
//! - All optional fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, read_config, ConfigError};
pub use schema::{AppConfig, ClientConfig, ObservabilityConfig, ProbeConfig};
pub use validation::{ProbeSettings, ValidationError};
