//! HTTP body formatting for the host framework.
//!
//! # Data Flow
//! ```text
//! request with Content-Type: application/json
//!     → raw_json.rs (media type check, charset decode)
//!     → handler receives the body as an untouched String
//!
//! handler returns RawJson(String)
//!     → raw_json.rs (encode, set Content-Type)
//!     → response body
//! ```
//!
//! # Design Decisions
//! - Formatters are a strategy trait; axum's extractor/responder traits are the glue
//! - Bodies are passed through, never parsed as JSON

pub mod raw_json;

pub use raw_json::{BodyFormatter, FormatError, MediaType, RawJson, RawJsonFormatter};
