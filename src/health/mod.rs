//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! HttpHealthProbe::check (probe.rs)
//!     → HttpClient::get (client.rs), bounded by the cancellation threshold
//!     → classify status code + elapsed time
//!     → ProbeResult (result.rs), logged and recorded as metrics
//! ```
//!
//! # Design Decisions
//! - One probe targets one dependency; aggregation belongs to the caller
//! - Probes share nothing mutable except a pooled client
//! - Every failure becomes a ProbeResult, never an error

pub mod client;
pub mod probe;
pub mod result;

pub use client::{
    ClientFactory, HttpClient, HyperClient, NamedClientFactory, ReqwestClient,
    SharedClientFactory, TransportError,
};
pub use probe::HttpHealthProbe;
pub use result::{ErrorKind, ProbeResult, ProbeStatus};
