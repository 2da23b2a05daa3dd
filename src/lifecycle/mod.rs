//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! Ctrl-C / SIGTERM → Shutdown::trigger → CancellationToken fires
//!     → in-flight probe checks return Unhealthy (cancelled)
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
