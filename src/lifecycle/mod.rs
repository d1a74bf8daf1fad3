//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (supervisor.rs):
//!     Compile rules → bind first stage to input queue → Running
//!
//! Reload (signals.rs → supervisor.rs):
//!     SIGHUP / source change → ReloadRequest
//!     → stage retires → recompile → new stage on the same queue
//!
//! Exit:
//!     end of input → success
//!     input error / compile error / writer gone → failure
//! ```
//!
//! # Design Decisions
//! - Reload never cancels in-flight work
//! - Fail fast: any compile error is fatal, even during reload

pub mod signals;
pub mod supervisor;

pub use signals::{reload_channel, ReloadRequest, ReloadTrigger};
pub use supervisor::{Supervisor, SupervisorError};
