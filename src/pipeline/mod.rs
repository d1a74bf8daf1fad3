//! Request processing pipeline.
//!
//! # Data Flow
//! ```text
//! stdin
//!     → input.rs (persistent reader task, bounded line queue)
//!     → router.rs (processing stage: parse line, pick mode)
//!         → Ordered:    evaluate inline, wait for the line to be written
//!         → Concurrent: spawn a worker per request
//!     → sink.rs (bounded delivery queue → single writer task)
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - Reader and writer live for the whole process; stages come and go on reload
//! - A stage borrows the input queue, so two stages can never read it at once
//! - Backpressure instead of drops when the writer falls behind

pub mod input;
pub mod router;
pub mod sink;

pub use input::{spawn_reader, InputEvent};
pub use router::{RequestRouter, StageExit};
pub use sink::{ResponseSink, SinkClosed};
