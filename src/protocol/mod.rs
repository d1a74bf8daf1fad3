//! Helper line protocol.
//!
//! # Data Flow
//! ```text
//! input line
//!     → request.rs (tagged Request: Plain | Identified)
//!     → ... evaluation ...
//!     → response.rs (Outcome → output line)
//! ```
//!
//! # Wire Format
//! ```text
//! in:  <url>                  |  <integer-id> <url> [ignored...]
//! out: [<id> ]ERR
//!      [<id> ]OK rewrite-url="<url>"
//!      [<id> ]OK status=<301|302> url="<url>"
//! ```

pub mod request;
pub mod response;

pub use request::{ProcessingMode, Request};
pub use response::format_outcome;
