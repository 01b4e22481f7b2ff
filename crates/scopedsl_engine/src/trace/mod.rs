//! In-memory resolution trace.
//!
//! A trace is only allocated when a caller asks for one. It records scope
//! entry and exit, per-candidate include/skip decisions, filter outcomes and
//! errors, each tagged with the dispatcher depth at which it happened.

mod buffer;
mod record;

pub use buffer::{TraceBuffer, TraceBufferStats};
pub use record::{TraceEvent, TraceRecord};
