//! Request middleware.
//!
//! Purpose: attach a trace identifier to every request so logs, error
//! payloads and the `trace-id` response header correlate.

pub mod trace;

pub use trace::Trace;
