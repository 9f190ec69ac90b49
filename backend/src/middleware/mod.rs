//! Request middleware.
//!
//! Currently only request tracing; sessions are wired by the server.

pub mod trace;

pub use trace::Trace;
