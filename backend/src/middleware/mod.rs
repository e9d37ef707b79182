//! Request middleware: tracing and session-based access control.

pub mod access_gate;
pub mod trace;

pub use access_gate::AccessGate;
pub use trace::Trace;
