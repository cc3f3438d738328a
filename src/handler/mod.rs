//! Request handler module
//!
//! Routing dispatch in front of the `smmsg` function.

pub mod function;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
