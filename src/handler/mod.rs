//! Request handler module
//!
//! Routes requests either to the forced-download path for the report
//! extensions or to the generic static fallback.

pub mod download;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
