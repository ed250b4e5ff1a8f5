//! HTTP protocol layer module
//!
//! Protocol-level building blocks shared by the download handler and the
//! static fallback: MIME inference, response builders, and cache headers.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    apply_cors_headers, build_304_response, build_404_response, build_405_response,
    build_500_response, build_options_response,
};
