//! Request handler module
//!
//! Routes requests to the `/correct` and `/clean` endpoints.

mod clean;
mod correct;
mod request;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
