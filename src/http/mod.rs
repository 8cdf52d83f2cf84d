//! HTTP protocol layer module
//!
//! Response builders shared by all request handlers.

pub mod response;

// Re-export commonly used builders
pub use response::{
    apply_common_headers, build_404_response, build_413_response, build_health_response,
    build_invalid_request_response, build_json_response, build_options_response,
    build_text_response,
};
