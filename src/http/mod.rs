//! HTTP protocol layer module
//!
//! Status-code response builders and MIME detection, decoupled from the
//! booking business logic.

pub mod mime;
pub mod response;

pub use response::{
    build_404_response, build_405_response, build_413_response, build_health_response,
    build_options_response, build_static_response,
};
