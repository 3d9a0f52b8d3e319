// main-api gateway
//
// HTTP surface and request instrumentation for the gateway binary.

pub mod http;
pub mod observability;

// Re-export commonly used types
pub use http::AppState;
