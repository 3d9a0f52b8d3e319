// main-api core library
//
// Configuration, logging, the downstream service registry and the
// timeout-bounded outbound HTTP client shared by the gateway binary.

pub mod config;
pub mod downstream;
pub mod error;
pub mod logging;
pub mod registry;

pub use config::Config;
pub use error::{Error, Result};
