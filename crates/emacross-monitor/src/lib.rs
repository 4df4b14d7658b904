//! Logging and tracing setup.

mod logging;

pub use logging::{build_filter, setup_logging, LogFormat, LoggingGuard};
