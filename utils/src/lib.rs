//! Shared utilities for the rebasing pools.

pub mod logging;
pub mod units;

pub use logging::{init_logging, LogFormat};
pub use units::format_units;
