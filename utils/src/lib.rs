//! Shared utilities for the Agora workspace.

pub mod logging;
pub mod time;

pub use logging::{init_tracing, init_tracing_with};
pub use time::format_duration;
