//! AccessMap Core - Domain models, error taxonomy, and configuration
//!
//! This crate contains the shared domain types for route recording and
//! accessibility discovery. It performs no I/O beyond loading configuration.

pub mod clock;
pub mod config;
pub mod error;
pub mod models;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AccessMapError, Result};
