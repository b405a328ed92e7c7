//! # e2g Core
//!
//! Core types shared by the e2g crates.
//! Provides the error and warning types of the conversion pipeline,
//! the measurement system enum, and the listener trait used to observe
//! a running conversion.

pub mod error;
pub mod events;
pub mod units;

pub use error::{ConversionError, ConversionResult, ConversionWarning, WarningKind};
pub use events::{ConversionListener, NoOpListener};
pub use units::MeasurementSystem;
