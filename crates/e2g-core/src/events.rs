//! Conversion listener interface
//!
//! Defines the listener trait used to observe a conversion without
//! influencing its output (console progress, logging, tests).

use crate::error::ConversionWarning;
use crate::units::MeasurementSystem;

/// Listener trait for conversion events
///
/// Implement this trait to receive notifications while a drill file is
/// transpiled. Every method has an empty default.
pub trait ConversionListener: Send + Sync {
    /// Called when the `M48` header block opens
    fn on_header_started(&self) {}

    /// Called for each tool definition found in the header
    fn on_tool_defined(&self, _tool: &str, _diameter: &str) {}

    /// Called when a tool is selected in the body
    fn on_tool_selected(&self, _tool: u32) {}

    /// Called when the unit mode is set
    fn on_units_set(&self, _units: MeasurementSystem) {}

    /// Called when the `M30` program end is converted
    fn on_program_end(&self) {}

    /// Called when a line is recovered with a diagnostic comment
    fn on_warning(&self, _warning: &ConversionWarning) {}
}

/// Listener that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpListener;

impl ConversionListener for NoOpListener {}
