//! Excellon conversion types.

use e2g_core::{ConversionWarning, MeasurementSystem, WarningKind};

/// Mutable state of one conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionState {
    /// Inside the `M48` ... `%` header block.
    pub in_header: bool,
    /// Tool selected by the last body `T` line.
    pub current_tool: Option<u32>,
    /// Next coordinate line starts a full drill cycle.
    pub new_drill_cycle: bool,
    /// Last emitted G-code line number.
    pub line_counter: u64,
}

/// Result of converting one drill file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionSummary {
    /// Input lines consumed, blank ones included.
    pub lines_read: u64,
    /// Numbered G-code lines emitted.
    pub gcode_lines: u64,
    /// Tool definitions found in the header.
    pub tools_defined: usize,
    /// Tool changes in the body.
    pub tool_changes: usize,
    /// Coordinate lines converted to drill hits.
    pub holes: usize,
    /// Last unit mode set by the file, if any.
    pub units: Option<MeasurementSystem>,
    /// Lines replaced by diagnostic comments.
    pub warnings: Vec<ConversionWarning>,
}

impl ConversionSummary {
    /// Number of lines whose numeric fields could not be parsed.
    pub fn malformed_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|warning| warning.kind == WarningKind::MalformedNumericField)
            .count()
    }
}
