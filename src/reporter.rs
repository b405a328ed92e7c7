//! Console progress reporting
//!
//! Prints the program banner, progress while a drill file is converted, and
//! the final result. Diagnostics for individual lines go through `tracing`.

use std::path::Path;

use e2g_camtools::ConversionSummary;
use e2g_core::{ConversionListener, MeasurementSystem};

/// Prints conversion progress to stdout
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    /// Create a reporter; a quiet reporter only prints failures
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    fn say(&self, message: &str) {
        if !self.quiet {
            println!("{}", message);
        }
    }

    /// Program name, version and build date
    pub fn banner(&self) {
        self.say(&format!(
            "==== Excellon to G-code converter ====\nVersion: {} ({})\n",
            crate::VERSION,
            crate::BUILD_DATE
        ));
    }

    /// Input and output locations
    pub fn paths(&self, input: &Path, output: &Path) {
        self.say(&format!(">>> Excellon File: {}", input.display()));
        self.say(&format!(">>> GCode File: {}", output.display()));
        self.say(">>> Converting File...");
    }

    /// Final result of a successful conversion
    pub fn success(&self, summary: &ConversionSummary) {
        self.say(&format!(
            "\n{} hole(s), {} tool change(s), {} G-code line(s)",
            summary.holes, summary.tool_changes, summary.gcode_lines
        ));
        if !summary.warnings.is_empty() {
            self.say(&format!(
                "{} line(s) replaced by diagnostic comments",
                summary.warnings.len()
            ));
        }
        self.say("\nSUCCESS!!\n");
    }

    /// Final result of a failed conversion, printed even when quiet
    pub fn failure(&self, error: &anyhow::Error) {
        eprintln!("\nERROR: {:#}", error);
    }
}

impl ConversionListener for ConsoleReporter {
    fn on_header_started(&self) {
        self.say("\tGenerating GCode Header...");
    }

    fn on_tool_defined(&self, tool: &str, diameter: &str) {
        self.say(&format!("\tFound Tool: {} with diameter: {}", tool, diameter));
    }

    fn on_tool_selected(&self, tool: u32) {
        self.say(&format!("\tConverting drill cycle for Tool {}", tool));
    }

    fn on_units_set(&self, units: MeasurementSystem) {
        self.say(&format!(
            "\tSetting units to {} ({})...",
            units,
            units.unit_name()
        ));
    }
}
