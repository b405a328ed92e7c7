//! Excellon to G-code transpiler.
//!
//! Lines are converted one at a time. Each call mutates the
//! [`ConversionState`] and returns the G-code produced for that line,
//! which may be empty.

use std::sync::Arc;

use e2g_core::{
    ConversionListener, ConversionWarning, MeasurementSystem, NoOpListener, WarningKind,
};
use e2g_settings::{Config, DrillSettings};

use super::tokenizer::{parse_code_pair, parse_code_value};
use super::types::{ConversionState, ConversionSummary};
use crate::format::{format_feed_rate, format_number};

/// Increment between G-code line numbers.
pub const LINE_NUMBER_STEP: u64 = 10;

/// Excellon coordinates are integers in 1/100000 units.
pub const COORDINATE_SCALE: f64 = 100_000.0;

const BANNER: &str = "( --------------------------------------------------------)\n\
                      ( ------------ EXCELLON TO GCODE CONVERTER ---------------)\n\
                      ( --------------------------------------------------------)\n";

/// Absolute, G54, continuous path, no scaling, XY plane, no cutter comp,
/// no canned cycle, feed per minute, absolute arc centers, no length offset.
const PREAMBLE: &str = "G90 G54 G64 G50 G17 G40 G80 G94 G91.1 G49";

/// Line-by-line Excellon to G-code converter
pub struct ExcellonTranspiler {
    drill: DrillSettings,
    precision: Option<usize>,
    state: ConversionState,
    summary: ConversionSummary,
    listener: Arc<dyn ConversionListener>,
}

impl ExcellonTranspiler {
    /// Create a transpiler using the drill and output settings of `config`
    pub fn new(config: &Config) -> Self {
        Self {
            drill: config.drill.clone(),
            precision: config.output.coordinate_precision,
            state: ConversionState::default(),
            summary: ConversionSummary::default(),
            listener: Arc::new(NoOpListener),
        }
    }

    /// Report conversion events to `listener`
    pub fn with_listener(mut self, listener: Arc<dyn ConversionListener>) -> Self {
        self.listener = listener;
        self
    }

    /// Current conversion state
    pub fn state(&self) -> &ConversionState {
        &self.state
    }

    /// Warnings recorded so far
    pub fn warnings(&self) -> &[ConversionWarning] {
        &self.summary.warnings
    }

    /// Convert a whole document, line by line
    pub fn transpile_str(&mut self, input: &str) -> String {
        input.lines().map(|line| self.transpile_line(line)).collect()
    }

    /// Convert one Excellon line into zero or more G-code lines
    pub fn transpile_line(&mut self, line: &str) -> String {
        self.summary.lines_read += 1;

        let line = line.trim();
        let Some(code_letter) = line.chars().next() else {
            return String::new();
        };

        tracing::trace!("Line {}: {}", self.summary.lines_read, line);

        let mut gcode = String::new();
        match code_letter {
            '%' => self.state.in_header = false,
            'M' => self.convert_mcode(line, &mut gcode),
            'T' if self.state.in_header => self.convert_tool_definition(line, &mut gcode),
            'T' => self.convert_tool_change(line, &mut gcode),
            'X' | 'Y' if self.state.in_header => {}
            'X' | 'Y' => self.convert_drill_hit(line, &mut gcode),
            _ => self.recover(WarningKind::UnrecognizedCode, line, &mut gcode),
        }
        gcode
    }

    /// Consume the transpiler and return the conversion summary
    pub fn finish(mut self) -> ConversionSummary {
        self.summary.gcode_lines = self.state.line_counter / LINE_NUMBER_STEP;
        self.summary
    }

    fn push_numbered(&mut self, gcode: &mut String, words: &str) {
        self.state.line_counter += LINE_NUMBER_STEP;
        gcode.push_str(&format!("N{} {}\n", self.state.line_counter, words));
    }

    fn number(&self, value: f64) -> String {
        format_number(value, self.precision)
    }

    fn convert_mcode(&mut self, line: &str, gcode: &mut String) {
        let code = parse_code_value(line, 0).and_then(|code| code.integer());

        match code {
            Some(30) => self.convert_program_end(gcode),
            Some(48) => self.convert_header_start(gcode),
            Some(code) => match MeasurementSystem::from_excellon_mcode(code) {
                Some(units) => self.convert_units(units, gcode),
                None => self.recover(WarningKind::UnknownMCode, line, gcode),
            },
            None => self.recover(WarningKind::UnknownMCode, line, gcode),
        }
    }

    fn convert_program_end(&mut self, gcode: &mut String) {
        gcode.push_str("\n( --------- PROGRAM END --------- )\n");
        self.push_numbered(gcode, "M5 (Spindle Stop)");
        self.push_numbered(gcode, "M9 (Coolant Off)");
        self.push_numbered(gcode, "G30 (Go Home)");
        self.push_numbered(gcode, "M30 (END)");

        tracing::debug!("Program end");
        self.listener.on_program_end();
    }

    fn convert_header_start(&mut self, gcode: &mut String) {
        self.state.in_header = true;

        gcode.push_str(BANNER);
        self.push_numbered(gcode, PREAMBLE);
        self.push_numbered(gcode, "G30");

        tracing::debug!("Header started");
        self.listener.on_header_started();
    }

    fn convert_units(&mut self, units: MeasurementSystem, gcode: &mut String) {
        let words = format!("{} ({})", units.gcode_word(), units.gcode_label());
        self.push_numbered(gcode, &words);
        gcode.push('\n');

        self.summary.units = Some(units);
        tracing::debug!("Units set to {}", units);
        self.listener.on_units_set(units);
    }

    fn convert_tool_definition(&mut self, line: &str, gcode: &mut String) {
        let Some((tool, diameter)) = parse_code_pair(line, 0) else {
            return;
        };
        let diameter = diameter.map(|code| code.raw_value).unwrap_or_default();

        gcode.push_str(&format!(
            "(T:{} Diameter: {} )\n",
            tool.raw_value, diameter
        ));

        self.summary.tools_defined += 1;
        tracing::debug!("Tool {} defined with diameter {}", tool.raw_value, diameter);
        self.listener.on_tool_defined(&tool.raw_value, &diameter);
    }

    fn convert_tool_change(&mut self, line: &str, gcode: &mut String) {
        let tool = parse_code_value(line, 0)
            .and_then(|code| code.integer())
            .and_then(|value| u32::try_from(value).ok());
        let Some(tool) = tool else {
            self.recover(WarningKind::MalformedNumericField, line, gcode);
            return;
        };

        self.state.current_tool = Some(tool);
        self.state.new_drill_cycle = true;

        gcode.push_str(&format!("\n( --------- DRILL T{} --------- )\n", tool));
        self.push_numbered(gcode, "M5 (Spindle Stop)");
        self.push_numbered(gcode, "M9 (Coolant Off)");
        self.push_numbered(gcode, "G30 (Go Home)");
        self.push_numbered(gcode, &format!("T{0} G43 H{0} M6 (Tool Change)", tool));
        self.push_numbered(
            gcode,
            &format!("S{} M3 (Spindle Start)", self.drill.spindle_speed),
        );
        self.push_numbered(gcode, "G54");

        self.summary.tool_changes += 1;
        tracing::debug!("Tool change to T{}", tool);
        self.listener.on_tool_selected(tool);
    }

    fn convert_drill_hit(&mut self, line: &str, gcode: &mut String) {
        let coordinates = match parse_code_pair(line, 0) {
            Some((x, Some(y))) if x.letter == 'X' && y.letter == 'Y' => {
                x.integer().zip(y.integer())
            }
            _ => None,
        };
        let Some((x, y)) = coordinates else {
            self.recover(WarningKind::MalformedNumericField, line, gcode);
            return;
        };

        let x = self.number(x as f64 / COORDINATE_SCALE);
        let y = self.number(y as f64 / COORDINATE_SCALE);

        if self.state.new_drill_cycle {
            let safe_z = self.number(self.drill.safe_z);
            let feed_z = self.number(self.drill.feed_z);
            let bottom_z = self.number(self.drill.hole_bottom_z);

            self.push_numbered(gcode, &format!("G0 X{} Y{}", x, y));
            self.push_numbered(gcode, &format!("G0 Z{}", safe_z));
            self.push_numbered(gcode, &format!("G0 Z{}", feed_z));
            // G98: return to the initial plane, G81: simple drilling cycle
            self.push_numbered(
                gcode,
                &format!(
                    "G98 G81 X{} Y{} Z{} R{} F{}",
                    x,
                    y,
                    bottom_z,
                    feed_z,
                    format_feed_rate(self.drill.feed_rate)
                ),
            );
            self.state.new_drill_cycle = false;
        } else {
            self.push_numbered(gcode, &format!("X{} Y{}", x, y));
        }

        self.summary.holes += 1;
    }

    fn recover(&mut self, kind: WarningKind, line: &str, gcode: &mut String) {
        match kind {
            WarningKind::UnrecognizedCode => {
                gcode.push_str(&format!("; Unknown Code: {}\n", line));
            }
            WarningKind::UnknownMCode => {
                gcode.push_str(&format!("(-- Unknown MCode: {})\n", line));
            }
            WarningKind::MalformedNumericField => {
                gcode.push_str(&format!("(-- Malformed numeric field: {})\n", line));
            }
        }

        let warning = ConversionWarning {
            line_number: self.summary.lines_read,
            kind,
            line: line.to_string(),
        };
        tracing::warn!("{}", warning);
        self.listener.on_warning(&warning);
        self.summary.warnings.push(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn transpiler() -> ExcellonTranspiler {
        ExcellonTranspiler::new(&Config::default())
    }

    fn line_numbers(gcode: &str) -> Vec<u64> {
        gcode
            .lines()
            .filter_map(|line| line.strip_prefix('N'))
            .filter_map(|rest| rest.split(' ').next())
            .filter_map(|number| number.parse().ok())
            .collect()
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn push(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl ConversionListener for Recorder {
        fn on_header_started(&self) {
            self.push("header".to_string());
        }
        fn on_tool_defined(&self, tool: &str, diameter: &str) {
            self.push(format!("define {} {}", tool, diameter));
        }
        fn on_tool_selected(&self, tool: u32) {
            self.push(format!("select {}", tool));
        }
        fn on_units_set(&self, units: MeasurementSystem) {
            self.push(format!("units {}", units));
        }
        fn on_program_end(&self) {
            self.push("end".to_string());
        }
        fn on_warning(&self, warning: &ConversionWarning) {
            self.push(format!("warn {}", warning.kind));
        }
    }

    #[test]
    fn test_empty_and_blank_lines_emit_nothing() {
        let mut t = transpiler();
        assert_eq!(t.transpile_line(""), "");
        assert_eq!(t.transpile_line("   \t"), "");
        assert_eq!(t.state(), &ConversionState::default());
    }

    #[test]
    fn test_percent_closes_header() {
        let mut t = transpiler();
        t.transpile_line("M48");
        assert!(t.state().in_header);
        assert_eq!(t.transpile_line("%"), "");
        assert!(!t.state().in_header);
    }

    #[test]
    fn test_m48_emits_banner_and_preamble() {
        let mut t = transpiler();
        let gcode = t.transpile_line("M48");
        assert!(gcode.starts_with(BANNER));
        assert!(gcode.contains("N10 G90 G54 G64 G50 G17 G40 G80 G94 G91.1 G49\n"));
        assert!(gcode.ends_with("N20 G30\n"));
    }

    #[test]
    fn test_unit_codes() {
        let mut t = transpiler();
        assert_eq!(t.transpile_line("M71"), "N10 G21 (METRIC)\n\n");
        assert_eq!(t.transpile_line("M72"), "N20 G20 (INCHES)\n\n");
        assert!(!t.state().in_header);
        assert_eq!(t.state().current_tool, None);
    }

    #[test]
    fn test_program_end_keeps_state() {
        let mut t = transpiler();
        t.transpile_line("T2");
        let before = t.state().clone();
        let gcode = t.transpile_line("M30");
        assert_eq!(
            gcode,
            "\n( --------- PROGRAM END --------- )\n\
             N70 M5 (Spindle Stop)\n\
             N80 M9 (Coolant Off)\n\
             N90 G30 (Go Home)\n\
             N100 M30 (END)\n"
        );
        assert_eq!(t.state().current_tool, before.current_tool);
        assert_eq!(t.state().in_header, before.in_header);

        // lines after M30 are still converted
        assert_eq!(t.transpile_line("M71"), "N110 G21 (METRIC)\n\n");
    }

    #[test]
    fn test_unknown_mcode() {
        let mut t = transpiler();
        assert_eq!(t.transpile_line("M95"), "(-- Unknown MCode: M95)\n");
        assert_eq!(
            t.transpile_line("METRIC,TZ"),
            "(-- Unknown MCode: METRIC,TZ)\n"
        );
        assert_eq!(t.state().line_counter, 0);
        assert_eq!(t.warnings().len(), 2);
        assert_eq!(t.warnings()[0].kind, WarningKind::UnknownMCode);
    }

    #[test]
    fn test_unknown_code() {
        let mut t = transpiler();
        assert_eq!(t.transpile_line("G05"), "; Unknown Code: G05\n");
        assert_eq!(t.transpile_line(";  comment"), "; Unknown Code: ;  comment\n");
        assert_eq!(t.warnings()[1].line_number, 2);
        assert_eq!(t.warnings()[1].kind, WarningKind::UnrecognizedCode);
    }

    #[test]
    fn test_tool_change_block() {
        let mut t = transpiler();
        let gcode = t.transpile_line("T01");
        assert_eq!(
            gcode,
            "\n( --------- DRILL T1 --------- )\n\
             N10 M5 (Spindle Stop)\n\
             N20 M9 (Coolant Off)\n\
             N30 G30 (Go Home)\n\
             N40 T1 G43 H1 M6 (Tool Change)\n\
             N50 S10000 M3 (Spindle Start)\n\
             N60 G54\n"
        );
        assert_eq!(t.state().current_tool, Some(1));
        assert!(t.state().new_drill_cycle);
    }

    #[test]
    fn test_header_tool_definition() {
        let mut t = transpiler();
        t.transpile_line("M48");
        let counter = t.state().line_counter;

        assert_eq!(t.transpile_line("T1C0.800"), "(T:1 Diameter: 0.800 )\n");
        assert_eq!(
            t.transpile_line("T01F00S00C0.0200"),
            "(T:01 Diameter: 00 )\n"
        );
        assert_eq!(t.state().line_counter, counter);
        assert_eq!(t.state().current_tool, None);
    }

    #[test]
    fn test_coordinates_ignored_in_header() {
        let mut t = transpiler();
        t.transpile_line("M48");
        assert_eq!(t.transpile_line("X001000Y002000"), "");
        assert_eq!(t.transpile_line("Y002000"), "");
        assert!(t.warnings().is_empty());
    }

    #[test]
    fn test_first_hit_starts_drill_cycle() {
        let mut t = transpiler();
        t.transpile_line("T01");
        let gcode = t.transpile_line("X001000Y002000");
        assert_eq!(
            gcode,
            "N70 G0 X0.01 Y0.02\n\
             N80 G0 Z0.6\n\
             N90 G0 Z0.2\n\
             N100 G98 G81 X0.01 Y0.02 Z-0.0725 R0.2 F10.\n"
        );
        assert!(!t.state().new_drill_cycle);

        assert_eq!(t.transpile_line("X001500Y002500"), "N110 X0.015 Y0.025\n");
        assert_eq!(t.transpile_line("X-001500Y0"), "N120 X-0.015 Y0\n");
    }

    #[test]
    fn test_each_tool_change_restarts_cycle() {
        let mut t = transpiler();
        t.transpile_line("T1");
        t.transpile_line("X100Y100");
        t.transpile_line("X200Y200");
        t.transpile_line("T2");
        let gcode = t.transpile_line("X300Y300");
        assert!(gcode.contains("G98 G81 X0.003 Y0.003"));
        assert_eq!(gcode.lines().count(), 4);
    }

    #[test]
    fn test_hit_before_tool_is_bare_move() {
        let mut t = transpiler();
        assert_eq!(t.transpile_line("X100000Y200000"), "N10 X1 Y2\n");
    }

    #[test]
    fn test_malformed_coordinates_are_recovered() {
        let mut t = transpiler();
        t.transpile_line("T1");
        let counter = t.state().line_counter;

        for line in ["XABCY10", "X100", "Y100X200", "X10YZZ", "XY123"] {
            assert_eq!(
                t.transpile_line(line),
                format!("(-- Malformed numeric field: {})\n", line)
            );
        }

        assert_eq!(t.state().line_counter, counter);
        assert!(t.state().new_drill_cycle);
        assert_eq!(t.warnings().len(), 5);
        assert!(t
            .warnings()
            .iter()
            .all(|w| w.kind == WarningKind::MalformedNumericField));
    }

    #[test]
    fn test_malformed_tool_keeps_previous_tool() {
        let mut t = transpiler();
        t.transpile_line("T3");
        t.transpile_line("X1Y1");
        assert_eq!(
            t.transpile_line("TXYZ"),
            "(-- Malformed numeric field: TXYZ)\n"
        );
        assert_eq!(t.state().current_tool, Some(3));
        assert!(!t.state().new_drill_cycle);
    }

    #[test]
    fn test_fixed_precision() {
        let mut config = Config::default();
        config.output.coordinate_precision = Some(4);
        let mut t = ExcellonTranspiler::new(&config);
        t.transpile_line("T1");
        let gcode = t.transpile_line("X001000Y002000");
        assert!(gcode.contains("G0 X0.0100 Y0.0200\n"));
        assert!(gcode.contains("G98 G81 X0.0100 Y0.0200 Z-0.0725 R0.2000 F10.\n"));
    }

    #[test]
    fn test_custom_drill_settings() {
        let mut config = Config::default();
        config.drill.spindle_speed = 24000;
        config.drill.feed_rate = 2.5;
        let mut t = ExcellonTranspiler::new(&config);
        assert!(t.transpile_line("T1").contains("S24000 M3"));
        assert!(t.transpile_line("X1Y1").contains(" F2.5\n"));
    }

    #[test]
    fn test_line_numbers_step_by_ten() {
        let mut t = transpiler();
        let gcode = t.transpile_str(
            "M48\nM71\nT1C0.8\nXZY\n%\nT1\nX1Y1\nX2Y2\nG90\nT2\nX3Y3\nM30\nT3\n",
        );
        let numbers = line_numbers(&gcode);
        assert!(!numbers.is_empty());
        for (index, number) in numbers.iter().enumerate() {
            assert_eq!(*number, (index as u64 + 1) * LINE_NUMBER_STEP);
        }
    }

    #[test]
    fn test_line_numbers_continue_past_u32_range() {
        let mut t = transpiler();
        t.state.line_counter = u64::from(u32::MAX) - 5;
        assert_eq!(t.transpile_line("M71"), "N4294967300 G21 (METRIC)\n\n");
        assert_eq!(t.transpile_line("M72"), "N4294967310 G20 (INCHES)\n\n");
        assert_eq!(t.finish().gcode_lines, 429_496_731);
    }

    #[test]
    fn test_listener_receives_events() {
        let recorder = Arc::new(Recorder::default());
        let mut t = transpiler().with_listener(recorder.clone());
        t.transpile_str("M48\nM72\nT1C0.8\n%\nT1\nXQY\nM30\n");

        let events = recorder.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                "header",
                "units Imperial",
                "define 1 0.8",
                "select 1",
                "warn malformed numeric field",
                "end",
            ]
        );
    }

    #[test]
    fn test_finish_summary() {
        let mut t = transpiler();
        t.transpile_str("M48\nM71\nT1C0.8\nT2C1.0\n%\nT1\nX1Y1\nX2Y2\nT2\nX3Y3\nFOO\nM30\n");
        let summary = t.finish();
        assert_eq!(summary.lines_read, 12);
        assert_eq!(summary.tools_defined, 2);
        assert_eq!(summary.tool_changes, 2);
        assert_eq!(summary.holes, 3);
        assert_eq!(summary.units, Some(MeasurementSystem::Metric));
        assert_eq!(summary.warnings.len(), 1);
        assert_eq!(summary.malformed_count(), 0);
        // 2 header + 1 units + 12 tool change + 4 + 1 + 4 hits + 4 end
        assert_eq!(summary.gcode_lines, 28);
    }
}
