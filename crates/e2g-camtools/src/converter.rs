//! Drill file conversion.
//!
//! Streams an Excellon file line by line through an [`ExcellonTranspiler`],
//! keeps the generated program in memory, and writes it once when the whole
//! input has been read. A read failure or a strict-mode violation leaves no
//! output file behind.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use e2g_core::{ConversionError, ConversionListener, ConversionResult, NoOpListener};
use e2g_settings::Config;

use crate::excellon::{ConversionSummary, ExcellonTranspiler};

/// Suffix appended to the input path to name the generated program
pub const OUTPUT_SUFFIX: &str = "-gcode.nc";

/// Output path for `input`: the full input path followed by [`OUTPUT_SUFFIX`]
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut path = input.as_os_str().to_os_string();
    path.push(OUTPUT_SUFFIX);
    PathBuf::from(path)
}

/// Convert an in-memory drill file
pub fn convert_str(input: &str, config: &Config) -> (String, ConversionSummary) {
    let mut transpiler = ExcellonTranspiler::new(config);
    let gcode = transpiler.transpile_str(input);
    (gcode, transpiler.finish())
}

/// Converts drill files on disk
pub struct ExcellonConverter {
    config: Config,
    listener: Arc<dyn ConversionListener>,
}

impl ExcellonConverter {
    /// Create a converter with the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            config,
            listener: Arc::new(NoOpListener),
        }
    }

    /// Report conversion events to `listener`
    pub fn with_listener(mut self, listener: Arc<dyn ConversionListener>) -> Self {
        self.listener = listener;
        self
    }

    /// Configuration used for conversions
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Convert every line of `reader`
    ///
    /// `source` only names the input in errors.
    ///
    /// Lines that are not valid UTF-8 are decoded lossily and converted
    /// like any other line.
    ///
    /// # Errors
    /// Returns [`ConversionError::InputRead`] as soon as the reader fails;
    /// the lines after it are not processed.
    pub fn convert_reader<R: BufRead>(
        &self,
        mut reader: R,
        source: &Path,
    ) -> ConversionResult<(String, ConversionSummary)> {
        let mut transpiler =
            ExcellonTranspiler::new(&self.config).with_listener(self.listener.clone());
        let mut gcode = String::new();
        let mut buffer = Vec::new();
        let mut line_number = 0u64;

        loop {
            buffer.clear();
            let read = reader.read_until(b'\n', &mut buffer).map_err(|source_error| {
                ConversionError::InputRead {
                    path: source.to_path_buf(),
                    line_number,
                    source: source_error,
                }
            })?;
            if read == 0 {
                break;
            }
            line_number += 1;

            let line = String::from_utf8_lossy(strip_line_ending(&buffer));
            gcode.push_str(&transpiler.transpile_line(&line));
        }

        Ok((gcode, transpiler.finish()))
    }

    /// Convert `input` and write the program to `output`
    ///
    /// # Errors
    /// - [`ConversionError::InputOpen`] if the input cannot be opened
    /// - [`ConversionError::InputRead`] if reading fails part way
    /// - [`ConversionError::StrictViolation`] in strict mode when a line had
    ///   a malformed numeric field
    /// - [`ConversionError::OutputWrite`] if the output cannot be written
    pub fn convert_file(&self, input: &Path, output: &Path) -> ConversionResult<ConversionSummary> {
        tracing::info!("Converting {} to {}", input.display(), output.display());

        let file = File::open(input).map_err(|source| ConversionError::InputOpen {
            path: input.to_path_buf(),
            source,
        })?;

        let (gcode, summary) = self.convert_reader(BufReader::new(file), input)?;

        let malformed = summary.malformed_count();
        if self.config.output.strict && malformed > 0 {
            tracing::error!(
                "{} malformed line(s), not writing {}",
                malformed,
                output.display()
            );
            return Err(ConversionError::StrictViolation { count: malformed });
        }

        std::fs::write(output, gcode).map_err(|source| ConversionError::OutputWrite {
            path: output.to_path_buf(),
            source,
        })?;

        tracing::info!(
            "Wrote {} G-code lines for {} holes",
            summary.gcode_lines,
            summary.holes
        );
        Ok(summary)
    }
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
