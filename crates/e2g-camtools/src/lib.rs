//! # e2g CAM Tools
//!
//! Converts Excellon drill files into G-code drilling programs.
//!
//! ## Components
//!
//! - **Tokenizer**: extracts letter-prefixed values from Excellon lines
//! - **Transpiler**: line-by-line state machine emitting numbered G-code
//! - **Converter**: streams a drill file from disk and writes the program once
//! - **Format**: number rendering for coordinates, heights, and feed rates

pub mod converter;
pub mod excellon;
pub mod format;

pub use converter::{convert_str, default_output_path, ExcellonConverter, OUTPUT_SUFFIX};
pub use excellon::{ConversionState, ConversionSummary, ExcellonTranspiler, ParsedCode};
