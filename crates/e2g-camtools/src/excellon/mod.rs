//! Excellon drill file conversion.

pub mod tokenizer;
pub mod transpiler;
pub mod types;

pub use tokenizer::{parse_code_pair, parse_code_value, parse_integer, ParsedCode};
pub use transpiler::{ExcellonTranspiler, COORDINATE_SCALE, LINE_NUMBER_STEP};
pub use types::{ConversionState, ConversionSummary};
