//! Code-value extraction for Excellon lines.
//!
//! An Excellon line is a run of letter-prefixed fields such as `T01C0.8` or
//! `X001000Y002000`. A value runs from just after its code letter up to the
//! next delimiter character.

/// Characters that end a code value.
const DELIMITERS: &[char] = &[
    'A', 'B', 'C', 'D', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S',
    'T', 'X', 'Y', 'Z', ',', '(', '[',
];

/// A code letter and the raw text that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCode {
    /// The code letter (`T`, `X`, `M`, ...).
    pub letter: char,
    /// Raw value text, possibly empty.
    pub raw_value: String,
}

impl ParsedCode {
    /// Value as an integer, see [`parse_integer`].
    pub fn integer(&self) -> Option<i64> {
        parse_integer(&self.raw_value)
    }

    /// Offset just past this field when it started at `offset`.
    pub fn end_offset(&self, offset: usize) -> usize {
        offset + self.letter.len_utf8() + self.raw_value.len()
    }
}

fn is_delimiter(ch: char) -> bool {
    DELIMITERS.contains(&ch)
}

/// Extract the code at `offset` of `line`.
///
/// The line is trimmed and uppercased first. The value is taken up to the
/// first delimiter found after the character following the code letter.
/// A delimiter directly after the code letter, or none at all, yields the
/// whole remainder of the line. Returns `None` if `offset` is past the end.
pub fn parse_code_value(line: &str, offset: usize) -> Option<ParsedCode> {
    let normalized = line.trim().to_ascii_uppercase();
    let field = normalized.get(offset..)?;

    let mut chars = field.chars();
    let letter = chars.next()?;
    let rest = chars.as_str();

    let end = match rest.find(is_delimiter) {
        Some(position) if position > 0 => position,
        _ => rest.len(),
    };

    Some(ParsedCode {
        letter,
        raw_value: rest[..end].to_string(),
    })
}

/// Extract the code at `offset` and the one directly after it.
///
/// Used for `X..Y..` coordinate pairs and header tool definitions. The
/// second element is `None` when the line ends after the first value.
pub fn parse_code_pair(line: &str, offset: usize) -> Option<(ParsedCode, Option<ParsedCode>)> {
    let first = parse_code_value(line, offset)?;
    let second = parse_code_value(line, first.end_offset(offset));
    Some((first, second))
}

/// Parse the leading integer of a raw value.
///
/// Accepts an optional sign followed by decimal digits and ignores whatever
/// follows the digits (`"0.0200"` parses as `0`). Returns `None` when there
/// are no digits or the value does not fit in an `i64`.
pub fn parse_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    let digit_count = unsigned
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digit_count == 0 {
        return None;
    }

    let magnitude: i64 = unsigned[..digit_count].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
