//! Fixed-width padding
//!
//! Every function here returns exactly `length` characters, whatever the
//! input length.

use super::schema::Format;

/// Pad character for string elements
pub const STRING_PAD: char = '-';
/// Pad character for numeric elements
pub const NUMERIC_PAD: char = '0';
/// Separator removed from float values before padding
pub const DECIMAL_SEPARATOR: char = '.';

/// Left-justify: pad on the right, or keep the first `length` characters
pub fn pad_right(value: &str, length: usize, pad: char) -> String {
    value
        .chars()
        .chain(std::iter::repeat(pad))
        .take(length)
        .collect()
}

/// Right-justify: pad on the left, or keep the last `length` characters
pub fn pad_left(value: &str, length: usize, pad: char) -> String {
    let count = value.chars().count();
    if count >= length {
        return value.chars().skip(count - length).collect();
    }
    std::iter::repeat_n(pad, length - count)
        .chain(value.chars())
        .collect()
}

/// Pad a scalar rendering according to its element format.
///
/// Float values lose their first decimal separator; the declared number of
/// decimals is not reapplied here. Returns `None` for array and parent formats.
pub fn pad_element(format: &Format, length: usize, value: &str) -> Option<String> {
    match format {
        Format::String => Some(pad_right(value, length, STRING_PAD)),
        Format::Integer => Some(pad_left(value, length, NUMERIC_PAD)),
        Format::Float { .. } => {
            let digits = value.replacen(DECIMAL_SEPARATOR, "", 1);
            Some(pad_left(&digits, length, NUMERIC_PAD))
        }
        Format::Array { .. } | Format::Parent { .. } => None,
    }
}
