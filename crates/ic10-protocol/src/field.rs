//! Fixed-width field helpers shared by every reply decoder

use crate::error::{EncodeError, ParseError};

/// Width of every frequency field on the wire
pub const FREQUENCY_DIGITS: usize = 11;

/// Largest frequency the 11-digit field can carry
pub const MAX_FREQUENCY_HZ: u64 = 99_999_999_999;

/// Render `hz` as an 11-digit zero-padded field
pub fn format_frequency(hz: u64) -> Result<String, EncodeError> {
    if hz > MAX_FREQUENCY_HZ {
        return Err(EncodeError::FrequencyOutOfRange(hz));
    }
    Ok(format!("{:011}", hz))
}

/// Parse a zero-padded unsigned decimal field
///
/// Only ASCII digits are accepted: no sign, no blanks, no decimal point.
pub fn parse_decimal(field: &'static str, raw: &[u8]) -> Result<u64, ParseError> {
    let invalid = || ParseError::InvalidNumber {
        field,
        raw: String::from_utf8_lossy(raw).into_owned(),
    };

    if raw.is_empty() || raw.len() > 19 || !raw.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }

    Ok(raw
        .iter()
        .fold(0u64, |acc, digit| acc * 10 + u64::from(digit - b'0')))
}

/// Parse the 11-digit frequency field starting at `offset`
pub fn parse_frequency_at(reply: &[u8], offset: usize) -> Result<u64, ParseError> {
    let end = offset + FREQUENCY_DIGITS;
    let raw = reply.get(offset..end).ok_or(ParseError::TooShort {
        needed: end,
        actual: reply.len(),
    })?;
    parse_decimal("frequency", raw)
}

/// Byte at `offset`, or a too-short error naming the needed length
pub fn byte_at(reply: &[u8], offset: usize) -> Result<u8, ParseError> {
    reply.get(offset).copied().ok_or(ParseError::TooShort {
        needed: offset + 1,
        actual: reply.len(),
    })
}

/// Require `reply` to start with the two-letter `tag`
pub fn expect_tag(reply: &[u8], tag: &'static str) -> Result<(), ParseError> {
    if reply.starts_with(tag.as_bytes()) {
        Ok(())
    } else {
        Err(ParseError::WrongTag {
            expected: tag,
            found: String::from_utf8_lossy(reply.get(..tag.len()).unwrap_or(reply)).into_owned(),
        })
    }
}

/// Require `reply` to be exactly `expected` bytes long
pub fn expect_len(command: &'static str, reply: &[u8], expected: usize) -> Result<(), ParseError> {
    if reply.len() == expected {
        Ok(())
    } else {
        Err(ParseError::WrongLength {
            command,
            expected,
            actual: reply.len(),
        })
    }
}
