//! Error types for IC-10 protocol parsing and encoding

use thiserror::Error;

/// Errors raised while decoding bytes received from a rig
///
/// Every variant is a protocol violation: a reply was present but its shape or
/// content does not match what the command set documents.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Reply shorter than the fixed layout requires
    #[error("reply too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },

    /// Reply length differs from the documented fixed width
    #[error("wrong reply length for {command}: expected {expected}, got {actual}")]
    WrongLength {
        command: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Reply does not start with the expected two-letter tag
    #[error("wrong reply tag: expected {expected}, got {found:?}")]
    WrongTag { expected: &'static str, found: String },

    /// A field byte has no entry in the axis code table
    #[error("unmapped {axis} code {code:?}")]
    UnmappedCode { axis: &'static str, code: char },

    /// A fixed-width decimal field contains something other than digits
    #[error("invalid {field} field: {raw:?}")]
    InvalidNumber { field: &'static str, raw: String },

    /// Command prefix not part of the IC-10 command set
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Memory record for a different slot or channel than the one requested
    #[error("memory record for slot {found_slot} channel {found_channel}, expected slot {slot} channel {channel}")]
    ChannelMismatch {
        slot: char,
        channel: u8,
        found_slot: char,
        found_channel: u8,
    },

    /// Structurally broken command or frame
    #[error("invalid frame: {0}")]
    InvalidFrame(String),
}

/// Errors raised before any I/O when the caller asks for something the
/// protocol cannot express
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Abstract value has no code on this axis
    #[error("{axis} value {value} is not supported by the IC-10 command set")]
    Unsupported { axis: &'static str, value: String },

    /// Frequency needs more than 11 decimal digits
    #[error("frequency {0} Hz does not fit the 11-digit field")]
    FrequencyOutOfRange(u64),

    /// Memory channel outside the model's range
    #[error("memory channel {channel} out of range (0..{count})")]
    ChannelOutOfRange { channel: u8, count: u8 },

    /// Clock value beyond one day
    #[error("clock value {0} s is not a time of day")]
    ClockOutOfRange(u32),
}

/// Shorthand for the axis-name/value form of [`EncodeError::Unsupported`]
pub(crate) fn unsupported(axis: &'static str, value: impl std::fmt::Debug) -> EncodeError {
    EncodeError::Unsupported {
        axis,
        value: format!("{:?}", value),
    }
}
