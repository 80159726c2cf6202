//! Error types for the IC-10 link

use ic10_protocol::{EncodeError, ParseError};
use thiserror::Error;

/// Caller-facing error taxonomy
///
/// I/O failures, protocol violations, unsupported input and unsupported
/// pushes are distinct variants; none is downgraded to a default value.
#[derive(Debug, Error)]
pub enum RigError {
    /// Transport write/read failure, including timeouts
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Reply present but malformed
    #[error("protocol error: {0}")]
    Protocol(#[from] ParseError),

    /// Every attempt of a retried query got a malformed reply
    #[error("reply rejected after {attempts} attempts: {reason}")]
    Rejected { attempts: u32, reason: ParseError },

    /// The caller asked for something the command set cannot express
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] EncodeError),

    /// A received frame of a kind this decoder does not handle
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// The receive slot was written but the transmit slot was not
    #[error("memory channel {channel} partially written: {source}")]
    PartialChannelWrite {
        channel: u8,
        #[source]
        source: Box<RigError>,
    },

    /// Serial port could not be opened or configured
    #[error("serial port error: {0}")]
    SerialPort(#[from] serialport::Error),

    /// Configuration rejected by validation
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RigError>;

impl RigError {
    /// Whether the error came from the transport rather than the rig's reply
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_) | Self::SerialPort(_))
    }
}
