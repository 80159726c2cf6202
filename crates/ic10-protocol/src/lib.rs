//! IC-10 CAT Protocol Library
//!
//! This crate provides parsing and encoding for the IC-10 command set used by
//! Kenwood transceivers and receivers of the 1980s (TS-940S, TS-440S, TS-711,
//! TS-811, R-5000).
//!
//! # Architecture
//!
//! - [`tables`]: one bijective code table per semantic axis (mode, VFO, ...)
//! - [`frame`]: the fixed-width `IF` status frame, located per model
//! - [`channel`]: memory channel records (`MR` / `MW`)
//! - [`reply`]: decoders for the short fixed-length query replies
//! - [`ic10`]: the host command enum, its encoder, and a streaming parser
//!   for the rig side of a link
//!
//! Nothing in this crate performs I/O.
//!
//! # Example
//!
//! ```rust
//! use ic10_protocol::{EncodeCommand, Mode, ProtocolCodec};
//! use ic10_protocol::ic10::{Ic10Codec, Ic10Command};
//!
//! let bytes = Ic10Command::Mode(Mode::Cw).encode().unwrap();
//! assert_eq!(bytes, b"MD3;");
//!
//! let mut codec = Ic10Codec::new();
//! codec.push_bytes(&bytes);
//! assert_eq!(codec.next_command(), Some(Ic10Command::Mode(Mode::Cw)));
//! ```

pub mod channel;
pub mod command;
pub mod error;
pub mod field;
pub mod frame;
pub mod ic10;
pub mod models;
pub mod reply;
pub mod tables;

pub use channel::{ChannelEntry, MemoryChannel};
pub use command::{Antenna, ChannelSlot, Function, Mode, PowerState, ScanAction, Transceive, Vfo, VfoOp};
pub use error::{EncodeError, ParseError};
pub use frame::{FrameLayout, RawFrame, StatusFrame};
pub use models::{RigDatabase, RigModel};
pub use reply::{ClockTime, Identity};

/// Trait for protocol codecs that can parse incoming data streams
pub trait ProtocolCodec {
    /// The command type produced by this codec
    type Command;

    /// Push raw bytes into the codec's buffer
    fn push_bytes(&mut self, data: &[u8]);

    /// Try to extract the next complete command from the buffer
    fn next_command(&mut self) -> Option<Self::Command>;

    /// Try to extract the next complete command along with its raw bytes
    fn next_command_with_bytes(&mut self) -> Option<(Self::Command, Vec<u8>)>;

    /// Clear the internal buffer
    fn clear(&mut self);
}

/// Trait for commands that can be encoded to bytes
pub trait EncodeCommand {
    /// Encode this command to its wire format
    ///
    /// Fails, before any I/O, when a value has no code in the IC-10 set.
    fn encode(&self) -> Result<Vec<u8>, EncodeError>;
}
