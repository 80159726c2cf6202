//! IF status frame parsing
//!
//! The `IF` frame is a fixed-width telemetry string. The frequency sits at a
//! fixed offset from the start; everything else is located from the *end* of
//! the frame, because each rig model uses a different total width:
//!
//! ```text
//! offset  0 1 2 .......... 12 .............. w-7 w-6 w-5 w-4 w-3 w-2 w-1  w
//!         I F f f f f f f f f f f f  ......   c   c   t   m   v   -   s   ;
//! ```
//!
//! - `f`: 11-digit frequency in Hz
//! - `c`: memory channel (2 digits)
//! - `t`: PTT (`0`/`1`)
//! - `m`: mode code
//! - `v`: VFO code
//! - `s`: split (`0`/`1`)
//!
//! where `w` is the model's `frame_width`. The terminator follows the split
//! byte, so a complete frame is `w + 1` bytes; anything at least `w` bytes long
//! carries every field.

use crate::command::{Mode, Vfo};
use crate::error::{EncodeError, ParseError};
use crate::field::{byte_at, format_frequency, parse_decimal, parse_frequency_at};
use crate::tables::{MODES, PTT_FLAG, SPLIT, VFOS};

/// Two-letter tag of the status frame
pub const STATUS_TAG: &str = "IF";

/// Offset of the 11-digit frequency field
pub const FREQUENCY_OFFSET: usize = 2;

/// Per-model placement of the trailing status fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameLayout {
    /// Total frame width the trailing offsets are counted from
    pub frame_width: usize,
}

impl FrameLayout {
    /// Narrowest frame that still has room for the frequency and trailing fields
    pub const MIN_WIDTH: usize = 20;

    pub const fn new(frame_width: usize) -> Self {
        Self { frame_width }
    }

    /// Whether the trailing fields can be placed after the frequency field
    pub fn is_valid(&self) -> bool {
        self.frame_width >= Self::MIN_WIDTH
    }

    /// Split flag: `frame_width - 1`
    pub fn split_offset(&self) -> usize {
        self.frame_width - 1
    }

    /// VFO code: `frame_width - 3`
    pub fn vfo_offset(&self) -> usize {
        self.frame_width - 3
    }

    /// Mode code: `frame_width - 4`
    pub fn mode_offset(&self) -> usize {
        self.frame_width - 4
    }

    /// PTT flag: `frame_width - 5`
    pub fn ptt_offset(&self) -> usize {
        self.frame_width - 5
    }

    /// Two-digit memory channel: `frame_width - 7 .. frame_width - 5`
    pub fn memory_channel_range(&self) -> std::ops::Range<usize> {
        self.frame_width - 7..self.frame_width - 5
    }
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self::new(38)
    }
}

/// Decoded snapshot of one status frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusFrame {
    /// Displayed frequency in Hz
    pub frequency_hz: u64,
    /// Active VFO (A, B or Memory)
    pub vfo: Vfo,
    /// Operating mode
    pub mode: Mode,
    /// Transmitting
    pub ptt_active: bool,
    /// Split operation
    pub split_active: bool,
}

impl StatusFrame {
    /// Render this snapshot as a complete `IF` frame with memory channel 00
    pub fn encode(&self, layout: FrameLayout) -> Result<Vec<u8>, EncodeError> {
        encode_status_frame(self, 0, layout)
    }
}

/// A status frame that passed the length and tag gate
///
/// Each accessor decodes one field at its layout offset, so callers interested
/// in a single field do not fail on an unrelated one.
#[derive(Debug, Clone, Copy)]
pub struct RawFrame<'a> {
    bytes: &'a [u8],
    layout: FrameLayout,
}

impl<'a> RawFrame<'a> {
    /// Accept `bytes` if it is at least `frame_width` long and tagged `IF`
    pub fn new(bytes: &'a [u8], layout: FrameLayout) -> Result<Self, ParseError> {
        if !layout.is_valid() {
            return Err(ParseError::InvalidFrame(format!(
                "frame width {} leaves no room for status fields",
                layout.frame_width
            )));
        }
        if bytes.len() < layout.frame_width {
            return Err(ParseError::TooShort {
                needed: layout.frame_width,
                actual: bytes.len(),
            });
        }
        crate::field::expect_tag(bytes, STATUS_TAG)?;
        Ok(Self { bytes, layout })
    }

    /// The raw bytes, terminator included if it was received
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn frequency_hz(&self) -> Result<u64, ParseError> {
        parse_frequency_at(self.bytes, FREQUENCY_OFFSET)
    }

    pub fn vfo(&self) -> Result<Vfo, ParseError> {
        VFOS.decode(byte_at(self.bytes, self.layout.vfo_offset())?)
    }

    pub fn mode(&self) -> Result<Mode, ParseError> {
        MODES.decode(byte_at(self.bytes, self.layout.mode_offset())?)
    }

    pub fn ptt_active(&self) -> Result<bool, ParseError> {
        PTT_FLAG.decode(byte_at(self.bytes, self.layout.ptt_offset())?)
    }

    pub fn split_active(&self) -> Result<bool, ParseError> {
        SPLIT.decode(byte_at(self.bytes, self.layout.split_offset())?)
    }

    /// Currently selected memory channel
    pub fn memory_channel(&self) -> Result<u8, ParseError> {
        let range = self.layout.memory_channel_range();
        let raw = self.bytes.get(range.clone()).ok_or(ParseError::TooShort {
            needed: range.end,
            actual: self.bytes.len(),
        })?;
        // two digits always fit
        Ok(parse_decimal("memory channel", raw)? as u8)
    }

    /// Decode every field of the snapshot
    pub fn decode(&self) -> Result<StatusFrame, ParseError> {
        Ok(StatusFrame {
            frequency_hz: self.frequency_hz()?,
            vfo: self.vfo()?,
            mode: self.mode()?,
            ptt_active: self.ptt_active()?,
            split_active: self.split_active()?,
        })
    }
}

/// Gate and decode a status frame in one step
pub fn parse_status_frame(bytes: &[u8], layout: FrameLayout) -> Result<StatusFrame, ParseError> {
    RawFrame::new(bytes, layout)?.decode()
}

/// Build a complete `IF` frame (`frame_width + 1` bytes, terminator included)
///
/// Columns not covered by a decoded field are filled with blanks, except the
/// byte between VFO and split which is `0`.
pub fn encode_status_frame(
    frame: &StatusFrame,
    memory_channel: u8,
    layout: FrameLayout,
) -> Result<Vec<u8>, EncodeError> {
    if !layout.is_valid() {
        return Err(EncodeError::Unsupported {
            axis: "frame width",
            value: layout.frame_width.to_string(),
        });
    }
    if memory_channel > 99 {
        return Err(EncodeError::ChannelOutOfRange {
            channel: memory_channel,
            count: 100,
        });
    }

    let mut out = vec![b' '; layout.frame_width + 1];
    out[..2].copy_from_slice(STATUS_TAG.as_bytes());
    out[FREQUENCY_OFFSET..FREQUENCY_OFFSET + 11]
        .copy_from_slice(format_frequency(frame.frequency_hz)?.as_bytes());
    out[layout.memory_channel_range()].copy_from_slice(format!("{:02}", memory_channel).as_bytes());
    out[layout.ptt_offset()] = PTT_FLAG.encode(frame.ptt_active)?;
    out[layout.mode_offset()] = MODES.encode(frame.mode)?;
    out[layout.vfo_offset()] = VFOS.encode(frame.vfo)?;
    out[layout.frame_width - 2] = b'0';
    out[layout.split_offset()] = SPLIT.encode(frame.split_active)?;
    out[layout.frame_width] = b';';
    Ok(out)
}
