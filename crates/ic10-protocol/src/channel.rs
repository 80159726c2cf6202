//! Memory channel record codec
//!
//! A memory channel is stored as two fixed-column records: slot 0 holds the
//! receive frequency and mode, slot 1 the transmit pair of a split channel.
//! Reads (`MR`) and writes (`MW`) share the same column layout:
//!
//! ```text
//! offset  0 1 2 3 4 5 6 ........ 16 17 18 19 .. 22 23
//!         M R n   c c f f f f f f f  m  0           ;
//! ```
//!
//! - `n`: slot digit (`0` receive, `1` transmit)
//! - `cc`: channel number, always two digits
//! - `f`: 11-digit frequency in Hz
//! - `m`: mode code (same table as `MD`)
//! - reserved columns: `0` then four blanks

use crate::command::{ChannelSlot, Mode};
use crate::error::{EncodeError, ParseError};
use crate::field::{byte_at, expect_tag, format_frequency, parse_decimal, parse_frequency_at};
use crate::tables::MODES;

/// Length of a complete record, terminator included
pub const CHANNEL_RECORD_LEN: usize = 24;

/// Channel numbers are rendered with two digits
pub const MAX_CHANNELS: u8 = 100;

const SLOT_OFFSET: usize = 2;
const CHANNEL_OFFSET: usize = 4;
const FREQUENCY_OFFSET: usize = 6;
const MODE_OFFSET: usize = 17;

/// Frequency and mode of one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelEntry {
    pub frequency_hz: u64,
    pub mode: Mode,
}

impl ChannelEntry {
    pub fn new(frequency_hz: u64, mode: Mode) -> Self {
        Self { frequency_hz, mode }
    }
}

/// One memory channel as read from or written to the rig
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryChannel {
    /// Channel index
    pub channel: u8,
    /// Receive slot
    pub rx: ChannelEntry,
    /// Transmit slot, present only on split channels
    pub tx: Option<ChannelEntry>,
}

impl MemoryChannel {
    /// Non-split channel
    pub fn simplex(channel: u8, rx: ChannelEntry) -> Self {
        Self {
            channel,
            rx,
            tx: None,
        }
    }

    /// Split channel with separate transmit frequency/mode
    pub fn split(channel: u8, rx: ChannelEntry, tx: ChannelEntry) -> Self {
        Self {
            channel,
            rx,
            tx: Some(tx),
        }
    }

    pub fn is_split(&self) -> bool {
        self.tx.is_some()
    }
}

/// Reject channels outside `0..count`
pub fn check_channel(channel: u8, count: u8) -> Result<(), EncodeError> {
    if channel < count.min(MAX_CHANNELS) {
        Ok(())
    } else {
        Err(EncodeError::ChannelOutOfRange { channel, count })
    }
}

/// `MR{n} {cc};`
pub fn encode_read(slot: ChannelSlot, channel: u8) -> Result<Vec<u8>, EncodeError> {
    check_channel(channel, MAX_CHANNELS)?;
    Ok(format!("MR{} {:02};", slot.digit() as char, channel).into_bytes())
}

/// `MW{n} {cc}{frequency}{mode}0    ;`
pub fn encode_write(
    slot: ChannelSlot,
    channel: u8,
    entry: &ChannelEntry,
) -> Result<Vec<u8>, EncodeError> {
    encode_record("MW", slot, channel, entry)
}

/// `MR{n} {cc}{frequency}{mode}0    ;`, the rig's answer to a read
pub fn encode_read_reply(
    slot: ChannelSlot,
    channel: u8,
    entry: &ChannelEntry,
) -> Result<Vec<u8>, EncodeError> {
    encode_record("MR", slot, channel, entry)
}

fn encode_record(
    tag: &str,
    slot: ChannelSlot,
    channel: u8,
    entry: &ChannelEntry,
) -> Result<Vec<u8>, EncodeError> {
    check_channel(channel, MAX_CHANNELS)?;
    let frequency = format_frequency(entry.frequency_hz)?;
    let mode = MODES.encode(entry.mode)?;
    Ok(format!(
        "{}{} {:02}{}{}0    ;",
        tag,
        slot.digit() as char,
        channel,
        frequency,
        mode as char
    )
    .into_bytes())
}

/// Decode the `MR` reply to a read of `slot` on `channel`
///
/// Only the columns up to the mode byte are required; the reserved tail may
/// be missing. A record for another slot or channel is rejected.
pub fn decode_read_reply(
    reply: &[u8],
    slot: ChannelSlot,
    channel: u8,
) -> Result<ChannelEntry, ParseError> {
    let (found_slot, found_channel, entry) = decode_record(reply, "MR")?;
    if found_slot != slot || found_channel != channel {
        return Err(ParseError::ChannelMismatch {
            slot: slot.digit() as char,
            channel,
            found_slot: found_slot.digit() as char,
            found_channel,
        });
    }
    Ok(entry)
}

/// Decode slot, channel and entry of a full record tagged `tag`
pub fn decode_record(
    record: &[u8],
    tag: &'static str,
) -> Result<(ChannelSlot, u8, ChannelEntry), ParseError> {
    let entry = decode_entry(record, tag)?;
    let slot_byte = byte_at(record, SLOT_OFFSET)?;
    let slot = ChannelSlot::from_digit(slot_byte).ok_or(ParseError::UnmappedCode {
        axis: "channel slot",
        code: slot_byte as char,
    })?;
    let channel = parse_decimal("channel", &record[CHANNEL_OFFSET..FREQUENCY_OFFSET])? as u8;
    Ok((slot, channel, entry))
}

fn decode_entry(record: &[u8], tag: &'static str) -> Result<ChannelEntry, ParseError> {
    if record.len() <= MODE_OFFSET {
        return Err(ParseError::TooShort {
            needed: MODE_OFFSET + 1,
            actual: record.len(),
        });
    }
    expect_tag(record, tag)?;
    Ok(ChannelEntry {
        frequency_hz: parse_frequency_at(record, FREQUENCY_OFFSET)?,
        mode: MODES.decode(record[MODE_OFFSET])?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_read() {
        assert_eq!(encode_read(ChannelSlot::Receive, 5).unwrap(), b"MR0 05;");
        assert_eq!(encode_read(ChannelSlot::Transmit, 42).unwrap(), b"MR1 42;");
    }

    #[test]
    fn test_encode_write_layout() {
        let entry = ChannelEntry::new(14_074_000, Mode::Usb);
        let bytes = encode_write(ChannelSlot::Receive, 7, &entry).unwrap();
        assert_eq!(bytes, b"MW0 070001407400020    ;");
        assert_eq!(bytes.len(), CHANNEL_RECORD_LEN);
    }

    #[test]
    fn test_encode_write_transmit_slot() {
        let entry = ChannelEntry::new(7_030_000, Mode::Cw);
        let bytes = encode_write(ChannelSlot::Transmit, 99, &entry).unwrap();
        assert_eq!(bytes, b"MW1 990000703000030    ;");
    }

    #[test]
    fn test_channel_out_of_range() {
        assert_eq!(
            encode_read(ChannelSlot::Receive, 100),
            Err(EncodeError::ChannelOutOfRange {
                channel: 100,
                count: 100
            })
        );
        assert!(check_channel(39, 40).is_ok());
        assert!(check_channel(40, 40).is_err());
    }

    #[test]
    fn test_write_rejects_unsupported_mode() {
        let entry = ChannelEntry::new(14_074_000, Mode::Data);
        assert!(matches!(
            encode_write(ChannelSlot::Receive, 1, &entry),
            Err(EncodeError::Unsupported { axis: "mode", .. })
        ));
    }

    #[test]
    fn test_decode_read_reply() {
        let entry = decode_read_reply(b"MR0 120000357300010    ;", ChannelSlot::Receive, 12).unwrap();
        assert_eq!(entry, ChannelEntry::new(3_573_000, Mode::Lsb));
    }

    #[test]
    fn test_decode_reply_for_other_channel_rejected() {
        assert_eq!(
            decode_read_reply(b"MR1 420001407400020    ;", ChannelSlot::Receive, 7),
            Err(ParseError::ChannelMismatch {
                slot: '0',
                channel: 7,
                found_slot: '1',
                found_channel: 42
            })
        );
        assert!(matches!(
            decode_read_reply(b"MR0 420001407400020    ;", ChannelSlot::Receive, 7),
            Err(ParseError::ChannelMismatch { .. })
        ));
    }

    #[test]
    fn test_decode_short_reply() {
        assert_eq!(
            decode_read_reply(b"MR1 12;", ChannelSlot::Transmit, 12),
            Err(ParseError::TooShort {
                needed: 18,
                actual: 7
            })
        );
    }

    #[test]
    fn test_decode_write_record() {
        let entry = ChannelEntry::new(28_400_000, Mode::Fm);
        let bytes = encode_write(ChannelSlot::Transmit, 3, &entry).unwrap();
        assert_eq!(
            decode_record(&bytes, "MW").unwrap(),
            (ChannelSlot::Transmit, 3, entry)
        );
    }

    #[test]
    fn test_blank_channel_mode_none() {
        let entry = ChannelEntry::new(0, Mode::None);
        let reply = encode_read_reply(ChannelSlot::Receive, 0, &entry).unwrap();
        assert_eq!(decode_read_reply(&reply, ChannelSlot::Receive, 0).unwrap(), entry);
    }
}
