//! Decoders for the short fixed-width query replies
//!
//! Every simple query answers with a reply of one documented length. A reply
//! of any other length, or with a different tag, is a protocol error.

use crate::command::{Antenna, PowerState, Transceive, Vfo};
use crate::error::{unsupported, EncodeError, ParseError};
use crate::field::{expect_len, expect_tag, parse_decimal, parse_frequency_at};
use crate::models::{RigDatabase, RigModel};
use crate::tables::{ANTENNAS, LOCK, POWER, TRANSCEIVE};

/// `PS0;`
pub const POWER_REPLY_LEN: usize = 4;
/// `LK0;`
pub const LOCK_REPLY_LEN: usize = 4;
/// `AN1;`
pub const ANTENNA_REPLY_LEN: usize = 4;
/// `AI` answers with a full-width block
pub const TRANSCEIVE_REPLY_LEN: usize = 38;
/// `CK1hhmmss;`
pub const CLOCK_REPLY_LEN: usize = 10;
/// `ID004;`
pub const IDENTITY_REPLY_LEN: usize = 6;
/// `FA00014074000;`
pub const FREQUENCY_REPLY_LEN: usize = 14;

const PAYLOAD_OFFSET: usize = 2;
const MODEL_CODE_OFFSET: usize = 4;

fn fixed_reply(
    reply: &[u8],
    tag: &'static str,
    len: usize,
) -> Result<u8, ParseError> {
    expect_len(tag, reply, len)?;
    expect_tag(reply, tag)?;
    Ok(reply[PAYLOAD_OFFSET])
}

pub fn decode_power(reply: &[u8]) -> Result<PowerState, ParseError> {
    POWER.decode(fixed_reply(reply, "PS", POWER_REPLY_LEN)?)
}

/// Lock function state
pub fn decode_lock(reply: &[u8]) -> Result<bool, ParseError> {
    LOCK.decode(fixed_reply(reply, "LK", LOCK_REPLY_LEN)?)
}

pub fn decode_antenna(reply: &[u8]) -> Result<Antenna, ParseError> {
    ANTENNAS.decode(fixed_reply(reply, "AN", ANTENNA_REPLY_LEN)?)
}

pub fn decode_transceive(reply: &[u8]) -> Result<Transceive, ParseError> {
    TRANSCEIVE.decode(fixed_reply(reply, "AI", TRANSCEIVE_REPLY_LEN)?)
}

/// Frequency of a specific VFO from an `FA`/`FB` reply
pub fn decode_frequency(reply: &[u8], vfo: Vfo) -> Result<u64, ParseError> {
    let tag = match vfo {
        Vfo::A => "FA",
        Vfo::B => "FB",
        other => {
            return Err(ParseError::InvalidFrame(format!(
                "no frequency reply exists for {:?}",
                other
            )))
        }
    };
    expect_len(tag, reply, FREQUENCY_REPLY_LEN)?;
    expect_tag(reply, tag)?;
    parse_frequency_at(reply, PAYLOAD_OFFSET)
}

/// Time of day as carried by the `CK1` clock command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClockTime {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl ClockTime {
    /// Split seconds since midnight into hours, minutes and seconds
    pub fn from_seconds(total: u32) -> Result<Self, EncodeError> {
        if total >= 24 * 3600 {
            return Err(EncodeError::ClockOutOfRange(total));
        }
        Ok(Self {
            hours: (total / 3600) as u8,
            minutes: (total / 60 % 60) as u8,
            seconds: (total % 60) as u8,
        })
    }

    pub fn total_seconds(&self) -> u32 {
        (u32::from(self.hours) * 60 + u32::from(self.minutes)) * 60 + u32::from(self.seconds)
    }

    /// `hhmmss`, each field two zero-padded digits
    pub fn encode_fields(&self) -> Result<String, EncodeError> {
        if self.minutes > 59 || self.seconds > 59 {
            return Err(unsupported("clock", self));
        }
        if self.hours > 23 {
            return Err(EncodeError::ClockOutOfRange(self.total_seconds()));
        }
        Ok(format!(
            "{:02}{:02}{:02}",
            self.hours, self.minutes, self.seconds
        ))
    }

    /// Parse `hhmmss`
    pub fn parse_fields(raw: &[u8]) -> Result<Self, ParseError> {
        if raw.len() != 6 {
            return Err(ParseError::InvalidNumber {
                field: "clock",
                raw: String::from_utf8_lossy(raw).into_owned(),
            });
        }
        Ok(Self {
            hours: parse_decimal("clock hours", &raw[0..2])? as u8,
            minutes: parse_decimal("clock minutes", &raw[2..4])? as u8,
            seconds: parse_decimal("clock seconds", &raw[4..6])? as u8,
        })
    }
}

/// Decode `CK1hhmmss;`
pub fn decode_clock(reply: &[u8]) -> Result<ClockTime, ParseError> {
    expect_len("CK1", reply, CLOCK_REPLY_LEN)?;
    expect_tag(reply, "CK")?;
    if reply[2] != b'1' {
        return Err(ParseError::UnmappedCode {
            axis: "clock",
            code: reply[2] as char,
        });
    }
    ClockTime::parse_fields(&reply[3..9])
}

/// Answer to `ID;`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    /// Model code byte at offset 4
    pub code: u8,
    /// Known model for that code
    pub model: Option<&'static RigModel>,
}

impl Identity {
    /// Model name, or `"unknown"`
    pub fn name(&self) -> &'static str {
        self.model.map(|m| m.model).unwrap_or("unknown")
    }
}

/// Decode `ID00c;`; an unrecognized model code is not an error
pub fn decode_identity(reply: &[u8]) -> Result<Identity, ParseError> {
    expect_len("ID", reply, IDENTITY_REPLY_LEN)?;
    expect_tag(reply, "ID")?;
    let code = reply[MODEL_CODE_OFFSET];
    Ok(Identity {
        code,
        model: RigDatabase::by_id_code(code),
    })
}
