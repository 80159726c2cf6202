//! One-character code tables, one per semantic axis
//!
//! Each table pairs a protocol byte with an abstract value. Encoding fails with
//! [`EncodeError::Unsupported`] for values the table does not list; decoding
//! fails with [`ParseError::UnmappedCode`] for bytes it does not list. There is
//! no fallback entry on either side.

use std::fmt;

use crate::command::{Antenna, Mode, PowerState, ScanAction, Transceive, Vfo};
use crate::error::{unsupported, EncodeError, ParseError};

/// Bijective mapping between protocol bytes and abstract values
#[derive(Debug, Clone, Copy)]
pub struct CodeTable<T: 'static> {
    axis: &'static str,
    entries: &'static [(u8, T)],
}

impl<T> CodeTable<T> {
    /// Build a table; `axis` names it in error messages
    pub const fn new(axis: &'static str, entries: &'static [(u8, T)]) -> Self {
        Self { axis, entries }
    }

    /// Axis name used in errors
    pub fn axis(&self) -> &'static str {
        self.axis
    }

    /// All `(code, value)` pairs
    pub fn entries(&self) -> &'static [(u8, T)] {
        self.entries
    }
}

impl<T: Copy + PartialEq + fmt::Debug> CodeTable<T> {
    /// Protocol byte for `value`
    pub fn encode(&self, value: T) -> Result<u8, EncodeError> {
        self.entries
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(code, _)| *code)
            .ok_or_else(|| unsupported(self.axis, value))
    }

    /// Abstract value for `code`
    pub fn decode(&self, code: u8) -> Result<T, ParseError> {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, value)| *value)
            .ok_or(ParseError::UnmappedCode {
                axis: self.axis,
                code: code as char,
            })
    }

    /// Whether `value` has a code in this table
    pub fn supports(&self, value: T) -> bool {
        self.entries.iter().any(|(_, v)| *v == value)
    }
}

/// `MD` command and status frame mode byte
pub static MODES: CodeTable<Mode> = CodeTable::new(
    "mode",
    &[
        (b'0', Mode::None),
        (b'1', Mode::Lsb),
        (b'2', Mode::Usb),
        (b'3', Mode::Cw),
        (b'4', Mode::Fm),
        (b'5', Mode::Am),
        (b'6', Mode::Rtty),
    ],
);

/// `FN` command and status frame VFO byte
pub static VFOS: CodeTable<Vfo> =
    CodeTable::new("VFO", &[(b'0', Vfo::A), (b'1', Vfo::B), (b'2', Vfo::Memory)]);

/// Leading letter of `RX;`/`TX;`
pub static PTT: CodeTable<bool> = CodeTable::new("PTT", &[(b'R', false), (b'T', true)]);

/// Status frame PTT byte
pub static PTT_FLAG: CodeTable<bool> = CodeTable::new("PTT flag", &[(b'0', false), (b'1', true)]);

/// Status frame split byte and `SP` payload
pub static SPLIT: CodeTable<bool> = CodeTable::new("split", &[(b'0', false), (b'1', true)]);

/// `LK` payload
pub static LOCK: CodeTable<bool> = CodeTable::new("lock", &[(b'0', false), (b'1', true)]);

/// `PS` payload
pub static POWER: CodeTable<PowerState> =
    CodeTable::new("power", &[(b'0', PowerState::Off), (b'1', PowerState::On)]);

/// `AI` payload
pub static TRANSCEIVE: CodeTable<Transceive> = CodeTable::new(
    "transceive",
    &[(b'0', Transceive::Off), (b'1', Transceive::Rig)],
);

/// `AN` payload
pub static ANTENNAS: CodeTable<Antenna> =
    CodeTable::new("antenna", &[(b'1', Antenna::Ant1), (b'2', Antenna::Ant2)]);

/// `SC` payload
pub static SCAN: CodeTable<ScanAction> =
    CodeTable::new("scan", &[(b'0', ScanAction::Stop), (b'1', ScanAction::Start)]);
