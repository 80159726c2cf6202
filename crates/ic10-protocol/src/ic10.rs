//! IC-10 command set
//!
//! The IC-10 command set is ASCII, semicolon-terminated, with a 2-letter
//! prefix followed by fixed-width parameters. Unlike later Kenwood sets there
//! is no framing beyond the terminator, and replies to set commands are not
//! sent.
//!
//! # Common Commands
//! - `IF` - Status frame (frequency, mode, VFO, PTT, split)
//! - `FA` / `FB` - VFO A/B frequency
//! - `MD` - Mode
//! - `FN` - VFO/memory select
//! - `SP` - Split
//! - `TX` / `RX` - Transmit/receive
//! - `MR` / `MW` / `MC` - Memory read/write/select
//! - `PS`, `AI`, `LK`, `AN`, `CK1`, `ID` - Power, transceive, lock, antenna,
//!   clock, identification

use crate::channel::{self, ChannelEntry, MAX_CHANNELS};
use crate::command::{Antenna, ChannelSlot, Function, Mode, PowerState, ScanAction, Transceive, Vfo, VfoOp};
use crate::error::{unsupported, EncodeError, ParseError};
use crate::field::{format_frequency, parse_decimal};
use crate::reply::ClockTime;
use crate::tables::{ANTENNAS, LOCK, MODES, POWER, PTT, SCAN, SPLIT, TRANSCEIVE, VFOS};
use crate::{EncodeCommand, ProtocolCodec};

/// Command terminator
pub const TERMINATOR: u8 = b';';

/// Maximum command length (reasonable limit to prevent buffer overflow)
const MAX_COMMAND_LEN: usize = 64;

/// IC-10 protocol command, as sent by a host
///
/// `None` payloads are queries; `Some` payloads are sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ic10Command {
    /// Status frame query: `IF;`
    Info,
    /// VFO A/B frequency: `FA;` or `FA00014074000;`
    Frequency { vfo: Vfo, hz: Option<u64> },
    /// Set mode: `MD2;`
    Mode(Mode),
    /// Select VFO A, VFO B or memory: `FN0;`
    SelectVfo(Vfo),
    /// Split on/off: `SP1;`
    Split(bool),
    /// `TX;` or `RX;`
    Ptt(bool),
    /// Power switch: `PS;` / `PS1;`
    Power(Option<PowerState>),
    /// Transceive: `AI;` / `AI1;`
    Transceive(Option<Transceive>),
    /// On/off function; only the dial lock (`LK`) exists on IC-10 rigs
    Function { func: Function, on: Option<bool> },
    /// Antenna selector: `AN;` / `AN2;`
    Antenna(Option<Antenna>),
    /// Frequency step: `UP;` / `DN;`
    VfoOp(VfoOp),
    /// Scan: `SC1;`
    Scan(ScanAction),
    /// Select memory channel: `MC 05;`
    MemorySelect(u8),
    /// Memory read: `MR0 05;`
    ReadChannel { slot: ChannelSlot, channel: u8 },
    /// Memory write: `MW0 050001407400020    ;`
    WriteChannel {
        slot: ChannelSlot,
        channel: u8,
        entry: ChannelEntry,
    },
    /// Clock: `CK1;` / `CK1123045;`
    Clock(Option<ClockTime>),
    /// Identification query: `ID;`
    Identify,
    /// Unknown/unrecognized command, kept verbatim without terminator
    Unknown(String),
}

impl Ic10Command {
    /// Whether the rig answers this command with a reply
    pub fn expects_reply(&self) -> bool {
        match self {
            Self::Info | Self::Identify | Self::ReadChannel { .. } => true,
            Self::Frequency { hz, .. } => hz.is_none(),
            Self::Power(v) => v.is_none(),
            Self::Transceive(v) => v.is_none(),
            Self::Function { on, .. } => on.is_none(),
            Self::Antenna(v) => v.is_none(),
            Self::Clock(v) => v.is_none(),
            _ => false,
        }
    }

    /// Parse a complete command (terminator stripped)
    pub fn parse(cmd: &[u8]) -> Result<Self, ParseError> {
        if cmd.len() < 2 {
            return Err(ParseError::InvalidFrame("command too short".into()));
        }

        let prefix = &cmd[..2];
        let params = &cmd[2..];

        match prefix {
            b"IF" => Ok(Self::Info),
            b"FA" | b"FB" => {
                let vfo = if prefix == b"FA" { Vfo::A } else { Vfo::B };
                let hz = if params.is_empty() {
                    None
                } else {
                    Some(parse_decimal("frequency", params)?)
                };
                Ok(Self::Frequency { vfo, hz })
            }
            b"MD" => Ok(Self::Mode(MODES.decode(single(params)?)?)),
            b"FN" => Ok(Self::SelectVfo(VFOS.decode(single(params)?)?)),
            b"SP" => Ok(Self::Split(SPLIT.decode(single(params)?)?)),
            b"TX" | b"RX" => Ok(Self::Ptt(PTT.decode(prefix[0])?)),
            b"PS" => Ok(Self::Power(optional(params, |c| POWER.decode(c))?)),
            b"AI" => Ok(Self::Transceive(optional(params, |c| TRANSCEIVE.decode(c))?)),
            b"LK" => Ok(Self::Function {
                func: Function::Lock,
                on: optional(params, |c| LOCK.decode(c))?,
            }),
            b"AN" => Ok(Self::Antenna(optional(params, |c| ANTENNAS.decode(c))?)),
            b"UP" => Ok(Self::VfoOp(VfoOp::Up)),
            b"DN" => Ok(Self::VfoOp(VfoOp::Down)),
            b"SC" => Ok(Self::Scan(SCAN.decode(single(params)?)?)),
            b"MC" => {
                let digits = params.strip_prefix(b" ").unwrap_or(params);
                Ok(Self::MemorySelect(parse_channel(digits)?))
            }
            b"MR" => {
                if params.len() != 4 || params[1] != b' ' {
                    return Err(ParseError::InvalidFrame(format!(
                        "malformed memory read: {}",
                        String::from_utf8_lossy(cmd)
                    )));
                }
                let slot = ChannelSlot::from_digit(params[0]).ok_or(ParseError::UnmappedCode {
                    axis: "channel slot",
                    code: params[0] as char,
                })?;
                Ok(Self::ReadChannel {
                    slot,
                    channel: parse_channel(&params[2..])?,
                })
            }
            b"MW" => {
                let (slot, channel, entry) = channel::decode_record(cmd, "MW")?;
                Ok(Self::WriteChannel {
                    slot,
                    channel,
                    entry,
                })
            }
            b"CK" => match params {
                b"1" => Ok(Self::Clock(None)),
                [b'1', rest @ ..] => Ok(Self::Clock(Some(ClockTime::parse_fields(rest)?))),
                _ => Err(ParseError::InvalidFrame(format!(
                    "malformed clock command: {}",
                    String::from_utf8_lossy(cmd)
                ))),
            },
            b"ID" => Ok(Self::Identify),
            _ => Err(ParseError::UnknownCommand(
                String::from_utf8_lossy(cmd).into_owned(),
            )),
        }
    }
}

fn single(params: &[u8]) -> Result<u8, ParseError> {
    match params {
        [code] => Ok(*code),
        _ => Err(ParseError::InvalidFrame(format!(
            "expected one parameter byte, got {:?}",
            String::from_utf8_lossy(params)
        ))),
    }
}

fn optional<T>(
    params: &[u8],
    decode: impl FnOnce(u8) -> Result<T, ParseError>,
) -> Result<Option<T>, ParseError> {
    if params.is_empty() {
        Ok(None)
    } else {
        decode(single(params)?).map(Some)
    }
}

fn parse_channel(digits: &[u8]) -> Result<u8, ParseError> {
    if digits.len() != 2 {
        return Err(ParseError::InvalidNumber {
            field: "channel",
            raw: String::from_utf8_lossy(digits).into_owned(),
        });
    }
    Ok(parse_decimal("channel", digits)? as u8)
}

fn frequency_letter(vfo: Vfo) -> Result<char, EncodeError> {
    match vfo {
        Vfo::A => Ok('A'),
        Vfo::B => Ok('B'),
        other => Err(unsupported("frequency VFO", other)),
    }
}

fn flag(code: u8) -> char {
    code as char
}

impl EncodeCommand for Ic10Command {
    fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let s = match self {
            Self::Info => "IF;".to_string(),
            Self::Frequency { vfo, hz: None } => format!("F{};", frequency_letter(*vfo)?),
            Self::Frequency { vfo, hz: Some(hz) } => {
                format!("F{}{};", frequency_letter(*vfo)?, format_frequency(*hz)?)
            }
            Self::Mode(Mode::None) => return Err(unsupported("mode", Mode::None)),
            Self::Mode(mode) => format!("MD{};", flag(MODES.encode(*mode)?)),
            Self::SelectVfo(vfo) => format!("FN{};", flag(VFOS.encode(*vfo)?)),
            Self::Split(on) => format!("SP{};", flag(SPLIT.encode(*on)?)),
            Self::Ptt(on) => format!("{}X;", flag(PTT.encode(*on)?)),
            Self::Power(None) => "PS;".to_string(),
            Self::Power(Some(state)) => format!("PS{};", flag(POWER.encode(*state)?)),
            Self::Transceive(None) => "AI;".to_string(),
            Self::Transceive(Some(state)) => format!("AI{};", flag(TRANSCEIVE.encode(*state)?)),
            Self::Function { func, on } => {
                if *func != Function::Lock {
                    return Err(unsupported("function", func));
                }
                match on {
                    None => "LK;".to_string(),
                    Some(on) => format!("LK{};", flag(LOCK.encode(*on)?)),
                }
            }
            Self::Antenna(None) => "AN;".to_string(),
            Self::Antenna(Some(ant)) => format!("AN{};", flag(ANTENNAS.encode(*ant)?)),
            Self::VfoOp(VfoOp::Up) => "UP;".to_string(),
            Self::VfoOp(VfoOp::Down) => "DN;".to_string(),
            Self::VfoOp(op) => return Err(unsupported("VFO operation", op)),
            Self::Scan(action) => format!("SC{};", flag(SCAN.encode(*action)?)),
            Self::MemorySelect(ch) => {
                channel::check_channel(*ch, MAX_CHANNELS)?;
                format!("MC {:02};", ch)
            }
            Self::ReadChannel { slot, channel } => return channel::encode_read(*slot, *channel),
            Self::WriteChannel {
                slot,
                channel,
                entry,
            } => return channel::encode_write(*slot, *channel, entry),
            Self::Clock(None) => "CK1;".to_string(),
            Self::Clock(Some(time)) => format!("CK1{};", time.encode_fields()?),
            Self::Identify => "ID;".to_string(),
            Self::Unknown(raw) => format!("{};", raw),
        };
        Ok(s.into_bytes())
    }
}

/// Streaming IC-10 command parser for the rig side of a link
#[derive(Debug)]
pub struct Ic10Codec {
    buffer: Vec<u8>,
}

impl Ic10Codec {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(MAX_COMMAND_LEN),
        }
    }

    /// Bytes received but not yet terminated
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

impl Default for Ic10Codec {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtocolCodec for Ic10Codec {
    type Command = Ic10Command;

    fn push_bytes(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);

        // Prevent buffer overflow
        if self.buffer.len() > MAX_COMMAND_LEN * 4 {
            let start = self.buffer.len() - MAX_COMMAND_LEN;
            self.buffer.drain(..start);
        }
    }

    fn next_command(&mut self) -> Option<Self::Command> {
        self.next_command_with_bytes().map(|(cmd, _)| cmd)
    }

    fn next_command_with_bytes(&mut self) -> Option<(Self::Command, Vec<u8>)> {
        let term_pos = self.buffer.iter().position(|&b| b == TERMINATOR)?;
        let cmd_bytes: Vec<u8> = self.buffer.drain(..=term_pos).collect();
        let body = &cmd_bytes[..cmd_bytes.len() - 1];

        let cmd = match Ic10Command::parse(body) {
            Ok(cmd) => cmd,
            Err(e) => {
                tracing::warn!("Failed to parse IC-10 command: {}", e);
                Ic10Command::Unknown(String::from_utf8_lossy(body).into_owned())
            }
        };

        Some((cmd, cmd_bytes))
    }

    fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse_one(bytes: &[u8]) -> Ic10Command {
        let mut codec = Ic10Codec::new();
        codec.push_bytes(bytes);
        codec.next_command().unwrap()
    }

    #[test]
    fn test_encode_mode_scenario() {
        assert_eq!(Ic10Command::Mode(Mode::Cw).encode().unwrap(), b"MD3;");
    }

    #[test]
    fn test_encode_frequency_scenario() {
        let cmd = Ic10Command::Frequency {
            vfo: Vfo::A,
            hz: Some(14_074_000),
        };
        assert_eq!(cmd.encode().unwrap(), b"FA00014074000;");
    }

    #[test]
    fn test_encode_simple_commands() {
        assert_eq!(Ic10Command::Info.encode().unwrap(), b"IF;");
        assert_eq!(Ic10Command::Ptt(true).encode().unwrap(), b"TX;");
        assert_eq!(Ic10Command::Ptt(false).encode().unwrap(), b"RX;");
        assert_eq!(Ic10Command::SelectVfo(Vfo::Memory).encode().unwrap(), b"FN2;");
        assert_eq!(Ic10Command::Split(true).encode().unwrap(), b"SP1;");
        assert_eq!(Ic10Command::MemorySelect(5).encode().unwrap(), b"MC 05;");
        assert_eq!(Ic10Command::Clock(None).encode().unwrap(), b"CK1;");
        assert_eq!(
            Ic10Command::Clock(Some(ClockTime::from_seconds(45_045).unwrap()))
                .encode()
                .unwrap(),
            b"CK1123045;"
        );
        assert_eq!(Ic10Command::VfoOp(VfoOp::Down).encode().unwrap(), b"DN;");
        assert_eq!(Ic10Command::Scan(ScanAction::Start).encode().unwrap(), b"SC1;");
    }

    #[test]
    fn test_encode_rejects_inexpressible() {
        assert!(Ic10Command::Mode(Mode::Data).encode().is_err());
        assert!(Ic10Command::Mode(Mode::None).encode().is_err());
        assert!(Ic10Command::SelectVfo(Vfo::Current).encode().is_err());
        assert!(Ic10Command::Frequency {
            vfo: Vfo::Memory,
            hz: None
        }
        .encode()
        .is_err());
        assert!(Ic10Command::VfoOp(VfoOp::Exchange).encode().is_err());
        assert!(Ic10Command::Function {
            func: Function::Rit,
            on: Some(true)
        }
        .encode()
        .is_err());
        assert!(Ic10Command::MemorySelect(100).encode().is_err());
    }

    #[test]
    fn test_expects_reply() {
        assert!(Ic10Command::Info.expects_reply());
        assert!(Ic10Command::Power(None).expects_reply());
        assert!(!Ic10Command::Power(Some(PowerState::On)).expects_reply());
        assert!(!Ic10Command::Mode(Mode::Usb).expects_reply());
        assert!(Ic10Command::Frequency { vfo: Vfo::B, hz: None }.expects_reply());
    }

    #[test]
    fn test_parse_frequency() {
        assert_eq!(
            parse_one(b"FA00014074000;"),
            Ic10Command::Frequency {
                vfo: Vfo::A,
                hz: Some(14_074_000)
            }
        );
        assert_eq!(
            parse_one(b"FB;"),
            Ic10Command::Frequency { vfo: Vfo::B, hz: None }
        );
    }

    #[test]
    fn test_parse_memory_commands() {
        assert_eq!(parse_one(b"MC 07;"), Ic10Command::MemorySelect(7));
        assert_eq!(
            parse_one(b"MR1 12;"),
            Ic10Command::ReadChannel {
                slot: ChannelSlot::Transmit,
                channel: 12
            }
        );
        assert_eq!(
            parse_one(b"MW0 070001407400020    ;"),
            Ic10Command::WriteChannel {
                slot: ChannelSlot::Receive,
                channel: 7,
                entry: ChannelEntry::new(14_074_000, Mode::Usb)
            }
        );
    }

    #[test]
    fn test_parse_unknown_is_kept() {
        assert_eq!(parse_one(b"ZZ123;"), Ic10Command::Unknown("ZZ123".into()));
        assert_eq!(parse_one(b"MD9;"), Ic10Command::Unknown("MD9".into()));
    }

    #[test]
    fn test_streaming_parse() {
        let mut codec = Ic10Codec::new();
        codec.push_bytes(b"MD");
        assert!(codec.next_command().is_none());
        assert_eq!(codec.pending(), 2);

        codec.push_bytes(b"2;TX;I");
        assert_eq!(codec.next_command(), Some(Ic10Command::Mode(Mode::Usb)));
        let (cmd, raw) = codec.next_command_with_bytes().unwrap();
        assert_eq!(cmd, Ic10Command::Ptt(true));
        assert_eq!(raw, b"TX;");
        assert!(codec.next_command().is_none());

        codec.push_bytes(b"F;");
        assert_eq!(codec.next_command(), Some(Ic10Command::Info));
    }

    #[test]
    fn test_codec_debug_shows_buffer() {
        let mut codec = Ic10Codec::new();
        codec.push_bytes(b"MD");
        assert!(format!("{:?}", codec).contains("Ic10Codec"));
    }

    #[test]
    fn test_buffer_is_bounded() {
        let mut codec = Ic10Codec::new();
        codec.push_bytes(&[b'X'; 1000]);
        assert!(codec.pending() <= MAX_COMMAND_LEN * 4);
        codec.clear();
        assert_eq!(codec.pending(), 0);
    }

    fn settable_command() -> impl Strategy<Value = Ic10Command> {
        prop_oneof![
            (0u64..=99_999_999_999).prop_map(|hz| Ic10Command::Frequency { vfo: Vfo::A, hz: Some(hz) }),
            (0u64..=99_999_999_999).prop_map(|hz| Ic10Command::Frequency { vfo: Vfo::B, hz: Some(hz) }),
            prop_oneof![Just(Mode::Lsb), Just(Mode::Usb), Just(Mode::Cw), Just(Mode::Fm), Just(Mode::Am), Just(Mode::Rtty)]
                .prop_map(Ic10Command::Mode),
            prop_oneof![Just(Vfo::A), Just(Vfo::B), Just(Vfo::Memory)].prop_map(Ic10Command::SelectVfo),
            any::<bool>().prop_map(Ic10Command::Split),
            any::<bool>().prop_map(Ic10Command::Ptt),
            (0u8..100).prop_map(Ic10Command::MemorySelect),
            (0u32..86_400).prop_map(|s| Ic10Command::Clock(Some(ClockTime::from_seconds(s).unwrap()))),
        ]
    }

    proptest! {
        #[test]
        fn host_commands_parse_back(cmd in settable_command()) {
            let bytes = cmd.encode().unwrap();
            prop_assert_eq!(parse_one(&bytes), cmd);
        }
    }
}
