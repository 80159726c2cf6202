//! Abstract radio-control vocabulary
//!
//! These enums describe what a caller wants from a rig, independent of how the
//! IC-10 command set spells it. Not every value has an IC-10 code: the code
//! tables in [`crate::tables`] decide what is expressible, and anything outside
//! them is rejected before a command is built.

use std::fmt;

/// Operating modes a caller may ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Lower Sideband
    Lsb,
    /// Upper Sideband
    Usb,
    /// Continuous Wave
    Cw,
    /// CW Reverse
    CwR,
    /// Amplitude Modulation
    Am,
    /// Frequency Modulation
    Fm,
    /// FM Narrow
    FmN,
    /// RTTY (FSK on IC-10 rigs)
    Rtty,
    /// RTTY Reverse
    RttyR,
    /// Packet/data
    Data,
    /// No mode selected (blank memory channels report this)
    None,
}

impl Mode {
    /// Short upper-case label used in logs and the monitor output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Lsb => "LSB",
            Self::Usb => "USB",
            Self::Cw => "CW",
            Self::CwR => "CW-R",
            Self::Am => "AM",
            Self::Fm => "FM",
            Self::FmN => "FM-N",
            Self::Rtty => "RTTY",
            Self::RttyR => "RTTY-R",
            Self::Data => "DATA",
            Self::None => "NONE",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// VFO selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Vfo {
    /// VFO A
    A,
    /// VFO B
    B,
    /// Memory channel
    Memory,
    /// Whatever the rig currently has selected
    Current,
}

impl fmt::Display for Vfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("VFO A"),
            Self::B => f.write_str("VFO B"),
            Self::Memory => f.write_str("MEM"),
            Self::Current => f.write_str("current"),
        }
    }
}

/// Rig power switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PowerState {
    Off,
    On,
}

/// Transceive (auto-information) setting
///
/// With `Rig`, the transceiver pushes an unsolicited status frame whenever its
/// state changes on the front panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transceive {
    Off,
    Rig,
}

/// Antenna connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Antenna {
    Ant1,
    Ant2,
}

/// On/off rig functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Function {
    /// Front panel dial lock
    Lock,
    /// Noise blanker
    NoiseBlanker,
    /// Receiver incremental tuning
    Rit,
    /// Transmitter incremental tuning
    Xit,
}

/// One-shot VFO operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VfoOp {
    /// Step the frequency up
    Up,
    /// Step the frequency down
    Down,
    /// Exchange VFO A and B
    Exchange,
    /// Copy VFO A into B
    Copy,
}

/// Scan control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScanAction {
    Start,
    Stop,
}

/// Half of a memory channel: the receive slot or the transmit slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelSlot {
    Receive,
    Transmit,
}

impl ChannelSlot {
    /// Slot digit used by `MR`/`MW`
    pub fn digit(&self) -> u8 {
        match self {
            Self::Receive => b'0',
            Self::Transmit => b'1',
        }
    }

    pub(crate) fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            b'0' => Some(Self::Receive),
            b'1' => Some(Self::Transmit),
            _ => None,
        }
    }
}
