//! Virtual IC-10 rig
//!
//! Provides a simulated rig that answers IC-10 commands with protocol-accurate
//! replies and, in transceive mode, pushes status frames when its front panel
//! is operated.

use std::collections::{BTreeMap, VecDeque};
use std::io;
use std::time::Instant;

use ic10_link::Transport;
use ic10_protocol::channel::{self, ChannelEntry, MemoryChannel};
use ic10_protocol::frame::encode_status_frame;
use ic10_protocol::ic10::{Ic10Codec, Ic10Command};
use ic10_protocol::reply::{ClockTime, TRANSCEIVE_REPLY_LEN};
use ic10_protocol::tables::{ANTENNAS, LOCK, POWER, TRANSCEIVE};
use ic10_protocol::{
    Antenna, ChannelSlot, EncodeCommand, EncodeError, FrameLayout, Mode, PowerState,
    ProtocolCodec, RigDatabase, ScanAction, StatusFrame, Transceive, Vfo, VfoOp,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Dial step of `UP;` / `DN;`
pub const STEP_HZ: u64 = 10;

/// Reply corruption applied to the next reply the rig sends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fault {
    /// Cut the reply to its first four bytes plus the terminator
    Truncate,
    /// Replace the two-letter tag with `XX`
    Mistag,
    /// Send nothing
    Drop,
}

/// Configuration for creating a virtual rig
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualRigConfig {
    /// Display name/identifier
    pub id: String,
    /// Model name looked up in the rig database
    pub model: String,
    /// Initial VFO A frequency in Hz
    pub initial_frequency_hz: u64,
    /// Initial operating mode
    pub initial_mode: Mode,
}

impl Default for VirtualRigConfig {
    fn default() -> Self {
        Self {
            id: "Virtual Rig".to_string(),
            model: "TS-440S".to_string(),
            initial_frequency_hz: 14_074_000,
            initial_mode: Mode::Usb,
        }
    }
}

/// A simulated IC-10 rig that implements [`Transport`]
#[derive(Debug)]
pub struct VirtualRig {
    id: String,
    layout: FrameLayout,
    channel_count: u8,
    id_code: Option<u8>,

    vfo_a_hz: u64,
    vfo_b_hz: u64,
    vfo: Vfo,
    mode: Mode,
    ptt: bool,
    split: bool,
    power: PowerState,
    transceive: Transceive,
    lock: bool,
    antenna: Antenna,
    scanning: bool,
    memory_channel: u8,
    clock: ClockTime,
    channels: BTreeMap<u8, MemoryChannel>,

    codec: Ic10Codec,
    outbound: VecDeque<u8>,
    faults: VecDeque<Fault>,
    received: Vec<Ic10Command>,
    last_change: Instant,
}

impl VirtualRig {
    /// Create a virtual rig of a known model with default settings
    pub fn new(id: impl Into<String>, model: &str) -> Self {
        Self::from_config(VirtualRigConfig {
            id: id.into(),
            model: model.to_string(),
            ..VirtualRigConfig::default()
        })
    }

    /// Create a virtual rig from configuration
    ///
    /// An unknown model gets a 38-wide frame, 100 channels and no `ID` reply.
    pub fn from_config(config: VirtualRigConfig) -> Self {
        let (layout, channel_count, id_code) = match RigDatabase::by_name(&config.model) {
            Some(model) => (model.layout(), model.channel_count, model.id_code),
            None => {
                warn!("Unknown model {}, using default layout", config.model);
                (FrameLayout::default(), channel::MAX_CHANNELS, None)
            }
        };

        Self {
            id: config.id,
            layout,
            channel_count,
            id_code,
            vfo_a_hz: config.initial_frequency_hz,
            vfo_b_hz: config.initial_frequency_hz,
            vfo: Vfo::A,
            mode: config.initial_mode,
            ptt: false,
            split: false,
            power: PowerState::On,
            transceive: Transceive::Off,
            lock: false,
            antenna: Antenna::Ant1,
            scanning: false,
            memory_channel: 0,
            clock: ClockTime {
                hours: 0,
                minutes: 0,
                seconds: 0,
            },
            channels: BTreeMap::new(),
            codec: Ic10Codec::new(),
            outbound: VecDeque::new(),
            faults: VecDeque::new(),
            received: Vec::new(),
            last_change: Instant::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    pub fn channel_count(&self) -> u8 {
        self.channel_count
    }

    /// Frequency shown on the display
    pub fn frequency_hz(&self) -> u64 {
        match self.vfo {
            Vfo::B => self.vfo_b_hz,
            Vfo::Memory => self
                .channels
                .get(&self.memory_channel)
                .map(|c| c.rx.frequency_hz)
                .unwrap_or(0),
            _ => self.vfo_a_hz,
        }
    }

    pub fn vfo_frequency(&self, vfo: Vfo) -> Option<u64> {
        match vfo {
            Vfo::A => Some(self.vfo_a_hz),
            Vfo::B => Some(self.vfo_b_hz),
            _ => None,
        }
    }

    pub fn vfo(&self) -> Vfo {
        self.vfo
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn ptt(&self) -> bool {
        self.ptt
    }

    pub fn split(&self) -> bool {
        self.split
    }

    pub fn power(&self) -> PowerState {
        self.power
    }

    pub fn transceive(&self) -> Transceive {
        self.transceive
    }

    pub fn locked(&self) -> bool {
        self.lock
    }

    pub fn antenna(&self) -> Antenna {
        self.antenna
    }

    pub fn scanning(&self) -> bool {
        self.scanning
    }

    pub fn memory_channel(&self) -> u8 {
        self.memory_channel
    }

    pub fn clock(&self) -> ClockTime {
        self.clock
    }

    /// Stored contents of a memory channel
    pub fn channel(&self, channel: u8) -> Option<&MemoryChannel> {
        self.channels.get(&channel)
    }

    /// Commands received so far, in order
    pub fn received(&self) -> &[Ic10Command] {
        &self.received
    }

    /// Get the time of last state change
    pub fn last_change(&self) -> Instant {
        self.last_change
    }

    /// Corrupt the next reply
    pub fn inject_fault(&mut self, fault: Fault) {
        self.faults.push_back(fault);
    }

    /// Queue raw bytes for the host, as line noise or an unsupported push
    pub fn inject_noise(&mut self, bytes: &[u8]) {
        self.outbound.extend(bytes);
    }

    /// Bytes waiting to be read by the host
    pub fn pending_output(&self) -> usize {
        self.outbound.len()
    }

    // -- front panel --

    /// Tune the active VFO; pushes a status frame in transceive mode
    pub fn turn_dial(&mut self, hz: u64) {
        match self.vfo {
            Vfo::B => self.vfo_b_hz = hz,
            _ => self.vfo_a_hz = hz,
        }
        self.panel_changed();
    }

    pub fn press_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.panel_changed();
    }

    pub fn press_vfo(&mut self, vfo: Vfo) {
        self.vfo = vfo;
        self.panel_changed();
    }

    pub fn key(&mut self, ptt: bool) {
        self.ptt = ptt;
        self.panel_changed();
    }

    /// Store a channel as if programmed from the front panel
    pub fn store_channel(&mut self, record: MemoryChannel) {
        self.channels.insert(record.channel, record);
        self.last_change = Instant::now();
    }

    fn panel_changed(&mut self) {
        self.last_change = Instant::now();
        if self.transceive == Transceive::Rig {
            match self.status_frame() {
                Ok(frame) => {
                    trace!("{} pushes {}", self.id, String::from_utf8_lossy(&frame));
                    self.outbound.extend(frame);
                }
                Err(e) => warn!("{} cannot push status: {}", self.id, e),
            }
        }
    }

    // -- command handling --

    fn status_frame(&self) -> Result<Vec<u8>, EncodeError> {
        let frame = StatusFrame {
            frequency_hz: self.frequency_hz(),
            vfo: self.vfo,
            mode: self.mode,
            ptt_active: self.ptt,
            split_active: self.split,
        };
        encode_status_frame(&frame, self.memory_channel, self.layout)
    }

    fn handle(&mut self, cmd: Ic10Command) -> Result<Option<Vec<u8>>, EncodeError> {
        debug!("{} handling {:?}", self.id, cmd);
        self.received.push(cmd.clone());

        let reply = match cmd {
            Ic10Command::Info => Some(self.status_frame()?),
            Ic10Command::Frequency { vfo, hz: None } => {
                let hz = self.vfo_frequency(vfo).unwrap_or(0);
                Some(Ic10Command::Frequency { vfo, hz: Some(hz) }.encode()?)
            }
            Ic10Command::Frequency { vfo, hz: Some(hz) } => {
                match vfo {
                    Vfo::B => self.vfo_b_hz = hz,
                    _ => self.vfo_a_hz = hz,
                }
                None
            }
            Ic10Command::Mode(mode) => {
                self.mode = mode;
                None
            }
            Ic10Command::SelectVfo(vfo) => {
                self.vfo = vfo;
                None
            }
            Ic10Command::Split(on) => {
                self.split = on;
                None
            }
            Ic10Command::Ptt(on) => {
                self.ptt = on;
                None
            }
            Ic10Command::Power(None) => Some(one_byte_reply("PS", POWER.encode(self.power)?)),
            Ic10Command::Power(Some(state)) => {
                self.power = state;
                None
            }
            Ic10Command::Transceive(None) => {
                let mut reply = one_byte_reply("AI", TRANSCEIVE.encode(self.transceive)?);
                reply.pop();
                reply.resize(TRANSCEIVE_REPLY_LEN - 1, b' ');
                reply.push(b';');
                Some(reply)
            }
            Ic10Command::Transceive(Some(state)) => {
                self.transceive = state;
                None
            }
            Ic10Command::Function { on: None, .. } => {
                Some(one_byte_reply("LK", LOCK.encode(self.lock)?))
            }
            Ic10Command::Function { on: Some(on), .. } => {
                self.lock = on;
                None
            }
            Ic10Command::Antenna(None) => Some(one_byte_reply("AN", ANTENNAS.encode(self.antenna)?)),
            Ic10Command::Antenna(Some(antenna)) => {
                self.antenna = antenna;
                None
            }
            Ic10Command::VfoOp(op) => {
                let hz = self.frequency_hz();
                let stepped = match op {
                    VfoOp::Down => hz.saturating_sub(STEP_HZ),
                    _ => hz + STEP_HZ,
                };
                match self.vfo {
                    Vfo::B => self.vfo_b_hz = stepped,
                    _ => self.vfo_a_hz = stepped,
                }
                None
            }
            Ic10Command::Scan(action) => {
                self.scanning = action == ScanAction::Start;
                None
            }
            Ic10Command::MemorySelect(channel) => {
                channel::check_channel(channel, self.channel_count)?;
                self.memory_channel = channel;
                None
            }
            Ic10Command::ReadChannel { slot, channel } => {
                channel::check_channel(channel, self.channel_count)?;
                let stored = self.channels.get(&channel);
                Some(match slot {
                    ChannelSlot::Receive => {
                        let entry = stored
                            .map(|c| c.rx)
                            .unwrap_or(ChannelEntry::new(0, Mode::None));
                        channel::encode_read_reply(slot, channel, &entry)?
                    }
                    ChannelSlot::Transmit => match stored.and_then(|c| c.tx) {
                        Some(entry) => channel::encode_read_reply(slot, channel, &entry)?,
                        // simplex: slot and channel only
                        None => format!("MR1 {:02};", channel).into_bytes(),
                    },
                })
            }
            Ic10Command::WriteChannel {
                slot,
                channel,
                entry,
            } => {
                channel::check_channel(channel, self.channel_count)?;
                match slot {
                    ChannelSlot::Receive => {
                        self.channels
                            .insert(channel, MemoryChannel::simplex(channel, entry));
                    }
                    ChannelSlot::Transmit => {
                        self.channels
                            .entry(channel)
                            .or_insert_with(|| {
                                MemoryChannel::simplex(channel, ChannelEntry::new(0, Mode::None))
                            })
                            .tx = Some(entry);
                    }
                }
                None
            }
            Ic10Command::Clock(None) => Some(Ic10Command::Clock(Some(self.clock)).encode()?),
            Ic10Command::Clock(Some(time)) => {
                self.clock = time;
                None
            }
            Ic10Command::Identify => self
                .id_code
                .map(|code| format!("ID00{};", code as char).into_bytes()),
            Ic10Command::Unknown(raw) => {
                warn!("{} rejects unknown command {}", self.id, raw);
                Some(b"?;".to_vec())
            }
        };

        if reply.is_none() {
            self.last_change = Instant::now();
        }
        Ok(reply)
    }

    fn send_reply(&mut self, mut reply: Vec<u8>) {
        match self.faults.pop_front() {
            None => {}
            Some(Fault::Truncate) => {
                reply.truncate(4);
                reply.push(b';');
            }
            Some(Fault::Mistag) => {
                let n = reply.len().min(2);
                reply[..n].fill(b'X');
            }
            Some(Fault::Drop) => return,
        }
        trace!("{} replies {}", self.id, String::from_utf8_lossy(&reply));
        self.outbound.extend(reply);
    }
}

fn one_byte_reply(tag: &str, code: u8) -> Vec<u8> {
    format!("{}{};", tag, code as char).into_bytes()
}

impl Transport for VirtualRig {
    fn flush_input(&mut self) -> io::Result<()> {
        self.outbound.clear();
        Ok(())
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.codec.push_bytes(bytes);
        while let Some(cmd) = self.codec.next_command() {
            match self.handle(cmd) {
                Ok(Some(reply)) => self.send_reply(reply),
                Ok(None) => {}
                Err(e) => {
                    warn!("{} cannot execute command: {}", self.id, e);
                    self.send_reply(b"?;".to_vec());
                }
            }
        }
        Ok(())
    }

    fn read_until(&mut self, terminator: u8, max_len: usize) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        while out.len() < max_len {
            match self.outbound.pop_front() {
                Some(byte) => {
                    out.push(byte);
                    if byte == terminator {
                        break;
                    }
                }
                None if out.is_empty() => break,
                None => return Err(io::ErrorKind::TimedOut.into()),
            }
        }
        Ok(out)
    }
}
