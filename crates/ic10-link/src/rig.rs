//! High-level rig API over one transport
//!
//! [`Ic10Rig`] maps every abstract operation to an IC-10 exchange. Values the
//! command set cannot express are rejected before any I/O. Read-side state
//! that the command set only exposes through the `IF` status frame (mode,
//! VFO, PTT, split, memory channel) is fetched through the retried status
//! query.

use ic10_protocol::channel::{self, ChannelEntry, MemoryChannel};
use ic10_protocol::ic10::Ic10Command;
use ic10_protocol::reply::{self, ClockTime, Identity};
use ic10_protocol::{
    Antenna, ChannelSlot, EncodeCommand, EncodeError, Function, Mode, ParseError, PowerState, RawFrame,
    ScanAction, StatusFrame, Transceive, Vfo, VfoOp,
};
use tracing::{debug, warn};

use crate::config::RigConfig;
use crate::error::{Result, RigError};
use crate::events::{self, DecodedEvent, EventDispatcher, EventKind, EventSink};
use crate::transaction::{read_pending, retry, transact};
use crate::transport::Transport;

/// One IC-10 rig on an exclusively owned transport
#[derive(Debug)]
pub struct Ic10Rig<T: Transport> {
    transport: T,
    config: RigConfig,
    events: EventDispatcher,
}

impl<T: Transport> Ic10Rig<T> {
    /// Wrap `transport`; fails if `config` does not validate
    pub fn new(transport: T, config: RigConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            transport,
            config,
            events: EventDispatcher::new(),
        })
    }

    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Register an observer for one notification axis
    pub fn subscribe(&mut self, kind: EventKind, sink: impl EventSink + Send + 'static) {
        self.events.subscribe(kind, sink);
    }

    /// Register an observer for every axis
    pub fn subscribe_all(&mut self, sink: impl EventSink + Send + 'static) {
        self.events.subscribe_all(sink);
    }

    fn execute(&mut self, command: &Ic10Command) -> Result<Vec<u8>> {
        let bytes = command.encode()?;
        transact(
            &mut self.transport,
            &bytes,
            command.expects_reply(),
            self.config.reply_limit,
        )
    }

    fn send(&mut self, command: Ic10Command) -> Result<()> {
        self.execute(&command).map(drop)
    }

    // -- status frame --

    /// Raw `IF` reply that passed the length and tag gate
    ///
    /// A reply shorter than the frame width or tagged otherwise is retried,
    /// up to the configured number of attempts. I/O failures are retried too;
    /// once attempts run out, the last failure is returned, with a protocol
    /// failure surfaced as [`RigError::Rejected`].
    pub fn status_frame_bytes(&mut self) -> Result<Vec<u8>> {
        let query = Ic10Command::Info.encode()?;
        let layout = self.config.layout;
        let attempts = self.config.retries;
        let limit = self.config.reply_limit;
        let transport = &mut self.transport;

        retry(attempts, |attempt| {
            let reply = transact(&mut *transport, &query, true, limit)?;
            match RawFrame::new(&reply, layout) {
                Ok(_) => Ok(reply),
                Err(reason) => {
                    warn!(
                        "Unexpected IF answer (attempt {}/{}): {:?}: {}",
                        attempt,
                        attempts,
                        String::from_utf8_lossy(&reply),
                        reason
                    );
                    Err(RigError::Protocol(reason))
                }
            }
        })
        .map_err(|e| match e {
            RigError::Protocol(reason) => RigError::Rejected { attempts, reason },
            other => other,
        })
    }

    fn status_field<V>(
        &mut self,
        field: impl FnOnce(&RawFrame<'_>) -> std::result::Result<V, ParseError>,
    ) -> Result<V> {
        let bytes = self.status_frame_bytes()?;
        let frame = RawFrame::new(&bytes, self.config.layout)?;
        Ok(field(&frame)?)
    }

    /// Every field of the status frame
    pub fn status(&mut self) -> Result<StatusFrame> {
        self.status_field(|frame| frame.decode())
    }

    // -- frequency --

    /// Displayed frequency
    pub fn frequency(&mut self) -> Result<u64> {
        self.status_field(|frame| frame.frequency_hz())
    }

    /// Frequency of VFO A or B, or the displayed one for [`Vfo::Current`]
    pub fn frequency_of(&mut self, vfo: Vfo) -> Result<u64> {
        if vfo == Vfo::Current {
            return self.frequency();
        }
        let reply = self.execute(&Ic10Command::Frequency { vfo, hz: None })?;
        Ok(reply::decode_frequency(&reply, vfo)?)
    }

    /// Set VFO A or B; any other target is an invalid argument
    pub fn set_frequency(&mut self, vfo: Vfo, hz: u64) -> Result<()> {
        self.send(Ic10Command::Frequency { vfo, hz: Some(hz) })
    }

    // -- mode / VFO / PTT / split --

    pub fn mode(&mut self) -> Result<Mode> {
        self.status_field(|frame| frame.mode())
    }

    pub fn set_mode(&mut self, mode: Mode) -> Result<()> {
        self.send(Ic10Command::Mode(mode))
    }

    pub fn vfo(&mut self) -> Result<Vfo> {
        self.status_field(|frame| frame.vfo())
    }

    /// Select VFO A, B or memory; [`Vfo::Current`] leaves the selection alone
    pub fn set_vfo(&mut self, vfo: Vfo) -> Result<()> {
        if vfo == Vfo::Current {
            return Ok(());
        }
        self.send(Ic10Command::SelectVfo(vfo))
    }

    pub fn ptt(&mut self) -> Result<bool> {
        self.status_field(|frame| frame.ptt_active())
    }

    /// Key or unkey; keying a receive-only model is an invalid argument
    pub fn set_ptt(&mut self, on: bool) -> Result<()> {
        if on && self.config.receive_only {
            return Err(RigError::InvalidArgument(EncodeError::Unsupported {
                axis: "PTT",
                value: "transmit on a receive-only model".into(),
            }));
        }
        self.send(Ic10Command::Ptt(on))
    }

    pub fn split(&mut self) -> Result<bool> {
        self.status_field(|frame| frame.split_active())
    }

    pub fn set_split(&mut self, on: bool) -> Result<()> {
        self.send(Ic10Command::Split(on))
    }

    // -- simple queries and toggles --

    pub fn power(&mut self) -> Result<PowerState> {
        let reply = self.execute(&Ic10Command::Power(None))?;
        Ok(reply::decode_power(&reply)?)
    }

    pub fn set_power(&mut self, state: PowerState) -> Result<()> {
        self.send(Ic10Command::Power(Some(state)))
    }

    pub fn transceive(&mut self) -> Result<Transceive> {
        let reply = self.execute(&Ic10Command::Transceive(None))?;
        Ok(reply::decode_transceive(&reply)?)
    }

    /// Enable or disable status pushes
    pub fn set_transceive(&mut self, state: Transceive) -> Result<()> {
        self.send(Ic10Command::Transceive(Some(state)))
    }

    pub fn function(&mut self, func: Function) -> Result<bool> {
        let reply = self.execute(&Ic10Command::Function { func, on: None })?;
        Ok(reply::decode_lock(&reply)?)
    }

    pub fn set_function(&mut self, func: Function, on: bool) -> Result<()> {
        self.send(Ic10Command::Function { func, on: Some(on) })
    }

    pub fn antenna(&mut self) -> Result<Antenna> {
        let reply = self.execute(&Ic10Command::Antenna(None))?;
        Ok(reply::decode_antenna(&reply)?)
    }

    pub fn set_antenna(&mut self, antenna: Antenna) -> Result<()> {
        self.send(Ic10Command::Antenna(Some(antenna)))
    }

    pub fn vfo_op(&mut self, op: VfoOp) -> Result<()> {
        self.send(Ic10Command::VfoOp(op))
    }

    pub fn scan(&mut self, action: ScanAction) -> Result<()> {
        self.send(Ic10Command::Scan(action))
    }

    pub fn clock(&mut self) -> Result<ClockTime> {
        let reply = self.execute(&Ic10Command::Clock(None))?;
        Ok(reply::decode_clock(&reply)?)
    }

    pub fn set_clock(&mut self, time: ClockTime) -> Result<()> {
        self.send(Ic10Command::Clock(Some(time)))
    }

    /// Model reported by `ID;`; models without the command time out
    pub fn identify(&mut self) -> Result<Identity> {
        let reply = self.execute(&Ic10Command::Identify)?;
        Ok(reply::decode_identity(&reply)?)
    }

    // -- memory channels --

    /// Memory channel shown in the status frame
    pub fn memory_channel(&mut self) -> Result<u8> {
        self.status_field(|frame| frame.memory_channel())
    }

    pub fn select_memory_channel(&mut self, channel: u8) -> Result<()> {
        channel::check_channel(channel, self.config.channel_count)?;
        self.send(Ic10Command::MemorySelect(channel))
    }

    /// Read both slots of `channel`
    ///
    /// The transmit slot is best-effort: a timeout or a short or mistagged
    /// reply leaves it absent, since simplex channels have none. A record for
    /// another slot or channel is a protocol error on either slot.
    pub fn read_channel(&mut self, channel: u8) -> Result<MemoryChannel> {
        channel::check_channel(channel, self.config.channel_count)?;

        let reply = self.execute(&Ic10Command::ReadChannel {
            slot: ChannelSlot::Receive,
            channel,
        })?;
        let rx = channel::decode_read_reply(&reply, ChannelSlot::Receive, channel)?;

        let tx = match self.execute(&Ic10Command::ReadChannel {
            slot: ChannelSlot::Transmit,
            channel,
        }) {
            Ok(reply) => match channel::decode_read_reply(&reply, ChannelSlot::Transmit, channel) {
                Ok(entry) => Some(entry),
                Err(e @ (ParseError::TooShort { .. } | ParseError::WrongTag { .. })) => {
                    debug!("No transmit slot for channel {}: {}", channel, e);
                    None
                }
                Err(e) => return Err(e.into()),
            },
            Err(RigError::Io(e)) => {
                debug!("No transmit slot for channel {}: {}", channel, e);
                None
            }
            Err(e) => return Err(e),
        };

        Ok(MemoryChannel { channel, rx, tx })
    }

    /// Write the receive slot, then the transmit slot if the channel has one
    ///
    /// Both records are encoded before anything is sent. If the receive slot
    /// was written and the transmit write fails, the error is
    /// [`RigError::PartialChannelWrite`] and the receive slot stays written.
    pub fn write_channel(&mut self, record: &MemoryChannel) -> Result<()> {
        let channel = record.channel;
        channel::check_channel(channel, self.config.channel_count)?;

        let rx = write_command(ChannelSlot::Receive, channel, record.rx).encode()?;
        let tx = record
            .tx
            .map(|entry| write_command(ChannelSlot::Transmit, channel, entry).encode())
            .transpose()?;

        let limit = self.config.reply_limit;
        transact(&mut self.transport, &rx, false, limit)?;
        if let Some(tx) = tx {
            transact(&mut self.transport, &tx, false, limit).map_err(|source| {
                RigError::PartialChannelWrite {
                    channel,
                    source: Box::new(source),
                }
            })?;
        }
        Ok(())
    }

    // -- transceive pushes --

    /// Read and dispatch one pushed status frame, if one has arrived
    ///
    /// Sends nothing. Must not be called while a command reply is pending.
    pub fn poll_event(&mut self) -> Result<Option<DecodedEvent>> {
        let Some(frame) = read_pending(&mut self.transport, self.config.reply_limit)? else {
            return Ok(None);
        };
        let decoded = events::decode_push(&frame, self.config.layout)?;
        self.events.dispatch(&decoded);
        Ok(Some(decoded))
    }
}

fn write_command(slot: ChannelSlot, channel: u8, entry: ChannelEntry) -> Ic10Command {
    Ic10Command::WriteChannel {
        slot,
        channel,
        entry,
    }
}
