//! Ic10Rig driven against the virtual rig

use std::sync::mpsc;

use ic10_link::{EventKind, Ic10Rig, RigConfig, RigError, RigEvent};
use ic10_protocol::{
    Antenna, ChannelEntry, ClockTime, Function, MemoryChannel, Mode, PowerState, RigDatabase,
    Transceive, Vfo, VfoOp,
};
use ic10_sim::{Fault, VirtualRig};
use proptest::prelude::*;

fn rig_for(model: &str) -> Ic10Rig<VirtualRig> {
    let info = RigDatabase::by_name(model).unwrap();
    Ic10Rig::new(VirtualRig::new("sim", info.model), RigConfig::for_model(info)).unwrap()
}

#[test]
fn test_frequency_mode_vfo_round_trip() {
    let mut rig = rig_for("TS-440S");

    rig.set_frequency(Vfo::B, 21_074_000).unwrap();
    rig.set_vfo(Vfo::B).unwrap();
    rig.set_mode(Mode::Cw).unwrap();

    let status = rig.status().unwrap();
    assert_eq!(status.frequency_hz, 21_074_000);
    assert_eq!(status.vfo, Vfo::B);
    assert_eq!(status.mode, Mode::Cw);
    assert_eq!(rig.frequency_of(Vfo::A).unwrap(), 14_074_000);
    assert_eq!(rig.frequency_of(Vfo::Current).unwrap(), 21_074_000);
}

#[test]
fn test_ptt_and_split() {
    let mut rig = rig_for("TS-940S");
    assert!(!rig.ptt().unwrap());
    rig.set_ptt(true).unwrap();
    rig.set_split(true).unwrap();
    assert!(rig.ptt().unwrap());
    assert!(rig.split().unwrap());
    rig.set_ptt(false).unwrap();
    assert!(!rig.ptt().unwrap());
}

#[test]
fn test_every_model_layout_decodes() {
    for model in RigDatabase::all() {
        let mut rig = rig_for(model.model);
        rig.set_mode(Mode::Am).unwrap();
        assert_eq!(rig.mode().unwrap(), Mode::Am, "{}", model.model);
        assert_eq!(rig.frequency().unwrap(), 14_074_000, "{}", model.model);
    }
}

#[test]
fn test_toggles_and_queries() {
    let mut rig = rig_for("TS-440S");

    rig.set_function(Function::Lock, true).unwrap();
    assert!(rig.function(Function::Lock).unwrap());

    rig.set_antenna(Antenna::Ant2).unwrap();
    assert_eq!(rig.antenna().unwrap(), Antenna::Ant2);

    rig.set_power(PowerState::Off).unwrap();
    assert_eq!(rig.power().unwrap(), PowerState::Off);

    rig.set_clock(ClockTime::from_seconds(45_045).unwrap()).unwrap();
    assert_eq!(rig.clock().unwrap().total_seconds(), 45_045);

    rig.vfo_op(VfoOp::Up).unwrap();
    assert_eq!(rig.frequency().unwrap(), 14_074_010);

    assert_eq!(rig.identify().unwrap().name(), "TS-440S");
}

#[test]
fn test_identify_on_model_without_id_times_out() {
    let mut rig = rig_for("TS-711");
    assert!(matches!(rig.identify(), Err(RigError::Io(_))));
}

#[test]
fn test_status_recovers_from_garbled_reply() {
    let mut rig = rig_for("TS-440S");
    rig.transport_mut().inject_fault(Fault::Truncate);
    rig.transport_mut().inject_fault(Fault::Mistag);
    assert_eq!(rig.frequency().unwrap(), 14_074_000);
}

#[test]
fn test_status_rejected_after_retries() {
    let mut rig = rig_for("TS-440S");
    for _ in 0..3 {
        rig.transport_mut().inject_fault(Fault::Truncate);
    }
    assert!(matches!(
        rig.status(),
        Err(RigError::Rejected { attempts: 3, .. })
    ));
}

#[test]
fn test_memory_channel_selection() {
    let mut rig = rig_for("TS-440S");
    rig.select_memory_channel(42).unwrap();
    assert_eq!(rig.memory_channel().unwrap(), 42);
}

#[test]
fn test_simplex_channel_has_no_transmit_slot() {
    let mut rig = rig_for("TS-440S");
    let record = MemoryChannel::simplex(3, ChannelEntry::new(3_573_000, Mode::Lsb));
    rig.write_channel(&record).unwrap();
    assert_eq!(rig.read_channel(3).unwrap(), record);
}

#[test]
fn test_transceive_push_decoding() {
    let mut rig = rig_for("TS-440S");
    rig.set_transceive(Transceive::Rig).unwrap();
    assert_eq!(rig.transceive().unwrap(), Transceive::Rig);

    let (tx, rx) = mpsc::channel();
    rig.subscribe(EventKind::Frequency, tx.clone());
    rig.subscribe(EventKind::Ptt, tx);

    rig.transport_mut().turn_dial(7_074_000);
    rig.transport_mut().key(true);

    let first = rig.poll_event().unwrap().unwrap();
    assert_eq!(first.frequency_hz, 7_074_000);
    assert!(!first.ptt_active);
    let second = rig.poll_event().unwrap().unwrap();
    assert!(second.ptt_active);
    assert!(rig.poll_event().unwrap().is_none());

    let events: Vec<RigEvent> = rx.try_iter().collect();
    assert_eq!(
        events,
        vec![
            RigEvent::FrequencyChanged(7_074_000),
            RigEvent::PttChanged(false),
            RigEvent::FrequencyChanged(7_074_000),
            RigEvent::PttChanged(true),
        ]
    );
}

#[test]
fn test_command_discards_pending_pushes() {
    let mut rig = rig_for("TS-440S");
    rig.set_transceive(Transceive::Rig).unwrap();
    rig.transport_mut().press_mode(Mode::Fm);

    // the status query flushes the push before it is read
    assert_eq!(rig.mode().unwrap(), Mode::Fm);
    assert!(rig.poll_event().unwrap().is_none());
}

fn channel_entry() -> impl Strategy<Value = ChannelEntry> {
    (
        0u64..=99_999_999_999,
        prop_oneof![
            Just(Mode::Lsb),
            Just(Mode::Usb),
            Just(Mode::Cw),
            Just(Mode::Fm),
            Just(Mode::Am),
            Just(Mode::Rtty),
        ],
    )
        .prop_map(|(hz, mode)| ChannelEntry::new(hz, mode))
}

proptest! {
    #[test]
    fn channel_write_then_read_is_consistent(
        channel in 0u8..100,
        rx in channel_entry(),
        tx in proptest::option::of(channel_entry()),
    ) {
        let mut rig = rig_for("TS-440S");
        let record = MemoryChannel { channel, rx, tx };
        rig.write_channel(&record).unwrap();

        let read = rig.read_channel(channel).unwrap();
        prop_assert_eq!(read.rx, rx);
        prop_assert_eq!(read.tx, tx);
    }
}
