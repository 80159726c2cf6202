//! IC-10 Rig Simulation Library
//!
//! This crate provides a simulated IC-10 transceiver for exercising the CAT
//! link without physical hardware. [`VirtualRig`] implements the link's
//! [`Transport`](ic10_link::Transport) trait directly, so an
//! [`Ic10Rig`](ic10_link::Ic10Rig) can drive it in place of a serial port.
//!
//! # Example
//!
//! ```rust
//! use ic10_link::{Ic10Rig, RigConfig};
//! use ic10_protocol::{Mode, RigDatabase, Vfo};
//! use ic10_sim::VirtualRig;
//!
//! let model = RigDatabase::by_name("TS-440S").unwrap();
//! let mut rig = Ic10Rig::new(VirtualRig::new("sim", model.model), RigConfig::for_model(model)).unwrap();
//!
//! rig.set_frequency(Vfo::A, 7_074_000).unwrap();
//! rig.set_mode(Mode::Lsb).unwrap();
//! assert_eq!(rig.frequency().unwrap(), 7_074_000);
//! assert_eq!(rig.transport().mode(), Mode::Lsb);
//! ```

pub mod radio;

pub use radio::{Fault, VirtualRig, VirtualRigConfig};
