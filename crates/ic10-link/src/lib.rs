//! Blocking IC-10 CAT link
//!
//! This crate drives one IC-10 rig over an injected [`Transport`]:
//!
//! - [`transaction`]: flush, write, read one `;`-terminated reply, and the
//!   bounded retry combinator
//! - [`rig`]: [`Ic10Rig`], one method per abstract operation
//! - [`events`]: decoding of transceive pushes and observer dispatch
//! - [`transport`]: the transport trait and a [`SerialTransport`] over
//!   `serialport`
//!
//! Everything is synchronous. A rig owns its transport exclusively and runs at
//! most one exchange at a time; callers sharing a rig across threads must
//! serialize access themselves.
//!
//! # Example
//!
//! ```no_run
//! use ic10_link::{Ic10Rig, RigConfig, SerialSettings, SerialTransport};
//! use ic10_protocol::{Mode, Vfo};
//!
//! let settings = SerialSettings {
//!     port: "/dev/ttyUSB0".into(),
//!     ..SerialSettings::default()
//! };
//! let transport = SerialTransport::open(&settings)?;
//! let mut rig = Ic10Rig::new(transport, RigConfig::default())?;
//!
//! rig.set_frequency(Vfo::A, 14_074_000)?;
//! rig.set_mode(Mode::Usb)?;
//! println!("{:?}", rig.status()?);
//! # Ok::<(), ic10_link::RigError>(())
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod rig;
pub mod transaction;
pub mod transport;

#[cfg(test)]
mod mock;

pub use config::{RigConfig, SerialSettings};
pub use error::{Result, RigError};
pub use events::{DecodedEvent, EventDispatcher, EventKind, EventSink, RigEvent};
pub use rig::Ic10Rig;
pub use transport::{SerialTransport, Transport};
