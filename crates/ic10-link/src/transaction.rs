//! Transaction engine: one command, at most one terminated reply

use std::io;

use tracing::trace;

use crate::error::Result;
use crate::transport::Transport;

pub use ic10_protocol::ic10::TERMINATOR;

/// Send `command` and, if `expect_reply`, read one terminated reply
///
/// Stale input is discarded before a non-empty command is written. An empty
/// command sends nothing and only reads, leaving buffered input intact.
/// Returns exactly the bytes read, terminator included; an empty vector only
/// when no reply was expected. A missing reply is a timed-out I/O error.
pub fn transact<T: Transport + ?Sized>(
    transport: &mut T,
    command: &[u8],
    expect_reply: bool,
    reply_limit: usize,
) -> Result<Vec<u8>> {
    if !command.is_empty() {
        transport.flush_input()?;
        trace!("-> {}", String::from_utf8_lossy(command));
        transport.write_all(command)?;
    }

    if !expect_reply {
        return Ok(Vec::new());
    }

    let reply = transport.read_until(TERMINATOR, reply_limit)?;
    if reply.is_empty() {
        return Err(io::Error::new(io::ErrorKind::TimedOut, "no reply from rig").into());
    }
    trace!("<- {}", String::from_utf8_lossy(&reply));
    Ok(reply)
}

/// Read one frame that arrived without a command, if any
pub fn read_pending<T: Transport + ?Sized>(
    transport: &mut T,
    reply_limit: usize,
) -> Result<Option<Vec<u8>>> {
    let frame = transport.read_until(TERMINATOR, reply_limit)?;
    if frame.is_empty() {
        return Ok(None);
    }
    trace!("<~ {}", String::from_utf8_lossy(&frame));
    Ok(Some(frame))
}

/// Run `op` up to `attempts` times, returning the first success or the last
/// failure
///
/// `op` receives the 1-based attempt number. Zero attempts is treated as one.
pub fn retry<T, E>(attempts: u32, mut op: impl FnMut(u32) -> std::result::Result<T, E>) -> std::result::Result<T, E> {
    let mut outcome = op(1);
    for attempt in 2..=attempts {
        if outcome.is_ok() {
            break;
        }
        outcome = op(attempt);
    }
    outcome
}
