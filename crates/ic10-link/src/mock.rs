//! Scripted transport for link-layer tests
//!
//! Expectations are consumed in order. Writing a command checks it against
//! the next expectation and queues the scripted reply as inbound bytes.

use std::collections::VecDeque;
use std::io;

use crate::transport::Transport;

#[derive(Debug)]
enum Reply {
    Bytes(Vec<u8>),
    Silent,
    ReadError(io::ErrorKind),
    WriteError(io::ErrorKind),
}

#[derive(Debug)]
struct Expectation {
    request: Vec<u8>,
    reply: Reply,
}

#[derive(Debug, Default)]
pub struct MockTransport {
    expectations: VecDeque<Expectation>,
    inbound: VecDeque<u8>,
    read_error: Option<io::ErrorKind>,
    write_error: Option<io::ErrorKind>,
    sent_log: Vec<Vec<u8>>,
    flushes: usize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// When `request` is written, answer with `response`
    pub fn expect(&mut self, request: &[u8], response: &[u8]) -> &mut Self {
        self.push(request, Reply::Bytes(response.to_vec()))
    }

    /// `request` gets no answer (set commands)
    pub fn expect_silent(&mut self, request: &[u8]) -> &mut Self {
        self.push(request, Reply::Silent)
    }

    /// Reading the answer to `request` fails with `kind`
    pub fn expect_read_error(&mut self, request: &[u8], kind: io::ErrorKind) -> &mut Self {
        self.push(request, Reply::ReadError(kind))
    }

    /// Writing `request` fails with `kind`
    pub fn expect_write_error(&mut self, request: &[u8], kind: io::ErrorKind) -> &mut Self {
        self.push(request, Reply::WriteError(kind))
    }

    /// Fail the next write with `kind`
    pub fn fail_next_write(&mut self, kind: io::ErrorKind) -> &mut Self {
        self.write_error = Some(kind);
        self
    }

    /// Bytes arriving without any command, as a transceive push
    pub fn push_unsolicited(&mut self, bytes: &[u8]) -> &mut Self {
        self.inbound.extend(bytes);
        self
    }

    pub fn sent_data(&self) -> &[Vec<u8>] {
        &self.sent_log
    }

    pub fn remaining_expectations(&self) -> usize {
        self.expectations.len()
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    fn push(&mut self, request: &[u8], reply: Reply) -> &mut Self {
        self.expectations.push_back(Expectation {
            request: request.to_vec(),
            reply,
        });
        self
    }
}

impl Transport for MockTransport {
    fn flush_input(&mut self) -> io::Result<()> {
        self.flushes += 1;
        self.inbound.clear();
        Ok(())
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.sent_log.push(bytes.to_vec());
        if let Some(kind) = self.write_error.take() {
            return Err(kind.into());
        }

        let expectation = self.expectations.pop_front().ok_or_else(|| {
            io::Error::other(format!(
                "unexpected write {:?}: no expectations left",
                String::from_utf8_lossy(bytes)
            ))
        })?;
        if expectation.request != bytes {
            return Err(io::Error::other(format!(
                "unexpected write: expected {:?}, got {:?}",
                String::from_utf8_lossy(&expectation.request),
                String::from_utf8_lossy(bytes)
            )));
        }

        match expectation.reply {
            Reply::Bytes(reply) => self.inbound.extend(reply),
            Reply::Silent => {}
            Reply::ReadError(kind) => self.read_error = Some(kind),
            Reply::WriteError(kind) => return Err(kind.into()),
        }
        Ok(())
    }

    fn read_until(&mut self, terminator: u8, max_len: usize) -> io::Result<Vec<u8>> {
        if let Some(kind) = self.read_error.take() {
            return Err(kind.into());
        }

        let mut out = Vec::new();
        while out.len() < max_len {
            match self.inbound.pop_front() {
                Some(byte) => {
                    out.push(byte);
                    if byte == terminator {
                        return Ok(out);
                    }
                }
                None if out.is_empty() => return Ok(out),
                None => return Err(io::ErrorKind::TimedOut.into()),
            }
        }
        Ok(out)
    }
}
