//! Forward-only byte source with single-byte lookahead.

use std::io::Read;

use crate::{Error, Result};

/// Wraps a blocking byte source and adds a one-byte peek slot.
///
/// `peek` is idempotent: repeated calls return the same byte until a
/// consuming read drains it. There is no seek and no write; the buffer only
/// ever moves forward.
pub struct PeekReader<R: Read> {
    inner: R,
    pending: Option<u8>,
    consumed: u64,
}

impl<R: Read> PeekReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: None,
            consumed: 0,
        }
    }

    /// Returns the next byte without consuming it, or `None` at end of
    /// stream.
    pub fn peek(&mut self) -> Result<Option<u8>> {
        if let Some(byte) = self.pending {
            return Ok(Some(byte));
        }

        let mut buf = [0u8; 1];
        match read_one(&mut self.inner, &mut buf)? {
            0 => Ok(None),
            _ => {
                self.pending = Some(buf[0]);
                Ok(Some(buf[0]))
            }
        }
    }

    /// Consumes and returns the next byte, the previously peeked byte first.
    pub fn read_byte(&mut self) -> Result<u8> {
        if let Some(byte) = self.pending.take() {
            self.consumed += 1;
            return Ok(byte);
        }

        let mut buf = [0u8; 1];
        match read_one(&mut self.inner, &mut buf)? {
            0 => Err(Error::EndOfStream),
            _ => {
                self.consumed += 1;
                Ok(buf[0])
            }
        }
    }

    /// Fills `buf` completely, satisfying the request from the pending
    /// peeked byte before touching the underlying source. Fails with
    /// `EndOfStream` if the source is exhausted early.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }

        let mut start = 0;
        if let Some(byte) = self.pending.take() {
            buf[0] = byte;
            start = 1;
        }

        self.inner.read_exact(&mut buf[start..]).map_err(|err| {
            if err.kind() == std::io::ErrorKind::UnexpectedEof {
                Error::EndOfStream
            } else {
                Error::Io(err)
            }
        })?;
        self.consumed += buf.len() as u64;
        Ok(())
    }

    /// Number of bytes consumed so far, not counting a pending peeked byte.
    pub fn position(&self) -> u64 {
        self.consumed
    }
}

// Retries Interrupted the way io::Read::read_exact does.
fn read_one<R: Read>(inner: &mut R, buf: &mut [u8; 1]) -> Result<usize> {
    loop {
        match inner.read(buf) {
            Ok(n) => return Ok(n),
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(Error::Io(err)),
        }
    }
}
