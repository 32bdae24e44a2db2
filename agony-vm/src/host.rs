//! # Host
//!
//! The three instructions that reach outside the core (`.`, `,` and `*`)
//! are delegated to a [`Host`]. The single-program interpreter plugs in a
//! [`StreamHost`] backed by byte streams and the buffer register; the arena
//! plugs in [`ArenaHost`], which turns all three into no-ops.

use crate::error::{Error, Result};
use std::io::{ErrorKind as IoErrorKind, Read, Write};

/// Side effects of the host-facing instructions
pub trait Host {
    /// `.`: emit a character
    fn output(&mut self, byte: u8) -> Result<()>;

    /// `,`: fetch a character to store at the pointer.
    ///
    /// `Ok(None)` leaves the core untouched. End of input is not `None`:
    /// a stream host reports it as `Some(0)`.
    fn input(&mut self) -> Result<Option<u8>>;

    /// `*`: exchange `byte` with the buffer register, returning the previous
    /// buffer value to store at the pointer, or `None` to leave the core
    /// untouched.
    fn swap(&mut self, byte: u8) -> Option<u8>;
}

/// Host for the single-program interpreter: a readable input stream, a
/// writable output stream and the one-character buffer register.
#[derive(Debug)]
pub struct StreamHost<R, W> {
    input: R,
    output: W,
    buffer: u8,
}

impl<R: Read, W: Write> StreamHost<R, W> {
    /// Create a host over the given streams with a zeroed buffer
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            buffer: 0,
        }
    }

    /// Current buffer register value
    pub fn buffer(&self) -> u8 {
        self.buffer
    }

    /// The output stream
    pub fn output_ref(&self) -> &W {
        &self.output
    }

    /// Flush pending output
    pub fn flush(&mut self) -> Result<()> {
        self.output
            .flush()
            .map_err(|e| Error::from(e).with_operation("host::flush"))
    }

    /// Take the streams back
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: Read, W: Write> Host for StreamHost<R, W> {
    fn output(&mut self, byte: u8) -> Result<()> {
        self.output
            .write_all(&[byte])
            .map_err(|e| Error::from(e).with_operation("host::output"))
    }

    fn input(&mut self) -> Result<Option<u8>> {
        // Anything written so far must be visible before blocking on input.
        self.flush()?;

        let mut buf = [0u8; 1];
        loop {
            match self.input.read(&mut buf) {
                Ok(0) => return Ok(Some(0)),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == IoErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::from(e).with_operation("host::input")),
            }
        }
    }

    fn swap(&mut self, byte: u8) -> Option<u8> {
        Some(std::mem::replace(&mut self.buffer, byte))
    }
}

/// Host for arena agents: no I/O, no buffer
#[derive(Debug, Clone, Copy, Default)]
pub struct ArenaHost;

impl Host for ArenaHost {
    fn output(&mut self, _byte: u8) -> Result<()> {
        Ok(())
    }

    fn input(&mut self) -> Result<Option<u8>> {
        Ok(None)
    }

    fn swap(&mut self, _byte: u8) -> Option<u8> {
        None
    }
}
