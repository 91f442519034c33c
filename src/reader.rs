//! Scalar and codepoint reads over the lookahead buffer.

use std::io::Read;

use crate::peek::PeekReader;
use crate::Result;

pub const REPLACEMENT: char = '\u{FFFD}';

const CONT_MASK: u8 = 0xC0;
const CONT_BITS: u8 = 0x80;

/// Reads raw bytes, big-endian shorts, and strictly validated UTF-8 scalar
/// values from a byte source.
///
/// The UTF-8 path is stricter than `str::from_utf8`: overlong encodings,
/// lone continuation or start bytes, the impossible bytes `0xFE`/`0xFF`, and
/// encoded UTF-16 surrogates all decode to U+FFFD without desynchronizing
/// the stream. A byte that fails the continuation check is left unconsumed;
/// only bytes belonging to the attempted sequence are eaten.
pub struct ValueReader<R: Read> {
    input: PeekReader<R>,
}

impl<R: Read> ValueReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            input: PeekReader::new(inner),
        }
    }

    pub fn peek(&mut self) -> Result<Option<u8>> {
        self.input.peek()
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        self.input.read_byte()
    }

    /// Two bytes, big-endian, unsigned.
    pub fn read_short(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.input.read_exact(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.input.read_exact(buf)
    }

    pub fn position(&self) -> u64 {
        self.input.position()
    }

    /// Decodes exactly one UTF-8 scalar value.
    ///
    /// End of stream before the lead byte is `EndOfStream`; end of stream
    /// inside a sequence yields U+FFFD like any other malformed sequence.
    pub fn read_utf8_codepoint(&mut self) -> Result<char> {
        let lead = self.read_byte()?;

        let (len, mut scalar) = match lead {
            0x00..=0x7F => return Ok(lead as char),
            0xC0..=0xDF => (2usize, (lead & 0x1F) as u32),
            0xE0..=0xEF => (3, (lead & 0x0F) as u32),
            0xF0..=0xF7 => (4, (lead & 0x07) as u32),
            // Lone continuation bytes, 5/6-byte lead forms, 0xFE, 0xFF.
            _ => return Ok(REPLACEMENT),
        };

        for _ in 1..len {
            match self.input.peek()? {
                Some(byte) if byte & CONT_MASK == CONT_BITS => {
                    self.input.read_byte()?;
                    scalar = (scalar << 6) | (byte & 0x3F) as u32;
                }
                // Not a continuation byte (or EOF): leave it unconsumed and
                // substitute for the truncated sequence.
                _ => return Ok(REPLACEMENT),
            }
        }

        let min = match len {
            2 => 0x80,
            3 => 0x800,
            _ => 0x1_0000,
        };
        if scalar < min {
            // Overlong: representable in a shorter sequence.
            return Ok(REPLACEMENT);
        }
        if (0xD800..=0xDFFF).contains(&scalar) || scalar > 0x10_FFFF {
            return Ok(REPLACEMENT);
        }

        Ok(char::from_u32(scalar).unwrap_or(REPLACEMENT))
    }
}
