//! Forward-only byte cursor over one packet body
//!
//! Every decode routine is built from these reads. A read either consumes
//! exactly the bytes it reports or fails with
//! [`DecodeError::BufferUnderrun`] and leaves the position untouched.
//!
//! # Text
//! - ASCII: one byte per character, decoded as Latin-1.
//! - UTF-8: `len` counts bytes.
//! - Unicode LE/BE: UTF-16, `len` counts characters, so `2 * len` bytes are consumed.
//!
//! Fixed-length reads consume the full width and truncate the returned text
//! at the first NUL. NUL-terminated reads consume the terminator; when no
//! terminator is present they consume the rest of the body.

use bytes::Buf;
use uodecode_core::{DecodeError, Result};

/// Cursor over a packet body (header already stripped)
#[derive(Debug, Clone)]
pub struct PacketReader<'a> {
    buf: &'a [u8],
    len: usize,
}

impl<'a> PacketReader<'a> {
    pub fn new(body: &'a [u8]) -> Self {
        Self {
            buf: body,
            len: body.len(),
        }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.len - self.buf.remaining()
    }

    /// Unread byte count
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    pub fn is_empty(&self) -> bool {
        !self.buf.has_remaining()
    }

    #[inline]
    fn ensure(&self, n: usize) -> Result<()> {
        if self.buf.remaining() < n {
            return Err(DecodeError::underrun(n, self.buf.remaining()));
        }
        Ok(())
    }

    /// Advance without returning data
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.buf.advance(n);
        Ok(())
    }

    /// Discard whatever is left, returning how many bytes were dropped
    pub fn skip_remaining(&mut self) -> usize {
        let n = self.buf.remaining();
        self.buf.advance(n);
        n
    }

    /// Next `n` raw bytes
    pub fn read_array(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    #[inline]
    pub fn read_i8(&mut self) -> Result<i8> {
        self.ensure(1)?;
        Ok(self.buf.get_i8())
    }

    /// One byte, nonzero is true
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.buf.get_u16())
    }

    #[inline]
    pub fn read_u16_le(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.buf.get_u16_le())
    }

    #[inline]
    pub fn read_i16(&mut self) -> Result<i16> {
        self.ensure(2)?;
        Ok(self.buf.get_i16())
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.buf.get_u32())
    }

    #[inline]
    pub fn read_u32_le(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.buf.get_u32_le())
    }

    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(self.buf.get_i32())
    }

    #[inline]
    pub fn read_u64(&mut self) -> Result<u64> {
        self.ensure(8)?;
        Ok(self.buf.get_u64())
    }

    /// Big-endian u16 without advancing
    pub fn peek_u16(&self) -> Result<u16> {
        self.ensure(2)?;
        Ok(u16::from_be_bytes([self.buf[0], self.buf[1]]))
    }

    /// Fixed-width single-byte text
    pub fn read_ascii(&mut self, len: usize) -> Result<String> {
        let raw = self.read_array(len)?;
        Ok(latin1(until_nul(raw)))
    }

    /// NUL-terminated single-byte text
    pub fn read_ascii_nul(&mut self) -> Result<String> {
        let raw = self.take_until_nul(1);
        Ok(latin1(raw))
    }

    /// Fixed-width UTF-8 text, `len` in bytes
    pub fn read_utf8(&mut self, len: usize) -> Result<String> {
        let raw = self.read_array(len)?;
        Ok(String::from_utf8_lossy(until_nul(raw)).into_owned())
    }

    /// NUL-terminated UTF-8 text
    pub fn read_utf8_nul(&mut self) -> Result<String> {
        let raw = self.take_until_nul(1);
        Ok(String::from_utf8_lossy(raw).into_owned())
    }

    /// Fixed-width little-endian UTF-16, `len` in characters
    pub fn read_unicode_le(&mut self, len: usize) -> Result<String> {
        let raw = self.read_array(len * 2)?;
        Ok(utf16(raw, u16::from_le_bytes))
    }

    /// NUL-terminated little-endian UTF-16
    pub fn read_unicode_le_nul(&mut self) -> Result<String> {
        let raw = self.take_until_nul(2);
        Ok(utf16(raw, u16::from_le_bytes))
    }

    /// Fixed-width big-endian UTF-16, `len` in characters
    pub fn read_unicode_be(&mut self, len: usize) -> Result<String> {
        let raw = self.read_array(len * 2)?;
        Ok(utf16(raw, u16::from_be_bytes))
    }

    /// NUL-terminated big-endian UTF-16
    pub fn read_unicode_be_nul(&mut self) -> Result<String> {
        let raw = self.take_until_nul(2);
        Ok(utf16(raw, u16::from_be_bytes))
    }

    /// Consume units of `width` bytes up to and including an all-zero unit.
    /// Returns the bytes before the terminator. Without a terminator the
    /// rest of the body is consumed.
    fn take_until_nul(&mut self, width: usize) -> &'a [u8] {
        let body = self.buf;
        let end = body
            .chunks_exact(width)
            .position(|unit| unit.iter().all(|&b| b == 0))
            .map(|i| i * width);

        match end {
            Some(end) => {
                self.buf = &body[end + width..];
                &body[..end]
            }
            None => {
                self.buf = &body[body.len()..];
                &body[..body.len() - body.len() % width]
            }
        }
    }
}

fn until_nul(raw: &[u8]) -> &[u8] {
    match raw.iter().position(|&b| b == 0) {
        Some(end) => &raw[..end],
        None => raw,
    }
}

fn latin1(raw: &[u8]) -> String {
    raw.iter().map(|&b| b as char).collect()
}

fn utf16(raw: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let units = raw
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .take_while(|&u| u != 0);

    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}
