//! Reader for the pickled payloads used by navigation records.
//!
//! A pickle is a `u32` body size followed by 4-byte aligned fields. Strings
//! are an `i32` length and the data, padded to the next 4-byte boundary:
//! UTF-8 strings count bytes, UTF-16 strings count code units.

use byteorder::{LittleEndian, ReadBytesExt};

const ALIGN: usize = 4;

/// Why a pickle field could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickleError {
    /// Field needs bytes up to `needed` but the payload has `available`.
    Short { needed: usize, available: usize },
    /// A string declared a negative length.
    NegativeLength,
}

/// Decoded text and whether any of it had to be replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub value: String,
    pub malformed: bool,
}

pub struct PickleReader<'a> {
    payload: &'a [u8],
    body_end: usize,
    pos: usize,
}

impl<'a> PickleReader<'a> {
    /// Reads the pickle header. The declared body size is trusted only as
    /// far as the payload actually extends.
    pub fn new(payload: &'a [u8]) -> Result<Self, PickleError> {
        let mut header = payload.get(..ALIGN).ok_or(PickleError::Short {
            needed: ALIGN,
            available: payload.len(),
        })?;
        let declared = header.read_u32::<LittleEndian>().unwrap_or(0) as usize;
        let body_end = ALIGN.saturating_add(declared).min(payload.len());
        Ok(Self {
            payload,
            body_end,
            pos: ALIGN,
        })
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], PickleError> {
        let end = self.pos.checked_add(len).ok_or(PickleError::Short {
            needed: usize::MAX,
            available: self.body_end,
        })?;
        if end > self.body_end {
            return Err(PickleError::Short {
                needed: end,
                available: self.body_end,
            });
        }
        let bytes = &self.payload[self.pos..end];
        // Trailing padding may be cut off at the very end of the body.
        self.pos = align_up(end).min(self.body_end);
        Ok(bytes)
    }

    pub fn read_i32(&mut self) -> Result<i32, PickleError> {
        let mut bytes = self.take(4)?;
        Ok(bytes.read_i32::<LittleEndian>().unwrap_or(0))
    }

    fn read_len(&mut self) -> Result<usize, PickleError> {
        let len = self.read_i32()?;
        usize::try_from(len).map_err(|_| PickleError::NegativeLength)
    }

    /// Reads a UTF-8 string, replacing invalid sequences with U+FFFD.
    pub fn read_string(&mut self) -> Result<Text, PickleError> {
        let len = self.read_len()?;
        let bytes = self.take(len)?;
        Ok(match std::str::from_utf8(bytes) {
            Ok(s) => Text {
                value: s.to_string(),
                malformed: false,
            },
            Err(_) => Text {
                value: String::from_utf8_lossy(bytes).into_owned(),
                malformed: true,
            },
        })
    }

    /// Reads a UTF-16LE string, replacing unpaired surrogates with U+FFFD.
    pub fn read_string16(&mut self) -> Result<Text, PickleError> {
        let units = self.read_len()?;
        let byte_len = units.checked_mul(2).ok_or(PickleError::Short {
            needed: usize::MAX,
            available: self.body_end,
        })?;
        let bytes = self.take(byte_len)?;
        Ok(decode_utf16_lossy(bytes))
    }
}

fn align_up(n: usize) -> usize {
    n.div_ceil(ALIGN) * ALIGN
}

/// Decodes little-endian UTF-16 code units without failing.
pub fn decode_utf16_lossy(bytes: &[u8]) -> Text {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
    let mut malformed = false;
    let value = char::decode_utf16(units)
        .map(|unit| {
            unit.unwrap_or_else(|_| {
                malformed = true;
                char::REPLACEMENT_CHARACTER
            })
        })
        .collect();
    Text { value, malformed }
}
