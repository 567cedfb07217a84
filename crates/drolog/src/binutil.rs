//! Utilities used by parsers: parse error type and byte readers/writers.
use thiserror::Error;

/// Error type returned by the parsing helpers in this module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input ended unexpectedly while the parser was expecting more bytes.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// An attempted read was outside the available buffer range.
    ///
    /// - `offset` is the index that was attempted to be accessed.
    /// - `needed` is the number of bytes required for the operation.
    /// - `available` is the current buffer length.
    #[error("offset out of range: 0x{offset:X} (needed {needed} bytes, available {available})")]
    OffsetOutOfRange {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A header was shorter than the minimum required length.
    ///
    /// The contained `String` identifies which header was too short.
    #[error("header too short: {0}")]
    HeaderTooShort(String),

    /// The eight-byte file signature did not match `DBRAWOPL`.
    ///
    /// The contained array is the raw 8 bytes that were read.
    #[error("invalid signature: {0:02X?}")]
    InvalidSignature([u8; 8]),
}

/// Read a 32-bit little-endian unsigned integer from `bytes` at `off`.
pub fn read_u32_le_at(bytes: &[u8], off: usize) -> Result<u32, ParseError> {
    let mut tmp: [u8; 4] = [0; 4];
    tmp.copy_from_slice(read_slice(bytes, off, 4)?);
    Ok(u32::from_le_bytes(tmp))
}

/// Read a 16-bit little-endian unsigned integer from `bytes` at `off`.
pub fn read_u16_le_at(bytes: &[u8], off: usize) -> Result<u16, ParseError> {
    let mut tmp: [u8; 2] = [0; 2];
    tmp.copy_from_slice(read_slice(bytes, off, 2)?);
    Ok(u16::from_le_bytes(tmp))
}

/// Read a single byte from `bytes` at `off`.
///
/// Returns `Err(ParseError::OffsetOutOfRange)` when `off` is out of bounds.
pub fn read_u8_at(bytes: &[u8], off: usize) -> Result<u8, ParseError> {
    bytes
        .get(off)
        .copied()
        .ok_or(ParseError::OffsetOutOfRange {
            offset: off,
            needed: 1,
            available: bytes.len(),
        })
}

/// Return a borrowed slice of length `len` starting at `off` from `bytes`.
///
/// Returns `Err(ParseError::OffsetOutOfRange)` when the requested range
/// exceeds the available buffer.
pub fn read_slice(bytes: &[u8], off: usize, len: usize) -> Result<&[u8], ParseError> {
    if bytes.len() < off + len {
        return Err(ParseError::OffsetOutOfRange {
            offset: off,
            needed: len,
            // Remaining number of bytes from `off` to the end of the buffer.
            available: bytes.len().saturating_sub(off),
        });
    }
    Ok(&bytes[off..off + len])
}

/// Write a 32-bit little-endian unsigned integer `v` into `buf` at `off`.
///
/// Does not perform bounds checking; callers must ensure the destination
/// range is valid.
pub fn write_u32(buf: &mut [u8], off: usize, v: u32) {
    buf[off..off + 4].copy_from_slice(&v.to_le_bytes());
}

/// Write a 16-bit little-endian unsigned integer `v` into `buf` at `off`.
pub fn write_u16(buf: &mut [u8], off: usize, v: u16) {
    buf[off..off + 2].copy_from_slice(&v.to_le_bytes());
}

/// Copy the contents of `s` into `buf` starting at `off`.
pub fn write_slice(buf: &mut [u8], off: usize, s: &[u8]) {
    buf[off..off + s.len()].copy_from_slice(s);
}
