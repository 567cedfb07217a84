//! Compact-index to register translation table.

use std::io::{self, Read};

use super::error::DroError;
use crate::binutil::ParseError;

/// Per-file table mapping compact in-stream register indices to real OPL
/// register numbers.
///
/// Index `i` of the table is the register written by a pair whose masked
/// register byte is `i`. Any byte is a valid entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Codemap(Vec<u8>);

impl Codemap {
    pub fn new(entries: Vec<u8>) -> Self {
        Self(entries)
    }

    /// Real register for a compact index.
    ///
    /// # Errors
    ///
    /// `CodemapIndexOutOfRange` when the table has no entry for `index`.
    pub fn resolve(&self, index: u8) -> Result<u8, DroError> {
        self.0
            .get(index as usize)
            .copied()
            .ok_or(DroError::CodemapIndexOutOfRange {
                index,
                len: self.0.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }
}

impl From<Vec<u8>> for Codemap {
    fn from(entries: Vec<u8>) -> Self {
        Self::new(entries)
    }
}

/// Read exactly `length` codemap entries from `stream`.
pub fn read_codemap<R: Read>(stream: &mut R, length: u8) -> Result<Codemap, DroError> {
    let mut entries = vec![0u8; length as usize];
    stream.read_exact(&mut entries).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            DroError::Parse(ParseError::UnexpectedEof)
        } else {
            DroError::io("could not read codemap", e)
        }
    })?;
    Ok(Codemap(entries))
}
