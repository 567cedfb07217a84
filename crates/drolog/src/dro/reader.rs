//! Opening a capture and iterating its raw pairs.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use tracing::debug;

use super::codemap::{Codemap, read_codemap};
use super::command::RawPair;
use super::error::DroError;
use super::header::{DRO_HEADER_SIZE, DroHeader};

/// A validated capture: header and codemap parsed, `stream` positioned at
/// the first pair.
#[derive(Debug)]
pub struct DroReader<R> {
    header: DroHeader,
    codemap: Codemap,
    stream: R,
}

impl<R: Read> DroReader<R> {
    /// Read and validate the header and codemap from `stream`.
    ///
    /// # Errors
    ///
    /// `BadSignature` if the stream does not start with `DBRAWOPL`, `Parse`
    /// if the header or codemap is cut short, `Io` on read failure.
    pub fn new(mut stream: R) -> Result<Self, DroError> {
        let header = read_header(&mut stream)?;
        let codemap = read_codemap(&mut stream, header.codemap_length)?;
        debug!(
            version = %format_args!("{}.{}", header.version_major, header.version_minor),
            pairs = header.length_pairs,
            length_ms = header.length_ms,
            hardware = header.hardware_type.name(),
            short_delay = header.short_delay_code,
            long_delay = header.long_delay_code,
            codemap_len = codemap.len(),
            "dro header"
        );
        Ok(Self {
            header,
            codemap,
            stream,
        })
    }

    pub fn header(&self) -> &DroHeader {
        &self.header
    }

    pub fn codemap(&self) -> &Codemap {
        &self.codemap
    }

    pub fn into_parts(self) -> (DroHeader, Codemap, R) {
        (self.header, self.codemap, self.stream)
    }

    /// Raw pairs that follow the codemap, at most `header.length_pairs`.
    pub fn into_pairs(self) -> Pairs<R> {
        Pairs::new(self.stream, self.header.length_pairs)
    }
}

/// Open `path` and validate it as a DRO capture.
///
/// # Errors
///
/// `InputNotFound` / `NotAFile` for a bad path, plus everything
/// [`DroReader::new`] returns.
pub fn open_and_validate(path: &Path) -> Result<DroReader<BufReader<File>>, DroError> {
    check_input(path)?;
    let file = File::open(path)
        .map_err(|e| DroError::io(format!("could not open input file: {}", path.display()), e))?;
    DroReader::new(BufReader::new(file))
}

/// Fail unless `path` names an existing regular file.
pub fn check_input(path: &Path) -> Result<(), DroError> {
    match path.metadata() {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(DroError::NotAFile(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(DroError::InputNotFound(path.to_path_buf()))
        }
        Err(e) => Err(DroError::io(
            format!("could not stat input file: {}", path.display()),
            e,
        )),
    }
}

/// Read the 26-byte header from the start of `stream`.
pub fn read_header<R: Read>(stream: &mut R) -> Result<DroHeader, DroError> {
    let mut bytes = Vec::with_capacity(DRO_HEADER_SIZE);
    stream
        .take(DRO_HEADER_SIZE as u64)
        .read_to_end(&mut bytes)
        .map_err(|e| DroError::io("could not read header", e))?;
    Ok(DroHeader::try_from(bytes.as_slice())?)
}

/// Iterator over the raw pairs of a capture.
///
/// Stops after `expected` pairs or at end of input, whichever comes first.
/// A trailing odd byte counts as end of input. Not restartable: it owns and
/// consumes the underlying stream.
#[derive(Debug)]
pub struct Pairs<R> {
    stream: R,
    expected: u32,
    read: u32,
    exhausted: bool,
}

impl<R: Read> Pairs<R> {
    pub fn new(stream: R, expected: u32) -> Self {
        Self {
            stream,
            expected,
            read: 0,
            exhausted: false,
        }
    }

    /// Pairs the header promised.
    pub fn expected(&self) -> u32 {
        self.expected
    }

    /// Pairs yielded so far.
    pub fn read(&self) -> u32 {
        self.read
    }

    /// True once the input ran out before `expected` pairs were read.
    pub fn is_truncated(&self) -> bool {
        self.exhausted && self.read < self.expected
    }
}

impl<R: Read> Iterator for Pairs<R> {
    type Item = Result<RawPair, DroError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted || self.read >= self.expected {
            return None;
        }

        let mut buf = [0u8; 2];
        match self.stream.read_exact(&mut buf) {
            Ok(()) => {
                self.read += 1;
                Some(Ok(RawPair::from(buf)))
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                self.exhausted = true;
                None
            }
            Err(e) => {
                self.exhausted = true;
                Some(Err(DroError::io("could not read register pair", e)))
            }
        }
    }
}
