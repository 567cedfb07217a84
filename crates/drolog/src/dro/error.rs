use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::binutil::ParseError;
use crate::chip::opl2::UnmappedLevelRegister;

/// Errors raised while opening, transcoding or writing a DRO capture.
///
/// Every variant is fatal for the pass it occurs in. A capture that ends
/// before its header's pair count is not an error; see
/// [`StreamEnd::Truncated`](super::StreamEnd::Truncated).
#[derive(Debug, Error)]
pub enum DroError {
    #[error("input file does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("input path is not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("output file exists and overwrite is not set: {}", .0.display())]
    OutputAlreadyExists(PathBuf),

    /// Input and output resolve to the same file.
    #[error("output would overwrite the input file: {}", .0.display())]
    SameFile(PathBuf),

    /// The first eight bytes were not `DBRAWOPL`.
    #[error("input is not a valid DOSBox DRO file (signature {0:02X?})")]
    BadSignature([u8; 8]),

    #[error("malformed DRO data: {0}")]
    Parse(ParseError),

    /// A compact register index had no codemap entry.
    #[error("register index 0x{index:02X} is outside the {len}-entry codemap")]
    CodemapIndexOutOfRange { index: u8, len: usize },

    #[error(transparent)]
    UnmappedLevelRegister(#[from] UnmappedLevelRegister),

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write output")]
    WriteFailed(#[source] io::Error),
}

impl DroError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        DroError::Io {
            context: context.into(),
            source,
        }
    }
}

impl From<ParseError> for DroError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::InvalidSignature(signature) => DroError::BadSignature(signature),
            other => DroError::Parse(other),
        }
    }
}
