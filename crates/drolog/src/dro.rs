//! DOSBox raw OPL (DRO v2) captures.
//!
//! A capture is a 26-byte [`DroHeader`], a [`Codemap`] of
//! `codemap_length` bytes and `length_pairs` two-byte register/value pairs.
//!
//! Typical flow:
//!
//! 1. [`open_and_validate`] parses the header and codemap.
//! 2. [`transcode`] replays the pairs through an OPL2 register model,
//!    lowering audible operator levels.
//! 3. [`write_output`] emits the header, the codemap and the new pairs.
//!
//! [`quiet_file`] runs all three for a pair of paths.
mod codemap;
mod command;
mod error;
mod header;
mod quiet;
mod reader;
mod transcode;
mod writer;

pub use codemap::{Codemap, read_codemap};
pub use command::{BANK_SELECT, Bank, PairKind, RawPair};
pub use error::DroError;
pub use header::{
    Compression, DRO_HEADER_SIZE, DRO_SIGNATURE, DroHeader, Format, HardwareType, parse_header,
};
pub use quiet::{QuietOptions, check_distinct, check_output, quiet_file, quiet_to_path};
pub use reader::{DroReader, Pairs, check_input, open_and_validate, read_header};
pub use transcode::{
    StreamEnd, Transcode, TranscodeSummary, TranscodedPair, Transcoder, transcode,
};
pub use writer::write_output;
