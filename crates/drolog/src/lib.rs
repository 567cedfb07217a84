#![doc = include_str!("../README.md")]
//! drolog — register-stream transcoder for DOSBox raw OPL captures
//!
//! `drolog` reads DRO v2 files (register writes captured from an emulated
//! OPL2 / Dual OPL2 / OPL3) and rewrites them so that the music plays
//! quieter, without touching timing, instruments or notes.
//!
//! Key features:
//! - Header and codemap parsing with signature validation.
//! - A full OPL2 register model that knows, for every level write, whether
//!   the operator is audible (carrier, or either operator in additive mode).
//! - Attenuation limited to the 6-bit total level; key-scale-level bits and
//!   every other register are passed through untouched.
//! - A lazy, single-pass transcoder that preserves file size and pair
//!   order.
//!
//! Example: transcoding an in-memory capture
//!
//! ```rust
//! use std::io::Cursor;
//! use drolog::dro::{DroHeader, DroReader, transcode, write_output};
//!
//! let header = DroHeader {
//!     length_pairs: 2,
//!     codemap_length: 2,
//!     ..DroHeader::default()
//! };
//! let mut bytes = header.to_bytes().to_vec();
//! bytes.extend_from_slice(&[0xC1, 0x43]); // codemap
//! bytes.extend_from_slice(&[0x00, 0x00]); // 0xC1 <- FM
//! bytes.extend_from_slice(&[0x01, 0x25]); // 0x43 <- level 0x25
//!
//! let reader = DroReader::new(Cursor::new(bytes.clone())).unwrap();
//! let (header, codemap, stream) = reader.into_parts();
//!
//! let mut out = Vec::new();
//! let pairs = transcode(stream, &header, &codemap, 5);
//! write_output(&mut out, &header, &codemap, pairs).unwrap();
//!
//! assert_eq!(out.len(), bytes.len());
//! assert_eq!(out[out.len() - 1], 0x20);
//! ```
//!
//! Example: file to file
//!
//! ```no_run
//! use std::path::Path;
//! use drolog::dro::{QuietOptions, quiet_file};
//!
//! let options = QuietOptions { reduction: 5, overwrite: false };
//! let summary = quiet_file(
//!     Path::new("song.dro"),
//!     Path::new("song-quiet.dro"),
//!     &options,
//!     |_pair| {},
//! )
//! .expect("transcoding failed");
//! println!("{} of {} pairs changed", summary.pairs_modified, summary.pairs_read);
//! ```
mod binutil;
pub mod chip;
pub mod dro;

pub use binutil::ParseError;
pub use dro::{DroError, DroHeader, DroReader};
