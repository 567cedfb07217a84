//! Replaying a capture through the OPL2 state machine.
//!
//! A [`Transcoder`] owns everything one pass needs: the delay codes, the
//! codemap and a fresh [`Opl2State`]. [`Transcode`] drives it lazily over
//! a [`Pairs`] iterator, yielding one [`TranscodedPair`] per input pair in
//! input order.
//!
//! Pairs have to be processed in stream order. Whether a level write is
//! audible depends on algorithm registers written earlier in the stream.

use std::io::Read;

use tracing::{trace, warn};

use super::codemap::Codemap;
use super::command::{Bank, PairKind, RawPair};
use super::error::DroError;
use super::header::DroHeader;
use super::reader::Pairs;
use crate::chip::state::{Attenuation, LevelReduction, Opl2State};

/// One pair after transcoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscodedPair {
    /// 1-based position in the pair stream
    pub position: u32,
    /// The pair as read
    pub input: RawPair,
    pub kind: PairKind,
    /// Value to emit in place of `input.value`
    pub value: u8,
}

impl TranscodedPair {
    pub fn bank(&self) -> Bank {
        self.input.bank()
    }

    pub fn is_modified(&self) -> bool {
        self.value != self.input.value
    }

    /// The pair to write: original register byte, adjusted value.
    pub fn output(&self) -> RawPair {
        RawPair::new(self.input.register, self.value)
    }
}

/// How the pair stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// Every pair the header promised was read.
    Complete,
    /// The input ran out early; only `read` of `expected` pairs exist.
    Truncated { expected: u32, read: u32 },
}

/// Counters for a finished (or in-progress) pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscodeSummary {
    pub pairs_read: u32,
    pub pairs_modified: u32,
    pub end: StreamEnd,
}

/// Per-pass transcoding state.
#[derive(Debug, Clone)]
pub struct Transcoder<A> {
    short_delay_code: u8,
    long_delay_code: u8,
    codemap: Codemap,
    state: Opl2State,
    attenuation: A,
}

impl<A: Attenuation> Transcoder<A> {
    pub fn new(header: &DroHeader, codemap: Codemap, attenuation: A) -> Self {
        Self {
            short_delay_code: header.short_delay_code,
            long_delay_code: header.long_delay_code,
            codemap,
            state: Opl2State::new(),
            attenuation,
        }
    }

    /// Decide what a raw pair means.
    ///
    /// Delay codes are matched against the masked register byte before any
    /// codemap lookup, so a delay code never needs a codemap entry.
    pub fn classify(&self, pair: RawPair) -> Result<PairKind, DroError> {
        let index = pair.index();
        if index == self.short_delay_code {
            Ok(PairKind::ShortDelay)
        } else if index == self.long_delay_code {
            Ok(PairKind::LongDelay)
        } else {
            Ok(PairKind::Write {
                register: self.codemap.resolve(index)?,
            })
        }
    }

    /// Transcode one pair. `position` is carried through for reporting.
    pub fn process(&mut self, position: u32, pair: RawPair) -> Result<TranscodedPair, DroError> {
        let kind = self.classify(pair)?;
        let value = match kind {
            PairKind::ShortDelay | PairKind::LongDelay => pair.value,
            PairKind::Write { register } => {
                let (_, value) = self.state.apply(register, pair.value, &self.attenuation)?;
                value
            }
        };
        Ok(TranscodedPair {
            position,
            input: pair,
            kind,
            value,
        })
    }

    /// Register state replayed so far.
    pub fn state(&self) -> &Opl2State {
        &self.state
    }
}

/// Lazy transcoding pass over a pair stream.
///
/// Yields `Ok` for every pair read and stops at the first error. Consumes
/// its input; once it returns `None` it stays exhausted.
#[derive(Debug)]
pub struct Transcode<R, A> {
    pairs: Pairs<R>,
    transcoder: Transcoder<A>,
    modified: u32,
    done: bool,
}

impl<R: Read, A: Attenuation> Transcode<R, A> {
    pub fn new(pairs: Pairs<R>, transcoder: Transcoder<A>) -> Self {
        Self {
            pairs,
            transcoder,
            modified: 0,
            done: false,
        }
    }

    /// Counters so far. `end` is only meaningful once iteration finished.
    pub fn summary(&self) -> TranscodeSummary {
        let end = if self.pairs.is_truncated() {
            StreamEnd::Truncated {
                expected: self.pairs.expected(),
                read: self.pairs.read(),
            }
        } else {
            StreamEnd::Complete
        };
        TranscodeSummary {
            pairs_read: self.pairs.read(),
            pairs_modified: self.modified,
            end,
        }
    }

    pub fn transcoder(&self) -> &Transcoder<A> {
        &self.transcoder
    }
}

impl<R: Read, A: Attenuation> Iterator for Transcode<R, A> {
    type Item = Result<TranscodedPair, DroError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let pair = match self.pairs.next() {
            Some(Ok(pair)) => pair,
            Some(Err(e)) => {
                self.done = true;
                return Some(Err(e));
            }
            None => {
                self.done = true;
                if self.pairs.is_truncated() {
                    warn!(
                        expected = self.pairs.expected(),
                        read = self.pairs.read(),
                        "input ended before the header's pair count"
                    );
                }
                return None;
            }
        };

        let result = self.transcoder.process(self.pairs.read(), pair);
        match &result {
            Ok(out) if out.is_modified() => {
                self.modified += 1;
                trace!(
                    position = out.position,
                    register = ?out.kind,
                    from = out.input.value,
                    to = out.value,
                    "level adjusted"
                );
            }
            Ok(_) => {}
            Err(_) => self.done = true,
        }
        Some(result)
    }
}

/// Transcode the pairs in `stream` with a [`LevelReduction`] of `reduction`.
///
/// `stream` must be positioned at the first pair, as left by
/// [`DroReader::into_parts`](super::DroReader::into_parts).
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use drolog::dro::{Codemap, DroHeader, transcode};
///
/// let header = DroHeader {
///     length_pairs: 1,
///     short_delay_code: 0x00,
///     long_delay_code: 0x02,
///     codemap_length: 2,
///     ..DroHeader::default()
/// };
/// let codemap = Codemap::new(vec![0x00, 0x43]);
///
/// let pairs: Vec<_> = transcode(Cursor::new(vec![0x01, 0x25]), &header, &codemap, 5)
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(pairs[0].value, 0x20);
/// ```
pub fn transcode<R: Read>(
    stream: R,
    header: &DroHeader,
    codemap: &Codemap,
    reduction: u32,
) -> Transcode<R, LevelReduction> {
    let transcoder = Transcoder::new(header, codemap.clone(), LevelReduction::new(reduction));
    Transcode::new(Pairs::new(stream, header.length_pairs), transcoder)
}
