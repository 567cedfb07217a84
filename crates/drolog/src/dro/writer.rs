//! Emitting a transcoded capture.

use std::io::Write;

use super::codemap::Codemap;
use super::error::DroError;
use super::header::DroHeader;
use super::transcode::TranscodedPair;

/// Write `header`, `codemap` and every pair of `pairs` to `out`.
///
/// The header and codemap are written byte-identical to the input. Pairs
/// are written as they arrive; the first `Err` in `pairs` stops writing and
/// is returned, leaving whatever was already written in `out`.
///
/// Returns the number of pairs written.
pub fn write_output<W, I>(
    mut out: W,
    header: &DroHeader,
    codemap: &Codemap,
    pairs: I,
) -> Result<u32, DroError>
where
    W: Write,
    I: IntoIterator<Item = Result<TranscodedPair, DroError>>,
{
    out.write_all(&header.to_bytes())
        .map_err(DroError::WriteFailed)?;
    out.write_all(codemap.as_bytes())
        .map_err(DroError::WriteFailed)?;

    let mut written = 0u32;
    for pair in pairs {
        out.write_all(&pair?.output().to_bytes())
            .map_err(DroError::WriteFailed)?;
        written += 1;
    }

    out.flush().map_err(DroError::WriteFailed)?;
    Ok(written)
}
