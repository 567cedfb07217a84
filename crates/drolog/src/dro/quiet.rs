//! File-to-file volume reduction.

use std::fs::{self, File};
use std::io::{BufWriter, Read};
use std::path::Path;

use tracing::debug;

use super::error::DroError;
use super::reader::{DroReader, check_input, open_and_validate};
use super::transcode::{TranscodeSummary, TranscodedPair, transcode};
use super::writer::write_output;
use crate::chip::state::LevelReduction;

/// Settings for [`quiet_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietOptions {
    /// Level steps subtracted from every audible operator
    pub reduction: u32,
    /// Replace `output` if it already exists
    pub overwrite: bool,
}

impl Default for QuietOptions {
    fn default() -> Self {
        Self {
            reduction: LevelReduction::DEFAULT_AMOUNT,
            overwrite: false,
        }
    }
}

/// Fail if `path` exists and `overwrite` is not set.
pub fn check_output(path: &Path, overwrite: bool) -> Result<(), DroError> {
    if path.exists() && !overwrite {
        return Err(DroError::OutputAlreadyExists(path.to_path_buf()));
    }
    Ok(())
}

/// Fail if `output` names the same file as `input`.
///
/// The input is read while the output is written, so quieting a file onto
/// itself would truncate it mid-read. Paths are compared after resolving
/// links and `.`/`..`; an output that does not exist yet always passes.
pub fn check_distinct(input: &Path, output: &Path) -> Result<(), DroError> {
    let Ok(output) = fs::canonicalize(output) else {
        return Ok(());
    };
    let input = fs::canonicalize(input).map_err(|e| {
        DroError::io(
            format!("could not resolve input path: {}", input.display()),
            e,
        )
    })?;
    if input == output {
        return Err(DroError::SameFile(output));
    }
    Ok(())
}

/// Reduce the volume of the capture at `input`, writing the result to
/// `output`.
///
/// `on_pair` sees every pair after transcoding, in stream order.
///
/// Nothing is created at `output` unless the input validates, `output` is a
/// different file from `input` and the overwrite check passes.
pub fn quiet_file<F>(
    input: &Path,
    output: &Path,
    options: &QuietOptions,
    on_pair: F,
) -> Result<TranscodeSummary, DroError>
where
    F: FnMut(&TranscodedPair),
{
    check_input(input)?;
    check_distinct(input, output)?;
    check_output(output, options.overwrite)?;
    let reader = open_and_validate(input)?;
    quiet_to_path(reader, output, options, on_pair)
}

/// Like [`quiet_file`] for a capture that was already opened.
///
/// The caller is responsible for [`check_distinct`] and [`check_output`].
pub fn quiet_to_path<R, F>(
    reader: DroReader<R>,
    output: &Path,
    options: &QuietOptions,
    mut on_pair: F,
) -> Result<TranscodeSummary, DroError>
where
    R: Read,
    F: FnMut(&TranscodedPair),
{
    let (header, codemap, stream) = reader.into_parts();
    let file = File::create(output).map_err(|e| {
        DroError::io(
            format!("could not open output file: {}", output.display()),
            e,
        )
    })?;

    let mut pass = transcode(stream, &header, &codemap, options.reduction);
    let written = write_output(
        BufWriter::new(file),
        &header,
        &codemap,
        pass.by_ref().inspect(|pair| {
            if let Ok(pair) = pair {
                on_pair(pair);
            }
        }),
    )?;

    let summary = pass.summary();
    debug!(
        written,
        modified = summary.pairs_modified,
        output = %output.display(),
        "wrote dro file"
    );
    Ok(summary)
}
