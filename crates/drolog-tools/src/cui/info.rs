use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use comfy_table::{Cell, ContentArrangement, Table, presets::NOTHING};

use drolog::dro::{Codemap, DroHeader, open_and_validate};

const FILESIZE_SUFFIXES: [&str; 7] = ["bytes", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// Codemap dump width, in entries per line.
const CODEMAP_COLUMNS: usize = 6;

/// Human-readable file size with four significant digits, e.g. `1.5 KiB`.
pub(crate) fn format_file_size(size: u64) -> String {
    let order = if size == 0 {
        0
    } else {
        (63 - size.leading_zeros() as usize) / 10
    };
    let scaled = size as f64 / (1u64 << (order * 10)) as f64;
    let int_digits = if scaled >= 1.0 {
        scaled.log10().floor() as usize + 1
    } else {
        1
    };
    let mut number = format!("{:.*}", 4usize.saturating_sub(int_digits), scaled);
    if number.contains('.') {
        number = number.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    format!("{} {}", number, FILESIZE_SUFFIXES[order])
}

/// Song length as `H:MM:SS.mmm`.
pub(crate) fn format_length(length: Duration) -> String {
    let total_secs = length.as_secs();
    format!(
        "{}:{:02}:{:02}.{:03}",
        total_secs / 3600,
        (total_secs / 60) % 60,
        total_secs % 60,
        length.subsec_millis()
    )
}

/// Modification time in `asctime` layout, e.g. `Tue Mar  5 07:08:09 2024`.
pub(crate) fn format_modified(time: DateTime<Local>) -> String {
    time.format("%a %b %e %H:%M:%S %Y").to_string()
}

/// Codemap entries laid out column-major, `CODEMAP_COLUMNS` per line.
pub(crate) fn format_codemap(codemap: &Codemap) -> Vec<String> {
    let entries = codemap.as_bytes();
    let rows = entries.len().div_ceil(CODEMAP_COLUMNS);
    (0..rows)
        .map(|row| {
            (0..CODEMAP_COLUMNS)
                .map(|col| row + col * rows)
                .take_while(|index| *index < entries.len())
                .map(|index| format!("0x{:02X}: 0x{:02X}", index, entries[index]))
                .collect::<Vec<_>>()
                .join("   ")
        })
        .collect()
}

/// Key/value rows describing a capture, in display order.
pub(crate) fn summarize(
    path: &Path,
    file_size: Option<u64>,
    modified: Option<DateTime<Local>>,
    header: &DroHeader,
) -> Vec<(String, String)> {
    let size = match file_size {
        Some(bytes) => format!("{} ({} bytes)", format_file_size(bytes), bytes),
        None => "(unknown)".to_string(),
    };
    let modified = match modified {
        Some(time) => format_modified(time),
        None => "(unknown)".to_string(),
    };
    vec![
        ("Filename".into(), path.display().to_string()),
        ("Size".into(), size),
        ("Modified".into(), modified),
        (
            "DRO version".into(),
            format!("{}.{}", header.version_major, header.version_minor),
        ),
        (
            "Length".into(),
            format!(
                "{} ({} ms, {} register/value pairs)",
                format_length(header.duration()),
                header.length_ms,
                header.length_pairs
            ),
        ),
        (
            "Hardware".into(),
            format!(
                "{} (id={})",
                header.hardware_type.name(),
                u8::from(header.hardware_type)
            ),
        ),
        (
            "Format".into(),
            format!("{} (id={})", header.format.name(), u8::from(header.format)),
        ),
        (
            "Compression".into(),
            format!(
                "{} (id={})",
                header.compression.name(),
                u8::from(header.compression)
            ),
        ),
        (
            "Delay codes".into(),
            format!(
                "{}/0x{:02X} (short)\n{}/0x{:02X} (long)",
                header.short_delay_code,
                header.short_delay_code,
                header.long_delay_code,
                header.long_delay_code
            ),
        ),
        (
            "Codemap table".into(),
            format!("{} entries", header.codemap_length),
        ),
    ]
}

/// Print the summary table and, if `show_codemap`, the codemap dump.
pub(crate) fn print_info(path: &Path, header: &DroHeader, codemap: &Codemap, show_codemap: bool) {
    let metadata = path.metadata().ok();
    let file_size = metadata.as_ref().map(|m| m.len());
    let modified = metadata
        .and_then(|m| m.modified().ok())
        .map(DateTime::<Local>::from);

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    for (key, value) in summarize(path, file_size, modified, header) {
        // split multi-line values into per-line rows so columns stay aligned
        for (i, line) in value.split('\n').enumerate() {
            let key_cell = if i == 0 {
                Cell::new(format!("{}:", key))
            } else {
                Cell::new("")
            };
            table.add_row(vec![key_cell, Cell::new(line)]);
        }
    }
    println!("{}", table);

    if show_codemap {
        println!();
        for line in format_codemap(codemap) {
            println!("{}", line);
        }
    }
}

/// Info command: validate a DRO file and print its header.
pub fn run_info(path: &Path, show_codemap: bool) -> Result<()> {
    let reader = open_and_validate(path)
        .with_context(|| format!("failed to read DRO file: {}", path.display()))?;
    print_info(path, reader.header(), reader.codemap(), show_codemap);
    Ok(())
}
