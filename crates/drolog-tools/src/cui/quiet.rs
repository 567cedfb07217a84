use std::path::PathBuf;

use anyhow::{Context, Result};

use drolog::dro::{
    PairKind, QuietOptions, TranscodedPair, check_distinct, check_input, check_output,
    open_and_validate, quiet_to_path,
};

use super::info::print_info;

/// Arguments of the `quiet` subcommand.
#[derive(Debug, Clone)]
pub struct QuietArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub level: u32,
    pub overwrite: bool,
    pub verbose: bool,
    pub silent: bool,
}

/// One trace line for a transcoded pair.
///
/// `Reg` is the real register for writes, `DLYS`/`DLYL` for delays. When
/// the value changed, the new value follows an arrow.
pub(crate) fn format_trace(pair: &TranscodedPair) -> String {
    let register = match pair.kind {
        PairKind::ShortDelay => "DLYS".to_string(),
        PairKind::LongDelay => "DLYL".to_string(),
        PairKind::Write { register } => format!("0x{:02X}", register),
    };
    let mut line = format!(
        "Pos: {:05}   Bank: {}   Reg: {}   Val: 0x{:02X}",
        pair.position,
        pair.bank().number(),
        register,
        pair.input.value
    );
    if pair.is_modified() {
        line.push_str(&format!(" -> 0x{:02X}", pair.value));
    }
    line
}

/// Quiet command: reduce the volume of `args.input` into `args.output`.
pub fn run_quiet(args: &QuietArgs) -> Result<()> {
    check_input(&args.input)?;
    check_distinct(&args.input, &args.output)?;
    check_output(&args.output, args.overwrite)?;

    let reader = open_and_validate(&args.input)
        .with_context(|| format!("failed to read DRO file: {}", args.input.display()))?;

    if !args.silent {
        print_info(&args.input, reader.header(), reader.codemap(), args.verbose);
        println!();
        println!("Reducing volume by {} levels.", args.level);
        if args.verbose {
            println!("Reading DRO file and logging events.");
        }
    }

    let options = QuietOptions {
        reduction: args.level,
        overwrite: args.overwrite,
    };
    let trace = args.verbose && !args.silent;
    let summary = quiet_to_path(reader, &args.output, &options, |pair| {
        if trace {
            println!("{}", format_trace(pair));
        }
    })
    .with_context(|| format!("failed to write DRO file: {}", args.output.display()))?;

    if !args.silent {
        if args.verbose {
            println!();
            println!(
                "{} of {} pairs changed.",
                summary.pairs_modified, summary.pairs_read
            );
        }
        println!("Wrote new DRO file: {}", args.output.display());
    }
    Ok(())
}
