use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cui;
use cui::info::run_info;
use cui::quiet::{QuietArgs, run_quiet};

/// drolog command line tools
#[derive(Parser)]
#[command(
    name = "drolog",
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show summary info for a DRO file
    Info {
        /// Input file to read
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Also dump the codemap table
        #[arg(long)]
        codemap: bool,
    },
    /// Reduce the volume of a DRO file
    Quiet {
        /// Input DRO file
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        /// Output DRO file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
        /// Amount of quieting, in level steps
        #[arg(long, default_value_t = drolog::chip::state::LevelReduction::DEFAULT_AMOUNT)]
        level: u32,
        /// Overwrite output file if it already exists
        #[arg(short, long)]
        overwrite: bool,
        /// Print extra file/progress information
        #[arg(short, long)]
        verbose: bool,
        /// Disable all info and error messages
        #[arg(short, long, conflicts_with = "verbose")]
        silent: bool,
    },
}

fn init_tracing(default_directive: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (result, silent) = match cli.command {
        Commands::Info { file, codemap } => {
            init_tracing("warn");
            (run_info(&file, codemap), false)
        }
        Commands::Quiet {
            input,
            output,
            level,
            overwrite,
            verbose,
            silent,
        } => {
            init_tracing(match (silent, verbose) {
                (true, _) => "off",
                (false, true) => "drolog=debug",
                (false, false) => "warn",
            });
            let args = QuietArgs {
                input,
                output,
                level,
                overwrite,
                verbose,
                silent,
            };
            (run_quiet(&args), silent)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !silent {
                eprintln!("error: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}
