//! Console front ends for the `drolog` subcommands.
pub mod info;
pub mod quiet;
