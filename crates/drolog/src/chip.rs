//! OPL2 register model used by the DRO transcoder.
//!
//! The `opl2` submodule classifies raw register addresses; the `state`
//! submodule replays register writes and attenuates output levels.
pub mod opl2;
pub mod state;
