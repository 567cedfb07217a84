//! Chip register state tracking and level attenuation.
//!
//! # Architecture
//!
//! - **RegisterStorage**: Trait for abstracting register storage backends
//! - **RegisterBank**: Zero-initialized 256 cell bank backing one pass
//! - **Attenuation**: Strategy applied to the 6-bit output level of an operator
//! - **Opl2State**: Replays writes and rewrites level registers
//!
//! # Examples
//!
//! ```rust
//! use drolog::chip::state::{LevelReduction, Opl2State};
//!
//! let mut state = Opl2State::new();
//! let reduce = LevelReduction::new(5);
//!
//! // No algorithm register written yet, so every channel is in FM mode.
//! // 0x43 is a carrier slot.
//! assert_eq!(state.apply(0x43, 0x25, &reduce).unwrap(), (0x43, 0x20));
//! // 0x40 is a modulator slot, which FM mode leaves alone.
//! assert_eq!(state.apply(0x40, 0x25, &reduce).unwrap(), (0x40, 0x25));
//! ```

pub mod attenuation;
pub mod opl2;
pub mod storage;

pub use attenuation::{Attenuation, LevelReduction};
pub use opl2::{Opl2State, SynthesisMode};
pub use storage::{ArrayStorage, RegisterBank, RegisterStorage};
