//! OPL2 register classification.
//!
//! Pure lookups over raw register addresses. Nothing here depends on the
//! current chip state; see [`crate::chip::state::Opl2State`] for that.
//!
//! # Register Layout
//!
//! - 0x40-0x55: Key Scale Level (bits 7-6) / Total Level (bits 5-0)
//! - 0xC0-0xC8: Feedback (bits 3-1) / Connection (bit 0) per channel
//!
//! The level block has gaps at 0x46, 0x47, 0x4E and 0x4F: those offsets
//! belong to no operator slot.

use thiserror::Error;

/// First level (KSL / TL) register.
pub const LEVEL_REGISTER_FIRST: u8 = 0x40;
/// Last level (KSL / TL) register.
pub const LEVEL_REGISTER_LAST: u8 = 0x55;

/// Key-scale-level bits of a level register value.
pub const KSL_MASK: u8 = 0xC0;
/// Total-level (attenuation) bits of a level register value. 0 is loudest.
pub const LEVEL_MASK: u8 = 0x3F;
/// Connection bit of a feedback/algorithm register. 0 = FM, 1 = additive.
pub const CONNECTION_MASK: u8 = 0x01;

/// Operator slots whose level is the audible output of their channel.
pub const CARRIERS: [u8; 9] = [0x43, 0x44, 0x45, 0x4B, 0x4C, 0x4D, 0x53, 0x54, 0x55];

/// Level register to the feedback/algorithm register of its channel.
const LEVEL_TO_ALGORITHM: [(u8, u8); 18] = [
    (0x40, 0xC0),
    (0x41, 0xC0),
    (0x42, 0xC1),
    (0x43, 0xC1),
    (0x44, 0xC2),
    (0x45, 0xC2),
    (0x48, 0xC3),
    (0x49, 0xC3),
    (0x4A, 0xC4),
    (0x4B, 0xC4),
    (0x4C, 0xC5),
    (0x4D, 0xC5),
    (0x50, 0xC6),
    (0x51, 0xC6),
    (0x52, 0xC7),
    (0x53, 0xC7),
    (0x54, 0xC8),
    (0x55, 0xC8),
];

/// A level register with no operator slot (and so no algorithm register)
/// was handed to [`algorithm_register_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("level register 0x{0:02X} has no algorithm register")]
pub struct UnmappedLevelRegister(pub u8);

/// Returns true if `register` is a KSL / total-level register.
pub fn is_level_register(register: u8) -> bool {
    (LEVEL_REGISTER_FIRST..=LEVEL_REGISTER_LAST).contains(&register)
}

/// Look up the feedback/algorithm register governing a level register.
///
/// # Examples
///
/// ```
/// use drolog::chip::opl2::algorithm_register_for;
///
/// assert_eq!(algorithm_register_for(0x43), Ok(0xC1));
/// assert!(algorithm_register_for(0x46).is_err());
/// ```
pub fn algorithm_register_for(level_register: u8) -> Result<u8, UnmappedLevelRegister> {
    LEVEL_TO_ALGORITHM
        .iter()
        .find(|(level, _)| *level == level_register)
        .map(|(_, algorithm)| *algorithm)
        .ok_or(UnmappedLevelRegister(level_register))
}

/// Returns true if `register` is the level register of a carrier operator.
pub fn is_carrier(register: u8) -> bool {
    CARRIERS.contains(&register)
}
