//! Output-level attenuation strategies.
//!
//! An OPL operator level is a 6-bit attenuation value: 0 is the loudest
//! setting and 63 is silent. [`Opl2State`](super::Opl2State) hands the
//! current 6-bit level to an [`Attenuation`] and masks whatever comes back
//! to 6 bits, so implementations may return out-of-range values without
//! corrupting the key-scale-level bits.

/// Maps a 6-bit operator level to a new level.
pub trait Attenuation {
    /// `level` is always in `0..=63`.
    fn attenuate(&self, level: u8) -> u8;
}

impl<F> Attenuation for F
where
    F: Fn(u8) -> u8,
{
    fn attenuate(&self, level: u8) -> u8 {
        self(level)
    }
}

/// Subtracts a fixed amount from every level, clamping at 0.
///
/// # Examples
///
/// ```
/// use drolog::chip::state::{Attenuation, LevelReduction};
///
/// let reduce = LevelReduction::new(5);
/// assert_eq!(reduce.attenuate(37), 32);
/// assert_eq!(reduce.attenuate(3), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelReduction(u32);

impl LevelReduction {
    /// Level steps removed by the reducer when no amount is configured.
    pub const DEFAULT_AMOUNT: u32 = 5;

    pub fn new(amount: u32) -> Self {
        Self(amount)
    }

    pub fn amount(&self) -> u32 {
        self.0
    }
}

impl Attenuation for LevelReduction {
    fn attenuate(&self, level: u8) -> u8 {
        // result never exceeds `level`, so it always fits
        u32::from(level).saturating_sub(self.0) as u8
    }
}
