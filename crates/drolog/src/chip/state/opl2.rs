//! YM3812 (OPL2) register state with output-level attenuation.
//!
//! This module replays every register write of a capture into a full
//! register bank so that each level write can be judged against the
//! synthesis mode its channel was last configured with.

use super::attenuation::Attenuation;
use super::storage::{RegisterBank, RegisterStorage};
use crate::chip::opl2::{self, CONNECTION_MASK, KSL_MASK, LEVEL_MASK, UnmappedLevelRegister};

/// Operator connection selected by bit 0 of a feedback/algorithm register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisMode {
    /// Modulator feeds the carrier; only the carrier is heard.
    Fm,
    /// Both operators are mixed to the output.
    Additive,
}

/// YM3812 register state tracker
///
/// Holds the register bank for a single transcoding pass. The bank starts
/// zeroed, so channels whose algorithm register was never written are in
/// FM mode.
///
/// # Register Layout
///
/// - 0x40-0x55: Key Scale Level (bits 7-6) + Total Level (bits 5-0)
/// - 0xC0-0xC8: Feedback (bits 3-1) + Connection (bit 0)
#[derive(Debug, Clone, Default)]
pub struct Opl2State {
    /// Every register write seen so far, after attenuation
    registers: RegisterBank,
}

impl Opl2State {
    /// Create a state tracker with all registers cleared
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the current value of a register
    pub fn read_register(&self, register: u8) -> u8 {
        self.registers.read(register)
    }

    /// Synthesis mode currently governing a level register
    ///
    /// # Errors
    ///
    /// `UnmappedLevelRegister` if `level_register` has no operator slot.
    pub fn synthesis_mode(
        &self,
        level_register: u8,
    ) -> Result<SynthesisMode, UnmappedLevelRegister> {
        let algorithm = opl2::algorithm_register_for(level_register)?;
        if self.registers.read(algorithm) & CONNECTION_MASK == 0 {
            Ok(SynthesisMode::Fm)
        } else {
            Ok(SynthesisMode::Additive)
        }
    }

    /// Apply a register write, attenuating it if it sets an audible level
    ///
    /// Non-level registers are stored and returned unchanged. For a level
    /// register the key-scale-level bits are kept and only the 6-bit total
    /// level is passed through `attenuation`. In FM mode only carrier
    /// levels are touched; in additive mode both operators are.
    ///
    /// The stored value is the one returned, so later writes observe the
    /// adjusted state.
    ///
    /// # Arguments
    ///
    /// * `register` - Real register address (after codemap translation)
    /// * `value` - Value written
    /// * `attenuation` - Level mapping applied to audible operators
    ///
    /// # Returns
    ///
    /// `(register, adjusted_value)`
    pub fn apply<A>(
        &mut self,
        register: u8,
        value: u8,
        attenuation: &A,
    ) -> Result<(u8, u8), UnmappedLevelRegister>
    where
        A: Attenuation + ?Sized,
    {
        let mut value = value;

        if opl2::is_level_register(register) {
            let audible = match self.synthesis_mode(register)? {
                SynthesisMode::Fm => opl2::is_carrier(register),
                SynthesisMode::Additive => true,
            };

            if audible {
                let ksl = value & KSL_MASK;
                let level = attenuation.attenuate(value & LEVEL_MASK) & LEVEL_MASK;
                value = ksl | level;
            }
        }

        self.registers.write(register, value);
        Ok((register, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::state::LevelReduction;

    #[test]
    fn test_opl2_non_level_register_passthrough() {
        let mut state = Opl2State::new();
        let reduce = LevelReduction::new(63);

        assert_eq!(state.apply(0xA0, 0x6D, &reduce), Ok((0xA0, 0x6D)));
        assert_eq!(state.apply(0xB0, 0x30, &reduce), Ok((0xB0, 0x30)));
        assert_eq!(state.apply(0x20, 0x3F, &reduce), Ok((0x20, 0x3F)));
        assert_eq!(state.read_register(0xA0), 0x6D);
        assert_eq!(state.read_register(0x20), 0x3F);
    }

    #[test]
    fn test_opl2_fm_mode_only_touches_carriers() {
        let mut state = Opl2State::new();
        let reduce = LevelReduction::new(5);

        // 0x43 is a carrier, 0x42 a modulator; both governed by 0xC1 == 0
        assert_eq!(state.synthesis_mode(0x43), Ok(SynthesisMode::Fm));
        assert_eq!(state.apply(0x43, 0x25, &reduce), Ok((0x43, 0x20)));
        assert_eq!(state.apply(0x42, 0x25, &reduce), Ok((0x42, 0x25)));
    }

    #[test]
    fn test_opl2_additive_mode_touches_both_operators() {
        let mut state = Opl2State::new();
        let reduce = LevelReduction::new(5);

        // feedback 3, connection 1
        state.apply(0xC1, 0x07, &reduce).unwrap();
        assert_eq!(state.synthesis_mode(0x42), Ok(SynthesisMode::Additive));
        assert_eq!(state.apply(0x42, 0x25, &reduce), Ok((0x42, 0x20)));
        assert_eq!(state.apply(0x43, 0x25, &reduce), Ok((0x43, 0x20)));

        // back to FM
        state.apply(0xC1, 0x06, &reduce).unwrap();
        assert_eq!(state.apply(0x42, 0x25, &reduce), Ok((0x42, 0x25)));
    }

    #[test]
    fn test_opl2_algorithm_only_affects_its_own_pair() {
        let mut state = Opl2State::new();
        let reduce = LevelReduction::new(5);

        state.apply(0xC0, 0x01, &reduce).unwrap();
        assert_eq!(state.apply(0x40, 0x10, &reduce), Ok((0x40, 0x0B)));
        // 0x42 is governed by 0xC1, still FM
        assert_eq!(state.apply(0x42, 0x10, &reduce), Ok((0x42, 0x10)));
    }

    #[test]
    fn test_opl2_ksl_bits_are_preserved() {
        let mut state = Opl2State::new();
        let reduce = LevelReduction::new(63);

        for ksl in [0x00u8, 0x40, 0x80, 0xC0] {
            let (_, value) = state.apply(0x55, ksl | 0x2A, &reduce).unwrap();
            assert_eq!(value & KSL_MASK, ksl);
            assert_eq!(value & LEVEL_MASK, 0);
        }
    }

    #[test]
    fn test_opl2_out_of_range_attenuation_is_masked() {
        let mut state = Opl2State::new();
        let overflow = |_level: u8| -> u8 { 0xFF };

        let (_, value) = state.apply(0x43, 0x80 | 0x01, &overflow).unwrap();
        assert_eq!(value, 0x80 | 0x3F);
    }

    #[test]
    fn test_opl2_stores_adjusted_value() {
        let mut state = Opl2State::new();
        let reduce = LevelReduction::new(5);

        state.apply(0x44, 0x30, &reduce).unwrap();
        assert_eq!(state.read_register(0x44), 0x2B);
    }

    #[test]
    fn test_opl2_unmapped_level_register_fails() {
        let mut state = Opl2State::new();
        let reduce = LevelReduction::new(5);

        assert_eq!(
            state.apply(0x46, 0x10, &reduce),
            Err(UnmappedLevelRegister(0x46))
        );
        assert_eq!(state.read_register(0x46), 0x00);
    }
}
