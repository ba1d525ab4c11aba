//! Per-sample wavetable lookup.
//!
//! A phase in [0, 1) maps onto 128 logical positions, the first 64 read the
//! stored half cycle and the last 64 its inverted mirror image. Both
//! waveforms of a slot are read at the same position and blended by the
//! slot's factor.

use fixed::types::U0F16;

use crate::{
    CYCLE_LENGTH,
    waveform::Waveform,
    wavetable::{Slot, Wavetable},
};

/// Logical waveform position for a phase in [0, 1)
pub fn logical_position(phase: f32) -> u8 {
    // Saturating cast, negative phases land on 0
    ((phase * CYCLE_LENGTH as f32) as usize).min(CYCLE_LENGTH - 1) as u8
}

/// Logical waveform position for a 16-bit phase, the top 7 bits
pub fn logical_position_q16(phase: U0F16) -> u8 {
    (phase.to_bits() >> 9) as u8
}

impl<const SIZE: usize> Wavetable<'_, SIZE> {
    /// Sample in [-1, 1] for `slot` at `phase`.
    /// Slots past the end play the last slot.
    pub fn sample_at(&self, slot: usize, phase: f32) -> f32 {
        let Some((left, right, slot)) = self.waveforms_at(slot) else {
            return 0.;
        };

        let position = logical_position(phase);
        let sample_l = left.sample(position);
        let sample_r = right.sample(position);
        let t = slot.factor();

        (1. - t) * sample_l + t * sample_r
    }

    /// Unsigned 8-bit sample centered at 128 for `slot` at `phase`.
    /// Slots past the end play the last slot.
    pub fn sample_at_q8(&self, slot: usize, phase: U0F16) -> u8 {
        let Some((left, right, slot)) = self.waveforms_at(slot) else {
            return 128;
        };

        let position = logical_position_q16(phase);
        let sample_l = left.sample_u8(position) as u16;
        let sample_r = right.sample_u8(position) as u16;
        let factor = slot.factor_q8().to_bits() as u16;

        // At most 256 * 255, fits in 16 bits
        let mix = (256 - factor) * sample_l + factor * sample_r;
        (mix >> 8) as u8
    }

    fn waveforms_at(&self, slot: usize) -> Option<(Waveform<'_>, Waveform<'_>, &Slot)> {
        let slot = self.slot(slot.min(SIZE.checked_sub(1)?))?;

        // Decoding only stores ids that are inside the bank
        let left = self.bank().waveform(slot.left()).ok()?;
        let right = self.bank().waveform(slot.right()).ok()?;

        Some((left, right, slot))
    }
}
