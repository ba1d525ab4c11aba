//! Time-driven control signals for the oscillators.
//!
//! The stock shapes are slow sines. They stand in for the LFOs and envelopes
//! the instrument does not have yet.

use defmt::Format;

/// Slot and filter cutoff as a function of elapsed time in seconds
pub trait ModulationSource {
    /// Wavetable slot to play, callers clamp it to the wavetable size
    fn slot(&self, time: f32) -> usize;

    /// One-pole filter coefficient, larger is brighter
    fn filter_coefficient(&self, time: f32) -> i8;
}

impl<M: ModulationSource + ?Sized> ModulationSource for &M {
    fn slot(&self, time: f32) -> usize {
        (**self).slot(time)
    }

    fn filter_coefficient(&self, time: f32) -> i8 {
        (**self).filter_coefficient(time)
    }
}

/// Sweeps slot and coefficient with sines:
///
/// ```text
/// slot(t)        = slot_center + slot_depth * sin(slot_rate * t)
/// coefficient(t) = coefficient_center + coefficient_depth * sin(coefficient_rate * t)
/// ```
///
/// Rates are in radians per second.
#[derive(Format, Debug, Clone, Copy, PartialEq)]
pub struct SineSweep {
    pub slot_center: f32,
    pub slot_depth: f32,
    pub slot_rate: f32,
    pub coefficient_center: f32,
    pub coefficient_depth: f32,
    pub coefficient_rate: f32,
}

impl Default for SineSweep {
    fn default() -> Self {
        Self {
            slot_center: 30.,
            slot_depth: 30.,
            slot_rate: 1.,
            coefficient_center: 64.,
            coefficient_depth: 30.,
            coefficient_rate: 32.,
        }
    }
}

impl ModulationSource for SineSweep {
    fn slot(&self, time: f32) -> usize {
        // Saturating cast, anything below 0 plays slot 0
        (self.slot_center + self.slot_depth * libm::sinf(self.slot_rate * time)) as usize
    }

    fn filter_coefficient(&self, time: f32) -> i8 {
        (self.coefficient_center + self.coefficient_depth * libm::sinf(self.coefficient_rate * time))
            as i8
    }
}

/// Constant slot and coefficient
#[derive(Format, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixed {
    pub slot: usize,
    pub filter_coefficient: i8,
}

impl Fixed {
    pub const fn new(slot: usize, filter_coefficient: i8) -> Self {
        Self {
            slot,
            filter_coefficient,
        }
    }
}

impl ModulationSource for Fixed {
    fn slot(&self, _time: f32) -> usize {
        self.slot
    }

    fn filter_coefficient(&self, _time: f32) -> i8 {
        self.filter_coefficient
    }
}
