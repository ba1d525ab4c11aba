pub mod modulation;


use defmt::Format;
use fixed::types::U0F16;

use crate::{CYCLE_LENGTH, SAMPLE_RATE, filter::OnePoleFilter, wavetable::Wavetable};
use modulation::ModulationSource;

#[derive(Format, Debug, Clone, Copy, PartialEq)]
pub struct OscillatorConfig {
    /// Output sample rate in Hz, must be positive
    pub sample_rate: u32,
    /// Oscillator frequency in Hz, must be positive
    pub frequency: f32,
}

impl OscillatorConfig {
    /// Floating point renderer default
    pub const DESKTOP: Self = Self {
        sample_rate: SAMPLE_RATE,
        frequency: 110.,
    };

    /// 8-bit filtered renderer default
    pub const EMBEDDED: Self = Self {
        sample_rate: SAMPLE_RATE,
        frequency: 62.,
    };

    pub fn phase_step(&self) -> U0F16 {
        phase_step(self.frequency, self.sample_rate)
    }
}

impl Default for OscillatorConfig {
    fn default() -> Self {
        Self::DESKTOP
    }
}

/// `round(65536 * frequency / sample_rate)` as a 16-bit phase increment.
/// A full cycle per sample wraps to 0.
pub fn phase_step(frequency: f32, sample_rate: u32) -> U0F16 {
    let step = libm::roundf(65536. * frequency / sample_rate as f32);
    U0F16::from_bits(step as u32 as u16)
}

/// 16-bit phase accumulator, overflowing is what loops the waveform
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PhaseAccumulator {
    phase: U0F16,
    increment: U0F16,
}

impl PhaseAccumulator {
    pub const fn new(increment: U0F16) -> Self {
        Self {
            phase: U0F16::ZERO,
            increment,
        }
    }

    pub const fn with_phase(phase: U0F16, increment: U0F16) -> Self {
        Self { phase, increment }
    }

    pub fn phase(&self) -> U0F16 {
        self.phase
    }

    pub fn increment(&self) -> U0F16 {
        self.increment
    }

    pub fn set_increment(&mut self, increment: U0F16) {
        self.increment = increment;
    }

    /// Steps the phase, returns the phase before stepping
    pub fn advance(&mut self) -> U0F16 {
        let current = self.phase;
        self.phase = self.phase.wrapping_add(self.increment);
        current
    }
}

impl Format for PhaseAccumulator {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "PhaseAccumulator {{ phase: {=u16}, increment: {=u16} }}",
            self.phase.to_bits(),
            self.increment.to_bits()
        )
    }
}

/// Sample counter shared by the oscillators, time starts one sample in
#[derive(Format, Debug, Clone, Copy, PartialEq, Eq)]
struct Clock {
    sample_rate: u32,
    elapsed: u32,
}

impl Clock {
    fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            elapsed: 0,
        }
    }

    /// Counts one sample, returns the time in seconds
    fn tick(&mut self) -> f32 {
        self.elapsed = self.elapsed.wrapping_add(1);
        self.elapsed as f32 / self.sample_rate as f32
    }
}

/// 8-bit oscillator followed by two cascaded one-pole low-pass filters.
///
/// An endless stream of unsigned 8-bit samples centered at 128, stop pulling
/// whenever enough has been rendered. Start over by building a new one.
pub struct FilteredOscillator<'wt, 'bank, M, const SIZE: usize> {
    wavetable: &'wt Wavetable<'bank, SIZE>,
    modulation: M,
    phase: PhaseAccumulator,
    clock: Clock,
    filters: [OnePoleFilter; 2],
}

impl<'wt, 'bank, M: ModulationSource, const SIZE: usize> FilteredOscillator<'wt, 'bank, M, SIZE> {
    pub fn new(
        wavetable: &'wt Wavetable<'bank, SIZE>,
        modulation: M,
        config: OscillatorConfig,
    ) -> Self {
        Self {
            wavetable,
            modulation,
            phase: PhaseAccumulator::new(config.phase_step()),
            clock: Clock::new(config.sample_rate),
            filters: [OnePoleFilter::new(); 2],
        }
    }

    pub fn phase(&self) -> &PhaseAccumulator {
        &self.phase
    }

    pub fn filters(&self) -> &[OnePoleFilter; 2] {
        &self.filters
    }

    pub fn next_sample(&mut self) -> u8 {
        let time = self.clock.tick();
        let slot = self.modulation.slot(time).min(SIZE.saturating_sub(1));

        let sample = self.wavetable.sample_at_q8(slot, self.phase.phase());
        let x = (sample as i16 - 128) as i8;

        let k = self.modulation.filter_coefficient(time);
        let [first, second] = &mut self.filters;
        let y = second.feed(k, first.feed(k, x));

        self.phase.advance();

        (128 + y as i16).clamp(0, 255) as u8
    }
}

impl<M: ModulationSource, const SIZE: usize> Iterator for FilteredOscillator<'_, '_, M, SIZE> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_sample())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// Floating point oscillator without filtering.
///
/// An endless stream of samples in [-1, 1].
pub struct Oscillator<'wt, 'bank, M, const SIZE: usize> {
    wavetable: &'wt Wavetable<'bank, SIZE>,
    modulation: M,
    phase: f32,
    phase_step: f32,
    clock: Clock,
}

impl<'wt, 'bank, M: ModulationSource, const SIZE: usize> Oscillator<'wt, 'bank, M, SIZE> {
    pub fn new(
        wavetable: &'wt Wavetable<'bank, SIZE>,
        modulation: M,
        config: OscillatorConfig,
    ) -> Self {
        Self {
            wavetable,
            modulation,
            phase: 0.,
            phase_step: config.frequency / config.sample_rate as f32,
            clock: Clock::new(config.sample_rate),
        }
    }

    /// Current phase in [0, 1)
    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn next_sample(&mut self) -> f32 {
        let time = self.clock.tick();
        let slot = self.modulation.slot(time).min(SIZE.saturating_sub(1));

        let sample = self.wavetable.sample_at(slot, self.phase);

        self.phase += self.phase_step;
        self.phase -= libm::floorf(self.phase);

        sample
    }
}

impl<M: ModulationSource, const SIZE: usize> Iterator for Oscillator<'_, '_, M, SIZE> {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_sample())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

/// Plays every slot of a wavetable in order, one cycle of 128 samples
/// per repetition, `repeat` repetitions per slot.
pub struct WavetableScan<'wt, 'bank, const SIZE: usize> {
    wavetable: &'wt Wavetable<'bank, SIZE>,
    repeat: usize,
    index: usize,
}

impl<'wt, 'bank, const SIZE: usize> WavetableScan<'wt, 'bank, SIZE> {
    pub fn new(wavetable: &'wt Wavetable<'bank, SIZE>, repeat: usize) -> Self {
        Self {
            wavetable,
            repeat,
            index: 0,
        }
    }

    fn total(&self) -> usize {
        SIZE * self.repeat * CYCLE_LENGTH
    }
}

impl<const SIZE: usize> Iterator for WavetableScan<'_, '_, SIZE> {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.total() {
            return None;
        }

        let slot = self.index / (self.repeat * CYCLE_LENGTH);
        let phase = (self.index % CYCLE_LENGTH) as f32 / CYCLE_LENGTH as f32;
        self.index += 1;

        Some(self.wavetable.sample_at(slot, phase))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total() - self.index;
        (remaining, Some(remaining))
    }
}

impl<const SIZE: usize> ExactSizeIterator for WavetableScan<'_, '_, SIZE> {}
