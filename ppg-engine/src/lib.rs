#![cfg_attr(not(test), no_std)]

mod error;
pub mod filter;
pub mod oscillator;
pub mod pcm;
pub mod synthesizer;
pub mod waveform;
pub mod wavetable;

/// Sample rate in Hz
pub const SAMPLE_RATE: u32 = 20000;

/// Number of slots in a PPG Wave 2.2 wavetable.
/// The hardware has 64, the last 3 hold fixed waveforms we don't need.
pub const WAVETABLE_SIZE: usize = 61;

/// Number of stored samples in one waveform (half a cycle, mirrored on playback)
pub const WAVEFORM_LENGTH: usize = 64;

/// Number of logical samples in one mirrored waveform cycle
pub const CYCLE_LENGTH: usize = 2 * WAVEFORM_LENGTH;

pub use error::{Error, FormatError};
pub use fixed::types::{U0F8, U0F16};
pub use oscillator::{
    FilteredOscillator, Oscillator, OscillatorConfig, PhaseAccumulator, WavetableScan,
    modulation::{Fixed, ModulationSource, SineSweep},
};
pub use waveform::{Waveform, WaveformBank, WaveformId};
pub use wavetable::{PpgWavetable, Slot, Wavetable};
