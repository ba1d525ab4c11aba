//! Read-only store of single-cycle waveforms.
//!
//! A bank is a flat byte array of 64-byte blocks, waveform `i` living at
//! `[i * 64, i * 64 + 64)`. Each block holds half of a cycle; the second half
//! is produced on playback by mirroring and inverting the first one:
//!
//! ```text
//! logical position   0 ..= 63   ->  stored[p]
//! logical position  64 ..= 127  ->  invert(stored[63 - (p - 64)])
//! ```

use defmt::Format;

use crate::{CYCLE_LENGTH, Error, WAVEFORM_LENGTH};

/// Handle to a waveform inside a [`WaveformBank`]
#[derive(Format, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WaveformId(u8);

impl WaveformId {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

impl From<u8> for WaveformId {
    fn from(index: u8) -> Self {
        Self(index)
    }
}

impl From<WaveformId> for u8 {
    fn from(id: WaveformId) -> Self {
        id.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveformBank<'a> {
    data: &'a [u8],
}

impl<'a> WaveformBank<'a> {
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Number of complete waveforms in the bank
    pub const fn len(&self) -> usize {
        self.data.len() / WAVEFORM_LENGTH
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: WaveformId) -> bool {
        (id.0 as usize) < self.len()
    }

    pub fn waveform(&self, id: WaveformId) -> Result<Waveform<'a>, Error> {
        let start = id.0 as usize * WAVEFORM_LENGTH;

        self.data
            .get(start..start + WAVEFORM_LENGTH)
            .and_then(|block| block.try_into().ok())
            .map(Waveform)
            .ok_or(Error::OutOfRange {
                index: id.0,
                count: self.len(),
            })
    }
}

impl Format for WaveformBank<'_> {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "WaveformBank({=usize} waveforms)", self.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Waveform<'a>(&'a [u8; WAVEFORM_LENGTH]);

impl<'a> Waveform<'a> {
    pub const fn new(samples: &'a [u8; WAVEFORM_LENGTH]) -> Self {
        Self(samples)
    }

    pub const fn as_bytes(&self) -> &'a [u8; WAVEFORM_LENGTH] {
        self.0
    }

    /// Stored sample, `position` wraps at 64
    pub fn raw(&self, position: u8) -> u8 {
        self.0[position as usize % WAVEFORM_LENGTH]
    }

    /// Unsigned 8-bit sample centered at 128, `position` wraps at 128
    pub fn sample_u8(&self, position: u8) -> u8 {
        let position = position as usize % CYCLE_LENGTH;

        if position < WAVEFORM_LENGTH {
            self.0[position]
        } else {
            255 - self.0[CYCLE_LENGTH - 1 - position]
        }
    }

    /// Sample in [-1, 1], `position` wraps at 128
    pub fn sample(&self, position: u8) -> f32 {
        let position = position as usize % CYCLE_LENGTH;

        if position < WAVEFORM_LENGTH {
            to_float(self.0[position])
        } else {
            -to_float(self.0[CYCLE_LENGTH - 1 - position])
        }
    }

    /// The full mirrored cycle as 8-bit samples
    pub fn cycle(&self) -> impl Iterator<Item = u8> + use<'a> {
        let waveform = *self;
        (0..CYCLE_LENGTH as u8).map(move |position| waveform.sample_u8(position))
    }
}

fn to_float(sample: u8) -> f32 {
    (sample as f32 - 128.) / 128.
}
