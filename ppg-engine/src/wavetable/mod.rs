//! PPG Wave 2.2 wavetable records.
//!
//! A record is a tag byte followed by `(waveform, slot)` byte pairs. Every
//! pair places a key wave; the record ends with the pair that places a key
//! wave in the last slot. Slots between two key waves blend them linearly.
//!
//! ```text
//! | tag | wf | slot | wf | slot | ... | wf | SIZE - 1 |
//! ```

use defmt::Format;
use fixed::types::U0F8;

use crate::{
    Error, FormatError, WAVETABLE_SIZE,
    waveform::{WaveformBank, WaveformId},
};


#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    left: WaveformId,
    right: WaveformId,
    factor: f32,
    factor_q8: U0F8,
    is_key: bool,
}

impl Slot {
    const EMPTY: Self = Self {
        left: WaveformId::new(0),
        right: WaveformId::new(0),
        factor: 0.,
        factor_q8: U0F8::ZERO,
        is_key: false,
    };

    fn interpolated(
        left: WaveformId,
        right: WaveformId,
        distance_l: usize,
        distance_total: usize,
        is_key: bool,
    ) -> Self {
        // The last key wave has nothing to its right
        if distance_total == 0 {
            return Self {
                left,
                right,
                is_key,
                ..Self::EMPTY
            };
        }

        // Scaled to a byte the same way the 8-bit hardware does it,
        // 65535 / total * l stays below 65535 because l < total
        let factor_q8 = (65535 / distance_total as u32 * distance_l as u32) >> 8;

        Self {
            left,
            right,
            factor: distance_l as f32 / distance_total as f32,
            factor_q8: U0F8::from_bits(factor_q8 as u8),
            is_key,
        }
    }

    pub fn left(&self) -> WaveformId {
        self.left
    }

    pub fn right(&self) -> WaveformId {
        self.right
    }

    /// Blend weight of the right waveform, 0 is fully left
    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Blend weight of the right waveform in 8-bit fixed point
    pub fn factor_q8(&self) -> U0F8 {
        self.factor_q8
    }

    pub fn is_key(&self) -> bool {
        self.is_key
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Format for Slot {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Slot {{ left: {}, right: {}, factor: {=f32}, factor_q8: {=u8}, is_key: {=bool} }}",
            self.left,
            self.right,
            self.factor,
            self.factor_q8.to_bits(),
            self.is_key
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wavetable<'a, const SIZE: usize> {
    bank: WaveformBank<'a>,
    slots: [Slot; SIZE],
}

/// The 61-slot layout used by the PPG Wave 2.2
pub type PpgWavetable<'a> = Wavetable<'a, WAVETABLE_SIZE>;

impl<'a, const SIZE: usize> Wavetable<'a, SIZE> {
    /// Decodes the record at the start of `data`.
    /// Returns the wavetable and the number of bytes the record took.
    pub fn decode(bank: WaveformBank<'a>, data: &[u8]) -> Result<(Self, usize), Error> {
        let mut slots = [Slot::EMPTY; SIZE];
        let end = decode_record(&bank, data, 0, &mut slots)?;

        Ok((Self { bank, slots }, end))
    }

    /// Decodes the `index`-th of the records stored back to back in `data`.
    /// Returns the wavetable and the number of bytes taken by records `0..=index`.
    pub fn decode_nth(
        bank: WaveformBank<'a>,
        data: &[u8],
        index: usize,
    ) -> Result<(Self, usize), Error> {
        let mut slots = [Slot::EMPTY; SIZE];
        let mut end = 0;

        for _ in 0..=index {
            end = decode_record(&bank, data, end, &mut slots)?;
        }

        Ok((Self { bank, slots }, end))
    }

    /// Iterates over the records stored back to back in `data`
    pub fn records<'d>(bank: WaveformBank<'a>, data: &'d [u8]) -> Records<'a, 'd, SIZE> {
        Records {
            bank,
            data,
            offset: 0,
            failed: false,
        }
    }

    /// Replaces the contents with the record at the start of `data`.
    /// On error the wavetable is left untouched.
    pub fn load(&mut self, data: &[u8]) -> Result<usize, Error> {
        let mut slots = [Slot::EMPTY; SIZE];
        let end = decode_record(&self.bank, data, 0, &mut slots)?;
        self.slots = slots;

        Ok(end)
    }

    pub fn bank(&self) -> &WaveformBank<'a> {
        &self.bank
    }

    pub fn slots(&self) -> &[Slot; SIZE] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn key_slots(&self) -> impl Iterator<Item = (usize, &Slot)> {
        self.slots.iter().enumerate().filter(|(_, slot)| slot.is_key)
    }

    pub const fn len(&self) -> usize {
        SIZE
    }

    pub const fn is_empty(&self) -> bool {
        SIZE == 0
    }
}

impl<const SIZE: usize> Format for Wavetable<'_, SIZE> {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Wavetable {{ slots: {=usize}, bank: {} }}",
            SIZE,
            self.bank
        )
    }
}

/// Records stored back to back, see [`Wavetable::records`].
/// Stops after the first malformed record.
pub struct Records<'a, 'd, const SIZE: usize> {
    bank: WaveformBank<'a>,
    data: &'d [u8],
    offset: usize,
    failed: bool,
}

impl<'a, const SIZE: usize> Records<'a, '_, SIZE> {
    /// Offset of the next record
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a, const SIZE: usize> Iterator for Records<'a, '_, SIZE> {
    type Item = Result<Wavetable<'a, SIZE>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.data.len() {
            return None;
        }

        let mut slots = [Slot::EMPTY; SIZE];
        match decode_record(&self.bank, self.data, self.offset, &mut slots) {
            Ok(end) => {
                self.offset = end;
                Some(Ok(Wavetable {
                    bank: self.bank,
                    slots,
                }))
            }
            Err(error) => {
                self.failed = true;
                Some(Err(error))
            }
        }
    }
}

/// Decodes the record starting at `start` into `slots`, returns the offset right after it
fn decode_record<const SIZE: usize>(
    bank: &WaveformBank<'_>,
    data: &[u8],
    start: usize,
    slots: &mut [Slot; SIZE],
) -> Result<usize, Error> {
    if SIZE == 0 || SIZE > 256 {
        return Err(FormatError::InvalidSize { size: SIZE }.into());
    }

    let last_slot = SIZE - 1;
    let mut waveforms = [WaveformId::default(); SIZE];
    let mut is_key = [false; SIZE];

    // Skip the tag byte
    let mut offset = start + 1;

    loop {
        let (Some(&waveform), Some(&position)) = (data.get(offset), data.get(offset + 1)) else {
            return Err(FormatError::Truncated { offset, last_slot }.into());
        };

        let id = WaveformId::new(waveform);
        if !bank.contains(id) {
            return Err(Error::OutOfRange {
                index: waveform,
                count: bank.len(),
            });
        }

        let slot = position as usize;
        if slot >= SIZE {
            return Err(FormatError::SlotOutOfRange {
                position,
                offset: offset + 1,
                size: SIZE,
            }
            .into());
        }

        waveforms[slot] = id;
        is_key[slot] = true;
        offset += 2;

        if slot == last_slot {
            break;
        }
    }

    // Slots before the first key wave hold it, the last slot is always a key wave
    let mut left = is_key.iter().position(|&key| key).unwrap_or(last_slot);
    let mut right = left;

    for (i, slot) in slots.iter_mut().enumerate() {
        if is_key[i] {
            left = i;
            right = (i + 1..SIZE).find(|&j| is_key[j]).unwrap_or(i);
        }

        *slot = if is_key[i] {
            Slot::interpolated(waveforms[i], waveforms[i], 0, 0, true)
        } else {
            Slot::interpolated(
                waveforms[left],
                waveforms[right],
                i.saturating_sub(left),
                right - left,
                false,
            )
        };
    }

    defmt::debug!(
        "Decoded wavetable at byte {=usize}: {=usize} key waves, {=usize} bytes",
        start,
        is_key.iter().filter(|&&key| key).count(),
        offset - start
    );

    Ok(offset)
}
