use defmt::Format;
use thiserror::Error;

/// Ways a wavetable record can be malformed
#[derive(Format, Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    #[error("a wavetable needs between 1 and 256 slots, got {size}")]
    InvalidSize { size: usize },

    #[error("record ended at byte {offset} before a key wave reached slot {last_slot}")]
    Truncated { offset: usize, last_slot: usize },

    #[error("slot position {position} at byte {offset} does not fit in {size} slots")]
    SlotOutOfRange {
        position: u8,
        offset: usize,
        size: usize,
    },
}

#[derive(Format, Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("invalid wavetable record: {0}")]
    InvalidFormat(#[from] FormatError),

    #[error("waveform {index} is out of range, the bank holds {count}")]
    OutOfRange { index: u8, count: usize },
}
