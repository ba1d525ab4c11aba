//! Conversions at the audio output boundary.

/// Float sample in [-1, 1] to unsigned 8-bit PCM, truncating.
/// Out of range input saturates at 0 and 255.
pub fn f32_to_u8(sample: f32) -> u8 {
    (128. + 127. * sample) as u8
}

/// Unsigned 8-bit PCM to signed 16-bit PCM
pub fn u8_to_i16(sample: u8) -> i16 {
    (sample as i16 - 128) * 256
}
