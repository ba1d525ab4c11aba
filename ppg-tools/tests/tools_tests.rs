use std::{fs::File, io::Write, path::Path};

use hound::WavReader;
use ppg_engine::{
    FilteredOscillator, Fixed, OscillatorConfig, WAVEFORM_LENGTH, WavetableScan, pcm,
};
use ppg_tools::{BankFiles, Sink, pcm_to_wav, sample_count, write_samples};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Waveform 0 a rising ramp from 64, waveform 1 all 255
fn waveform_bytes() -> Vec<u8> {
    let mut data: Vec<u8> = (0..WAVEFORM_LENGTH as u8).map(|i| 64 + i).collect();
    data.extend(std::iter::repeat_n(255, WAVEFORM_LENGTH));
    data
}

/// Record 0 blends waveform 0 into 1, record 1 holds waveform 1
fn wavetable_bytes() -> Vec<u8> {
    vec![0, 0, 0, 1, 60, 0, 1, 60]
}

fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = File::create(&path).unwrap();
    file.write_all(contents).unwrap();
    path
}

fn read_wav(path: &Path) -> (hound::WavSpec, Vec<i16>) {
    let mut reader = WavReader::open(path).unwrap();
    let spec = reader.spec();
    let samples = reader.samples::<i16>().map(Result::unwrap).collect();
    (spec, samples)
}

#[test]
fn bank_files_load_from_disk() {
    let dir = TempDir::new().unwrap();
    let waveforms = write_file(&dir, "waveforms.bin", &waveform_bytes());
    let wavetables = write_file(&dir, "wavetables.bin", &wavetable_bytes());

    let files = BankFiles::read(&waveforms, &wavetables).unwrap();

    assert_eq!(files.bank().len(), 2);
    assert_eq!(files.waveform(1).unwrap().raw(0), 255);

    let second = files.wavetable(1).unwrap();
    assert_eq!(second.key_slots().count(), 1);
    assert_eq!(second.slot(0).unwrap().left().as_u8(), 1);
}

#[test]
fn missing_file_names_the_path() {
    let dir = TempDir::new().unwrap();
    let wavetables = write_file(&dir, "wavetables.bin", &wavetable_bytes());
    let missing = dir.path().join("nope.bin");

    let error = BankFiles::read(&missing, &wavetables).unwrap_err();

    assert!(format!("{error}").contains("nope.bin"), "{error}");
}

#[test]
fn wavetable_past_the_end_fails_with_context() {
    let files = BankFiles::new(waveform_bytes(), wavetable_bytes());

    let error = files.wavetable(2).unwrap_err();

    assert_eq!(format!("{error}"), "Failed to decode wavetable 2");
}

#[test]
fn waveform_past_the_end_fails() {
    let files = BankFiles::new(waveform_bytes(), wavetable_bytes());

    assert!(files.waveform(2).is_err());
}

#[test]
fn wav_sink_widens_samples() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.wav");

    let mut sink = Sink::wav(&path, 8000).unwrap();
    let count = write_samples(&mut sink, [0u8, 128, 255, 129].into_iter(), None).unwrap();
    sink.finalize().unwrap();

    assert_eq!(count, 4);
    let (spec, samples) = read_wav(&path);
    assert_eq!(spec, ppg_tools::wav_spec(8000));
    assert_eq!(samples, vec![-32768, 0, 32512, 256]);
}

#[test]
fn wav_sink_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("out.wav");

    let sink = Sink::wav(&path, 20000).unwrap();
    sink.finalize().unwrap();

    let (_, samples) = read_wav(&path);
    assert!(samples.is_empty());
}

#[test]
fn raw_sink_writes_bytes_unchanged() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.raw");

    let mut sink = Sink::raw(File::create(&path).unwrap());
    write_samples(&mut sink, [1u8, 2, 3, 250].into_iter(), None).unwrap();
    sink.finalize().unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3, 250]);
}

#[test]
fn endless_renderer_stops_at_limit() {
    let files = BankFiles::new(waveform_bytes(), wavetable_bytes());
    let wavetable = files.wavetable(0).unwrap();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("filtered.wav");
    let config = OscillatorConfig::EMBEDDED;

    let limit = sample_count(0.5, config.sample_rate);
    let mut sink = Sink::wav(&path, config.sample_rate).unwrap();
    let samples = FilteredOscillator::new(&wavetable, Fixed::new(30, 64), config);
    let count = write_samples(&mut sink, samples, Some(limit)).unwrap();
    sink.finalize().unwrap();

    assert_eq!(count, 10_000);

    let expected: Vec<i16> = FilteredOscillator::new(&wavetable, Fixed::new(30, 64), config)
        .take(limit)
        .map(pcm::u8_to_i16)
        .collect();
    let (_, samples) = read_wav(&path);
    assert_eq!(samples, expected);
}

#[test]
fn wavetable_dump_covers_every_slot() {
    let files = BankFiles::new(waveform_bytes(), wavetable_bytes());
    let wavetable = files.wavetable(0).unwrap();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dump.raw");

    let mut sink = Sink::raw(File::create(&path).unwrap());
    let samples = WavetableScan::new(&wavetable, 3).map(pcm::f32_to_u8);
    write_samples(&mut sink, samples, None).unwrap();
    sink.finalize().unwrap();

    let dumped = std::fs::read(&path).unwrap();
    assert_eq!(dumped.len(), 61 * 3 * 128);
    // Slot 0 starts on the ramp, 64 is half way down
    assert_eq!(dumped[0], pcm::f32_to_u8(-0.5));
}

#[test]
fn pcm_converts_to_wav() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("converted.wav");
    let input: &[u8] = &[128, 0, 255];

    let count = pcm_to_wav(input, &path, 20000).unwrap();

    assert_eq!(count, 3);
    let (spec, samples) = read_wav(&path);
    assert_eq!(spec.sample_rate, 20000);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.channels, 1);
    assert_eq!(samples, vec![0, -32768, 32512]);
}

#[test]
fn sample_count_scales_with_rate() {
    assert_eq!(sample_count(1., 20000), 20000);
    assert_eq!(sample_count(0.25, 44100), 11025);
    assert_eq!(sample_count(-1., 20000), 0);
}
