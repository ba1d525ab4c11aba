//! Where rendered samples go: raw unsigned 8-bit PCM, or a 16-bit WAV file.

use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use ppg_engine::{SAMPLE_RATE, pcm};

#[derive(clap::Args, Debug, Clone)]
pub struct OutputArgs {
    /// Write a 16-bit WAV file instead of raw 8-bit PCM on stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Sample rate in Hz
    #[arg(long, default_value_t = SAMPLE_RATE, value_parser = clap::value_parser!(u32).range(1..))]
    pub sample_rate: u32,
}

impl OutputArgs {
    pub fn sink(&self) -> Result<Sink> {
        match &self.output {
            Some(path) => Sink::wav(path, self.sample_rate),
            None => Ok(Sink::stdout()),
        }
    }
}

pub fn wav_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

pub enum Sink {
    Raw(Box<dyn Write>),
    Wav(WavWriter<BufWriter<File>>),
}

impl Sink {
    pub fn stdout() -> Self {
        Self::Raw(Box::new(BufWriter::new(std::io::stdout().lock())))
    }

    pub fn raw(writer: impl Write + 'static) -> Self {
        Self::Raw(Box::new(writer))
    }

    /// Creates the file and any missing parent directories
    pub fn wav(path: &Path, sample_rate: u32) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }

        let writer = WavWriter::create(path, wav_spec(sample_rate))
            .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;

        log::info!("Writing {} at {sample_rate} Hz", path.display());
        Ok(Self::Wav(writer))
    }

    pub fn write(&mut self, sample: u8) -> Result<()> {
        match self {
            Self::Raw(writer) => writer
                .write_all(&[sample])
                .context("Failed to write sample"),
            Self::Wav(writer) => writer
                .write_sample(pcm::u8_to_i16(sample))
                .context("Failed to write sample"),
        }
    }

    /// Flushes raw output, patches the WAV header sizes
    pub fn finalize(self) -> Result<()> {
        match self {
            Self::Raw(mut writer) => writer.flush().context("Failed to flush output"),
            Self::Wav(writer) => writer.finalize().context("Failed to finalize WAV file"),
        }
    }
}

/// Pulls samples into `sink`, at most `limit` of them when given.
/// Returns the number written.
pub fn write_samples(
    sink: &mut Sink,
    samples: impl Iterator<Item = u8>,
    limit: Option<usize>,
) -> Result<usize> {
    let mut count = 0;
    for sample in samples.take(limit.unwrap_or(usize::MAX)) {
        sink.write(sample)?;
        count += 1;
    }

    Ok(count)
}

/// Converts headerless 8-bit PCM from `input` to a 16-bit WAV file
pub fn pcm_to_wav(input: impl Read, path: &Path, sample_rate: u32) -> Result<usize> {
    let mut sink = Sink::wav(path, sample_rate)?;
    let mut count = 0;

    for byte in std::io::BufReader::new(input).bytes() {
        sink.write(byte.context("Failed to read input")?)?;
        count += 1;
    }

    sink.finalize()?;
    Ok(count)
}

/// Number of samples in `seconds` of audio
pub fn sample_count(seconds: f32, sample_rate: u32) -> usize {
    (seconds.max(0.) * sample_rate as f32) as usize
}

/// A closed stdout means the reader has had enough, not a failure
pub fn is_broken_pipe(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|e| e.kind() == std::io::ErrorKind::BrokenPipe)
    })
}
