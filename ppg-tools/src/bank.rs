//! Waveform and wavetable files on disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ppg_engine::{PpgWavetable, WAVEFORM_LENGTH, Waveform, WaveformBank, WaveformId};

#[derive(clap::Args, Debug, Clone)]
pub struct BankArgs {
    /// Waveform file, 64-byte blocks back to back
    #[arg(long)]
    pub waveforms: PathBuf,

    /// Wavetable file, records back to back
    #[arg(long)]
    pub wavetables: PathBuf,
}

impl BankArgs {
    pub fn load(&self) -> Result<BankFiles> {
        BankFiles::read(&self.waveforms, &self.wavetables)
    }
}

/// Contents of a waveform file and a wavetable file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankFiles {
    waveforms: Vec<u8>,
    wavetables: Vec<u8>,
}

impl BankFiles {
    pub fn new(waveforms: Vec<u8>, wavetables: Vec<u8>) -> Self {
        Self {
            waveforms,
            wavetables,
        }
    }

    pub fn read(waveforms: &Path, wavetables: &Path) -> Result<Self> {
        let waveforms = std::fs::read(waveforms)
            .with_context(|| format!("Failed to read waveforms: {}", waveforms.display()))?;
        let wavetables = std::fs::read(wavetables)
            .with_context(|| format!("Failed to read wavetables: {}", wavetables.display()))?;

        if waveforms.len() % WAVEFORM_LENGTH != 0 {
            log::warn!(
                "Waveform file is {} bytes, ignoring the trailing {} bytes",
                waveforms.len(),
                waveforms.len() % WAVEFORM_LENGTH
            );
        }

        let files = Self::new(waveforms, wavetables);
        log::info!(
            "Loaded {} waveforms and {} bytes of wavetables",
            files.bank().len(),
            files.wavetables.len()
        );

        Ok(files)
    }

    pub fn bank(&self) -> WaveformBank<'_> {
        WaveformBank::new(&self.waveforms)
    }

    pub fn waveform(&self, index: u8) -> Result<Waveform<'_>> {
        self.bank()
            .waveform(WaveformId::new(index))
            .with_context(|| format!("Failed to load waveform {index}"))
    }

    /// Decodes the `index`-th wavetable record
    pub fn wavetable(&self, index: usize) -> Result<PpgWavetable<'_>> {
        let (wavetable, end) = PpgWavetable::decode_nth(self.bank(), &self.wavetables, index)
            .with_context(|| format!("Failed to decode wavetable {index}"))?;

        log::debug!("Wavetable {index} ends at byte {end}");
        log::debug!(
            "Key waves at slots {:?}",
            wavetable.key_slots().map(|(i, _)| i).collect::<Vec<_>>()
        );

        Ok(wavetable)
    }
}
