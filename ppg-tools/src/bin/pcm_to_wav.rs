use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "PCM to WAV")]
#[command(about = "Reads unsigned 8-bit PCM from stdin and writes a mono 16-bit WAV file", long_about = None)]
struct Args {
    /// Output WAV file path
    output: PathBuf,

    /// Sample rate in Hz
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    sample_rate: u32,
}

fn main() -> Result<()> {
    ppg_tools::init_logging();
    let args = Args::parse();

    let count = ppg_tools::pcm_to_wav(std::io::stdin().lock(), &args.output, args.sample_rate)?;

    log::info!("Wrote {count} samples to {}", args.output.display());
    Ok(())
}
