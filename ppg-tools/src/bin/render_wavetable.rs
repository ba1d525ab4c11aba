use anyhow::{Result, bail};
use clap::Parser;
use ppg_engine::{Oscillator, OscillatorConfig, SineSweep, pcm};
use ppg_tools::{BankArgs, OutputArgs, sample_count, write_samples};

#[derive(Parser, Debug)]
#[command(name = "PPG Wavetable Renderer")]
#[command(about = "Plays a wavetable with the floating point oscillator, sweeping its slots", long_about = None)]
struct Args {
    #[command(flatten)]
    bank: BankArgs,

    /// Wavetable record to play
    #[arg(long, default_value_t = 18)]
    wavetable: usize,

    /// Oscillator frequency in Hz
    #[arg(long, default_value_t = OscillatorConfig::DESKTOP.frequency)]
    frequency: f32,

    /// Stop after this many seconds, runs until stdout closes otherwise
    #[arg(long)]
    seconds: Option<f32>,

    #[command(flatten)]
    output: OutputArgs,
}

fn main() -> Result<()> {
    ppg_tools::init_logging();
    ppg_tools::finish(run(Args::parse()))
}

fn run(args: Args) -> Result<()> {
    if args.output.output.is_some() && args.seconds.is_none() {
        bail!("--seconds is required when writing a WAV file");
    }

    let files = args.bank.load()?;
    let wavetable = files.wavetable(args.wavetable)?;
    let config = OscillatorConfig {
        sample_rate: args.output.sample_rate,
        frequency: args.frequency,
    };

    log::info!(
        "Rendering wavetable {} at {} Hz, {} Hz sample rate",
        args.wavetable,
        config.frequency,
        config.sample_rate
    );

    let samples = Oscillator::new(&wavetable, SineSweep::default(), config).map(pcm::f32_to_u8);
    let limit = args.seconds.map(|s| sample_count(s, config.sample_rate));

    let mut sink = args.output.sink()?;
    let count = write_samples(&mut sink, samples, limit)?;
    sink.finalize()?;

    log::info!("Rendered {count} samples");
    Ok(())
}
