use anyhow::{Result, bail};
use clap::Parser;
use ppg_engine::{
    FilteredOscillator, Fixed, ModulationSource, OscillatorConfig, PpgWavetable, SineSweep,
};
use ppg_tools::{BankArgs, OutputArgs, Sink, sample_count, write_samples};

#[derive(Parser, Debug)]
#[command(name = "PPG Filtered Renderer")]
#[command(about = "Plays a wavetable through the 8-bit oscillator and its two-pole filter", long_about = None)]
struct Args {
    #[command(flatten)]
    bank: BankArgs,

    /// Wavetable record to play
    #[arg(long, default_value_t = 18)]
    wavetable: usize,

    /// Oscillator frequency in Hz
    #[arg(long, default_value_t = OscillatorConfig::EMBEDDED.frequency)]
    frequency: f32,

    /// Hold this slot instead of sweeping
    #[arg(long)]
    slot: Option<usize>,

    /// Filter coefficient while holding a slot, larger is brighter
    #[arg(long, default_value_t = 64, requires = "slot")]
    coefficient: i8,

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
    let limit = args.seconds.map(|s| sample_count(s, config.sample_rate));

    log::info!(
        "Rendering wavetable {} at {} Hz, {} Hz sample rate",
        args.wavetable,
        config.frequency,
        config.sample_rate
    );

    let mut sink = args.output.sink()?;
    let count = match args.slot {
        Some(slot) => {
            log::info!("Holding slot {slot}, filter coefficient {}", args.coefficient);
            render(&mut sink, &wavetable, Fixed::new(slot, args.coefficient), config, limit)?
        }
        None => render(&mut sink, &wavetable, SineSweep::default(), config, limit)?,
    };
    sink.finalize()?;

    log::info!("Rendered {count} samples");
    Ok(())
}

fn render(
    sink: &mut Sink,
    wavetable: &PpgWavetable<'_>,
    modulation: impl ModulationSource,
    config: OscillatorConfig,
    limit: Option<usize>,
) -> Result<usize> {
    let samples = FilteredOscillator::new(wavetable, modulation, config);
    write_samples(sink, samples, limit)
}
