use anyhow::Result;
use clap::Parser;
use ppg_engine::{WavetableScan, pcm};
use ppg_tools::{BankArgs, OutputArgs, write_samples};

#[derive(Parser, Debug)]
#[command(name = "PPG Wavetable Dump")]
#[command(about = "Plays every slot of a wavetable in order, one cycle per repetition", long_about = None)]
struct Args {
    /// Wavetable record to dump
    index: usize,

    /// Cycles to play per slot
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    repeat: u32,

    #[command(flatten)]
    bank: BankArgs,

    #[command(flatten)]
    output: OutputArgs,
}

fn main() -> Result<()> {
    ppg_tools::init_logging();
    ppg_tools::finish(run(Args::parse()))
}

fn run(args: Args) -> Result<()> {
    let files = args.bank.load()?;
    let wavetable = files.wavetable(args.index)?;

    let samples = WavetableScan::new(&wavetable, args.repeat as usize).map(pcm::f32_to_u8);

    let mut sink = args.output.sink()?;
    let count = write_samples(&mut sink, samples, None)?;
    sink.finalize()?;

    log::info!("Dumped wavetable {}, {count} samples", args.index);
    Ok(())
}
