use anyhow::Result;
use clap::Parser;
use ppg_tools::{BankArgs, OutputArgs, write_samples};

#[derive(Parser, Debug)]
#[command(name = "PPG Waveform Dump")]
#[command(about = "Repeats the full mirrored cycle of one waveform", long_about = None)]
struct Args {
    /// Waveform to dump
    index: u8,

    /// Number of cycles
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
    let waveform = files.waveform(args.index)?;

    let samples = (0..args.repeat).flat_map(|_| waveform.cycle());

    let mut sink = args.output.sink()?;
    let count = write_samples(&mut sink, samples, None)?;
    sink.finalize()?;

    log::info!("Dumped waveform {}, {count} samples", args.index);
    Ok(())
}
