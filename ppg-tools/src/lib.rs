//! Shared plumbing for the desktop renderers and dump utilities.
//!
//! Samples go to stdout as raw unsigned 8-bit PCM (pipe them into
//! `aplay -r 20000 -f U8`) or into a WAV file with `--output`. Diagnostics go
//! to stderr through `env_logger`, set `RUST_LOG` to change the level.

mod bank;
mod output;

pub use bank::{BankArgs, BankFiles};
pub use output::{
    OutputArgs, Sink, is_broken_pipe, pcm_to_wav, sample_count, wav_spec, write_samples,
};

pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Ends a tool run, a reader hanging up on stdout counts as success
pub fn finish(result: anyhow::Result<()>) -> anyhow::Result<()> {
    match result {
        Err(error) if is_broken_pipe(&error) => {
            log::debug!("Output closed, stopping");
            Ok(())
        }
        other => other,
    }
}
