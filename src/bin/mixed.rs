//! `carga-mixed`: the mixed CPU and delay workload fixture.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use carga::cli::{self, MixedCli};
use carga::delay::{self, Interrupter};
use carga::workload::MixedWorkloadFixture;

fn main() -> Result<()> {
    let args = MixedCli::parse();
    cli::init_tracing(args.debug);

    delay::install_signal_interrupt().context("installing signal handlers")?;

    let fixture = MixedWorkloadFixture::new(
        Duration::from_millis(args.recursion_delay_ms),
        Duration::from_millis(args.string_delay_ms),
        Interrupter::new(),
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    fixture
        .run(&mut rand::thread_rng(), &mut out)
        .context("writing fixture output")?;

    Ok(())
}
