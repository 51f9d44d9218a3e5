//! `carga-delay`: the sequential blocking-delay fixture.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use carga::cli::{self, DelayCli};
use carga::delay::{self, Interrupter};
use carga::sequential::SequentialDelayFixture;

fn main() -> Result<()> {
    let args = DelayCli::parse();
    cli::init_tracing(args.debug);

    delay::install_signal_interrupt().context("installing signal handlers")?;

    let fixture = SequentialDelayFixture::new(
        Duration::from_millis(args.delay_ms),
        Interrupter::new(),
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    fixture.run(&mut out).context("writing fixture output")?;

    Ok(())
}
