//! CLI argument parsing for the fixture binaries
//!
//! Only delay durations are adjustable. Anything that would change the call
//! tree or output line structure (array size, recursion depth, matrix size,
//! token count) is deliberately not exposed: the shape is the contract.

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "carga-delay")]
#[command(version)]
#[command(about = "Sequential blocking-delay fixture for profiler validation", long_about = None)]
pub struct DelayCli {
    /// Blocking delay per phase in milliseconds
    #[arg(long = "delay-ms", value_name = "MS", default_value = "3000")]
    pub delay_ms: u64,

    /// Enable debug tracing to stderr
    #[arg(long)]
    pub debug: bool,
}

#[derive(Parser, Debug)]
#[command(name = "carga-mixed")]
#[command(version)]
#[command(about = "Mixed CPU and delay workload fixture for profiler validation", long_about = None)]
pub struct MixedCli {
    /// Blocking delay per recursion frame in milliseconds
    #[arg(long = "recursion-delay-ms", value_name = "MS", default_value = "1000")]
    pub recursion_delay_ms: u64,

    /// Blocking delay after string accumulation in milliseconds
    #[arg(long = "string-delay-ms", value_name = "MS", default_value = "1")]
    pub string_delay_ms: u64,

    /// Enable debug tracing to stderr
    #[arg(long)]
    pub debug: bool,
}

/// Initialize tracing subscriber for debug output
pub fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}
