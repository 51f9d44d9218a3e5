//! Flat sequential delay fixture
//!
//! Four named phases run strictly in order, each one blocking for a fixed
//! duration. The profiler under test should render a flat call tree with
//! four uniform-cost leaves under a single root. Phases never overlap: a
//! phase's completion marker is written before the next phase starts.

use std::io::{self, Write};
use std::time::Duration;

use tracing::warn;

use crate::delay::{interruptible_sleep, Interrupter, SleepOutcome};

/// Blocking delay for each of the four phases.
pub const PHASE_DELAY: Duration = Duration::from_millis(3000);

/// The sequential delay fixture.
///
/// `Default` gives the contractual 3000 ms phase delay with a fresh
/// interrupter; the binary substitutes the CLI override, tests substitute
/// millisecond-scale delays.
#[derive(Debug, Clone)]
pub struct SequentialDelayFixture {
    phase_delay: Duration,
    interrupter: Interrupter,
}

impl Default for SequentialDelayFixture {
    fn default() -> Self {
        Self::new(PHASE_DELAY, Interrupter::new())
    }
}

impl SequentialDelayFixture {
    pub fn new(phase_delay: Duration, interrupter: Interrupter) -> Self {
        Self {
            phase_delay,
            interrupter,
        }
    }

    /// Run all four phases in order, bracketed by program markers.
    ///
    /// Uninterrupted, this blocks for at least four times the phase delay.
    /// An interrupted delay is reported and then treated as already elapsed;
    /// the sequence always reaches the final marker.
    pub fn run<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Starting...")?;

        self.function_one(out)?;
        self.function_two(out)?;
        self.function_three(out)?;
        self.function_four(out)?;

        writeln!(out, "All functions completed.")
    }

    // Each phase is its own never-inlined function so the profiler sees
    // four distinct frames, not one loop body.

    #[inline(never)]
    fn function_one<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Function One started.")?;
        self.pause(out)?;
        writeln!(out, "Function One completed.")
    }

    #[inline(never)]
    fn function_two<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Function Two started.")?;
        self.pause(out)?;
        writeln!(out, "Function Two completed.")
    }

    #[inline(never)]
    fn function_three<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Function Three started.")?;
        self.pause(out)?;
        writeln!(out, "Function Three completed.")
    }

    #[inline(never)]
    fn function_four<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Function Four started.")?;
        self.pause(out)?;
        writeln!(out, "Function Four completed.")
    }

    fn pause<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if let SleepOutcome::Interrupted { remaining } =
            interruptible_sleep(self.phase_delay, &self.interrupter)
        {
            warn!(
                remaining_ms = remaining.as_millis() as u64,
                "phase delay interrupted"
            );
            writeln!(out, "Sleep was interrupted")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn run_fixture(fixture: &SequentialDelayFixture) -> Vec<String> {
        let mut out = Vec::new();
        fixture.run(&mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn test_run_emits_ten_lines_in_fixed_order() {
        let fixture = SequentialDelayFixture::new(Duration::from_millis(1), Interrupter::new());
        let lines = run_fixture(&fixture);
        assert_eq!(
            lines,
            vec![
                "Starting...",
                "Function One started.",
                "Function One completed.",
                "Function Two started.",
                "Function Two completed.",
                "Function Three started.",
                "Function Three completed.",
                "Function Four started.",
                "Function Four completed.",
                "All functions completed.",
            ]
        );
    }

    #[test]
    fn test_elapsed_at_least_four_phase_delays() {
        let fixture = SequentialDelayFixture::new(Duration::from_millis(10), Interrupter::new());
        let start = Instant::now();
        run_fixture(&fixture);
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn test_interrupted_run_reports_each_phase_and_completes() {
        let interrupter = Interrupter::new();
        interrupter.fire();
        let fixture = SequentialDelayFixture::new(Duration::from_secs(3), interrupter);

        let start = Instant::now();
        let lines = run_fixture(&fixture);

        // Interruption is swallowed per phase, never re-raised: all four
        // phases complete, each reporting its cut-short sleep.
        assert_eq!(lines.len(), 14);
        assert_eq!(
            lines
                .iter()
                .filter(|line| *line == "Sleep was interrupted")
                .count(),
            4
        );
        assert_eq!(lines.last().unwrap(), "All functions completed.");
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_interrupted_marker_sits_between_phase_markers() {
        let interrupter = Interrupter::new();
        interrupter.fire();
        let fixture = SequentialDelayFixture::new(Duration::from_secs(1), interrupter);
        let lines = run_fixture(&fixture);

        let started = lines
            .iter()
            .position(|line| line == "Function One started.")
            .unwrap();
        assert_eq!(lines[started + 1], "Sleep was interrupted");
        assert_eq!(lines[started + 2], "Function One completed.");
    }

    #[test]
    fn test_default_uses_contract_delay() {
        let fixture = SequentialDelayFixture::default();
        assert_eq!(fixture.phase_delay, PHASE_DELAY);
    }
}
