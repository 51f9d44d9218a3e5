//! Integration tests for the sequential delay fixture
//!
//! Exercised in-process with millisecond-scale delays; the contract under
//! test is marker count, ordering, and wall-clock behavior, none of which
//! depend on the delay magnitude.

use std::time::{Duration, Instant};

use carga::delay::Interrupter;
use carga::sequential::SequentialDelayFixture;
use serial_test::serial;

fn run_lines(fixture: &SequentialDelayFixture) -> Vec<String> {
    let mut out = Vec::new();
    fixture.run(&mut out).expect("fixture run failed");
    String::from_utf8(out)
        .expect("fixture output is not UTF-8")
        .lines()
        .map(str::to_owned)
        .collect()
}

#[test]
fn test_uninterrupted_run_emits_exactly_ten_lines() {
    let fixture = SequentialDelayFixture::new(Duration::from_millis(1), Interrupter::new());
    let lines = run_lines(&fixture);
    assert_eq!(lines.len(), 10);
    assert_eq!(lines[0], "Starting...");
    assert_eq!(lines[9], "All functions completed.");
}

#[test]
fn test_four_phases_strictly_interleaved_in_order() {
    let fixture = SequentialDelayFixture::new(Duration::from_millis(1), Interrupter::new());
    let lines = run_lines(&fixture);

    let phases = ["One", "Two", "Three", "Four"];
    let mut cursor = 1;
    for phase in phases {
        assert_eq!(lines[cursor], format!("Function {phase} started."));
        assert_eq!(lines[cursor + 1], format!("Function {phase} completed."));
        cursor += 2;
    }
}

#[test]
#[serial]
fn test_wall_time_at_least_four_phase_delays() {
    let delay = Duration::from_millis(25);
    let fixture = SequentialDelayFixture::new(delay, Interrupter::new());
    let start = Instant::now();
    run_lines(&fixture);
    assert!(start.elapsed() >= delay * 4);
}

#[test]
#[serial]
fn test_interruption_never_increases_elapsed_time() {
    let interrupter = Interrupter::new();
    interrupter.fire();
    let fixture = SequentialDelayFixture::new(Duration::from_secs(3), interrupter);

    let start = Instant::now();
    let lines = run_lines(&fixture);

    // All four phases still complete, just without their sleeps.
    assert_eq!(lines.last().unwrap(), "All functions completed.");
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[test]
fn test_interruption_swallowed_per_phase() {
    let interrupter = Interrupter::new();
    interrupter.fire();
    let fixture = SequentialDelayFixture::new(Duration::from_secs(1), interrupter);
    let lines = run_lines(&fixture);

    // One interrupted-sleep report inside each of the four phases.
    assert_eq!(lines.len(), 14);
    for phase in ["One", "Two", "Three", "Four"] {
        let started = lines
            .iter()
            .position(|line| *line == format!("Function {phase} started."))
            .expect("missing start marker");
        assert_eq!(lines[started + 1], "Sleep was interrupted");
        assert_eq!(lines[started + 2], format!("Function {phase} completed."));
    }
}
