//! Mixed CPU and delay workload fixture
//!
//! Three named phases run in order, each fanning out into CPU-bound
//! sub-operations (array generation and reduction, bounded recursion with a
//! per-frame delay, dense matrix multiplication, string accumulation). The
//! profiler under test should render a deeper, heterogeneous call tree than
//! the flat sequential fixture.
//!
//! Data values are random but never steer control flow: branch counts, call
//! nesting, and output line structure are identical on every run. Only the
//! delays are configurable; everything that shapes the call tree is a
//! compile-time constant.

use std::hint::black_box;
use std::io::{self, Write};
use std::time::Duration;

use rand::Rng;
use tracing::warn;

use crate::delay::{interruptible_sleep, Interrupter, SleepOutcome};

/// Number of elements in the sample array.
pub const DATA_SIZE: usize = 1000;
/// Exclusive upper bound for sampled values and string tokens.
pub const VALUE_BOUND: u32 = 1000;
/// Threshold for the strictly-greater filter count.
pub const FILTER_THRESHOLD: u32 = 500;
/// Number of explicit-summation rounds.
pub const CALCULATION_ROUNDS: u64 = 3;
/// Terms per summation round.
pub const CALCULATION_TERMS: u64 = 1000;
/// Initial recursion depth; total frames = depth + 1.
pub const RECURSION_DEPTH: u32 = 3;
/// Square matrix dimension.
pub const MATRIX_SIZE: usize = 5;
/// Exclusive upper bound for matrix entries.
pub const MATRIX_VALUE_BOUND: u32 = 10;
/// Number of integer tokens accumulated by string processing.
pub const STRING_TOKEN_COUNT: usize = 100;
/// Blocking delay per recursion frame.
pub const RECURSION_DELAY: Duration = Duration::from_millis(1000);
/// Fixed delay after string accumulation.
pub const STRING_DELAY: Duration = Duration::from_millis(1);

/// Fixed-size square matrix of bounded-range entries.
pub type Matrix = [[u32; MATRIX_SIZE]; MATRIX_SIZE];

/// The mixed workload fixture.
///
/// `Default` gives the contractual delays (1000 ms per recursion frame,
/// 1 ms after string accumulation) with a fresh interrupter.
#[derive(Debug, Clone)]
pub struct MixedWorkloadFixture {
    recursion_delay: Duration,
    string_delay: Duration,
    interrupter: Interrupter,
}

impl Default for MixedWorkloadFixture {
    fn default() -> Self {
        Self::new(RECURSION_DELAY, STRING_DELAY, Interrupter::new())
    }
}

impl MixedWorkloadFixture {
    pub fn new(recursion_delay: Duration, string_delay: Duration, interrupter: Interrupter) -> Self {
        Self {
            recursion_delay,
            string_delay,
            interrupter,
        }
    }

    /// Run all three phases in order, bracketed by program markers.
    ///
    /// The RNG is caller-supplied so embedders can seed it; the generated
    /// values affect output text but never the call or branch structure.
    pub fn run<R: Rng, W: Write>(&self, rng: &mut R, out: &mut W) -> io::Result<()> {
        writeln!(out, "Starting program...")?;

        self.process_data(rng, out)?;
        self.calculate_results(out)?;
        self.perform_complex_operation(rng, out)?;

        writeln!(out, "Program completed.")
    }

    #[inline(never)]
    fn process_data<R: Rng, W: Write>(&self, rng: &mut R, out: &mut W) -> io::Result<()> {
        writeln!(out, "\nProcessing data...")?;
        let data = generate_data(rng, DATA_SIZE, out)?;
        analyze_data(&data, out)?;
        filter_data(&data, out)
    }

    #[inline(never)]
    fn calculate_results<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "\nCalculating results...")?;
        for iteration in 0..CALCULATION_ROUNDS {
            perform_calculation(iteration, out)?;
        }
        self.recursive_function(RECURSION_DEPTH, out)
    }

    /// One recursion frame: entry marker, blocking delay, recurse while
    /// depth > 0, exit marker on unwind. Depth 0 still blocks before the
    /// check, so frames = initial depth + 1.
    #[inline(never)]
    pub fn recursive_function<W: Write>(&self, depth: u32, out: &mut W) -> io::Result<()> {
        writeln!(out, "Entering recursion depth: {depth}")?;
        if let SleepOutcome::Interrupted { remaining } =
            interruptible_sleep(self.recursion_delay, &self.interrupter)
        {
            warn!(
                depth,
                remaining_ms = remaining.as_millis() as u64,
                "recursion delay interrupted"
            );
        }
        if depth > 0 {
            self.recursive_function(depth - 1, out)?;
        }
        writeln!(out, "Exiting recursion depth: {depth}")
    }

    #[inline(never)]
    fn perform_complex_operation<R: Rng, W: Write>(
        &self,
        rng: &mut R,
        out: &mut W,
    ) -> io::Result<()> {
        writeln!(out, "\nPerforming complex operations...")?;
        matrix_multiplication(rng, out)?;
        self.string_processing(rng, out)
    }

    #[inline(never)]
    fn string_processing<R: Rng, W: Write>(&self, rng: &mut R, out: &mut W) -> io::Result<()> {
        writeln!(out, "Processing strings...")?;
        let accumulated = build_token_string(rng, STRING_TOKEN_COUNT);
        if let SleepOutcome::Interrupted { remaining } =
            interruptible_sleep(self.string_delay, &self.interrupter)
        {
            warn!(
                remaining_ms = remaining.as_millis() as u64,
                "string-processing delay interrupted"
            );
        }
        writeln!(
            out,
            "Generated string with {} numbers",
            count_tokens(&accumulated)
        )
    }
}

/// Fill the sample array with uniform values in [0, `VALUE_BOUND`).
#[inline(never)]
pub fn generate_data<R: Rng, W: Write>(
    rng: &mut R,
    size: usize,
    out: &mut W,
) -> io::Result<Vec<u32>> {
    writeln!(out, "Generating {size} random numbers...")?;
    Ok((0..size).map(|_| rng.gen_range(0..VALUE_BOUND)).collect())
}

/// Sum, mean, and min/max over the sample array. Reads only; the same
/// slice feeds every analysis.
#[inline(never)]
pub fn analyze_data<W: Write>(data: &[u32], out: &mut W) -> io::Result<()> {
    writeln!(out, "Analyzing data...")?;
    let sum = calculate_sum(data);
    let avg = calculate_average(data, sum);
    find_min_max(data, out)?;
    writeln!(out, "Analysis results - Sum: {sum}, Avg: {avg:.2}")
}

/// Element-wise sum, widened to 64 bits before accumulation.
#[inline(never)]
pub fn calculate_sum(data: &[u32]) -> u64 {
    let mut sum = 0u64;
    for &value in data {
        sum += u64::from(value);
    }
    sum
}

pub fn calculate_average(data: &[u32], sum: u64) -> f64 {
    sum as f64 / data.len() as f64
}

/// Linear min/max scan seeded from the first element. `None` on an empty
/// slice.
pub fn min_max(data: &[u32]) -> Option<(u32, u32)> {
    let (&first, rest) = data.split_first()?;
    let mut min = first;
    let mut max = first;
    for &value in rest {
        if value < min {
            min = value;
        }
        if value > max {
            max = value;
        }
    }
    Some((min, max))
}

/// An empty array produces no output at all, by contract.
#[inline(never)]
pub fn find_min_max<W: Write>(data: &[u32], out: &mut W) -> io::Result<()> {
    match min_max(data) {
        Some((min, max)) => writeln!(out, "Min: {min}, Max: {max}"),
        None => Ok(()),
    }
}

/// Count of elements strictly greater than `threshold`.
pub fn count_above(data: &[u32], threshold: u32) -> usize {
    data.iter().filter(|&&value| value > threshold).count()
}

#[inline(never)]
pub fn filter_data<W: Write>(data: &[u32], out: &mut W) -> io::Result<()> {
    let count = count_above(data, FILTER_THRESHOLD);
    writeln!(out, "Filtered {count} elements > 500")
}

/// Σ_{k=0}^{TERMS-1} k·iteration. A closed form exists; the explicit loop
/// is the workload, and `black_box` keeps the optimizer from collapsing it.
pub fn calculation_sum(iteration: u64) -> u64 {
    let mut result = 0u64;
    for term in 0..CALCULATION_TERMS {
        result += black_box(term * iteration);
    }
    result
}

#[inline(never)]
pub fn perform_calculation<W: Write>(iteration: u64, out: &mut W) -> io::Result<()> {
    let result = calculation_sum(iteration);
    writeln!(out, "Calculation {iteration} result: {result}")
}

/// Fill a matrix with uniform entries in [0, `MATRIX_VALUE_BOUND`).
pub fn random_matrix<R: Rng>(rng: &mut R) -> Matrix {
    let mut matrix = [[0u32; MATRIX_SIZE]; MATRIX_SIZE];
    for row in &mut matrix {
        for entry in row.iter_mut() {
            *entry = rng.gen_range(0..MATRIX_VALUE_BOUND);
        }
    }
    matrix
}

/// Standard triple-nested-loop product.
pub fn multiply_matrices(m1: &Matrix, m2: &Matrix) -> Matrix {
    let mut result = [[0u32; MATRIX_SIZE]; MATRIX_SIZE];
    for i in 0..MATRIX_SIZE {
        for j in 0..MATRIX_SIZE {
            for k in 0..MATRIX_SIZE {
                result[i][j] += m1[i][k] * m2[k][j];
            }
        }
    }
    result
}

/// Build, multiply, and discard two random matrices. The product exists
/// only to consume CPU; `black_box` stops dead-code elimination.
#[inline(never)]
pub fn matrix_multiplication<R: Rng, W: Write>(rng: &mut R, out: &mut W) -> io::Result<()> {
    writeln!(out, "Multiplying matrices...")?;
    let m1 = random_matrix(rng);
    let m2 = random_matrix(rng);
    black_box(multiply_matrices(&m1, &m2));
    writeln!(out, "Matrix multiplication completed")
}

/// Accumulate `count` random integers, each followed by a single space.
pub fn build_token_string<R: Rng>(rng: &mut R, count: usize) -> String {
    let mut accumulated = String::new();
    for _ in 0..count {
        accumulated.push_str(&rng.gen_range(0..VALUE_BOUND).to_string());
        accumulated.push(' ');
    }
    accumulated
}

/// Whitespace-delimited token count. The accumulated string ends with a
/// separator; counting whitespace-delimited tokens keeps that from
/// manufacturing an empty trailing token.
pub fn count_tokens(accumulated: &str) -> usize {
    accumulated.split_ascii_whitespace().count()
}
