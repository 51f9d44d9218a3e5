//! Carga - deterministic workload fixtures for profiler validation
//!
//! This library backs the `carga-delay` and `carga-mixed` binaries: small
//! programs whose call nesting, branch counts, and blocking delays are fixed,
//! so an external profiler or trace viewer can be judged against a known
//! execution shape. The fixtures compute nothing useful; the work itself is
//! the product.

pub mod cli;
pub mod delay;
pub mod sequential;
pub mod workload;
