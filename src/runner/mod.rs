// src/runner/mod.rs
pub mod maven;
pub mod process;

pub use maven::{build_benchmarks, find_benchmarks_jar, run_jmh};
