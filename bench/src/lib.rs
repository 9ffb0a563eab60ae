//! Benchmark utilities for the substrate.
//!
//! This crate provides benchmarking infrastructure for the entity store, component access, the
//! event bus and background tasks:
//!
//! - **Microbenchmarks**: individual operations in isolation (create, validate, attach, raise)
//! - **Scenario benchmarks**: frame-shaped workloads mixing all of them (particles, skirmish)
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p rusty_bench
//!
//! # Run specific benchmark group
//! cargo bench -p rusty_bench -- handles
//! ```
//!
//! Results are written to `target/criterion/` with HTML reports for visualization.

pub mod components;
pub mod scenarios;
