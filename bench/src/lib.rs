//! Benchmark utilities for tannoy.
//!
//! This crate provides benchmarking infrastructure for the notification
//! center, including:
//!
//! - **Microbenchmarks**: Individual operation performance (post, subscribe,
//!   invalidate, metadata construction)
//! - **Scenario benchmarks**: Realistic workloads (chat-room fan-out,
//!   subscriber churn, metadata-heavy bursts)
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p tannoy_bench
//!
//! # Run a specific benchmark group
//! cargo bench -p tannoy_bench -- post
//! ```
//!
//! # Benchmark Results
//!
//! Results are written to `target/criterion/` with HTML reports for
//! visualization.

pub mod payloads;
pub mod scenarios;
