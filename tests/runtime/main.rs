//! Integration tests for the parley_runtime crate.
//!
//! Tests for argument processing and running:
//! - Processing and defaulting
//! - The prompt engine (retries, time-outs, cancellation, infinite mode,
//!   breakout)
//! - The argument runner (match modes, cursor state, short-circuits)

mod prompt_tests;
mod runner_tests;
