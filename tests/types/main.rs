//! Integration tests for the parley_types crate.
//!
//! Tests for the caster combinator algebra:
//! - Combinator laws (union, product, compose, range)
//! - Provenance tagging
//! - Built-in types and registration

mod combinator_tests;
mod support;
