//! Composable type casting for parley.
//!
//! This crate provides:
//! - [`Caster`] - A combinator algebra turning one phrase into a typed
//!   [`parley_foundation::Value`] or a failure
//! - [`TypeResolver`] - Named type lookup, pre-populated with built-ins
//! - [`CastContext`] / [`CastFn`] - The evaluation context and the trait
//!   user-supplied (possibly async) casters implement

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod caster;
pub mod resolver;

pub use caster::{CastContext, CastFn, Caster, Predicate};
pub use resolver::TypeResolver;
