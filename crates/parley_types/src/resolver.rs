//! Named type resolution.
//!
//! A [`TypeResolver`] maps type names to casters. It comes pre-populated
//! with the built-in types and accepts host registrations; a name that
//! resolves to nothing is a configuration defect, reported loudly at cast
//! time.

use std::collections::HashMap;

use parley_foundation::Value;

use crate::caster::Caster;

/// Registry of named casters.
#[derive(Debug)]
pub struct TypeResolver {
    types: HashMap<String, Caster>,
}

impl TypeResolver {
    /// Creates a resolver pre-populated with the built-in types:
    /// `string`, `lowercase`, `uppercase`, `charcodes`, `integer`,
    /// `number`.
    #[must_use]
    pub fn new() -> Self {
        let mut resolver = Self {
            types: HashMap::new(),
        };
        resolver.register_builtins();
        resolver
    }

    /// Registers (or replaces) a named caster.
    pub fn register(&mut self, name: impl Into<String>, caster: Caster) {
        self.types.insert(name.into(), caster);
    }

    /// Looks up a caster by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Caster> {
        self.types.get(name)
    }

    fn register_builtins(&mut self) {
        self.register(
            "string",
            Caster::from_fn(|_, phrase| {
                Ok((!phrase.is_empty()).then(|| Value::from(phrase)))
            }),
        );

        self.register(
            "lowercase",
            Caster::from_fn(|_, phrase| {
                Ok((!phrase.is_empty()).then(|| Value::from(phrase.to_lowercase())))
            }),
        );

        self.register(
            "uppercase",
            Caster::from_fn(|_, phrase| {
                Ok((!phrase.is_empty()).then(|| Value::from(phrase.to_uppercase())))
            }),
        );

        self.register(
            "charcodes",
            Caster::from_fn(|_, phrase| {
                if phrase.is_empty() {
                    return Ok(None);
                }
                let codes = phrase
                    .chars()
                    .map(|c| Value::Int(i64::from(u32::from(c))))
                    .collect();
                Ok(Some(Value::List(codes)))
            }),
        );

        self.register(
            "integer",
            Caster::from_fn(|_, phrase| Ok(phrase.trim().parse::<i64>().ok().map(Value::Int))),
        );

        self.register(
            "number",
            Caster::from_fn(|_, phrase| {
                Ok(phrase.trim().parse::<f64>().ok().map(Value::Float))
            }),
        );
    }
}

impl Default for TypeResolver {
    fn default() -> Self {
        Self::new()
    }
}
