//! Positional argument parsing.

use std::fmt;
use std::str::FromStr;

use shared_types::Money;

use super::{DispatchError, Function};

/// Arguments of one call, already checked for arity.
pub(crate) struct Args<'a, A: AsRef<str>> {
    function: Function,
    values: &'a [A],
}

impl<'a, A: AsRef<str>> Args<'a, A> {
    pub(crate) fn new(function: Function, values: &'a [A]) -> Result<Self, DispatchError> {
        if values.len() != function.arity() {
            return Err(DispatchError::Arity {
                usage: function.usage(),
                expected: function.arity(),
                actual: values.len(),
            });
        }
        Ok(Self { function, values })
    }

    pub(crate) fn text(&self, index: usize) -> String {
        self.raw(index).to_string()
    }

    /// Parse with the type's own `FromStr`.
    pub(crate) fn parse<T>(&self, index: usize) -> Result<T, DispatchError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let raw = self.raw(index).trim();
        raw.parse().map_err(|e: T::Err| self.invalid(index, e.to_string()))
    }

    /// Decimal amount; plain digits with an optional fraction.
    pub(crate) fn money(&self, index: usize) -> Result<Money, DispatchError> {
        let raw = self.raw(index).trim();
        Money::from_str_exact(raw).map_err(|e| self.invalid(index, e.to_string()))
    }

    fn raw(&self, index: usize) -> &str {
        self.values[index].as_ref()
    }

    fn invalid(&self, index: usize, reason: String) -> DispatchError {
        DispatchError::InvalidArgument {
            function: self.function,
            parameter: self.function.parameters()[index],
            value: self.raw(index).to_string(),
            reason,
        }
    }
}
