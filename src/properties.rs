#![warn(missing_docs)]
//! Module for handling generic request parameters.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{BeampropError, BpResult};

/// Value of a single named request parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Proptype {
    /// boolean flag
    Bool(bool),
    /// signed integer value
    Int(i64),
    /// floating point value
    Float(f64),
    /// string value
    String(String),
}
impl From<bool> for Proptype {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}
impl From<i64> for Proptype {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}
impl From<f64> for Proptype {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}
impl From<&str> for Proptype {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// A general set of named parameters attached to a propagation request.
///
/// The host framework encodes additional, propagator-specific parameters (parallelism, single
/// propagation flag, ...) in such a generic map. Typed accessors translate a wrongly typed entry
/// into a [`TypeMismatch`](BeampropError::TypeMismatch) error.
///
/// ## Example
/// ```rust
/// use beamprop::properties::Properties;
/// let mut params = Properties::default();
/// params.set("parallelism", 4i64.into());
/// assert_eq!(params.int_or("parallelism", 1).unwrap(), 4);
/// ```
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
    props: BTreeMap<String, Proptype>,
}
impl Properties {
    /// Sets (or overwrites) the parameter with the given name.
    pub fn set(&mut self, name: &str, value: Proptype) {
        self.props.insert(name.into(), value);
    }
    /// Returns the parameter with the given name, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Proptype> {
        self.props.get(name)
    }
    /// Returns the boolean parameter with the given name, or `default` if absent.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameter is present but not a boolean.
    pub fn bool_or(&self, name: &str, default: bool) -> BpResult<bool> {
        match self.props.get(name) {
            None => Ok(default),
            Some(Proptype::Bool(value)) => Ok(*value),
            Some(other) => Err(BeampropError::TypeMismatch(format!(
                "parameter '{name}' must be a boolean, got {other:?}"
            ))),
        }
    }
    /// Returns the integer parameter with the given name, or `default` if absent.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameter is present but not an integer.
    pub fn int_or(&self, name: &str, default: i64) -> BpResult<i64> {
        match self.props.get(name) {
            None => Ok(default),
            Some(Proptype::Int(value)) => Ok(*value),
            Some(other) => Err(BeampropError::TypeMismatch(format!(
                "parameter '{name}' must be an integer, got {other:?}"
            ))),
        }
    }
    /// Returns the number of parameters in this set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.props.len()
    }
    /// Returns `true` if this set contains no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }
}
