#![warn(missing_docs)]
//! Beamprop specific error structures
use std::{error::Error, fmt::Display};

/// Beamprop application specific Result type
pub type BpResult<T> = std::result::Result<T, BeampropError>;

/// Errors that can be returned by various beamprop functions.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum BeampropError {
    /// the propagation request or a chain operation is malformed (empty beamline, source element
    /// as single-step target, unsupported insertion placement, out-of-range index, non-positive
    /// parallelism, duplicate element name)
    InvalidRequest(String),
    /// a request parameter or wavefront value has an unexpected representation
    TypeMismatch(String),
    /// a required upstream field is missing and no input wavefront was supplied to fill it
    ComputationImpossible(String),
    /// errors not falling in one of the categories above
    Other(String),
}

impl Display for BeampropError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequest(m) => {
                write!(f, "InvalidRequest:{m}")
            }
            Self::TypeMismatch(m) => {
                write!(f, "TypeMismatch:{m}")
            }
            Self::ComputationImpossible(m) => {
                write!(f, "ComputationImpossible:{m}")
            }
            Self::Other(m) => write!(f, "Beamprop Error:Other:{m}"),
        }
    }
}
impl Error for BeampropError {}

impl std::convert::From<String> for BeampropError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}
