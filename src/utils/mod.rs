#![warn(missing_docs)]
//! Helper functions and macros
pub mod uom_macros;
