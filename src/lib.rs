//! This is the documentation for the **beamprop** crate.
//!
//! beamprop orchestrates the propagation of a coherent 1D optical wavefront through an ordered
//! chain of optical elements (sources, mirrors, detectors, transmissive masks) whose physical
//! field computation is delegated to an external optical-simulation engine, and exposes that chain
//! through a generic propagation-framework interface.
//!
//! The crate deliberately contains no propagation mathematics: the diffraction kernel lives behind
//! the [`FieldEngine`] trait. What it does contain is the state-resolution logic around a
//! propagation request: which subsequence of the [`Beamline`] must be (re)computed, when a
//! fixed-field source has to be synthesized for an externally supplied upstream field, whether
//! computation happens at all (interactive vs. batch mode) and how the result is translated
//! between the host framework's [`GenericWavefront`] and the engine-native [`ComputationResult`].
#![allow(clippy::module_name_repetitions)]

pub mod beamline;
pub mod element;
pub mod engine;
pub mod error;
pub mod positioning;
pub mod propagator;
pub mod properties;
pub mod request;
pub mod utils;
pub mod wavefront;

pub use beamline::{Beamline, InsertMode};
pub use element::{BeamlineElement, ComputationSettings, ElementKind};
pub use engine::FieldEngine;
pub use error::{BeampropError, BpResult};
pub use propagator::{propagate, propagate_request, InteractiveMode, PropagationConfig};
pub use request::PropagationRequest;
pub use wavefront::{ComputationResult, GenericWavefront, Wavefront};
