#![warn(missing_docs)]
//! Seam towards the external optical-simulation engine.
use crate::{element::BeamlineElement, error::BpResult, wavefront::ComputationResult};

/// Field-computation backend of a [`Beamline`](crate::beamline::Beamline).
///
/// This trait is implemented by the external optical-simulation engine which owns the actual
/// physical propagation mathematics (diffraction integrals, mirror figure errors, detector
/// sampling). [`Beamline::compute_fields`](crate::beamline::Beamline::compute_fields) walks the
/// chain in order and calls [`FieldEngine::eval_field`] once per element that needs a (re)computed
/// field, so a result is always available before any element depending on it is computed.
///
/// `parallelism` bounds the engine's internal worker pool for a single evaluation; no ordering
/// guarantee is made about sub-computations inside that pool. The trait is object safe so tests
/// can instrument implementations with call counters.
pub trait FieldEngine {
    /// Compute the field on `element`, given the `incoming` field of its upstream neighbour.
    ///
    /// `incoming` is `None` only for source elements, in which case the engine synthesizes the
    /// source field analytically from the element's physical parameters.
    ///
    /// # Errors
    ///
    /// This function will return an engine-specific error if the evaluation fails.
    fn eval_field(
        &self,
        element: &BeamlineElement,
        incoming: Option<&ComputationResult>,
        parallelism: usize,
    ) -> BpResult<ComputationResult>;
}
