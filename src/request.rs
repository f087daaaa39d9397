#![warn(missing_docs)]
//! Request envelope handed over by the host propagation framework.
use crate::{
    error::{BeampropError, BpResult},
    propagator::{InteractiveMode, PropagationConfig},
    properties::{Properties, Proptype},
    wavefront::Wavefront,
};

/// A single propagation request as supplied by the host framework.
///
/// Besides the optional input wavefront, the envelope carries propagator-specific parameters in a
/// generic [`Properties`] map (`single_propagation`, `parallelism`,
/// `full_propagator_override`) and the interactive-mode flag queried from the host environment at
/// call time. The flag is threaded through explicitly instead of being read from global state, so
/// the orchestrator stays pure with respect to its environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropagationRequest {
    wavefront: Option<Wavefront>,
    parameters: Properties,
    interactive_mode: InteractiveMode,
}
impl PropagationRequest {
    /// Creates a new [`PropagationRequest`] with the given (optional) input wavefront.
    #[must_use]
    pub fn new(wavefront: Option<Wavefront>) -> Self {
        Self {
            wavefront,
            parameters: Properties::default(),
            interactive_mode: InteractiveMode::Unset,
        }
    }
    /// Returns the input wavefront of this [`PropagationRequest`], if one was supplied.
    #[must_use]
    pub const fn wavefront(&self) -> Option<&Wavefront> {
        self.wavefront.as_ref()
    }
    /// Sets a named parameter of this [`PropagationRequest`].
    pub fn set_parameter(&mut self, name: &str, value: Proptype) {
        self.parameters.set(name, value);
    }
    /// Returns the parameter map of this [`PropagationRequest`].
    #[must_use]
    pub const fn parameters(&self) -> &Properties {
        &self.parameters
    }
    /// Sets the interactive-mode flag of this [`PropagationRequest`].
    pub fn set_interactive_mode(&mut self, mode: InteractiveMode) {
        self.interactive_mode = mode;
    }
    /// Returns the interactive-mode flag of this [`PropagationRequest`].
    #[must_use]
    pub const fn interactive_mode(&self) -> InteractiveMode {
        self.interactive_mode
    }
    /// Decode the generic parameter map into a [`PropagationConfig`].
    ///
    /// Absent parameters fall back to their defaults (`single_propagation`: `false`,
    /// `parallelism`: 1, `full_propagator_override`: `false`).
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - a parameter is present but wrongly typed ([`TypeMismatch`](BeampropError::TypeMismatch)).
    ///   - `parallelism` is not a positive integer.
    pub fn config(&self) -> BpResult<PropagationConfig> {
        let single_propagation = self.parameters.bool_or("single_propagation", false)?;
        let full_propagator_override =
            self.parameters.bool_or("full_propagator_override", false)?;
        let parallelism = self.parameters.int_or("parallelism", 1)?;
        if parallelism < 1 {
            return Err(BeampropError::InvalidRequest(
                "parallelism must be a positive integer".into(),
            ));
        }
        let parallelism = usize::try_from(parallelism).map_err(|e| {
            BeampropError::InvalidRequest(format!("parallelism cannot be represented: {e}"))
        })?;
        Ok(PropagationConfig {
            single_propagation,
            parallelism,
            interactive_mode: self.interactive_mode,
            full_propagator_override,
        })
    }
}
