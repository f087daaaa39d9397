#![warn(missing_docs)]
//! Wavefront representations exchanged between the host framework and the computation engine.
//!
//! A wavefront exists in two structurally identical forms: the engine-native
//! [`ComputationResult`] which is stored on each [`BeamlineElement`](crate::element::BeamlineElement)
//! after field computation, and the host framework's [`GenericWavefront`]. The conversion between
//! the two is a lossless, order-preserving bijection: the same numeric arrays are carried over
//! field for field, no resampling takes place.
use num::Complex;
use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

use crate::error::{BeampropError, BpResult};

/// Native result of an engine field computation on a single beamline element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationResult {
    wavelength: Length,
    abscissas: Vec<f64>,
    field: Vec<Complex<f64>>,
}
impl ComputationResult {
    /// Creates a new [`ComputationResult`].
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - `abscissas` and `field` do not have the same length.
    ///   - the given wavelength is not positive or not finite.
    pub fn new(wavelength: Length, abscissas: Vec<f64>, field: Vec<Complex<f64>>) -> BpResult<Self> {
        if abscissas.len() != field.len() {
            return Err(BeampropError::Other(
                "abscissas and field must have the same length".into(),
            ));
        }
        if !wavelength.is_finite() || wavelength.is_sign_negative() || wavelength.value == 0.0 {
            return Err(BeampropError::Other(
                "wavelength must be positive and finite".into(),
            ));
        }
        Ok(Self {
            wavelength,
            abscissas,
            field,
        })
    }
    /// Returns the wavelength of this [`ComputationResult`].
    #[must_use]
    pub const fn wavelength(&self) -> Length {
        self.wavelength
    }
    /// Returns the abscissas (sampling positions along the element) of this [`ComputationResult`].
    #[must_use]
    pub fn abscissas(&self) -> &[f64] {
        &self.abscissas
    }
    /// Returns the complex field amplitudes of this [`ComputationResult`].
    #[must_use]
    pub fn field(&self) -> &[Complex<f64>] {
        &self.field
    }
}

/// A 1D wavefront in the host framework's generic representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericWavefront {
    wavelength: Length,
    positions: Vec<f64>,
    complex_amplitude: Vec<Complex<f64>>,
}
impl GenericWavefront {
    /// Creates a new [`GenericWavefront`] from a position array and a complex amplitude array.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - `positions` and `complex_amplitude` do not have the same length.
    ///   - the given wavelength is not positive or not finite.
    pub fn from_arrays(
        wavelength: Length,
        positions: Vec<f64>,
        complex_amplitude: Vec<Complex<f64>>,
    ) -> BpResult<Self> {
        // same well-formedness rules as the native form
        let result = ComputationResult::new(wavelength, positions, complex_amplitude)?;
        Ok(Self::from(&result))
    }
    /// Returns the wavelength of this [`GenericWavefront`].
    #[must_use]
    pub const fn wavelength(&self) -> Length {
        self.wavelength
    }
    /// Returns the position array of this [`GenericWavefront`].
    #[must_use]
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }
    /// Returns the complex amplitude array of this [`GenericWavefront`].
    #[must_use]
    pub fn complex_amplitude(&self) -> &[Complex<f64>] {
        &self.complex_amplitude
    }
}

impl From<&ComputationResult> for GenericWavefront {
    fn from(result: &ComputationResult) -> Self {
        Self {
            wavelength: result.wavelength,
            positions: result.abscissas.clone(),
            complex_amplitude: result.field.clone(),
        }
    }
}
impl From<&GenericWavefront> for ComputationResult {
    fn from(wavefront: &GenericWavefront) -> Self {
        Self {
            wavelength: wavefront.wavelength,
            abscissas: wavefront.positions.clone(),
            field: wavefront.complex_amplitude.clone(),
        }
    }
}

/// A wavefront value in one of the two supported representations.
///
/// This closed enum replaces runtime type inspection of the incoming wavefront value: the
/// representation is resolved once at construction time and any unsupported representation is
/// unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Wavefront {
    /// host-framework generic representation
    Generic(GenericWavefront),
    /// engine-native representation
    Native(ComputationResult),
}
impl Wavefront {
    /// Returns `true` if this [`Wavefront`] is in the generic representation.
    #[must_use]
    pub const fn is_generic(&self) -> bool {
        matches!(self, Self::Generic(_))
    }
    /// Returns this [`Wavefront`] in the engine-native representation.
    #[must_use]
    pub fn to_native(&self) -> ComputationResult {
        match self {
            Self::Generic(wavefront) => ComputationResult::from(wavefront),
            Self::Native(result) => result.clone(),
        }
    }
}
impl From<GenericWavefront> for Wavefront {
    fn from(wavefront: GenericWavefront) -> Self {
        Self::Generic(wavefront)
    }
}
impl From<ComputationResult> for Wavefront {
    fn from(result: ComputationResult) -> Self {
        Self::Native(result)
    }
}
