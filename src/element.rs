#![warn(missing_docs)]
//! Basic data entity representing one element of a beamline chain.
use serde::{Deserialize, Serialize};

use crate::{
    error::{BeampropError, BpResult},
    positioning::{Placement, PositioningDirectives},
    wavefront::ComputationResult,
};

/// Capability tag of a [`BeamlineElement`], resolved once at construction time.
///
/// The tag answers the two capability questions the propagation orchestrator asks (does this
/// element need an upstream field? does its measurement depend on the fully resolved chain
/// geometry?) without repeated downcasting along the call path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum ElementKind {
    /// generates a field analytically, needs no upstream input
    Source,
    /// reflective element (plane, elliptic, ... figure handled by the engine)
    Mirror,
    /// measuring element; requires up-to-date absolute geometry before computation
    Detector,
    /// transmissive mask or window
    Transmissive,
    /// synthesized source answering a pre-supplied field verbatim
    FixedField,
}
impl ElementKind {
    /// Returns `true` if an element of this kind requires no upstream field.
    #[must_use]
    pub const fn is_source(self) -> bool {
        matches!(self, Self::Source | Self::FixedField)
    }
    /// Returns `true` if an element of this kind measures the field and therefore depends on the
    /// fully resolved chain geometry.
    #[must_use]
    pub const fn is_detector(self) -> bool {
        matches!(self, Self::Detector)
    }
}

/// Sampling and worker-pool settings the engine uses when computing an element's field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationSettings {
    use_custom_sampling: bool,
    n_samples: usize,
    n_pools: usize,
}
impl Default for ComputationSettings {
    fn default() -> Self {
        Self {
            use_custom_sampling: false,
            n_samples: 1000,
            n_pools: 1,
        }
    }
}
impl ComputationSettings {
    /// Returns `true` if the engine shall use the custom sample count instead of its automatic
    /// sampling heuristics.
    #[must_use]
    pub const fn use_custom_sampling(&self) -> bool {
        self.use_custom_sampling
    }
    /// Returns the custom sample count (only relevant if [`Self::use_custom_sampling`] is set).
    #[must_use]
    pub const fn n_samples(&self) -> usize {
        self.n_samples
    }
    /// Returns the worker-pool size hint forwarded to the engine.
    #[must_use]
    pub const fn n_pools(&self) -> usize {
        self.n_pools
    }
    /// Sets the custom sampling flag and sample count.
    pub fn set_sampling(&mut self, use_custom_sampling: bool, n_samples: usize) {
        self.use_custom_sampling = use_custom_sampling;
        self.n_samples = n_samples;
    }
    /// Sets the worker-pool size hint.
    pub fn set_n_pools(&mut self, n_pools: usize) {
        self.n_pools = n_pools;
    }
}

/// One element of a beamline chain together with its computation state.
///
/// The identity of an element (name, kind, positioning directives) is immutable once created.
/// There is deliberately no operation to mutate an element's parent: parenthood is derived purely
/// from chain order by [`Beamline::parent_of`](crate::beamline::Beamline::parent_of). The
/// computation result transitions from absent to present during a computation pass; re-running a
/// computation overwrites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamlineElement {
    name: String,
    kind: ElementKind,
    positioning: PositioningDirectives,
    settings: ComputationSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    computation_result: Option<ComputationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    placement: Option<Placement>,
}
impl BeamlineElement {
    /// Creates a new [`BeamlineElement`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the given name is empty.
    pub fn new(name: &str, kind: ElementKind, positioning: PositioningDirectives) -> BpResult<Self> {
        if name.is_empty() {
            return Err(BeampropError::InvalidRequest(
                "element name must not be empty".into(),
            ));
        }
        Ok(Self {
            name: name.into(),
            kind,
            positioning,
            settings: ComputationSettings::default(),
            computation_result: None,
            placement: None,
        })
    }
    /// Creates a synthesized fixed-field source element.
    ///
    /// The element carries the given field as its computation result and answers it verbatim under
    /// computation, modelling "treat this already-known field as the upstream boundary condition".
    /// The sampling configuration (custom-sampling flag and sample count) is copied from the
    /// anchor element's settings so downstream computation sees consistent grid settings.
    #[must_use]
    pub fn fixed_field(
        name: &str,
        field: ComputationResult,
        anchor_settings: &ComputationSettings,
    ) -> Self {
        let mut settings = ComputationSettings::default();
        settings.set_sampling(
            anchor_settings.use_custom_sampling(),
            anchor_settings.n_samples(),
        );
        Self {
            name: name.into(),
            kind: ElementKind::FixedField,
            positioning: PositioningDirectives::default(),
            settings,
            computation_result: Some(field),
            placement: None,
        }
    }
    /// Returns the name of this [`BeamlineElement`] (unique within its chain).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Returns the [`ElementKind`] of this [`BeamlineElement`].
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        self.kind
    }
    /// Returns `true` if this element requires no upstream field.
    #[must_use]
    pub const fn is_source(&self) -> bool {
        self.kind.is_source()
    }
    /// Returns `true` if this element is a detector-class element.
    #[must_use]
    pub const fn is_detector(&self) -> bool {
        self.kind.is_detector()
    }
    /// Returns the [`PositioningDirectives`] of this [`BeamlineElement`].
    #[must_use]
    pub const fn positioning(&self) -> &PositioningDirectives {
        &self.positioning
    }
    /// Returns the [`ComputationSettings`] of this [`BeamlineElement`].
    #[must_use]
    pub const fn settings(&self) -> &ComputationSettings {
        &self.settings
    }
    /// Returns a mutable reference to the [`ComputationSettings`] of this [`BeamlineElement`].
    pub fn settings_mut(&mut self) -> &mut ComputationSettings {
        &mut self.settings
    }
    /// Returns the computation result of this [`BeamlineElement`], if already computed.
    #[must_use]
    pub const fn computation_result(&self) -> Option<&ComputationResult> {
        self.computation_result.as_ref()
    }
    /// Sets (or overwrites) the computation result of this [`BeamlineElement`].
    ///
    /// Besides the engine populating results during a computation pass, this is used to pre-seed
    /// an element with a previously computed upstream field handed in as an input wavefront.
    pub fn set_computation_result(&mut self, result: ComputationResult) {
        self.computation_result = Some(result);
    }
    /// Returns the resolved absolute [`Placement`] of this [`BeamlineElement`], if positions have
    /// been recomputed since the last chain mutation.
    #[must_use]
    pub const fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }
    pub(crate) fn set_placement(&mut self, placement: Placement) {
        self.placement = Some(placement);
    }
}
