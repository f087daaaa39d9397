#![warn(missing_docs)]
//! The propagation orchestrator.
//!
//! [`propagate`] is the single operation exposed to the host framework: given a [`Beamline`], an
//! optional input [`Wavefront`] and the mode flags of the call, it resolves which subsequence of
//! the chain must be (re)computed, synthesizes a fixed-field source where an upstream field was
//! supplied without a preceding element, decides whether computation actually happens (interactive
//! vs. batch mode) and translates the terminal element's result back into the representation the
//! caller handed in.
use log::{info, warn};

use crate::{
    beamline::{Beamline, InsertMode},
    element::BeamlineElement,
    engine::FieldEngine,
    error::{BeampropError, BpResult},
    request::PropagationRequest,
    wavefront::{ComputationResult, GenericWavefront, Wavefront},
};

/// Interactive-mode flag supplied by the host environment at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum InteractiveMode {
    /// computation is performed eagerly during the propagation call
    Enabled,
    /// computation is deferred to a later interactive trigger owned by the host
    Disabled,
    /// the host environment did not supply a usable flag; no result is produced
    #[default]
    Unset,
}

/// Mode flags of a single propagation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropagationConfig {
    /// recompute only the terminal element from its immediate predecessor, reusing all upstream
    /// results
    pub single_propagation: bool,
    /// worker-pool size hint forwarded to the engine, must be at least 1
    pub parallelism: usize,
    /// interactive-mode flag of the host environment
    pub interactive_mode: InteractiveMode,
    /// force eager computation even if interactive mode is not enabled
    pub full_propagator_override: bool,
}
impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            single_propagation: false,
            parallelism: 1,
            interactive_mode: InteractiveMode::Unset,
            full_propagator_override: false,
        }
    }
}

/// Propagate a wavefront along the given beamline.
///
/// The terminal element (last in the chain) is the propagation target. In single-step mode only
/// the terminal is recomputed from its immediate predecessor; otherwise the whole chain is
/// recomputed from its head. If an upstream field is required but no preceding element exists, a
/// fixed-field source carrying the input wavefront is synthesized and inserted. A detector
/// terminal forces a refresh of the absolute chain geometry before computation.
///
/// Computation only takes place if interactive mode is [`Enabled`](InteractiveMode::Enabled) or
/// the full-propagator override is set; with interactive mode
/// [`Disabled`](InteractiveMode::Disabled) the input wavefront is returned unchanged, and with an
/// [`Unset`](InteractiveMode::Unset) flag no result is produced at all. A computed result is
/// returned in the representation of the input wavefront (generic in, generic out).
///
/// # Errors
///
/// This function will return an error if
///   - the beamline contains no elements or `parallelism` is zero
///     ([`InvalidRequest`](BeampropError::InvalidRequest)).
///   - the terminal element is a source in single-step mode
///     ([`InvalidRequest`](BeampropError::InvalidRequest)).
///   - an element requires an upstream field and no input wavefront was supplied to fill it
///     ([`ComputationImpossible`](BeampropError::ComputationImpossible)).
///   - the engine fails to evaluate an element's field.
///
/// Any error aborts the call; already-computed results on the chain are left unchanged.
pub fn propagate(
    beamline: &mut Beamline,
    engine: &dyn FieldEngine,
    input: Option<&Wavefront>,
    config: &PropagationConfig,
) -> BpResult<Option<Wavefront>> {
    if beamline.is_empty() {
        return Err(BeampropError::InvalidRequest(
            "a propagation request needs a beamline with at least one element".into(),
        ));
    }
    let was_generic = input.is_some_and(Wavefront::is_generic);
    let native_input = input.map(Wavefront::to_native);

    let mut terminal_idx = beamline.len() - 1;
    let start_idx = if config.single_propagation {
        let terminal = beamline.get(-1)?;
        if terminal.is_source() {
            return Err(BeampropError::InvalidRequest(format!(
                "source element '{}' cannot be the target of a single-step propagation",
                terminal.name()
            )));
        }
        if terminal_idx == 0 {
            let seed = required_input(native_input.as_ref(), terminal.name())?;
            synthesize_upstream_source(beamline, seed)?;
            terminal_idx = 1;
        }
        let parent_idx = terminal_idx - 1;
        let parent = beamline.get(isize_index(parent_idx))?;
        if !parent.is_source() && parent.computation_result().is_none() {
            let seed = required_input(native_input.as_ref(), parent.name())?;
            beamline
                .get_mut(isize_index(parent_idx))?
                .set_computation_result(seed);
        }
        parent_idx
    } else {
        let head = beamline.get(0)?;
        if !head.is_source() {
            let seed = required_input(native_input.as_ref(), head.name())?;
            synthesize_upstream_source(beamline, seed)?;
            terminal_idx += 1;
        } else if head.computation_result().is_none() {
            if let Some(seed) = native_input.clone() {
                beamline.get_mut(0)?.set_computation_result(seed);
            }
        }
        0
    };

    if beamline.get(isize_index(terminal_idx))?.is_detector() {
        info!("terminal element is a detector, refreshing absolute positions");
        beamline.recompute_positions();
    }
    beamline.set_parallelism(config.parallelism)?;

    match (config.interactive_mode, config.full_propagator_override) {
        (InteractiveMode::Enabled, _) | (_, true) => {
            beamline.compute_fields(engine, isize_index(start_idx), isize_index(terminal_idx))?;
            let result = beamline
                .get(isize_index(terminal_idx))?
                .computation_result()
                .cloned()
                .ok_or_else(|| {
                    BeampropError::Other(
                        "terminal element has no computation result after field computation".into(),
                    )
                })?;
            Ok(Some(wrap_result(result, was_generic)))
        }
        (InteractiveMode::Disabled, false) => {
            info!("interactive mode disabled, deferring field computation");
            Ok(input.cloned())
        }
        (InteractiveMode::Unset, false) => {
            warn!("interactive mode is unset, no propagation result is produced");
            Ok(None)
        }
    }
}

/// Propagate a wavefront along the given beamline, driven by a host-framework request envelope.
///
/// This decodes the request's generic parameter map into a [`PropagationConfig`] and delegates to
/// [`propagate`].
///
/// # Errors
///
/// This function will return an error if the parameter map cannot be decoded (see
/// [`PropagationRequest::config`]) or if [`propagate`] fails.
pub fn propagate_request(
    beamline: &mut Beamline,
    engine: &dyn FieldEngine,
    request: &PropagationRequest,
) -> BpResult<Option<Wavefront>> {
    let config = request.config()?;
    propagate(beamline, engine, request.wavefront(), &config)
}

fn wrap_result(result: ComputationResult, as_generic: bool) -> Wavefront {
    if as_generic {
        Wavefront::Generic(GenericWavefront::from(&result))
    } else {
        Wavefront::Native(result)
    }
}

fn required_input(
    input: Option<&ComputationResult>,
    element_name: &str,
) -> BpResult<ComputationResult> {
    input.cloned().ok_or_else(|| {
        BeampropError::ComputationImpossible(format!(
            "element '{element_name}' has no computed upstream field and no input wavefront was supplied"
        ))
    })
}

/// Insert a synthesized fixed-field source carrying `seed` before the chain head.
fn synthesize_upstream_source(beamline: &mut Beamline, seed: ComputationResult) -> BpResult<()> {
    let anchor = beamline.get(0)?;
    info!(
        "synthesizing fixed-field source upstream of element '{}'",
        anchor.name()
    );
    let dummy = BeamlineElement::fixed_field("dummy", seed, anchor.settings());
    beamline.insert(0, InsertMode::Before, dummy)
}

#[allow(clippy::cast_possible_wrap)]
const fn isize_index(index: usize) -> isize {
    index as isize
}
