#![warn(missing_docs)]
//! Ordered, strictly linear chain of beamline elements.
use itertools::Itertools;
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    element::{BeamlineElement, ElementKind},
    engine::FieldEngine,
    error::{BeampropError, BpResult},
    wavefront::ComputationResult,
};

/// Placement of an insertion relative to its anchor element.
///
/// Only these two placements are supported; the chain is strictly linear and no fork topology can
/// be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum InsertMode {
    /// insert the new element immediately upstream of the anchor
    Before,
    /// insert the new element immediately downstream of the anchor
    After,
}

/// An ordered sequence of [`BeamlineElement`]s, index 0 being the most upstream element.
///
/// A [`Beamline`] is a single-writer structure: concurrent mutation and computation on the same
/// chain must be serialized by the caller, no internal locking is provided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beamline {
    elements: Vec<BeamlineElement>,
    parallelism: usize,
    positions_stale: bool,
}
impl Default for Beamline {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            parallelism: 1,
            positions_stale: false,
        }
    }
}
impl Beamline {
    /// Creates a new, empty [`Beamline`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Returns the number of elements in this [`Beamline`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }
    /// Returns `true` if this [`Beamline`] contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
    /// Resolve a possibly negative chain index (-1 = last element) to a vector position.
    fn resolve_index(&self, index: isize) -> BpResult<usize> {
        let len = self.elements.len();
        let resolved = if index < 0 {
            len.checked_sub(index.unsigned_abs())
        } else {
            let index = index.unsigned_abs();
            (index < len).then_some(index)
        };
        resolved.ok_or_else(|| {
            BeampropError::InvalidRequest(format!(
                "index {index} is out of range for a beamline of {len} elements"
            ))
        })
    }
    /// Returns the element at the given (possibly negative, -1 = last) position.
    ///
    /// # Errors
    ///
    /// This function will return an error if the index has no element.
    pub fn get(&self, index: isize) -> BpResult<&BeamlineElement> {
        let index = self.resolve_index(index)?;
        Ok(&self.elements[index])
    }
    /// Returns the element at the given (possibly negative) position as mutable.
    ///
    /// # Errors
    ///
    /// This function will return an error if the index has no element.
    pub fn get_mut(&mut self, index: isize) -> BpResult<&mut BeamlineElement> {
        let index = self.resolve_index(index)?;
        Ok(&mut self.elements[index])
    }
    /// Returns the predecessor of the element at the given position, or `None` for the chain head.
    ///
    /// This read-only query is the only notion of "parent" a [`Beamline`] exposes: parenthood is
    /// derived purely from chain order and can never diverge from it.
    ///
    /// # Errors
    ///
    /// This function will return an error if the index has no element.
    pub fn parent_of(&self, index: isize) -> BpResult<Option<&BeamlineElement>> {
        let index = self.resolve_index(index)?;
        Ok(index.checked_sub(1).map(|parent| &self.elements[parent]))
    }
    fn check_name_free(&self, element: &BeamlineElement) -> BpResult<()> {
        if self
            .elements
            .iter()
            .map(BeamlineElement::name)
            .contains(&element.name())
        {
            return Err(BeampropError::InvalidRequest(format!(
                "an element with the name '{}' already exists in this beamline",
                element.name()
            )));
        }
        Ok(())
    }
    /// Adds an element at the tail of this [`Beamline`].
    ///
    /// Absolute positions are stale afterwards until [`Self::recompute_positions`] is invoked.
    ///
    /// # Errors
    ///
    /// This function will return an error if an element with the same name already exists.
    pub fn append(&mut self, element: BeamlineElement) -> BpResult<()> {
        self.check_name_free(&element)?;
        self.elements.push(element);
        self.positions_stale = true;
        Ok(())
    }
    /// Inserts an element before or after the anchor element at the given (possibly negative)
    /// position.
    ///
    /// On an empty beamline only anchor index 0 is accepted and the element simply becomes the
    /// first one. Absolute positions are stale afterwards until [`Self::recompute_positions`] is
    /// invoked.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the anchor index has no element (and the beamline is not empty with anchor 0).
    ///   - an element with the same name already exists.
    pub fn insert(
        &mut self,
        anchor: isize,
        mode: InsertMode,
        element: BeamlineElement,
    ) -> BpResult<()> {
        if self.elements.is_empty() && anchor == 0 {
            return self.append(element);
        }
        self.check_name_free(&element)?;
        let anchor = self.resolve_index(anchor)?;
        let position = match mode {
            InsertMode::Before => anchor,
            InsertMode::After => anchor + 1,
        };
        info!(
            "inserting element '{}' {} '{}'",
            element.name(),
            mode.to_string().to_lowercase(),
            self.elements[anchor].name()
        );
        self.elements.insert(position, element);
        self.positions_stale = true;
        Ok(())
    }
    /// Inserts an element immediately upstream of the anchor element.
    ///
    /// # Errors
    ///
    /// See [`Self::insert`].
    pub fn insert_before(&mut self, anchor: isize, element: BeamlineElement) -> BpResult<()> {
        self.insert(anchor, InsertMode::Before, element)
    }
    /// Inserts an element immediately downstream of the anchor element.
    ///
    /// # Errors
    ///
    /// See [`Self::insert`].
    pub fn insert_after(&mut self, anchor: isize, element: BeamlineElement) -> BpResult<()> {
        self.insert(anchor, InsertMode::After, element)
    }
    /// Returns `true` if absolute positions have not been recomputed since the last chain
    /// mutation.
    #[must_use]
    pub const fn positions_stale(&self) -> bool {
        self.positions_stale
    }
    /// Recalculates the absolute placement of every element from its positioning directives and
    /// its predecessor's placement, in chain order.
    ///
    /// Must be invoked before any measurement that depends on the final geometry (detector
    /// terminal) after any insertion.
    pub fn recompute_positions(&mut self) {
        let mut upstream = None;
        for element in &mut self.elements {
            let placement = element.positioning().resolve(upstream.as_ref());
            element.set_placement(placement.clone());
            upstream = Some(placement);
        }
        self.positions_stale = false;
    }
    /// Returns the worker-pool size hint forwarded to the engine.
    #[must_use]
    pub const fn parallelism(&self) -> usize {
        self.parallelism
    }
    /// Sets the worker-pool size hint forwarded to the engine.
    ///
    /// # Errors
    ///
    /// This function will return an error if `parallelism` is zero.
    pub fn set_parallelism(&mut self, parallelism: usize) -> BpResult<()> {
        if parallelism == 0 {
            return Err(BeampropError::InvalidRequest(
                "parallelism must be at least 1".into(),
            ));
        }
        self.parallelism = parallelism;
        Ok(())
    }
    /// Propagates the field from `start` through each element up to and including `end`, in chain
    /// order, populating each element's computation result.
    ///
    /// The `start` element acts as the boundary condition: if it already carries a result it is
    /// reused unchanged, otherwise it is computed first (a source element is synthesized by the
    /// engine from nothing). Fixed-field elements always answer their stored field. All further
    /// elements in the range are (re)computed by the engine from their predecessor's result. The
    /// engine's internal worker concurrency is bounded by the chain's parallelism hint, which is
    /// stamped into each evaluated element's [`ComputationSettings`](crate::element::ComputationSettings)
    /// so the engine sees the same hint on the element itself.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - `start` or `end` has no element, or `start` lies downstream of `end`.
    ///   - an element requires an upstream field which is absent ([`ComputationImpossible`](BeampropError::ComputationImpossible)).
    ///   - the engine fails to evaluate an element's field.
    pub fn compute_fields(
        &mut self,
        engine: &dyn FieldEngine,
        start: isize,
        end: isize,
    ) -> BpResult<()> {
        let start = self.resolve_index(start)?;
        let end = self.resolve_index(end)?;
        if start > end {
            return Err(BeampropError::InvalidRequest(format!(
                "start element (index {start}) must not lie downstream of end element (index {end})"
            )));
        }
        for index in start..=end {
            let element = &self.elements[index];
            if element.kind() == ElementKind::FixedField {
                if element.computation_result().is_none() {
                    return Err(BeampropError::ComputationImpossible(format!(
                        "fixed-field source '{}' carries no field",
                        element.name()
                    )));
                }
                continue;
            }
            // the start element is the boundary condition, an existing result is reused
            if index == start && element.computation_result().is_some() {
                continue;
            }
            self.elements[index]
                .settings_mut()
                .set_n_pools(self.parallelism);
            let element = &self.elements[index];
            let result = if element.is_source() {
                engine.eval_field(element, None, self.parallelism)?
            } else {
                let incoming = self.upstream_result(index)?;
                engine.eval_field(element, Some(&incoming), self.parallelism)?
            };
            self.elements[index].set_computation_result(result);
        }
        Ok(())
    }
    fn upstream_result(&self, index: usize) -> BpResult<ComputationResult> {
        let element = &self.elements[index];
        let Some(parent) = index.checked_sub(1).map(|parent| &self.elements[parent]) else {
            return Err(BeampropError::ComputationImpossible(format!(
                "element '{}' is not a source and has no upstream element",
                element.name()
            )));
        };
        parent.computation_result().cloned().ok_or_else(|| {
            BeampropError::ComputationImpossible(format!(
                "upstream element '{}' has no computed field and element '{}' is not a source",
                parent.name(),
                element.name()
            ))
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{nanometer, positioning::PositioningDirectives};
    use assert_matches::assert_matches;
    use nalgebra::Point2;
    use num::Complex;
    use std::cell::RefCell;
    use uom::si::angle::radian;

    fn element(name: &str, kind: ElementKind) -> BeamlineElement {
        BeamlineElement::new(name, kind, PositioningDirectives::default()).unwrap()
    }
    fn test_field(amplitude: f64) -> ComputationResult {
        ComputationResult::new(
            nanometer!(632.8),
            vec![0.0, 1.0],
            vec![Complex::new(amplitude, 0.0), Complex::new(0.0, amplitude)],
        )
        .unwrap()
    }
    /// engine stub which doubles the incoming field and records the evaluated element names
    struct DoublingEngine {
        calls: RefCell<Vec<String>>,
    }
    impl DoublingEngine {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
            }
        }
    }
    impl FieldEngine for DoublingEngine {
        fn eval_field(
            &self,
            element: &BeamlineElement,
            incoming: Option<&ComputationResult>,
            _parallelism: usize,
        ) -> BpResult<ComputationResult> {
            self.calls.borrow_mut().push(element.name().to_string());
            let incoming = incoming.cloned().unwrap_or_else(|| test_field(1.0));
            ComputationResult::new(
                incoming.wavelength(),
                incoming.abscissas().to_vec(),
                incoming.field().iter().map(|f| *f * 2.0).collect(),
            )
        }
    }

    #[test]
    fn append_and_get() {
        let mut beamline = Beamline::new();
        assert!(beamline.is_empty());
        beamline.append(element("s1", ElementKind::Source)).unwrap();
        beamline.append(element("m1", ElementKind::Mirror)).unwrap();
        assert_eq!(beamline.len(), 2);
        assert_eq!(beamline.get(0).unwrap().name(), "s1");
        assert_eq!(beamline.get(1).unwrap().name(), "m1");
        assert_eq!(beamline.get(-1).unwrap().name(), "m1");
        assert_eq!(beamline.get(-2).unwrap().name(), "s1");
    }
    #[test]
    fn get_out_of_range() {
        let mut beamline = Beamline::new();
        assert_matches!(beamline.get(0), Err(BeampropError::InvalidRequest(_)));
        beamline.append(element("s1", ElementKind::Source)).unwrap();
        assert_matches!(beamline.get(1), Err(BeampropError::InvalidRequest(_)));
        assert_matches!(beamline.get(-2), Err(BeampropError::InvalidRequest(_)));
    }
    #[test]
    fn append_duplicate_name() {
        let mut beamline = Beamline::new();
        beamline.append(element("s1", ElementKind::Source)).unwrap();
        assert_matches!(
            beamline.append(element("s1", ElementKind::Mirror)),
            Err(BeampropError::InvalidRequest(_))
        );
    }
    #[test]
    fn insert_before_on_empty_chain() {
        let mut beamline = Beamline::new();
        beamline.insert_before(0, element("a", ElementKind::Mirror)).unwrap();
        beamline.insert_before(0, element("b", ElementKind::Mirror)).unwrap();
        assert_eq!(beamline.get(0).unwrap().name(), "b");
        assert_eq!(beamline.get(-1).unwrap().name(), "a");
    }
    #[test]
    fn insert_after_negative_anchor() {
        let mut beamline = Beamline::new();
        beamline.append(element("s1", ElementKind::Source)).unwrap();
        beamline.append(element("m1", ElementKind::Mirror)).unwrap();
        beamline
            .insert_after(-1, element("d1", ElementKind::Detector))
            .unwrap();
        beamline
            .insert_before(-1, element("m2", ElementKind::Mirror))
            .unwrap();
        let names = (0..4)
            .map(|i| beamline.get(i).unwrap().name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["s1", "m1", "m2", "d1"]);
    }
    #[test]
    fn insert_bad_anchor() {
        let mut beamline = Beamline::new();
        assert_matches!(
            beamline.insert_before(1, element("a", ElementKind::Mirror)),
            Err(BeampropError::InvalidRequest(_))
        );
    }
    #[test]
    fn parent_of() {
        let mut beamline = Beamline::new();
        beamline.append(element("s1", ElementKind::Source)).unwrap();
        beamline.append(element("m1", ElementKind::Mirror)).unwrap();
        assert!(beamline.parent_of(0).unwrap().is_none());
        assert_eq!(beamline.parent_of(1).unwrap().unwrap().name(), "s1");
        assert_eq!(beamline.parent_of(-1).unwrap().unwrap().name(), "s1");
        assert!(beamline.parent_of(2).is_err());
    }
    #[test]
    fn recompute_positions_clears_staleness() {
        let mut beamline = Beamline::new();
        assert!(!beamline.positions_stale());
        beamline.append(element("s1", ElementKind::Source)).unwrap();
        assert!(beamline.positions_stale());
        beamline.recompute_positions();
        assert!(!beamline.positions_stale());
        beamline
            .insert_after(0, element("m1", ElementKind::Mirror))
            .unwrap();
        assert!(beamline.positions_stale());
    }
    #[test]
    fn recompute_positions_chains_upstream_offsets() {
        let mut beamline = Beamline::new();
        beamline
            .append(
                BeamlineElement::new(
                    "s1",
                    ElementKind::Source,
                    PositioningDirectives::absolute(Point2::new(1.0, 0.0), crate::degree!(0.0)),
                )
                .unwrap(),
            )
            .unwrap();
        beamline
            .append(
                BeamlineElement::new(
                    "m1",
                    ElementKind::Mirror,
                    PositioningDirectives::upstream(Point2::new(2.0, 0.0), crate::degree!(0.0)),
                )
                .unwrap(),
            )
            .unwrap();
        beamline.recompute_positions();
        let placement = beamline.get(1).unwrap().placement().unwrap().clone();
        assert_eq!(placement.centre(), Point2::new(3.0, 0.0));
        assert_eq!(placement.rotation().get::<radian>(), 0.0);
    }
    #[test]
    fn set_parallelism() {
        let mut beamline = Beamline::new();
        assert_eq!(beamline.parallelism(), 1);
        beamline.set_parallelism(4).unwrap();
        assert_eq!(beamline.parallelism(), 4);
        assert_matches!(
            beamline.set_parallelism(0),
            Err(BeampropError::InvalidRequest(_))
        );
    }
    #[test]
    fn compute_fields_whole_chain() {
        let mut beamline = Beamline::new();
        beamline.append(element("s1", ElementKind::Source)).unwrap();
        beamline.append(element("m1", ElementKind::Mirror)).unwrap();
        let engine = DoublingEngine::new();
        beamline.compute_fields(&engine, 0, -1).unwrap();
        assert_eq!(*engine.calls.borrow(), vec!["s1", "m1"]);
        let terminal = beamline.get(-1).unwrap().computation_result().unwrap();
        assert_eq!(terminal.field()[0], Complex::new(4.0, 0.0));
    }
    #[test]
    fn compute_fields_stamps_parallelism_hint() {
        let mut beamline = Beamline::new();
        let dummy = BeamlineElement::fixed_field(
            "dummy",
            test_field(1.0),
            &crate::element::ComputationSettings::default(),
        );
        beamline.append(dummy).unwrap();
        beamline.append(element("m1", ElementKind::Mirror)).unwrap();
        beamline.set_parallelism(3).unwrap();
        let engine = DoublingEngine::new();
        beamline.compute_fields(&engine, 0, -1).unwrap();
        // evaluated elements carry the chain hint, skipped fixed-field elements keep their own
        assert_eq!(beamline.get(1).unwrap().settings().n_pools(), 3);
        assert_eq!(beamline.get(0).unwrap().settings().n_pools(), 1);
    }
    #[test]
    fn compute_fields_reuses_start_result() {
        let mut beamline = Beamline::new();
        let mut seeded = element("m1", ElementKind::Mirror);
        seeded.set_computation_result(test_field(1.0));
        beamline.append(seeded).unwrap();
        beamline.append(element("m2", ElementKind::Mirror)).unwrap();
        let engine = DoublingEngine::new();
        beamline.compute_fields(&engine, 0, 1).unwrap();
        // the seeded start element is the boundary condition and must not be recomputed
        assert_eq!(*engine.calls.borrow(), vec!["m2"]);
        let start = beamline.get(0).unwrap().computation_result().unwrap();
        assert_eq!(start.field()[0], Complex::new(1.0, 0.0));
    }
    #[test]
    fn compute_fields_fixed_field_answers_stored_result() {
        let mut beamline = Beamline::new();
        let dummy = BeamlineElement::fixed_field(
            "dummy",
            test_field(3.0),
            &crate::element::ComputationSettings::default(),
        );
        beamline.append(dummy).unwrap();
        beamline.append(element("m1", ElementKind::Mirror)).unwrap();
        let engine = DoublingEngine::new();
        beamline.compute_fields(&engine, 0, 1).unwrap();
        assert_eq!(*engine.calls.borrow(), vec!["m1"]);
        let terminal = beamline.get(1).unwrap().computation_result().unwrap();
        assert_eq!(terminal.field()[0], Complex::new(6.0, 0.0));
    }
    #[test]
    fn compute_fields_missing_upstream_field() {
        let mut beamline = Beamline::new();
        beamline.append(element("m1", ElementKind::Mirror)).unwrap();
        let engine = DoublingEngine::new();
        assert_matches!(
            beamline.compute_fields(&engine, 0, 0),
            Err(BeampropError::ComputationImpossible(_))
        );
    }
    #[test]
    fn compute_fields_bad_range() {
        let mut beamline = Beamline::new();
        beamline.append(element("s1", ElementKind::Source)).unwrap();
        beamline.append(element("m1", ElementKind::Mirror)).unwrap();
        let engine = DoublingEngine::new();
        assert_matches!(
            beamline.compute_fields(&engine, 1, 0),
            Err(BeampropError::InvalidRequest(_))
        );
        assert_matches!(
            beamline.compute_fields(&engine, 0, 2),
            Err(BeampropError::InvalidRequest(_))
        );
    }
}
