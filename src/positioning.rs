#![warn(missing_docs)]
//! Positioning directives and absolute placement of beamline elements.
//!
//! Each element carries a [`PositioningDirectives`] value describing where it sits, either in
//! absolute lab-frame coordinates or relative to its upstream neighbour. The directives are opaque
//! to the propagation orchestrator, which only ever triggers a whole-chain resolution via
//! [`Beamline::recompute_positions`](crate::beamline::Beamline::recompute_positions).
use nalgebra::{Point2, Rotation2};
use serde::{Deserialize, Serialize};
use uom::si::{angle::radian, f64::Angle};

/// Reference frame of a [`PositioningDirectives`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display)]
pub enum ReferTo {
    /// centre and rotation are absolute lab-frame coordinates
    #[default]
    Absolute,
    /// centre is an offset in the upstream element's frame, rotation adds to the upstream rotation
    Upstream,
}

/// Positioning directive of a single beamline element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositioningDirectives {
    refer_to: ReferTo,
    centre: Point2<f64>,
    rotation: Angle,
}
impl Default for PositioningDirectives {
    fn default() -> Self {
        Self {
            refer_to: ReferTo::Absolute,
            centre: Point2::origin(),
            rotation: Angle::new::<radian>(0.0),
        }
    }
}
impl PositioningDirectives {
    /// Creates new [`PositioningDirectives`].
    #[must_use]
    pub const fn new(refer_to: ReferTo, centre: Point2<f64>, rotation: Angle) -> Self {
        Self {
            refer_to,
            centre,
            rotation,
        }
    }
    /// Creates new absolute (lab-frame) [`PositioningDirectives`].
    #[must_use]
    pub const fn absolute(centre: Point2<f64>, rotation: Angle) -> Self {
        Self::new(ReferTo::Absolute, centre, rotation)
    }
    /// Creates new [`PositioningDirectives`] relative to the upstream element.
    #[must_use]
    pub const fn upstream(centre: Point2<f64>, rotation: Angle) -> Self {
        Self::new(ReferTo::Upstream, centre, rotation)
    }
    /// Returns the reference frame of these [`PositioningDirectives`].
    #[must_use]
    pub const fn refer_to(&self) -> ReferTo {
        self.refer_to
    }
    /// Returns the centre coordinates of these [`PositioningDirectives`] (interpreted in the
    /// reference frame given by [`Self::refer_to`]).
    #[must_use]
    pub const fn centre(&self) -> Point2<f64> {
        self.centre
    }
    /// Returns the rotation of these [`PositioningDirectives`].
    #[must_use]
    pub const fn rotation(&self) -> Angle {
        self.rotation
    }
    /// Resolve the absolute [`Placement`] of an element given its predecessor's resolved placement.
    ///
    /// Absolute directives ignore the predecessor. Upstream-relative directives rotate the centre
    /// offset into the predecessor's frame and accumulate the rotation. An upstream-relative
    /// directive without a predecessor (head of the chain) resolves as if it were absolute.
    #[must_use]
    pub fn resolve(&self, predecessor: Option<&Placement>) -> Placement {
        match (self.refer_to, predecessor) {
            (ReferTo::Absolute, _) | (ReferTo::Upstream, None) => Placement {
                centre: self.centre,
                rotation: self.rotation,
            },
            (ReferTo::Upstream, Some(upstream)) => {
                let frame = Rotation2::new(upstream.rotation.get::<radian>());
                Placement {
                    centre: upstream.centre + frame * self.centre.coords,
                    rotation: upstream.rotation + self.rotation,
                }
            }
        }
    }
}

/// Resolved absolute placement of a beamline element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    centre: Point2<f64>,
    rotation: Angle,
}
impl Placement {
    /// Returns the absolute centre coordinates of this [`Placement`].
    #[must_use]
    pub const fn centre(&self) -> Point2<f64> {
        self.centre
    }
    /// Returns the absolute rotation of this [`Placement`].
    #[must_use]
    pub const fn rotation(&self) -> Angle {
        self.rotation
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{degree, radian};
    use approx::assert_relative_eq;

    #[test]
    fn default() {
        let directives = PositioningDirectives::default();
        assert_eq!(directives.refer_to(), ReferTo::Absolute);
        assert_eq!(directives.centre(), Point2::origin());
        assert_relative_eq!(directives.rotation().get::<radian>(), 0.0);
    }
    #[test]
    fn resolve_absolute_ignores_predecessor() {
        let directives = PositioningDirectives::absolute(Point2::new(1.0, 2.0), degree!(10.0));
        let upstream = PositioningDirectives::absolute(Point2::new(5.0, 5.0), degree!(90.0))
            .resolve(None);
        let placement = directives.resolve(Some(&upstream));
        assert_eq!(placement.centre(), Point2::new(1.0, 2.0));
        assert_relative_eq!(placement.rotation().get::<radian>(), degree!(10.0).value);
    }
    #[test]
    fn resolve_upstream_without_predecessor() {
        let directives = PositioningDirectives::upstream(Point2::new(1.0, 0.0), radian!(0.1));
        let placement = directives.resolve(None);
        assert_eq!(placement.centre(), Point2::new(1.0, 0.0));
    }
    #[test]
    fn resolve_upstream_rotates_offset() {
        let upstream = PositioningDirectives::absolute(Point2::new(1.0, 1.0), degree!(90.0))
            .resolve(None);
        let directives = PositioningDirectives::upstream(Point2::new(2.0, 0.0), degree!(45.0));
        let placement = directives.resolve(Some(&upstream));
        // an x offset in a frame rotated by 90° becomes a y offset in the lab frame
        assert_relative_eq!(placement.centre().x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(placement.centre().y, 3.0, epsilon = 1e-12);
        assert_relative_eq!(
            placement.rotation().get::<radian>(),
            degree!(135.0).get::<radian>()
        );
    }
}
