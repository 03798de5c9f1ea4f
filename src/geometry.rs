//! Label geometry: anchor, rotation and offset of a segment's label

use glam::DVec2;

use crate::types::{Angle, LabelOffset, MapPoint};

/// Midpoint of `a` and `b`, in `a`'s spatial reference.
pub fn midpoint(a: MapPoint, b: MapPoint) -> MapPoint {
    let mid = (a.to_dvec2() + b.to_dvec2()) * 0.5;
    MapPoint::from_dvec2(mid, a.spatial_ref)
}

/// Rotation that lays label text along the segment from `a` to `b`.
///
/// This is the arctangent of rise over run, negated because map y grows
/// upward while text rotation is clockwise. The result lies in [-90, 90], so
/// text is never upside down and the angle does not depend on which end was
/// drawn first. Vertical segments take their sign from the direction of
/// travel: -90 going up, +90 going down. A zero-length segment gives 0.
pub fn slope_angle_degrees(a: MapPoint, b: MapPoint) -> Angle {
    let d: DVec2 = b.to_dvec2() - a.to_dvec2();
    // Flat (or zero-length): plain zero, never -0.
    if d.y == 0.0 {
        return Angle::ZERO;
    }
    if d.x == 0.0 {
        return if d.y > 0.0 { Angle(-90.0) } else { Angle(90.0) };
    }
    Angle(-(d.y / d.x).atan().to_degrees())
}

/// Offset that keeps the label clear of its segment.
///
/// The label always sits `magnitude` above the anchor; it moves left for
/// segments rising to the right (negative angle) and right otherwise, which
/// puts it on the open side of the line.
pub fn label_offset(angle: Angle, magnitude: f64) -> LabelOffset {
    let x = if angle.degrees() < 0.0 { -magnitude } else { magnitude };
    LabelOffset::new(x, magnitude)
}
