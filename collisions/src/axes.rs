//! Separating-axis candidates for every convex pair.
//!
//! Each function projects both shapes onto every candidate axis in a frame
//! centered on the first shape (`offset` is the second shape's center in that
//! frame) and hands the intervals to `visit`. Enumeration stops as soon as
//! `visit` returns `false`; the return value is `false` in that case.

use crate::polygon::Polygon;
use crate::vector::{project_points, Projection};
use nalgebra::Vector2;

#[inline(always)]
pub(crate) fn rectangle_corners(half: Vector2<f32>, center: Vector2<f32>) -> [Vector2<f32>; 4] {
    [
        center + Vector2::new(-half.x, -half.y),
        center + Vector2::new(half.x, -half.y),
        center + Vector2::new(half.x, half.y),
        center + Vector2::new(-half.x, half.y),
    ]
}

/// Reach of a centered rectangle along a unit axis.
#[inline(always)]
fn rectangle_reach(half: Vector2<f32>, axis: Vector2<f32>) -> f32 {
    half.x * axis.x.abs() + half.y * axis.y.abs()
}

pub(crate) fn rectangle_rectangle(
    a_half: Vector2<f32>,
    b_half: Vector2<f32>,
    offset: Vector2<f32>,
    mut visit: impl FnMut(Vector2<f32>, Projection, Projection) -> bool,
) -> bool {
    visit(
        Vector2::x(),
        Projection::centered(0.0, a_half.x),
        Projection::centered(offset.x, b_half.x),
    ) && visit(
        Vector2::y(),
        Projection::centered(0.0, a_half.y),
        Projection::centered(offset.y, b_half.y),
    )
}

pub(crate) fn rectangle_polygon(
    a_half: Vector2<f32>,
    b: &Polygon,
    offset: Vector2<f32>,
    mut visit: impl FnMut(Vector2<f32>, Projection, Projection) -> bool,
) -> bool {
    let b_bounds = b.local_bounds();
    if !visit(
        Vector2::x(),
        Projection::centered(0.0, a_half.x),
        Projection::new(b_bounds.min_x, b_bounds.max_x).shifted(offset.x),
    ) {
        return false;
    }
    if !visit(
        Vector2::y(),
        Projection::centered(0.0, a_half.y),
        Projection::new(b_bounds.min_y, b_bounds.max_y).shifted(offset.y),
    ) {
        return false;
    }
    for (i, normal) in b.normals().iter().enumerate() {
        let a = Projection::centered(0.0, rectangle_reach(a_half, *normal));
        let b_projection = b.normal_projection(i).shifted(offset.dot(normal));
        if !visit(*normal, a, b_projection) {
            return false;
        }
    }
    true
}

pub(crate) fn polygon_polygon(
    a: &Polygon,
    b: &Polygon,
    offset: Vector2<f32>,
    mut visit: impl FnMut(Vector2<f32>, Projection, Projection) -> bool,
) -> bool {
    for (i, normal) in a.normals().iter().enumerate() {
        let b_projection = project_points(b.points(), offset, *normal);
        if !visit(*normal, a.normal_projection(i), b_projection) {
            return false;
        }
    }
    for (i, normal) in b.normals().iter().enumerate() {
        let a_projection = project_points(a.points(), Vector2::zeros(), *normal);
        let b_projection = b.normal_projection(i).shifted(offset.dot(normal));
        if !visit(*normal, a_projection, b_projection) {
            return false;
        }
    }
    true
}

/// Face axes of the rectangle plus one axis from the circle's center through
/// each corner.
pub(crate) fn circle_rectangle(
    radius: f32,
    b_half: Vector2<f32>,
    offset: Vector2<f32>,
    mut visit: impl FnMut(Vector2<f32>, Projection, Projection) -> bool,
) -> bool {
    let a = Projection::centered(0.0, radius);
    if !visit(Vector2::x(), a, Projection::centered(offset.x, b_half.x)) {
        return false;
    }
    if !visit(Vector2::y(), a, Projection::centered(offset.y, b_half.y)) {
        return false;
    }
    let corners = rectangle_corners(b_half, offset);
    for corner in &corners {
        let length = corner.norm();
        if length <= f32::EPSILON {
            continue;
        }
        let axis = corner / length;
        if !visit(axis, a, project_points(&corners, Vector2::zeros(), axis)) {
            return false;
        }
    }
    true
}

/// Face normals of the polygon plus one axis from the circle's center through
/// each vertex.
pub(crate) fn circle_polygon(
    radius: f32,
    b: &Polygon,
    offset: Vector2<f32>,
    mut visit: impl FnMut(Vector2<f32>, Projection, Projection) -> bool,
) -> bool {
    let a = Projection::centered(0.0, radius);
    for (i, normal) in b.normals().iter().enumerate() {
        let b_projection = b.normal_projection(i).shifted(offset.dot(normal));
        if !visit(*normal, a, b_projection) {
            return false;
        }
    }
    for point in b.points() {
        let vertex = point + offset;
        let length = vertex.norm();
        if length <= f32::EPSILON {
            continue;
        }
        let axis = vertex / length;
        if !visit(axis, a, project_points(b.points(), offset, axis)) {
            return false;
        }
    }
    true
}
