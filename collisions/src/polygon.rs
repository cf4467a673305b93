use crate::error::{validate_circle_radius, CollisionError, CollisionResult};
use crate::vector::{project_points, Projection};
use common::BoundingBox;
use nalgebra::{Point2, Vector2};
use parry2d::transformation::convex_hull;
use rand::Rng;
use std::f32::consts::TAU;

// sine of the sharpest inward turn still accepted as a straight edge
const CONVEXITY_TOLERANCE: f32 = 1e-4;

/// Convex polygon with points relative to the owning shape's center.
///
/// Normal `i` is the outward unit normal of the edge `points[i - 1] -> points[i]`
/// (wrapping), and `normal_projections[i]` holds the extent of every point on it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    points: Vec<Vector2<f32>>,
    normals: Vec<Vector2<f32>>,
    normal_projections: Vec<Projection>,
    local_bounds: BoundingBox,
    area: f32,
}

impl Polygon {
    /// Accepts either winding. Consecutive duplicate points, collinear-only
    /// outlines and reflex or self-intersecting outlines are rejected.
    pub fn new(points: Vec<Vector2<f32>>) -> CollisionResult<Self> {
        let count = points.len();
        if count < 3 {
            return Err(CollisionError::DegeneratePolygon { count });
        }
        if let Some(index) = points
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(CollisionError::NonFinitePoint { index });
        }
        let signed_area = signed_area(&points);
        if signed_area.abs() <= f32::EPSILON {
            return Err(CollisionError::DegeneratePolygon { count });
        }
        let winding = signed_area.signum();

        let mut normals = Vec::with_capacity(count);
        let mut turning = 0.0;
        for i in 0..count {
            let previous = points[(i + count - 1) % count];
            let current = points[i];
            let next = points[(i + 1) % count];
            let edge = current - previous;
            let following = next - current;
            let edge_length = edge.norm();
            let following_length = following.norm();
            if edge_length <= f32::EPSILON || following_length <= f32::EPSILON {
                return Err(CollisionError::DegeneratePolygon { count });
            }
            let cross = edge.perp(&following);
            if cross * winding / (edge_length * following_length) < -CONVEXITY_TOLERANCE {
                return Err(CollisionError::NonConvexPolygon { index: i });
            }
            turning += cross.atan2(edge.dot(&following));
            normals.push(Vector2::new(edge.y, -edge.x) * (winding / edge_length));
        }
        // a star outline turns the same way at every point but winds twice
        if turning.abs() > TAU + 0.1 {
            return Err(CollisionError::NonConvexPolygon { index: 0 });
        }

        let normal_projections = normals
            .iter()
            .map(|normal| project_points(&points, Vector2::zeros(), *normal))
            .collect();
        let mut local_bounds = BoundingBox::empty();
        for point in &points {
            local_bounds.expand_to_include(&BoundingBox::new(point.x, point.y, point.x, point.y));
        }

        Ok(Self {
            points,
            normals,
            normal_projections,
            local_bounds,
            area: signed_area.abs(),
        })
    }

    /// Regular polygon inscribed in a circle, useful as a circle approximation.
    pub fn regular(radius: f32, sides: usize) -> CollisionResult<Self> {
        validate_circle_radius(radius)?;
        if sides < 3 {
            return Err(CollisionError::DegeneratePolygon { count: sides });
        }
        let step = TAU / sides as f32;
        let points = (0..sides)
            .map(|i| {
                let angle = step * i as f32;
                Vector2::new(radius * angle.cos(), radius * angle.sin())
            })
            .collect();
        Self::new(points)
    }

    /// Smallest convex polygon enclosing an arbitrary point cloud.
    pub fn from_convex_hull(points: &[Vector2<f32>]) -> CollisionResult<Self> {
        let cloud: Vec<Point2<f32>> = points.iter().map(|p| Point2::from(*p)).collect();
        let hull = convex_hull(&cloud);
        Self::new(hull.into_iter().map(|p| p.coords).collect())
    }

    /// Hull of `point_count` points scattered at random angles between the two radii.
    pub fn random_convex<R: Rng>(
        rng: &mut R,
        min_radius: f32,
        max_radius: f32,
        point_count: usize,
    ) -> CollisionResult<Self> {
        validate_circle_radius(min_radius)?;
        validate_circle_radius(max_radius)?;
        if min_radius == 0.0 || max_radius < min_radius {
            return Err(CollisionError::InvalidCircleRadius { radius: min_radius });
        }
        if point_count < 3 {
            return Err(CollisionError::DegeneratePolygon { count: point_count });
        }
        let points: Vec<Vector2<f32>> = (0..point_count)
            .map(|_| {
                let angle = rng.gen_range(0.0..TAU);
                let radius = rng.gen_range(min_radius..=max_radius);
                Vector2::new(radius * angle.cos(), radius * angle.sin())
            })
            .collect();
        Self::from_convex_hull(&points)
    }

    pub fn points(&self) -> &[Vector2<f32>] {
        &self.points
    }

    pub fn normals(&self) -> &[Vector2<f32>] {
        &self.normals
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Extent of every point on normal `index`.
    pub fn normal_projection(&self, index: usize) -> Projection {
        self.normal_projections[index]
    }

    pub fn local_bounds(&self) -> BoundingBox {
        self.local_bounds
    }

    pub fn area(&self) -> f32 {
        self.area
    }
}

fn signed_area(points: &[Vector2<f32>]) -> f32 {
    let count = points.len();
    let twice_area: f32 = (0..count)
        .map(|i| points[i].perp(&points[(i + 1) % count]))
        .sum();
    twice_area * 0.5
}
