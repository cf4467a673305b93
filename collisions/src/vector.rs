use nalgebra::Vector2;

/// Squared distance from `point` to the infinite line through `line_a` and `line_b`.
pub fn dist_to_line_squared(
    point: Vector2<f32>,
    line_a: Vector2<f32>,
    line_b: Vector2<f32>,
) -> f32 {
    let line = line_b - line_a;
    let to_point = point - line_a;
    let length_squared = line.norm_squared();
    if length_squared == 0.0 {
        return to_point.norm_squared();
    }
    let cross = line.perp(&to_point);
    cross * cross / length_squared
}

/// Interval covered by a shape on one axis, relative to the reference shape's center.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projection {
    pub min: f32,
    pub max: f32,
}

impl Projection {
    #[inline(always)]
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[inline(always)]
    pub fn centered(center: f32, reach: f32) -> Self {
        Self {
            min: center - reach,
            max: center + reach,
        }
    }

    #[inline(always)]
    pub fn shifted(self, amount: f32) -> Self {
        Self {
            min: self.min + amount,
            max: self.max + amount,
        }
    }

    /// Strict overlap, touching intervals are disjoint.
    #[inline(always)]
    pub fn overlaps(&self, other: &Projection) -> bool {
        self.max > other.min && other.max > self.min
    }
}

/// Projects `points + offset` onto a unit `axis`.
pub fn project_points(
    points: &[Vector2<f32>],
    offset: Vector2<f32>,
    axis: Vector2<f32>,
) -> Projection {
    let shift = offset.dot(&axis);
    let mut min = f32::MAX;
    let mut max = -f32::MAX;
    for point in points {
        let distance = point.dot(&axis);
        min = min.min(distance);
        max = max.max(distance);
    }
    Projection::new(min + shift, max + shift)
}

/// Orders axes independently of their sign so mirrored tests settle ties the same way.
pub(crate) fn axis_precedes(axis: Vector2<f32>, other: Vector2<f32>) -> bool {
    canonical_axis(axis) < canonical_axis(other)
}

fn canonical_axis(axis: Vector2<f32>) -> (f32, f32) {
    if axis.x < 0.0 || (axis.x == 0.0 && axis.y < 0.0) {
        (-axis.x, -axis.y)
    } else {
        (axis.x, axis.y)
    }
}
