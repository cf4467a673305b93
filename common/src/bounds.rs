use rand::Rng;

/// Axis-aligned extent stored as min/max corners.
///
/// "Top" is the smaller y, matching the quadrant naming used by the tree.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl BoundingBox {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn from_center_half_extents(x: f32, y: f32, half_width: f32, half_height: f32) -> Self {
        Self {
            min_x: x - half_width,
            min_y: y - half_height,
            max_x: x + half_width,
            max_y: y + half_height,
        }
    }

    pub fn square(center_x: f32, center_y: f32, half_length: f32) -> Self {
        Self::from_center_half_extents(center_x, center_y, half_length, half_length)
    }

    /// An inverted box that any `expand_to_include` call will overwrite.
    pub fn empty() -> Self {
        Self {
            min_x: f32::MAX,
            min_y: f32::MAX,
            max_x: -f32::MAX,
            max_y: -f32::MAX,
        }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f32, f32) {
        (
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Inclusive containment: touching edges still count as inside.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// Containment with no shared edge on any side.
    pub fn contains_strictly(&self, other: &BoundingBox) -> bool {
        other.min_x > self.min_x
            && other.max_x < self.max_x
            && other.min_y > self.min_y
            && other.max_y < self.max_y
    }

    /// Inclusive intersection test.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    pub fn expand_to_include(&mut self, other: &BoundingBox) {
        self.min_x = f32::min(self.min_x, other.min_x);
        self.min_y = f32::min(self.min_y, other.min_y);
        self.max_x = f32::max(self.max_x, other.max_x);
        self.max_y = f32::max(self.max_y, other.max_y);
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut merged = *self;
        merged.expand_to_include(other);
        merged
    }

    pub fn translated(&self, dx: f32, dy: f32) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x + dx,
            min_y: self.min_y + dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }

    /// Picks a point that keeps a disc of `margin` inside the box. Collapses to
    /// the lower edge on an axis narrower than the margin.
    pub fn random_point_inside<R: Rng>(&self, margin: f32, rng: &mut R) -> (f32, f32) {
        (
            safe_range(rng, self.min_x + margin, self.max_x - margin),
            safe_range(rng, self.min_y + margin, self.max_y - margin),
        )
    }
}

fn safe_range<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..=max)
}
