use crate::collision::Collision;
use crate::collision_data::CollisionData;
use crate::error::{validate_circle_radius, validate_rectangle_dims, CollisionResult};
use crate::polygon::Polygon;
use crate::{overlap, sweep};
use common::BoundingBox;
use nalgebra::Vector2;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapeKind {
    Circle { radius: f32 },
    Rectangle { half_width: f32, half_height: f32 },
    Polygon(Polygon),
}

impl ShapeKind {
    /// Extent around the shape's own center.
    pub fn local_bounds(&self) -> BoundingBox {
        match self {
            ShapeKind::Circle { radius } => BoundingBox::square(0.0, 0.0, *radius),
            ShapeKind::Rectangle {
                half_width,
                half_height,
            } => BoundingBox::from_center_half_extents(0.0, 0.0, *half_width, *half_height),
            ShapeKind::Polygon(polygon) => polygon.local_bounds(),
        }
    }

    pub fn area(&self) -> f32 {
        match self {
            ShapeKind::Circle { radius } => std::f32::consts::PI * radius * radius,
            ShapeKind::Rectangle {
                half_width,
                half_height,
            } => 4.0 * half_width * half_height,
            ShapeKind::Polygon(polygon) => polygon.area(),
        }
    }
}

/// A convex collider moving linearly between steps.
///
/// Position and velocity mirror the owning entity, shifted by a fixed
/// `offset`. The cached bounding box is only as fresh as the last call to
/// [`Shape::calculate_bounding_box`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shape {
    kind: ShapeKind,
    position: Vector2<f32>,
    velocity: Vector2<f32>,
    offset: Vector2<f32>,
    bounds: BoundingBox,
    collision_type: u8,
}

impl Shape {
    pub fn circle(radius: f32) -> CollisionResult<Self> {
        validate_circle_radius(radius)?;
        Ok(Self::from_kind(ShapeKind::Circle { radius }))
    }

    pub fn rectangle(half_width: f32, half_height: f32) -> CollisionResult<Self> {
        validate_rectangle_dims(half_width, half_height)?;
        Ok(Self::from_kind(ShapeKind::Rectangle {
            half_width,
            half_height,
        }))
    }

    pub fn polygon(polygon: Polygon) -> Self {
        Self::from_kind(ShapeKind::Polygon(polygon))
    }

    fn from_kind(kind: ShapeKind) -> Self {
        let bounds = kind.local_bounds();
        Self {
            kind,
            position: Vector2::zeros(),
            velocity: Vector2::zeros(),
            offset: Vector2::zeros(),
            bounds,
            collision_type: 0,
        }
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Vector2::new(x, y) + self.offset;
        self.bounds = self.current_bounds();
        self
    }

    pub fn with_velocity(mut self, dx: f32, dy: f32) -> Self {
        self.velocity = Vector2::new(dx, dy);
        self
    }

    /// Fixed displacement from the owning entity's position.
    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        let offset = Vector2::new(x, y);
        self.position += offset - self.offset;
        self.offset = offset;
        self.bounds = self.current_bounds();
        self
    }

    pub fn with_collision_type(mut self, collision_type: u8) -> Self {
        self.collision_type = collision_type;
        self
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn position(&self) -> Vector2<f32> {
        self.position
    }

    pub fn velocity(&self) -> Vector2<f32> {
        self.velocity
    }

    pub fn offset(&self) -> Vector2<f32> {
        self.offset
    }

    pub fn collision_type(&self) -> u8 {
        self.collision_type
    }

    pub fn set_collision_type(&mut self, collision_type: u8) {
        self.collision_type = collision_type;
    }

    pub fn set_position(&mut self, position: Vector2<f32>) {
        self.position = position;
    }

    pub fn set_velocity(&mut self, velocity: Vector2<f32>) {
        self.velocity = velocity;
    }

    /// Mirrors the owner's kinematics, applying the local offset.
    pub fn update_kinematics(
        &mut self,
        owner_position: Vector2<f32>,
        owner_velocity: Vector2<f32>,
    ) {
        self.position = owner_position + self.offset;
        self.velocity = owner_velocity;
    }

    pub fn area(&self) -> f32 {
        self.kind.area()
    }

    /// Extent at the current position, ignoring motion.
    pub fn current_bounds(&self) -> BoundingBox {
        self.kind
            .local_bounds()
            .translated(self.position.x, self.position.y)
    }

    /// Union of the extents at `t = 0` and `t = time`. Nothing is cached.
    pub fn swept_bounds(&self, time: f32) -> BoundingBox {
        let start = self.current_bounds();
        let end = start.translated(self.velocity.x * time, self.velocity.y * time);
        start.union(&end)
    }

    /// [`Shape::swept_bounds`], cached on the shape.
    pub fn calculate_bounding_box(&mut self, time: f32) -> BoundingBox {
        self.bounds = self.swept_bounds(time);
        self.bounds
    }

    /// Swept extent from the last [`Shape::calculate_bounding_box`] call.
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounds
    }

    /// Earliest time in `[0, max_time]` at which `self` touches `other`.
    ///
    /// `result` receives [`crate::NO_COLLISION`] when they stay apart. The
    /// normal points from `self` towards `other`.
    pub fn collide_with_shape(
        &self,
        other: &Shape,
        max_time: f32,
        data: &mut CollisionData,
        result: &mut Collision,
    ) {
        sweep::collide_shapes(self, other, max_time, data, result);
    }

    pub fn collide(&self, other: &Shape, max_time: f32) -> Collision {
        let mut data = CollisionData::new();
        let mut result = Collision::none();
        self.collide_with_shape(other, max_time, &mut data, &mut result);
        result
    }

    /// Static test on current positions. Touching shapes do not overlap.
    pub fn is_overlapping_shape(&self, other: &Shape) -> bool {
        overlap::overlap_shapes(self, other)
    }
}
