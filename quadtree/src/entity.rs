use collisions::Shape;
use nalgebra::Vector2;

slotmap::new_key_type! {
    /// Stable handle for an entity stored in a [`crate::quadtree::SpatialTree`].
    pub struct EntityId;
}

/// Anything the tree can index: a body that owns exactly one shape.
///
/// The tree reads the shape for bounds and sweeps, and calls
/// [`Entity::update_position`] when time advances.
pub trait Entity {
    fn shape(&self) -> &Shape;
    fn shape_mut(&mut self) -> &mut Shape;
    fn position(&self) -> Vector2<f32>;
    fn set_position(&mut self, position: Vector2<f32>);
    fn velocity(&self) -> Vector2<f32>;
    fn set_velocity(&mut self, velocity: Vector2<f32>);
    fn mass(&self) -> f32;

    fn collision_type(&self) -> u8 {
        self.shape().collision_type()
    }

    /// Copies position and velocity onto the shape.
    fn sync_shape(&mut self) {
        let position = self.position();
        let velocity = self.velocity();
        self.shape_mut().update_kinematics(position, velocity);
    }

    /// Moves linearly by `dt` and keeps the shape in step.
    fn update_position(&mut self, dt: f32) {
        let position = self.position() + self.velocity() * dt;
        self.set_position(position);
        self.sync_shape();
    }
}

/// Plain moving body, enough for most simulations and for tests.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Body {
    shape: Shape,
    position: Vector2<f32>,
    velocity: Vector2<f32>,
    mass: f32,
}

impl Body {
    pub fn new(shape: Shape) -> Self {
        let mut body = Body {
            shape,
            position: Vector2::zeros(),
            velocity: Vector2::zeros(),
            mass: 1.0,
        };
        body.sync_shape();
        body
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Vector2::new(x, y);
        self.sync_shape();
        self
    }

    pub fn with_velocity(mut self, dx: f32, dy: f32) -> Self {
        self.velocity = Vector2::new(dx, dy);
        self.sync_shape();
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Mass from the shape's area.
    pub fn with_density(mut self, density: f32) -> Self {
        self.mass = self.shape.area() * density;
        self
    }
}

impl Entity for Body {
    fn shape(&self) -> &Shape {
        &self.shape
    }

    fn shape_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }

    fn position(&self) -> Vector2<f32> {
        self.position
    }

    fn set_position(&mut self, position: Vector2<f32>) {
        self.position = position;
    }

    fn velocity(&self) -> Vector2<f32> {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vector2<f32>) {
        self.velocity = velocity;
    }

    fn mass(&self) -> f32 {
        self.mass
    }
}
