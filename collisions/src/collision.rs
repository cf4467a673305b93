use nalgebra::Vector2;

/// Time reported when two shapes never touch within the requested horizon.
///
/// Finite so it orders below nothing and above every real time.
pub const NO_COLLISION: f32 = f32::MAX;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Collision {
    pub time_to_collision: f32,
    /// Unit vector pointing from the first shape towards the second.
    pub normal: Vector2<f32>,
}

impl Collision {
    pub fn new(time_to_collision: f32, normal: Vector2<f32>) -> Self {
        Self {
            time_to_collision,
            normal,
        }
    }

    pub fn none() -> Self {
        Self {
            time_to_collision: NO_COLLISION,
            normal: Vector2::zeros(),
        }
    }

    pub fn set(&mut self, time_to_collision: f32, normal: Vector2<f32>) {
        self.time_to_collision = time_to_collision;
        self.normal = normal;
    }

    pub fn set_no_collision(&mut self) {
        self.time_to_collision = NO_COLLISION;
        self.normal = Vector2::zeros();
    }

    pub fn is_collision(&self) -> bool {
        self.time_to_collision < NO_COLLISION
    }

    pub fn flip(&mut self) {
        self.normal = -self.normal;
    }

    pub fn flipped(mut self) -> Self {
        self.flip();
        self
    }
}

impl Default for Collision {
    fn default() -> Self {
        Self::none()
    }
}
