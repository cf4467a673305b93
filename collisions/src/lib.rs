mod axes;
pub mod collision;
pub mod collision_data;
pub mod error;
mod overlap;
pub mod polygon;
pub mod shape;
mod sweep;
pub mod vector;

pub use collision::{Collision, NO_COLLISION};
pub use collision_data::CollisionData;
pub use error::{CollisionError, CollisionResult};
pub use polygon::Polygon;
pub use shape::{Shape, ShapeKind};
