pub mod detector;
pub mod entity;
pub mod error;
pub mod groups;
pub mod object_pool;
pub mod physics;
pub mod quadtree;

pub use detector::{CollisionDetector, DetectorConfig};
pub use entity::{Body, Entity, EntityId};
pub use error::{QuadtreeError, QuadtreeResult};
pub use groups::{CollisionGroups, MAX_COLLISION_TYPES};
pub use physics::{Outcome, Physics};
pub use quadtree::{EntityCollision, NodeId, SpatialTree, TreeConfig, GROW_THRESH};
