pub mod bounds;

pub use bounds::BoundingBox;
