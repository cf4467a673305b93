use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuadtreeError {
    #[error("quadtree half-length must be finite and positive (half_length: {half_length})")]
    InvalidHalfLength { half_length: f32 },
    #[error("quadtree center must be finite (x: {x}, y: {y})")]
    InvalidCenter { x: f32, y: f32 },
    #[error(
        "entity bounds must be finite (min_x: {min_x}, min_y: {min_y}, max_x: {max_x}, max_y: {max_y})"
    )]
    NonFiniteBounds {
        min_x: f32,
        min_y: f32,
        max_x: f32,
        max_y: f32,
    },
    #[error("quadtree root cannot grow past half-length {half_length}")]
    GrowthLimit { half_length: f32 },
    #[error("invalid quadtree config: {reason}")]
    InvalidConfig { reason: &'static str },
    #[error("quadtree invariant violated: {0}")]
    InvariantViolation(String),
}

pub type QuadtreeResult<T> = Result<T, QuadtreeError>;
