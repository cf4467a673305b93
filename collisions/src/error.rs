use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CollisionError {
    #[error("circle radius must be finite and non-negative (radius: {radius})")]
    InvalidCircleRadius { radius: f32 },
    #[error(
        "rectangle half extents must be finite and non-negative (half_width: {half_width}, half_height: {half_height})"
    )]
    InvalidRectangleDims { half_width: f32, half_height: f32 },
    #[error("polygon needs at least 3 distinct points spanning a non-zero area (points: {count})")]
    DegeneratePolygon { count: usize },
    #[error("polygon point {index} is not finite")]
    NonFinitePoint { index: usize },
    #[error("polygon is not convex at point {index}")]
    NonConvexPolygon { index: usize },
}

pub type CollisionResult<T> = Result<T, CollisionError>;

pub(crate) fn validate_circle_radius(radius: f32) -> CollisionResult<()> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(CollisionError::InvalidCircleRadius { radius });
    }
    Ok(())
}

pub(crate) fn validate_rectangle_dims(half_width: f32, half_height: f32) -> CollisionResult<()> {
    if !half_width.is_finite() || !half_height.is_finite() || half_width < 0.0 || half_height < 0.0
    {
        return Err(CollisionError::InvalidRectangleDims {
            half_width,
            half_height,
        });
    }
    Ok(())
}
