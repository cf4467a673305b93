use crate::error::{QuadtreeError, QuadtreeResult};

/// Entities a leaf holds directly before it splits.
pub const GROW_THRESH: usize = 2;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeConfig {
    pub grow_threshold: usize,
    /// Leaves never split into children smaller than this.
    pub min_half_length: f32,
    /// Nodes built up front.
    pub pool_size: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            grow_threshold: GROW_THRESH,
            min_half_length: 1.0,
            pool_size: 64,
        }
    }
}

impl TreeConfig {
    pub fn validate(&self) -> QuadtreeResult<()> {
        if self.grow_threshold == 0 {
            return Err(QuadtreeError::InvalidConfig {
                reason: "grow_threshold must be at least 1",
            });
        }
        if !self.min_half_length.is_finite() || self.min_half_length <= 0.0 {
            return Err(QuadtreeError::InvalidConfig {
                reason: "min_half_length must be finite and positive",
            });
        }
        Ok(())
    }
}
