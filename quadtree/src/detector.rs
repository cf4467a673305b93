use crate::entity::{Entity, EntityId};
use crate::error::QuadtreeResult;
use crate::groups::CollisionGroups;
use crate::physics::Physics;
use crate::quadtree::{SpatialTree, TreeConfig};
use tracing::{trace, warn};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectorConfig {
    pub tree: TreeConfig,
    /// Collisions resolved in one `update` before the rest of the step is
    /// integrated without collision checks.
    pub max_collisions_per_update: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig {
            tree: TreeConfig::default(),
            max_collisions_per_update: 1024,
        }
    }
}

/// Event-driven stepper: advances the world to each collision in time
/// order, resolves it and carries on until the step is used up.
pub struct CollisionDetector<E: Entity> {
    tree: SpatialTree<E>,
    groups: CollisionGroups,
    max_collisions_per_update: usize,
    removed: Vec<(EntityId, E)>,
}

impl<E: Entity> CollisionDetector<E> {
    pub fn new(center_x: f32, center_y: f32, half_length: f32) -> QuadtreeResult<Self> {
        Self::with_config(center_x, center_y, half_length, DetectorConfig::default())
    }

    pub fn with_config(
        center_x: f32,
        center_y: f32,
        half_length: f32,
        config: DetectorConfig,
    ) -> QuadtreeResult<Self> {
        Ok(CollisionDetector {
            tree: SpatialTree::with_config(center_x, center_y, half_length, config.tree)?,
            groups: CollisionGroups::new(),
            max_collisions_per_update: config.max_collisions_per_update,
            removed: Vec::new(),
        })
    }

    pub fn tree(&self) -> &SpatialTree<E> {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut SpatialTree<E> {
        &mut self.tree
    }

    pub fn groups(&self) -> &CollisionGroups {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut CollisionGroups {
        &mut self.groups
    }

    pub fn add_entity(&mut self, entity: E) -> QuadtreeResult<EntityId> {
        self.tree.add_entity(entity)
    }

    pub fn remove_entity(&mut self, id: EntityId) -> Option<E> {
        self.tree.remove_entity(id)
    }

    /// Entities removed by [`crate::Outcome`]s since the last drain, in
    /// removal order.
    pub fn drain_removed(&mut self) -> std::vec::Drain<'_, (EntityId, E)> {
        self.removed.drain(..)
    }

    /// Advances the world by `dt`, stopping at every collision in
    /// chronological order to let `physics` resolve it. Returns how many
    /// collisions were resolved. Collision times passed to `physics` are
    /// measured from the start of this update.
    ///
    /// An indexing error does not cut the step short: every entity still
    /// reaches the end of the step and the first error is returned.
    pub fn update<P: Physics<E>>(&mut self, dt: f32, physics: &mut P) -> QuadtreeResult<usize> {
        let mut handled = 0;
        if dt > 0.0 {
            self.tree.begin_step(&self.groups, dt);
            while let Some(next) = self.tree.next_scheduled() {
                if handled >= self.max_collisions_per_update {
                    warn!(
                        handled,
                        time_left = dt - next.time(),
                        "collision limit reached, finishing step without collisions"
                    );
                    break;
                }
                match self
                    .tree
                    .resolve_next(&self.groups, physics, &mut self.removed)
                {
                    Some(_) => handled += 1,
                    None => break,
                }
            }
        }
        let result = self.tree.finish_step();
        self.tree.try_resize();
        trace!(dt, handled, "step finished");
        result.map(|()| handled)
    }
}
