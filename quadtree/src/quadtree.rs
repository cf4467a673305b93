use crate::entity::{Entity, EntityId};
use crate::error::{QuadtreeError, QuadtreeResult};
use crate::object_pool::ObjectPool;
use common::BoundingBox;
use slotmap::SlotMap;

mod collision_pairs;
mod config;
mod insert;
mod maintenance;
mod node;
mod query;
mod schedule;

pub use collision_pairs::EntityCollision;
pub use config::{TreeConfig, GROW_THRESH};
pub use node::NodeId;

use node::Node;
use schedule::StepState;

pub(crate) struct EntityRecord<E> {
    pub(crate) entity: E,
    pub(crate) node: NodeId,
    pub(crate) slot: usize,
    /// Step time the entity's position belongs to. Zero outside a step.
    pub(crate) time: f32,
}

/// Growable quadtree over entities with swept bounds.
///
/// Each entity lives in the deepest node whose region strictly contains its
/// bounding box. Entities straddling a center line stay on the quad itself.
/// The root doubles outward whenever something escapes it, so the world has
/// no fixed extent.
pub struct SpatialTree<E: Entity> {
    nodes: ObjectPool<Node>,
    root: NodeId,
    entities: SlotMap<EntityId, EntityRecord<E>>,
    config: TreeConfig,
    origin: (f32, f32, f32),
    id_scratch: Vec<EntityId>,
    ancestor_scratch: Vec<EntityId>,
    step: StepState,
}

impl<E: Entity> SpatialTree<E> {
    pub fn new(center_x: f32, center_y: f32, half_length: f32) -> QuadtreeResult<Self> {
        Self::with_config(center_x, center_y, half_length, TreeConfig::default())
    }

    pub fn with_config(
        center_x: f32,
        center_y: f32,
        half_length: f32,
        config: TreeConfig,
    ) -> QuadtreeResult<Self> {
        config.validate()?;
        if !center_x.is_finite() || !center_y.is_finite() {
            return Err(QuadtreeError::InvalidCenter {
                x: center_x,
                y: center_y,
            });
        }
        if !half_length.is_finite() || half_length <= 0.0 {
            return Err(QuadtreeError::InvalidHalfLength { half_length });
        }
        let mut nodes: ObjectPool<Node> = ObjectPool::with_capacity(config.pool_size);
        let root = nodes.acquire();
        nodes[root].initialize(center_x, center_y, half_length, None);
        Ok(SpatialTree {
            nodes,
            root,
            entities: SlotMap::with_key(),
            config,
            origin: (center_x, center_y, half_length),
            id_scratch: Vec::new(),
            ancestor_scratch: Vec::new(),
            step: StepState::default(),
        })
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&E> {
        self.entities.get(id).map(|record| &record.entity)
    }

    /// Changes that move the entity or its shape take effect in the tree at
    /// the next [`SpatialTree::ensure_entities_are_contained`] or
    /// [`SpatialTree::begin_step`].
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut E> {
        self.entities.get_mut(id).map(|record| &mut record.entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &E)> {
        self.entities.iter().map(|(id, record)| (id, &record.entity))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut E)> {
        self.entities
            .iter_mut()
            .map(|(id, record)| (id, &mut record.entity))
    }

    pub fn root_bounds(&self) -> BoundingBox {
        self.nodes[self.root].bounds
    }

    pub fn root_half_length(&self) -> f32 {
        self.nodes[self.root].half_length
    }

    /// Entities counted at the root, which covers the whole tree.
    pub fn entity_count(&self) -> usize {
        self.nodes[self.root].entity_count
    }

    /// Nodes currently in the tree.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes ever built, including the ones parked for reuse.
    pub fn pool_capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Bounds of the node currently holding `id`.
    pub fn owning_node_bounds(&self, id: EntityId) -> Option<BoundingBox> {
        self.entities
            .get(id)
            .map(|record| self.nodes[record.node].bounds)
    }
}
