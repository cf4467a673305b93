use super::node::{NodeKind, BOTTOM_LEFT, BOTTOM_RIGHT, TOP_LEFT, TOP_RIGHT};
use super::*;
use tracing::{debug, trace};

pub(crate) fn check_finite(bounds: &BoundingBox) -> QuadtreeResult<()> {
    if bounds.is_finite() {
        Ok(())
    } else {
        Err(QuadtreeError::NonFiniteBounds {
            min_x: bounds.min_x,
            min_y: bounds.min_y,
            max_x: bounds.max_x,
            max_y: bounds.max_y,
        })
    }
}

impl<E: Entity> SpatialTree<E> {
    /// Indexes `entity` at its current position, growing the root if needed.
    ///
    /// While a step is open the entity is taken to be at the step's current
    /// time, and the queued collisions are rebuilt before the next resolve.
    pub fn add_entity(&mut self, mut entity: E) -> QuadtreeResult<EntityId> {
        let horizon = if self.step.active {
            self.step.end - self.step.now
        } else {
            0.0
        };
        entity.sync_shape();
        let bounds = entity.shape_mut().calculate_bounding_box(horizon);
        check_finite(&bounds)?;
        self.grow_to_contain(&bounds)?;
        let root = self.root;
        let id = self.entities.insert(EntityRecord {
            entity,
            node: root,
            slot: 0,
            time: self.step.now,
        });
        self.insert_from(root, id);
        self.step.dirty |= self.step.active;
        Ok(id)
    }

    pub fn remove_entity(&mut self, id: EntityId) -> Option<E> {
        if !self.entities.contains_key(id) {
            return None;
        }
        self.detach(id);
        self.entities.remove(id).map(|record| record.entity)
    }

    /// Unlinks `id` from its node in O(1) and uncounts it up to the root.
    /// The record keeps pointing at the old node until it is attached again.
    pub(crate) fn detach(&mut self, id: EntityId) {
        let (node_id, slot) = {
            let record = &self.entities[id];
            (record.node, record.slot)
        };
        let node = &mut self.nodes[node_id];
        debug_assert_eq!(node.entities[slot], id);
        node.entities.swap_remove(slot);
        if let Some(&moved) = node.entities.get(slot) {
            self.entities[moved].slot = slot;
        }
        self.decrement_counts(node_id);
    }

    fn attach(&mut self, node_id: NodeId, id: EntityId) {
        let node = &mut self.nodes[node_id];
        let record = &mut self.entities[id];
        record.node = node_id;
        record.slot = node.entities.len();
        node.entities.push(id);
    }

    fn increment_counts(&mut self, from: NodeId) {
        let mut current = Some(from);
        while let Some(node_id) = current {
            let node = &mut self.nodes[node_id];
            node.entity_count += 1;
            current = node.parent;
        }
    }

    fn decrement_counts(&mut self, from: NodeId) {
        let mut current = Some(from);
        while let Some(node_id) = current {
            let node = &mut self.nodes[node_id];
            debug_assert!(node.entity_count > 0);
            node.entity_count -= 1;
            current = node.parent;
        }
    }

    /// Descends from `start` while a single child holds the entity's cached
    /// bounds, stores it there and splits the node if it overflowed.
    pub(crate) fn insert_from(&mut self, start: NodeId, id: EntityId) {
        let bounds = self.entities[id].entity.shape().bounding_box();
        let mut node_id = start;
        while let Some(children) = self.nodes[node_id].children() {
            match self.nodes[node_id].quadrant_for(&bounds) {
                Some(quadrant) => node_id = children[quadrant],
                None => break,
            }
        }
        self.attach(node_id, id);
        self.increment_counts(node_id);
        self.split_if_needed(node_id);
    }

    fn split_if_needed(&mut self, node_id: NodeId) {
        let node = &self.nodes[node_id];
        let child_half = node.half_length * 0.5;
        if !node.is_leaf()
            || node.entities.len() <= self.config.grow_threshold
            || child_half < self.config.min_half_length
        {
            return;
        }
        let centers: [(f32, f32); 4] = std::array::from_fn(|quadrant| node.child_center(quadrant));
        let children: [NodeId; 4] = std::array::from_fn(|quadrant| {
            let child = self.nodes.acquire();
            let (x, y) = centers[quadrant];
            self.nodes[child].initialize(x, y, child_half, Some(node_id));
            child
        });
        let entities = std::mem::take(&mut self.nodes[node_id].entities);
        let node = &mut self.nodes[node_id];
        node.kind = NodeKind::Quad(children);
        node.stale = true;
        trace!(half_length = child_half * 2.0, entities = entities.len(), "split leaf");

        for id in entities {
            let bounds = self.entities[id].entity.shape().bounding_box();
            match self.nodes[node_id].quadrant_for(&bounds) {
                Some(quadrant) => {
                    let child = children[quadrant];
                    self.attach(child, id);
                    self.nodes[child].entity_count += 1;
                }
                None => self.attach(node_id, id),
            }
        }
        for child in children {
            self.split_if_needed(child);
        }
    }

    pub(crate) fn grow_to_contain(&mut self, bounds: &BoundingBox) -> QuadtreeResult<()> {
        while !self.nodes[self.root].contains(bounds) {
            self.grow_towards(bounds)?;
        }
        Ok(())
    }

    /// Doubles the root. The old root becomes the child on the far side from
    /// where `bounds` escaped, so the new area opens towards the escape.
    fn grow_towards(&mut self, bounds: &BoundingBox) -> QuadtreeResult<()> {
        let old_root = self.root;
        let (center_x, center_y, half_length, root_bounds, entity_count) = {
            let root = &self.nodes[old_root];
            (
                root.center_x,
                root.center_y,
                root.half_length,
                root.bounds,
                root.entity_count,
            )
        };
        let new_half = half_length * 2.0;
        let escapes_left = bounds.min_x <= root_bounds.min_x;
        let escapes_up = bounds.min_y <= root_bounds.min_y;
        let new_x = if escapes_left {
            center_x - half_length
        } else {
            center_x + half_length
        };
        let new_y = if escapes_up {
            center_y - half_length
        } else {
            center_y + half_length
        };
        if !BoundingBox::square(new_x, new_y, new_half).is_finite() {
            return Err(QuadtreeError::GrowthLimit { half_length });
        }
        let old_quadrant = match (escapes_up, escapes_left) {
            (true, true) => BOTTOM_RIGHT,
            (true, false) => BOTTOM_LEFT,
            (false, true) => TOP_RIGHT,
            (false, false) => TOP_LEFT,
        };

        let new_root = self.nodes.acquire();
        self.nodes[new_root].initialize(new_x, new_y, new_half, None);
        let centers: [(f32, f32); 4] =
            std::array::from_fn(|quadrant| self.nodes[new_root].child_center(quadrant));
        let children: [NodeId; 4] = std::array::from_fn(|quadrant| {
            if quadrant == old_quadrant {
                return old_root;
            }
            let child = self.nodes.acquire();
            let (x, y) = centers[quadrant];
            self.nodes[child].initialize(x, y, half_length, Some(new_root));
            child
        });
        let root = &mut self.nodes[new_root];
        root.kind = NodeKind::Quad(children);
        root.entity_count = entity_count;
        self.nodes[old_root].parent = Some(new_root);
        self.root = new_root;
        debug!(
            half_length = new_half,
            center_x = new_x,
            center_y = new_y,
            "grew quadtree root"
        );
        Ok(())
    }
}
