use super::insert::check_finite;
use super::node::NodeKind;
use super::*;
use fxhash::FxHashSet;
use smallvec::SmallVec;
use tracing::trace;

impl<E: Entity> SpatialTree<E> {
    /// Refreshes every entity's swept bounds over `time_horizon` and moves
    /// entities whose node no longer strictly contains them. Entities that
    /// escape the root grow it. Entities that now fit inside one child of
    /// their quad are pushed down.
    ///
    /// An entity whose bounds cannot be indexed keeps its previous bounds and
    /// node. Every other entity is still processed and the first error is
    /// returned afterwards.
    pub fn ensure_entities_are_contained(&mut self, time_horizon: f32) -> QuadtreeResult<()> {
        let mut ids = std::mem::take(&mut self.id_scratch);
        ids.clear();
        ids.extend(self.entities.keys());
        let result = self.contain_all(&ids, time_horizon);
        self.id_scratch = ids;
        result
    }

    fn contain_all(&mut self, ids: &[EntityId], time_horizon: f32) -> QuadtreeResult<()> {
        let mut first_error = None;
        for &id in ids {
            let entity = &mut self.entities[id].entity;
            entity.sync_shape();
            let bounds = entity.shape().swept_bounds(time_horizon);
            let placed = check_finite(&bounds).and_then(|()| self.place(id, &bounds, time_horizon));
            if let Err(err) = placed {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Caches `bounds` (the swept box over `time_horizon`) on the entity and
    /// moves it to the deepest node strictly containing them. Returns the
    /// node the descent started from, the highest node whose contents may
    /// have changed.
    ///
    /// When the root cannot grow far enough the entity is left untouched.
    pub(crate) fn place(
        &mut self,
        id: EntityId,
        bounds: &BoundingBox,
        time_horizon: f32,
    ) -> QuadtreeResult<NodeId> {
        let from = self.entities[id].node;
        let mut start = from;
        while !self.nodes[start].contains(bounds) {
            match self.nodes[start].parent {
                Some(parent) => start = parent,
                None => {
                    self.grow_to_contain(bounds)?;
                    start = self.root;
                    break;
                }
            }
        }
        self.entities[id]
            .entity
            .shape_mut()
            .calculate_bounding_box(time_horizon);
        let node = &self.nodes[start];
        if start == from && (node.is_leaf() || node.quadrant_for(bounds).is_none()) {
            return Ok(from);
        }
        self.detach(id);
        if start != from {
            trace!(?id, "relocated entity");
        }
        self.insert_from(start, id);
        Ok(start)
    }

    /// Advances every entity linearly by `dt`. The tree is not touched, and
    /// an open step must be finished first.
    pub fn update_entity_positions(&mut self, dt: f32) {
        for record in self.entities.values_mut() {
            record.entity.update_position(dt);
        }
    }

    /// Folds every quad whose subtree holds no entities back into a leaf and
    /// returns its descendants to the pool.
    pub fn try_resize(&mut self) {
        let mut stack: SmallVec<[NodeId; 32]> = SmallVec::new();
        stack.push(self.root);
        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id];
            let children = match node.children() {
                Some(children) => children,
                None => continue,
            };
            if node.entity_count == 0 {
                for child in children {
                    self.release_subtree(child);
                }
                self.nodes[node_id].kind = NodeKind::Leaf;
                trace!(half_length = self.nodes[node_id].half_length, "collapsed quad");
            } else {
                stack.extend(
                    children
                        .into_iter()
                        .filter(|&child| !self.nodes[child].is_leaf()),
                );
            }
        }
    }

    fn release_subtree(&mut self, node_id: NodeId) {
        if let Some(children) = self.nodes[node_id].children() {
            for child in children {
                self.release_subtree(child);
            }
        }
        self.nodes.release(node_id);
    }

    /// Drops every entity and resets the root to its initial square. Pooled
    /// nodes are kept for reuse.
    pub fn clear(&mut self) {
        self.step = StepState::default();
        self.entities.clear();
        self.nodes.clear();
        let (center_x, center_y, half_length) = self.origin;
        self.root = self.nodes.acquire();
        self.nodes[self.root].initialize(center_x, center_y, half_length, None);
    }

    /// Walks the whole tree and checks its bookkeeping: subtree counts,
    /// parent links, record slots and strict containment of cached bounds.
    ///
    /// Holds after any `add_entity`, `remove_entity` or
    /// `ensure_entities_are_contained`.
    pub fn check_invariants(&self) -> QuadtreeResult<()> {
        let mut seen = FxHashSet::default();
        let counted = self.check_node(self.root, None, &mut seen)?;
        if counted != self.entities.len() || seen.len() != self.entities.len() {
            return Err(QuadtreeError::InvariantViolation(format!(
                "tree holds {} entities, {} distinct, store has {}",
                counted,
                seen.len(),
                self.entities.len()
            )));
        }
        Ok(())
    }

    fn check_node(
        &self,
        node_id: NodeId,
        parent: Option<NodeId>,
        seen: &mut FxHashSet<EntityId>,
    ) -> QuadtreeResult<usize> {
        let node = self.nodes.get(node_id).ok_or_else(|| {
            QuadtreeError::InvariantViolation(format!("node {:?} is not live", node_id))
        })?;
        if node.parent != parent {
            return Err(QuadtreeError::InvariantViolation(format!(
                "node {:?} has parent {:?}, expected {:?}",
                node_id, node.parent, parent
            )));
        }
        for (slot, &id) in node.entities.iter().enumerate() {
            let record = self.entities.get(id).ok_or_else(|| {
                QuadtreeError::InvariantViolation(format!("node {:?} lists dead {:?}", node_id, id))
            })?;
            if record.node != node_id || record.slot != slot {
                return Err(QuadtreeError::InvariantViolation(format!(
                    "{:?} recorded at {:?}[{}], found at {:?}[{}]",
                    id, record.node, record.slot, node_id, slot
                )));
            }
            if !node.contains(&record.entity.shape().bounding_box()) {
                return Err(QuadtreeError::InvariantViolation(format!(
                    "{:?} escapes node {:?}",
                    id, node_id
                )));
            }
            if !seen.insert(id) {
                return Err(QuadtreeError::InvariantViolation(format!(
                    "{:?} is stored twice",
                    id
                )));
            }
        }
        let mut total = node.entities.len();
        if let Some(children) = node.children() {
            for child in children {
                total += self.check_node(child, Some(node_id), seen)?;
            }
        }
        if total != node.entity_count {
            return Err(QuadtreeError::InvariantViolation(format!(
                "node {:?} counts {} entities, holds {}",
                node_id, node.entity_count, total
            )));
        }
        Ok(total)
    }
}
