//! Incremental collision scheduling for one step.
//!
//! Every node caches the earliest collision among the pairs it owns and all
//! caches sit in one queue ordered by time. Resolving a collision only
//! re-tests the nodes below the places the two entities left and reached,
//! and entities elsewhere are not moved until something near them happens.

use super::collision_pairs::PairSearch;
use super::insert::check_finite;
use super::*;
use crate::groups::CollisionGroups;
use crate::physics::Physics;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::trace;

/// Queue entry for the collision cached on `node`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scheduled {
    pub(crate) collision: EntityCollision,
    pub(crate) node: NodeId,
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        self.collision
            .time()
            .total_cmp(&other.collision.time())
            .then_with(|| {
                (self.collision.a, self.collision.b, self.node).cmp(&(
                    other.collision.a,
                    other.collision.b,
                    other.node,
                ))
            })
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

#[derive(Debug, Default)]
pub(crate) struct StepState {
    pub(crate) active: bool,
    /// Time of the last resolved collision, measured from the step start.
    pub(crate) now: f32,
    pub(crate) end: f32,
    pub(crate) queue: BTreeSet<Scheduled>,
    /// Entities were added mid-step, so the queue is rebuilt before the
    /// next collision is resolved.
    pub(crate) dirty: bool,
    pub(crate) error: Option<QuadtreeError>,
}

impl<E: Entity> SpatialTree<E> {
    /// Opens a step of length `dt`. Containment is refreshed over the whole
    /// step and every node's earliest collision is queued.
    ///
    /// Until [`SpatialTree::finish_step`] positions are advanced lazily: an
    /// entity only moves when a collision is resolved near it, so
    /// [`SpatialTree::entity`] may report an earlier position. A containment
    /// error is held back and returned by `finish_step`. A step that is
    /// still open is finished first and its error dropped.
    pub fn begin_step(&mut self, groups: &CollisionGroups, dt: f32) {
        if self.step.active {
            self.settle();
        }
        let end = dt.max(0.0);
        self.step.active = true;
        self.step.now = 0.0;
        self.step.end = end;
        self.step.dirty = false;
        self.step.error = self.ensure_entities_are_contained(end).err();
        self.rebuild_schedule(groups);
        trace!(dt, queued = self.step.queue.len(), "opened step");
    }

    pub fn is_stepping(&self) -> bool {
        self.step.active
    }

    /// Step time reached so far.
    pub fn step_time(&self) -> f32 {
        self.step.now
    }

    /// Earliest queued collision. Times are measured from the step start.
    pub fn next_scheduled(&self) -> Option<EntityCollision> {
        self.step.queue.first().map(|entry| entry.collision)
    }

    /// Every queued collision in the order they would be resolved, one per
    /// node that owns a colliding pair.
    pub fn scheduled_collisions(&self) -> impl Iterator<Item = &EntityCollision> + '_ {
        self.step.queue.iter().map(|entry| &entry.collision)
    }

    /// Advances the pair of the earliest queued collision to its time, lets
    /// `physics` resolve it and re-queues only the pairs the two entities
    /// take part in. Entities the outcome removes are pushed onto `removed`.
    ///
    /// Returns the resolved collision, or `None` once the queue is empty.
    pub fn resolve_next<P: Physics<E>>(
        &mut self,
        groups: &CollisionGroups,
        physics: &mut P,
        removed: &mut Vec<(EntityId, E)>,
    ) -> Option<EntityCollision> {
        if !self.step.active {
            return None;
        }
        if self.step.dirty {
            self.rebuild_schedule(groups);
        }
        loop {
            let entry = *self.step.queue.first()?;
            let Scheduled { collision, node } = entry;
            let (a, b) = (collision.a, collision.b);
            if self.nodes.get(node).is_none() {
                self.step.queue.remove(&entry);
                continue;
            }
            if !self.entities.contains_key(a) || !self.entities.contains_key(b) {
                // removed outside a resolve; recount the stale node
                self.refresh_subtree(node, groups, &[], &[a, b]);
                continue;
            }

            self.step.now = collision.time().max(self.step.now).min(self.step.end);
            self.advance(a);
            self.advance(b);
            let outcome = self.apply_collision(&collision, physics).unwrap_or_default();

            let horizon = self.step.end - self.step.now;
            let mut tops: SmallVec<[NodeId; 2]> = SmallVec::new();
            for (id, remove) in [(a, outcome.removes_a()), (b, outcome.removes_b())] {
                if remove {
                    tops.push(self.entities[id].node);
                    self.detach(id);
                    if let Some(record) = self.entities.remove(id) {
                        removed.push((id, record.entity));
                    }
                    trace!(?id, "removed entity during collision");
                    continue;
                }
                let bounds = self.entities[id].entity.shape().swept_bounds(horizon);
                match check_finite(&bounds).and_then(|()| self.place(id, &bounds, horizon)) {
                    Ok(top) => tops.push(top),
                    Err(err) => {
                        tops.push(self.entities[id].node);
                        self.step.error.get_or_insert(err);
                    }
                }
            }

            tops.dedup();
            let changed: SmallVec<[EntityId; 2]> = [a, b]
                .into_iter()
                .filter(|&id| self.entities.contains_key(id))
                .collect();
            for (index, &top) in tops.iter().enumerate() {
                let covered = tops
                    .iter()
                    .enumerate()
                    .any(|(other, &node)| other != index && self.is_ancestor_of(node, top));
                if !covered {
                    self.refresh_subtree(top, groups, &changed, &[a, b]);
                }
            }
            return Some(collision);
        }
    }

    /// Moves every entity to the end of the step and drops the queue.
    /// Returns the first error met while indexing during the step.
    pub fn finish_step(&mut self) -> QuadtreeResult<()> {
        self.settle();
        self.step.error.take().map_or(Ok(()), Err)
    }

    fn settle(&mut self) {
        let end = self.step.end;
        for record in self.entities.values_mut() {
            let dt = end - record.time;
            if dt > 0.0 {
                record.entity.update_position(dt);
            }
            record.time = 0.0;
        }
        self.clear_caches();
        self.step.active = false;
        self.step.dirty = false;
        self.step.now = 0.0;
        self.step.end = 0.0;
    }

    fn clear_caches(&mut self) {
        self.step.queue.clear();
        let mut stack: SmallVec<[NodeId; 32]> = SmallVec::new();
        stack.push(self.root);
        while let Some(node_id) = stack.pop() {
            let node = &mut self.nodes[node_id];
            node.cache = None;
            node.stale = true;
            if let Some(children) = node.children() {
                stack.extend(children);
            }
        }
    }

    fn rebuild_schedule(&mut self, groups: &CollisionGroups) {
        self.clear_caches();
        self.step.dirty = false;
        let root = self.root;
        self.refresh_subtree(root, groups, &[], &[]);
    }

    /// Strict ancestry, walking parent links up from `node`.
    fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes[node].parent;
        while let Some(node_id) = current {
            if node_id == ancestor {
                return true;
            }
            current = self.nodes[node_id].parent;
        }
        false
    }

    /// Brings `id` forward to the step's current time.
    fn advance(&mut self, id: EntityId) {
        let now = self.step.now;
        let record = &mut self.entities[id];
        let dt = now - record.time;
        if dt > 0.0 {
            record.entity.update_position(dt);
        }
        record.time = now;
    }

    /// Re-queues the nodes under `top`. A node is recounted from scratch
    /// when it is stale or its cached pair names an `invalid` entity;
    /// otherwise only the pairs of `changed` entities are tested against its
    /// cache.
    fn refresh_subtree(
        &mut self,
        top: NodeId,
        groups: &CollisionGroups,
        changed: &[EntityId],
        invalid: &[EntityId],
    ) {
        let mut ancestors = std::mem::take(&mut self.ancestor_scratch);
        ancestors.clear();
        let mut current = self.nodes[top].parent;
        while let Some(node_id) = current {
            for slot in 0..self.nodes[node_id].entities.len() {
                let id = self.nodes[node_id].entities[slot];
                self.advance(id);
                ancestors.push(id);
            }
            current = self.nodes[node_id].parent;
        }
        let max_time = self.step.end - self.step.now;
        let mut search = PairSearch::new(groups, max_time, self.step.now, ancestors);
        self.refresh_node(top, &mut search, changed, invalid);
        self.ancestor_scratch = search.ancestors;
    }

    fn refresh_node(
        &mut self,
        node_id: NodeId,
        search: &mut PairSearch<'_>,
        changed: &[EntityId],
        invalid: &[EntityId],
    ) {
        for slot in 0..self.nodes[node_id].entities.len() {
            let id = self.nodes[node_id].entities[slot];
            self.advance(id);
        }
        let node = &self.nodes[node_id];
        let recount = node.stale
            || node.cache.map_or(false, |cached| {
                invalid.contains(&cached.a) || invalid.contains(&cached.b)
            });
        if recount {
            search.best = None;
            self.test_node(node_id, search);
        } else {
            search.best = node.cache;
            for &id in changed {
                self.test_changed(node_id, id, search);
            }
        }
        let best = search.best.take();
        self.set_cache(node_id, best);

        let children = match self.nodes[node_id].children() {
            Some(children) => children,
            None => return,
        };
        let mark = search.ancestors.len();
        search
            .ancestors
            .extend_from_slice(&self.nodes[node_id].entities);
        for child in children {
            let child_node = &self.nodes[child];
            if child_node.entity_count > 0 || child_node.cache.is_some() {
                self.refresh_node(child, search, changed, invalid);
            }
        }
        search.ancestors.truncate(mark);
    }

    /// Pairs of `id` owned by `node_id`: against the node's other entities
    /// and everything above when `id` lives here, or against the node's
    /// entities when `id` lives above.
    fn test_changed(&self, node_id: NodeId, id: EntityId, search: &mut PairSearch<'_>) {
        let record = match self.entities.get(id) {
            Some(record) => record,
            None => return,
        };
        let local = &self.nodes[node_id].entities;
        if record.node == node_id {
            for &other in local {
                if other != id {
                    self.test_pair(id, other, search);
                }
            }
            for index in 0..search.ancestors.len() {
                let other = search.ancestors[index];
                self.test_pair(id, other, search);
            }
        } else if search.ancestors.contains(&id) {
            for &other in local {
                self.test_pair(id, other, search);
            }
        }
    }

    fn set_cache(&mut self, node_id: NodeId, cache: Option<EntityCollision>) {
        let node = &mut self.nodes[node_id];
        node.stale = false;
        if node.cache == cache {
            return;
        }
        if let Some(collision) = node.cache.take() {
            self.step.queue.remove(&Scheduled {
                collision,
                node: node_id,
            });
        }
        if let Some(collision) = cache {
            self.step.queue.insert(Scheduled {
                collision,
                node: node_id,
            });
        }
        node.cache = cache;
    }
}
