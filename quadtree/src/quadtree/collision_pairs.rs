use super::*;
use crate::groups::CollisionGroups;
use crate::physics::{Outcome, Physics};
use collisions::{Collision, CollisionData};
use nalgebra::Vector2;

/// Earliest contact between two entities. `a` always has the smaller id and
/// the normal points from `a` towards `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityCollision {
    pub collision: Collision,
    pub a: EntityId,
    pub b: EntityId,
}

impl EntityCollision {
    pub fn time(&self) -> f32 {
        self.collision.time_to_collision
    }

    pub fn normal(&self) -> Vector2<f32> {
        self.collision.normal
    }

    fn precedes(&self, other: &EntityCollision) -> bool {
        self.time() < other.time()
            || (self.time() == other.time() && (self.a, self.b) < (other.a, other.b))
    }
}

pub(super) struct PairSearch<'a> {
    groups: &'a CollisionGroups,
    max_time: f32,
    /// Added to every reported time, so queued collisions share one clock.
    time_offset: f32,
    pub(super) ancestors: Vec<EntityId>,
    data: CollisionData,
    result: Collision,
    pub(super) best: Option<EntityCollision>,
}

impl<'a> PairSearch<'a> {
    pub(super) fn new(
        groups: &'a CollisionGroups,
        max_time: f32,
        time_offset: f32,
        ancestors: Vec<EntityId>,
    ) -> Self {
        PairSearch {
            groups,
            max_time,
            time_offset,
            ancestors,
            data: CollisionData::new(),
            result: Collision::none(),
            best: None,
        }
    }
}

impl<E: Entity> SpatialTree<E> {
    /// Earliest collision within `max_time` over every pair whose types may
    /// collide and whose swept boxes meet. Ties go to the lowest id pair.
    ///
    /// Reads the swept boxes cached by the last
    /// [`SpatialTree::ensure_entities_are_contained`], which must have
    /// covered at least `max_time`.
    pub fn calc_collision(
        &mut self,
        groups: &CollisionGroups,
        max_time: f32,
    ) -> Option<EntityCollision> {
        let mut ancestors = std::mem::take(&mut self.ancestor_scratch);
        ancestors.clear();
        let mut search = PairSearch::new(groups, max_time, 0.0, ancestors);
        if self.nodes[self.root].entity_count > 1 {
            self.visit(self.root, &mut search);
        }
        self.ancestor_scratch = search.ancestors;
        search.best
    }

    /// Pairs inside `node_id`, then each of its entities against everything
    /// stored on the path above it. Siblings never overlap, so no other
    /// pairs can meet.
    fn visit(&self, node_id: NodeId, search: &mut PairSearch<'_>) {
        self.test_node(node_id, search);
        let node = &self.nodes[node_id];
        if let Some(children) = node.children() {
            let mark = search.ancestors.len();
            search.ancestors.extend_from_slice(&node.entities);
            for child in children {
                if self.nodes[child].entity_count > 0 {
                    self.visit(child, search);
                }
            }
            search.ancestors.truncate(mark);
        }
    }

    /// Every pair owned by `node_id`: its own entities against each other and
    /// against `search.ancestors`.
    pub(super) fn test_node(&self, node_id: NodeId, search: &mut PairSearch<'_>) {
        let local = &self.nodes[node_id].entities;
        for (i, &a) in local.iter().enumerate() {
            for &b in &local[i + 1..] {
                self.test_pair(a, b, search);
            }
            for index in 0..search.ancestors.len() {
                let b = search.ancestors[index];
                self.test_pair(a, b, search);
            }
        }
    }

    pub(super) fn test_pair(&self, a: EntityId, b: EntityId, search: &mut PairSearch<'_>) {
        let (a, b) = if a < b { (a, b) } else { (b, a) };
        let first = &self.entities[a].entity;
        let second = &self.entities[b].entity;
        if !search
            .groups
            .can_collide(first.collision_type(), second.collision_type())
        {
            return;
        }
        let shape_a = first.shape();
        let shape_b = second.shape();
        if !shape_a.bounding_box().intersects(&shape_b.bounding_box()) {
            return;
        }
        shape_a.collide_with_shape(shape_b, search.max_time, &mut search.data, &mut search.result);
        if !search.result.is_collision() {
            return;
        }
        let mut collision = search.result;
        collision.time_to_collision += search.time_offset;
        let candidate = EntityCollision { collision, a, b };
        match &search.best {
            Some(best) if !candidate.precedes(best) => {}
            _ => search.best = Some(candidate),
        }
    }

    /// Hands both entities of `collision` to `physics` and refreshes their
    /// shapes. Returns `None` when either entity is gone. Entities the
    /// outcome asks to remove are left for the caller.
    pub fn apply_collision<P: Physics<E>>(
        &mut self,
        collision: &EntityCollision,
        physics: &mut P,
    ) -> Option<Outcome> {
        let [first, second] = self.entities.get_disjoint_mut([collision.a, collision.b])?;
        let outcome = physics.perform_collision(collision, &mut first.entity, &mut second.entity);
        first.entity.sync_shape();
        second.entity.sync_shape();
        Some(outcome)
    }
}
