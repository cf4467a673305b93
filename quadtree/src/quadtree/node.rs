use super::collision_pairs::EntityCollision;
use crate::entity::EntityId;
use crate::object_pool::{PoolId, Resettable};
use common::BoundingBox;

pub type NodeId = PoolId;

pub(crate) const TOP_LEFT: usize = 0;
pub(crate) const TOP_RIGHT: usize = 1;
pub(crate) const BOTTOM_LEFT: usize = 2;
pub(crate) const BOTTOM_RIGHT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Leaf,
    Quad([NodeId; 4]),
}

/// Square region of the tree.
///
/// `entity_count` covers this node and every descendant. A quad keeps the
/// entities whose bounds straddle one of its center lines.
///
/// While a step is open, `cache` holds the earliest collision among the pairs
/// this node owns: its own entities against each other and against every
/// entity stored above it. `stale` forces a full recount of those pairs.
#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) center_x: f32,
    pub(crate) center_y: f32,
    pub(crate) half_length: f32,
    pub(crate) bounds: BoundingBox,
    pub(crate) entities: Vec<EntityId>,
    pub(crate) entity_count: usize,
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
    pub(crate) cache: Option<EntityCollision>,
    pub(crate) stale: bool,
}

impl Default for Node {
    fn default() -> Self {
        Node {
            center_x: 0.0,
            center_y: 0.0,
            half_length: 0.0,
            bounds: BoundingBox::default(),
            entities: Vec::new(),
            entity_count: 0,
            parent: None,
            kind: NodeKind::Leaf,
            cache: None,
            stale: true,
        }
    }
}

impl Resettable for Node {
    fn reset(&mut self) {
        self.entities.clear();
        self.entity_count = 0;
        self.parent = None;
        self.kind = NodeKind::Leaf;
        self.cache = None;
        self.stale = true;
    }
}

impl Node {
    pub(crate) fn initialize(
        &mut self,
        center_x: f32,
        center_y: f32,
        half_length: f32,
        parent: Option<NodeId>,
    ) {
        self.center_x = center_x;
        self.center_y = center_y;
        self.half_length = half_length;
        self.bounds = BoundingBox::square(center_x, center_y, half_length);
        self.entities.clear();
        self.entity_count = 0;
        self.parent = parent;
        self.kind = NodeKind::Leaf;
        self.cache = None;
        self.stale = true;
    }

    #[inline(always)]
    pub(crate) fn children(&self) -> Option<[NodeId; 4]> {
        match self.kind {
            NodeKind::Leaf => None,
            NodeKind::Quad(children) => Some(children),
        }
    }

    #[inline(always)]
    pub(crate) fn is_leaf(&self) -> bool {
        self.kind == NodeKind::Leaf
    }

    /// Center of child `quadrant`, which shares half this node's half-length.
    pub(crate) fn child_center(&self, quadrant: usize) -> (f32, f32) {
        let offset = self.half_length * 0.5;
        let x = if quadrant == TOP_LEFT || quadrant == BOTTOM_LEFT {
            self.center_x - offset
        } else {
            self.center_x + offset
        };
        let y = if quadrant == TOP_LEFT || quadrant == TOP_RIGHT {
            self.center_y - offset
        } else {
            self.center_y + offset
        };
        (x, y)
    }

    /// The single child whose side of both center lines holds `bounds`
    /// strictly, or `None` when the bounds straddle a center line.
    #[inline(always)]
    pub(crate) fn quadrant_for(&self, bounds: &BoundingBox) -> Option<usize> {
        let right = if bounds.max_x < self.center_x {
            false
        } else if bounds.min_x > self.center_x {
            true
        } else {
            return None;
        };
        let bottom = if bounds.max_y < self.center_y {
            false
        } else if bounds.min_y > self.center_y {
            true
        } else {
            return None;
        };
        Some(match (bottom, right) {
            (false, false) => TOP_LEFT,
            (false, true) => TOP_RIGHT,
            (true, false) => BOTTOM_LEFT,
            (true, true) => BOTTOM_RIGHT,
        })
    }

    #[inline(always)]
    pub(crate) fn contains(&self, bounds: &BoundingBox) -> bool {
        self.bounds.contains_strictly(bounds)
    }
}
