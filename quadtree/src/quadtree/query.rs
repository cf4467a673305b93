use super::*;
use collisions::Shape;
use smallvec::SmallVec;

type NodeStack = SmallVec<[NodeId; 32]>;

impl<E: Entity> SpatialTree<E> {
    /// Regions of every live node, root first.
    pub fn node_bounding_boxes(&self, out: &mut Vec<BoundingBox>) {
        let mut stack = NodeStack::new();
        stack.push(self.root);
        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id];
            out.push(node.bounds);
            if let Some(children) = node.children() {
                stack.extend(children.into_iter().rev());
            }
        }
    }

    /// Levels below the root, zero for a lone leaf.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: SmallVec<[(NodeId, usize); 32]> = SmallVec::new();
        stack.push((self.root, 0));
        while let Some((node_id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let Some(children) = self.nodes[node_id].children() {
                stack.extend(children.into_iter().map(|child| (child, depth + 1)));
            }
        }
        deepest
    }

    /// Entities whose cached swept box meets `region`, edges included.
    pub fn query_region(&self, region: &BoundingBox, out: &mut Vec<EntityId>) {
        self.for_each_near(region, |id, entity| {
            if entity.shape().bounding_box().intersects(region) {
                out.push(id);
            }
        });
    }

    /// Entities whose shape overlaps `query` at their current positions.
    pub fn collisions(&self, query: &Shape, out: &mut Vec<EntityId>) {
        let region = query.current_bounds();
        self.for_each_near(&region, |id, entity| {
            let shape = entity.shape();
            if shape.current_bounds().intersects(&region) && shape.is_overlapping_shape(query) {
                out.push(id);
            }
        });
    }

    fn for_each_near<F>(&self, region: &BoundingBox, mut visit: F)
    where
        F: FnMut(EntityId, &E),
    {
        let mut stack = NodeStack::new();
        stack.push(self.root);
        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id];
            for &id in &node.entities {
                visit(id, &self.entities[id].entity);
            }
            if let Some(children) = node.children() {
                for child in children {
                    let child_node = &self.nodes[child];
                    if child_node.entity_count > 0 && child_node.bounds.intersects(region) {
                        stack.push(child);
                    }
                }
            }
        }
    }
}
