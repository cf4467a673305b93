use crate::quadtree::EntityCollision;

/// What the detector does with the two entities once a collision is
/// resolved. Removed entities are handed back through
/// [`crate::CollisionDetector::drain_removed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Keep,
    RemoveA,
    RemoveB,
    RemoveBoth,
}

impl Outcome {
    pub fn removes_a(self) -> bool {
        matches!(self, Outcome::RemoveA | Outcome::RemoveBoth)
    }

    pub fn removes_b(self) -> bool {
        matches!(self, Outcome::RemoveB | Outcome::RemoveBoth)
    }
}

/// Resolves a reported collision, usually by changing the two velocities.
///
/// `a` and `b` are the entities named by `collision.a` and `collision.b`;
/// the normal points from `a` to `b`. Any closure with the same shape works.
pub trait Physics<E> {
    fn perform_collision(&mut self, collision: &EntityCollision, a: &mut E, b: &mut E) -> Outcome;
}

impl<E, F> Physics<E> for F
where
    F: FnMut(&EntityCollision, &mut E, &mut E) -> Outcome,
{
    fn perform_collision(&mut self, collision: &EntityCollision, a: &mut E, b: &mut E) -> Outcome {
        self(collision, a, b)
    }
}
