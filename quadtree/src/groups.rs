/// Number of distinct collision types a [`CollisionGroups`] table can hold.
pub const MAX_COLLISION_TYPES: usize = 64;

/// Symmetric adjacency table over collision types.
///
/// Type `b` is tested against type `a` only when bit `b` of `masks[a]` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionGroups {
    masks: [u64; MAX_COLLISION_TYPES],
}

impl Default for CollisionGroups {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionGroups {
    /// No type collides with any other.
    pub fn new() -> Self {
        Self {
            masks: [0; MAX_COLLISION_TYPES],
        }
    }

    /// Every type collides with every type, itself included.
    pub fn all() -> Self {
        Self {
            masks: [u64::MAX; MAX_COLLISION_TYPES],
        }
    }

    pub fn set_collision_group(&mut self, a: u8, b: u8) {
        if !in_range(a) || !in_range(b) {
            return;
        }
        self.masks[a as usize] |= 1u64 << b;
        self.masks[b as usize] |= 1u64 << a;
    }

    pub fn set_collision_groups(&mut self, a: u8, others: &[u8]) {
        for &b in others {
            self.set_collision_group(a, b);
        }
    }

    pub fn remove_collision_group(&mut self, a: u8, b: u8) {
        if !in_range(a) || !in_range(b) {
            return;
        }
        self.masks[a as usize] &= !(1u64 << b);
        self.masks[b as usize] &= !(1u64 << a);
    }

    #[inline(always)]
    pub fn can_collide(&self, a: u8, b: u8) -> bool {
        in_range(a) && in_range(b) && self.masks[a as usize] & (1u64 << b) != 0
    }

    pub fn mask(&self, collision_type: u8) -> u64 {
        if in_range(collision_type) {
            self.masks[collision_type as usize]
        } else {
            0
        }
    }

    pub fn clear(&mut self) {
        self.masks = [0; MAX_COLLISION_TYPES];
    }
}

#[inline(always)]
fn in_range(collision_type: u8) -> bool {
    (collision_type as usize) < MAX_COLLISION_TYPES
}
