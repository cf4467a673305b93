use std::ops::{Index, IndexMut};

/// Handle into an [`ObjectPool`]. The generation changes every time the
/// slot is released, so a stale handle never reaches the slot's next tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId {
    index: u32,
    generation: u32,
}

impl PoolId {
    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

pub trait Resettable {
    fn reset(&mut self);
}

#[derive(Debug)]
struct Slot<T> {
    value: T,
    generation: u32,
    occupied: bool,
}

/// Slab of reusable objects. Released objects are reset and parked on a
/// free list instead of being dropped, keeping their allocations.
#[derive(Debug)]
pub struct ObjectPool<T: Resettable> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T: Resettable + Default> ObjectPool<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Pre-builds `capacity` idle objects.
    pub fn with_capacity(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|_| Slot {
                value: T::default(),
                generation: 0,
                occupied: false,
            })
            .collect();
        // popped from the back, so the lowest index goes out first
        let free = (0..capacity as u32).rev().collect();
        ObjectPool {
            slots,
            free,
            live: 0,
        }
    }

    /// Hands out an idle object, building a new one when none is parked.
    pub fn acquire(&mut self) -> PoolId {
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.occupied = true;
                PoolId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    value: T::default(),
                    generation: 0,
                    occupied: true,
                });
                PoolId {
                    index,
                    generation: 0,
                }
            }
        }
    }
}

impl<T: Resettable + Default> Default for ObjectPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Resettable> ObjectPool<T> {
    /// Resets the object and parks it. Returns `false` for a stale handle.
    pub fn release(&mut self, id: PoolId) -> bool {
        match self.slots.get_mut(id.index()) {
            Some(slot) if slot.occupied && slot.generation == id.generation => {
                slot.value.reset();
                slot.occupied = false;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index);
                self.live -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: PoolId) -> Option<&T> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.occupied && slot.generation == id.generation)
            .map(|slot| &slot.value)
    }

    pub fn get_mut(&mut self, id: PoolId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.occupied && slot.generation == id.generation)
            .map(|slot| &mut slot.value)
    }

    pub fn contains(&self, id: PoolId) -> bool {
        self.get(id).is_some()
    }

    /// Objects currently handed out.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Objects ever built, live or parked.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Releases every live object.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.occupied {
                slot.value.reset();
                slot.occupied = false;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.live = 0;
    }
}

impl<T: Resettable> Index<PoolId> for ObjectPool<T> {
    type Output = T;

    fn index(&self, id: PoolId) -> &T {
        match self.get(id) {
            Some(value) => value,
            None => panic!("stale pool id {:?}", id),
        }
    }
}

impl<T: Resettable> IndexMut<PoolId> for ObjectPool<T> {
    fn index_mut(&mut self, id: PoolId) -> &mut T {
        match self.get_mut(id) {
            Some(value) => value,
            None => panic!("stale pool id {:?}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, Debug)]
    struct Scratch {
        items: Vec<u32>,
    }

    impl Resettable for Scratch {
        fn reset(&mut self) {
            self.items.clear();
        }
    }

    #[test]
    fn released_objects_are_reset_and_reused() {
        let mut pool: ObjectPool<Scratch> = ObjectPool::new();
        let first = pool.acquire();
        pool[first].items.extend([1, 2, 3]);
        assert!(pool.release(first));
        let second = pool.acquire();
        assert_eq!(second.index(), first.index());
        assert_ne!(second.generation(), first.generation());
        assert!(pool[second].items.is_empty());
        assert!(pool[second].items.capacity() >= 3);
        assert_eq!(pool.capacity(), 1);
    }

    #[test]
    fn stale_ids_are_rejected() {
        let mut pool: ObjectPool<Scratch> = ObjectPool::new();
        let id = pool.acquire();
        assert!(pool.release(id));
        assert!(!pool.release(id));
        assert!(pool.get(id).is_none());
        let _ = pool.acquire();
        assert!(pool.get(id).is_none());
    }

    #[test]
    fn preallocated_slots_are_handed_out_in_order() {
        let mut pool: ObjectPool<Scratch> = ObjectPool::with_capacity(3);
        assert_eq!(pool.capacity(), 3);
        assert!(pool.is_empty());
        let ids: Vec<_> = (0..3).map(|_| pool.acquire()).collect();
        assert_eq!(
            ids.iter().map(|id| id.index()).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(pool.capacity(), 3);
        let _ = pool.acquire();
        assert_eq!(pool.capacity(), 4);
        pool.clear();
        assert!(pool.is_empty());
        assert!(!pool.contains(ids[0]));
    }
}
