//! Slot arena with stable, generation-checked ids
//!
//! One arena holds every live entity of a kind. Removal is two-phase: an
//! entity is destroyed in place (liveness flag) and its slot is only returned
//! to the free list by `sweep`, so populations can be iterated while other
//! systems mark members dead.

use super::body::Entity;

/// Stable handle into an [`Arena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Arena of entities of a single kind
#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    /// Free slot indices, reused LIFO
    free_list: Vec<usize>,
    count: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            count: 0,
        }
    }
}

impl<T: Entity> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: T) -> EntityId {
        self.count += 1;
        if let Some(i) = self.free_list.pop() {
            let slot = &mut self.slots[i];
            slot.value = Some(value);
            EntityId {
                index: i as u32,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                value: Some(value),
            });
            EntityId {
                index: (self.slots.len() - 1) as u32,
                generation: 0,
            }
        }
    }

    pub fn extend<I: IntoIterator<Item = T>>(&mut self, values: I) {
        for v in values {
            self.insert(v);
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.slots
            .get(id.index())
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.value.as_ref())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index())
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.value.as_mut())
    }

    /// Id refers to a present entity whose liveness flag is still set
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|e| e.is_alive())
    }

    /// Occupied slots in index order (includes entities marked dead this tick)
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.value.as_ref().map(|v| {
                (
                    EntityId {
                        index: i as u32,
                        generation: s.generation,
                    },
                    v,
                )
            })
        })
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|s| s.value.as_ref())
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter_map(|s| s.value.as_mut())
    }

    /// Live entities only
    pub fn alive(&self) -> impl Iterator<Item = &T> {
        self.values().filter(|e| e.is_alive())
    }

    /// Free every slot whose entity has been destroyed; returns how many
    pub fn sweep(&mut self) -> usize {
        let mut freed = 0;
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.as_ref().is_some_and(|v| !v.is_alive()) {
                slot.value = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free_list.push(i);
                freed += 1;
            }
        }
        self.count -= freed;
        freed
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Body;
    use glam::Vec2;

    struct Dummy(Body);

    impl Entity for Dummy {
        fn body(&self) -> &Body {
            &self.0
        }
        fn body_mut(&mut self) -> &mut Body {
            &mut self.0
        }
    }

    fn dummy() -> Dummy {
        Dummy(Body::new(Vec2::ZERO, Vec2::ONE))
    }

    #[test]
    fn test_destroy_is_deferred_until_sweep() {
        let mut arena = Arena::new();
        let a = arena.insert(dummy());
        let b = arena.insert(dummy());
        arena.get_mut(a).unwrap().destroy();

        assert_eq!(arena.len(), 2);
        assert!(arena.get(a).is_some());
        assert!(!arena.is_alive(a));
        assert!(arena.is_alive(b));

        assert_eq!(arena.sweep(), 1);
        assert_eq!(arena.len(), 1);
        assert!(arena.get(a).is_none());
    }

    #[test]
    fn test_stale_id_does_not_alias_reused_slot() {
        let mut arena = Arena::new();
        let a = arena.insert(dummy());
        arena.get_mut(a).unwrap().destroy();
        arena.sweep();

        let c = arena.insert(dummy());
        assert_eq!(a.index(), c.index());
        assert!(arena.get(a).is_none());
        assert!(arena.is_alive(c));
    }

    #[test]
    fn test_iteration_is_in_slot_order() {
        let mut arena = Arena::new();
        let ids: Vec<_> = (0..4).map(|_| arena.insert(dummy())).collect();
        let seen: Vec<_> = arena.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, seen);
    }
}
