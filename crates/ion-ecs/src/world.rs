use std::any::{Any, TypeId};
use std::collections::HashMap;

use tracing::trace;

use crate::entity::EntityId;
use crate::error::{EcsError, EcsResult};

/// Marker trait for anything that can be stored as a component. Blanket
/// implemented for any `'static` type — there is no per-component trait
/// surface to implement, matching the "components are plain data" design
/// note.
pub trait Component: Any {}
impl<T: Any> Component for T {}

/// Maximum distinct component types a single `World` can register. Chosen
/// so the presence mask fits in a `u32`.
pub const MAX_COMPONENT_KINDS: u32 = 32;

struct Slot {
    generation: u16,
    alive: bool,
    mask: u32,
}

/// The entity/component substrate: a fixed-capacity pool of generational
/// entity slots plus one type-erased, densely-indexed store per component
/// type. Entity destruction is deferred — `destroy` hides the entity from
/// iteration immediately but the slot and its component storage are only
/// reclaimed on the next [`World::cleanup_destroyed`] call, which the
/// scheduler runs once per tick after every system has had a chance to see
/// the tick in which the entity died.
pub struct World {
    capacity: usize,
    slots: Vec<Slot>,
    free_list: Vec<u16>,
    pending_destroy: Vec<u16>,
    stores: HashMap<TypeId, Box<dyn Any>>,
    bit_of: HashMap<TypeId, u32>,
    next_bit: u32,
}

impl World {
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity + 1);
        // Slot 0 is the permanently-invalid sentinel reserved by
        // `EntityId::INVALID`; it is allocated eagerly so `capacity` always
        // means "this many real entities", independent of this
        // implementation detail.
        slots.push(Slot {
            generation: 0,
            alive: false,
            mask: 0,
        });
        Self {
            capacity,
            slots,
            free_list: Vec::new(),
            pending_destroy: Vec::new(),
            stores: HashMap::new(),
            bit_of: HashMap::new(),
            next_bit: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entity_count(&self) -> usize {
        self.slots.iter().filter(|s| s.alive).count()
    }

    /// Creates a new entity, returning `EcsError::CapacityExceeded` once the
    /// pool's fixed capacity is reached and no destroyed slots remain to
    /// recycle.
    pub fn create_entity(&mut self) -> EcsResult<EntityId> {
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.alive = true;
            slot.mask = 0;
            return Ok(EntityId::new(index, slot.generation));
        }
        // `slots.len() - 1` excludes the reserved sentinel at index 0, so
        // `capacity` real entities can always be allocated.
        if self.slots.len() - 1 >= self.capacity {
            return Err(EcsError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        let index = self.slots.len() as u16;
        self.slots.push(Slot {
            generation: 1,
            alive: true,
            mask: 0,
        });
        Ok(EntityId::new(index, 1))
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.slots
            .get(id.index() as usize)
            .map(|s| s.alive && s.generation == id.generation())
            .unwrap_or(false)
    }

    /// Hides `id` from iteration immediately. The slot is not recycled and
    /// its components are not dropped until [`World::cleanup_destroyed`]
    /// runs.
    pub fn destroy_entity(&mut self, id: EntityId) -> EcsResult<()> {
        if !self.is_alive(id) {
            return Err(EcsError::EntityNotAlive(id));
        }
        let idx = id.index();
        self.slots[idx as usize].alive = false;
        self.pending_destroy.push(idx);
        Ok(())
    }

    /// Reclaims every slot destroyed since the last call: bumps its
    /// generation, clears its presence mask, and returns the slot to the
    /// free list. Called once per tick by the scheduler after all systems
    /// have run. Stale component values left behind in the type-erased
    /// stores are never observable afterwards — every accessor gates on the
    /// presence mask, and a recycled slot starts with an empty one — so they
    /// are overwritten lazily by `add_component` rather than eagerly dropped
    /// here.
    pub fn cleanup_destroyed(&mut self) {
        for idx in self.pending_destroy.drain(..) {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.mask = 0;
            self.free_list.push(idx);
        }
    }

    fn bit_for<T: Component>(&mut self) -> EcsResult<u32> {
        let type_id = TypeId::of::<T>();
        if let Some(bit) = self.bit_of.get(&type_id) {
            return Ok(*bit);
        }
        if self.next_bit >= MAX_COMPONENT_KINDS {
            return Err(EcsError::ComponentRegistryFull {
                max: MAX_COMPONENT_KINDS,
            });
        }
        let bit = 1u32 << self.next_bit;
        self.bit_of.insert(type_id, bit);
        self.next_bit += 1;
        Ok(bit)
    }

    /// Returns the presence-mask bit assigned to `T`, registering it on
    /// first use. Used by callers that build a combined mask for
    /// [`World::for_each`].
    pub fn component_bit<T: Component>(&mut self) -> EcsResult<u32> {
        self.bit_for::<T>()
    }

    fn store_mut<T: Component>(&mut self) -> &mut Vec<Option<T>> {
        let type_id = TypeId::of::<T>();
        self.stores
            .entry(type_id)
            .or_insert_with(|| Box::new(Vec::<Option<T>>::new()))
            .downcast_mut::<Vec<Option<T>>>()
            .expect("store type mismatch for registered TypeId")
    }

    pub fn add_component<T: Component>(&mut self, id: EntityId, value: T) -> EcsResult<()> {
        if !self.is_alive(id) {
            return Err(EcsError::EntityNotAlive(id));
        }
        let bit = self.bit_for::<T>()?;
        let idx = id.index() as usize;
        {
            let store = self.store_mut::<T>();
            if store.len() <= idx {
                store.resize_with(idx + 1, || None);
            }
            store[idx] = Some(value);
        }
        self.slots[idx].mask |= bit;
        Ok(())
    }

    pub fn remove_component<T: Component>(&mut self, id: EntityId) -> Option<T> {
        if !self.is_alive(id) {
            return None;
        }
        let idx = id.index() as usize;
        let type_id = TypeId::of::<T>();
        if let Some(bit) = self.bit_of.get(&type_id).copied() {
            self.slots[idx].mask &= !bit;
        }
        let store = self.store_mut::<T>();
        store.get_mut(idx).and_then(|slot| slot.take())
    }

    fn has_bit_set<T: Component>(&self, id: EntityId) -> bool {
        let type_id = TypeId::of::<T>();
        match self.bit_of.get(&type_id) {
            Some(bit) => self.slots[id.index() as usize].mask & bit != 0,
            None => false,
        }
    }

    pub fn get_component<T: Component>(&self, id: EntityId) -> Option<&T> {
        if !self.is_alive(id) || !self.has_bit_set::<T>(id) {
            return None;
        }
        let type_id = TypeId::of::<T>();
        let store = self.stores.get(&type_id)?;
        let store = store.downcast_ref::<Vec<Option<T>>>()?;
        store.get(id.index() as usize)?.as_ref()
    }

    pub fn get_component_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        if !self.is_alive(id) || !self.has_bit_set::<T>(id) {
            return None;
        }
        let type_id = TypeId::of::<T>();
        let store = self.stores.get_mut(&type_id)?;
        let store = store.downcast_mut::<Vec<Option<T>>>()?;
        store.get_mut(id.index() as usize)?.as_mut()
    }

    pub fn has_component<T: Component>(&self, id: EntityId) -> bool {
        self.get_component::<T>(id).is_some()
    }

    /// Calls `f` for every live entity whose presence mask contains every
    /// bit set in `required_mask`. New entities created or destroyed by `f`
    /// are not visited in the same pass — destruction is deferred anyway,
    /// and creation only takes effect on the next call.
    pub fn for_each(&self, required_mask: u32, mut f: impl FnMut(EntityId)) {
        for (index, slot) in self.slots.iter().enumerate() {
            if slot.alive && (slot.mask & required_mask) == required_mask {
                f(EntityId::new(index as u16, slot.generation));
            }
        }
    }

    /// Collects the ids matching `required_mask` into a `Vec` so the caller
    /// can mutate components for each of them without holding a borrow of
    /// `World` across the iteration (needed once a system needs `&mut
    /// World` per-entity, e.g. to read one component and write another).
    pub fn query(&self, required_mask: u32) -> Vec<EntityId> {
        let mut out = Vec::new();
        self.for_each(required_mask, |id| out.push(id));
        trace!(count = out.len(), mask = required_mask, "world query");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Pos(f32);
    #[derive(Debug, PartialEq)]
    struct Vel(f32);

    #[test]
    fn create_destroy_recycles_slot_with_new_generation() {
        let mut world = World::new(8);
        let e1 = world.create_entity().unwrap();
        world.destroy_entity(e1).unwrap();
        assert!(!world.is_alive(e1));
        world.cleanup_destroyed();
        let e2 = world.create_entity().unwrap();
        assert_eq!(e2.index(), e1.index());
        assert_ne!(e2.generation(), e1.generation());
    }

    #[test]
    fn capacity_is_enforced() {
        let mut world = World::new(2);
        world.create_entity().unwrap();
        world.create_entity().unwrap();
        assert!(matches!(
            world.create_entity(),
            Err(EcsError::CapacityExceeded { capacity: 2 })
        ));
    }

    #[test]
    fn destroyed_entity_is_invisible_before_and_after_cleanup() {
        let mut world = World::new(4);
        let e = world.create_entity().unwrap();
        world.add_component(e, Pos(1.0)).unwrap();
        world.destroy_entity(e).unwrap();
        assert!(world.get_component::<Pos>(e).is_none());
        world.cleanup_destroyed();
        assert!(world.get_component::<Pos>(e).is_none());
    }

    #[test]
    fn for_each_respects_required_mask() {
        let mut world = World::new(4);
        let a = world.create_entity().unwrap();
        let b = world.create_entity().unwrap();
        let pos_bit = world.component_bit::<Pos>().unwrap();
        let vel_bit = world.component_bit::<Vel>().unwrap();
        world.add_component(a, Pos(0.0)).unwrap();
        world.add_component(a, Vel(1.0)).unwrap();
        world.add_component(b, Pos(0.0)).unwrap();

        let both: Vec<_> = {
            let mut out = Vec::new();
            world.for_each(pos_bit | vel_bit, |id| out.push(id));
            out
        };
        assert_eq!(both, vec![a]);

        let pos_only = world.query(pos_bit);
        assert_eq!(pos_only, vec![a, b]);
    }

    #[test]
    fn get_component_mut_allows_in_place_updates() {
        let mut world = World::new(4);
        let e = world.create_entity().unwrap();
        world.add_component(e, Pos(1.0)).unwrap();
        world.get_component_mut::<Pos>(e).unwrap().0 = 42.0;
        assert_eq!(world.get_component::<Pos>(e), Some(&Pos(42.0)));
    }

    #[test]
    fn remove_component_clears_mask_bit() {
        let mut world = World::new(4);
        let e = world.create_entity().unwrap();
        let bit = world.component_bit::<Pos>().unwrap();
        world.add_component(e, Pos(1.0)).unwrap();
        assert!(world.remove_component::<Pos>(e).is_some());
        assert!(!world.has_component::<Pos>(e));
        let matches = world.query(bit);
        assert!(matches.is_empty());
    }
}
