//! Entity records and the ordered id-keyed store that holds them.
//!
//! Entities reference each other only by id. The controller owns one
//! [`EntityStore`] per entity type; iteration order is insertion order.

pub mod bond;
pub mod boundary;
pub mod heat_source;
pub mod particle;

pub use bond::{Bond, BondKind, BondSpec};
pub use boundary::{Boundary, BoundaryKind, BoundaryShape, BoundarySpec};
pub use heat_source::{HeatSource, HeatSourceSpec, HeatSourceUpdate};
pub use particle::{HeatTint, Particle, ParticleSpec};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

macro_rules! entity_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(u64);

        impl $name {
            pub fn raw(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

entity_id!(ParticleId, "p_");
entity_id!(BondId, "b_");
entity_id!(BoundaryId, "boundary_");
entity_id!(HeatSourceId, "heat_");

/// Monotonic id source shared by all entity kinds of one controller.
///
/// Never rewinds, so an id handed out before a `reset` can not be confused
/// with an entity created after it.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    fn bump(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn particle(&mut self) -> ParticleId {
        ParticleId(self.bump())
    }

    pub fn bond(&mut self) -> BondId {
        BondId(self.bump())
    }

    pub fn boundary(&mut self) -> BoundaryId {
        BoundaryId(self.bump())
    }

    pub fn heat_source(&mut self) -> HeatSourceId {
        HeatSourceId(self.bump())
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

pub trait Entity {
    type Id: Copy + Eq + Hash + fmt::Debug;

    fn id(&self) -> Self::Id;
}

/// Insertion-ordered arena with O(1) lookup by id.
#[derive(Debug, Clone)]
pub struct EntityStore<T: Entity> {
    items: Vec<T>,
    index: HashMap<T::Id, usize>,
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an entity. An entity with the same id is replaced in place.
    pub fn insert(&mut self, item: T) {
        let id = item.id();
        if let Some(&slot) = self.index.get(&id) {
            self.items[slot] = item;
        } else {
            self.index.insert(id, self.items.len());
            self.items.push(item);
        }
    }

    pub fn contains(&self, id: T::Id) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.index.get(&id).map(|&slot| &self.items[slot])
    }

    pub fn get_mut(&mut self, id: T::Id) -> Option<&mut T> {
        match self.index.get(&id) {
            Some(&slot) => Some(&mut self.items[slot]),
            None => None,
        }
    }

    pub fn position_of(&self, id: T::Id) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Remove by id, keeping the order of the remaining entities.
    pub fn remove(&mut self, id: T::Id) -> Option<T> {
        let slot = self.index.remove(&id)?;
        let item = self.items.remove(slot);
        for moved in &self.items[slot..] {
            if let Some(entry) = self.index.get_mut(&moved.id()) {
                *entry -= 1;
            }
        }
        Some(item)
    }

    /// Keep only entities matching `keep`; returns how many were dropped.
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, mut keep: F) -> usize {
        let before = self.items.len();
        self.items.retain(|item| keep(item));
        let dropped = before - self.items.len();
        if dropped > 0 {
            self.reindex();
        }
        dropped
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Mutable view of the entities. Ids must not be changed through it.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (slot, item) in self.items.iter().enumerate() {
            self.index.insert(item.id(), slot);
        }
    }
}

impl<T: Entity + Clone> EntityStore<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
