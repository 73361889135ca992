//! Generational slot storage for live agents
//!
//! Agents are never removed mid-frame. Callers mark an agent for removal and
//! the arena drops every marked slot in one [`AgentArena::sweep`] at the end
//! of the frame, so iteration order and snapshots stay stable for the whole
//! tick.

use crate::id::AgentId;

struct Slot<T> {
    generation: u32,
    value: Option<T>,
    marked: bool,
}

/// Stores values keyed by [`AgentId`] with slot reuse and stale-id detection
pub struct AgentArena<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
    len: usize,
}

impl<T> AgentArena<T> {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::with_capacity(16)
    }

    /// Create with specific initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Insert a value and get its id
    pub fn insert(&mut self, value: T) -> AgentId {
        self.insert_with(|_| value)
    }

    /// Insert a value built from its own id
    pub fn insert_with(&mut self, make: impl FnOnce(AgentId) -> T) -> AgentId {
        self.len += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            let id = AgentId::new(index, slot.generation);
            slot.value = Some(make(id));
            slot.marked = false;
            return id;
        }

        let index = self.slots.len() as u32;
        let id = AgentId::new(index, 0);
        self.slots.push(Slot {
            generation: 0,
            value: Some(make(id)),
            marked: false,
        });
        id
    }

    fn slot(&self, id: AgentId) -> Option<&Slot<T>> {
        if id.is_null() {
            return None;
        }
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation() && slot.value.is_some())
    }

    fn slot_mut(&mut self, id: AgentId) -> Option<&mut Slot<T>> {
        if id.is_null() {
            return None;
        }
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation() && slot.value.is_some())
    }

    /// Check if an id still refers to a stored value
    pub fn contains(&self, id: AgentId) -> bool {
        self.slot(id).is_some()
    }

    /// Get a reference to a value
    pub fn get(&self, id: AgentId) -> Option<&T> {
        self.slot(id).and_then(|slot| slot.value.as_ref())
    }

    /// Get a mutable reference to a value
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut T> {
        self.slot_mut(id).and_then(|slot| slot.value.as_mut())
    }

    /// Remove a value immediately, bumping the slot generation
    pub fn remove(&mut self, id: AgentId) -> Option<T> {
        let slot = self.slot_mut(id)?;
        let value = slot.value.take();
        slot.generation = slot.generation.wrapping_add(1);
        slot.marked = false;
        self.free_list.push(id.index());
        self.len -= 1;
        value
    }

    /// Flag a value for removal at the next sweep. Returns false for stale ids.
    pub fn mark_for_removal(&mut self, id: AgentId) -> bool {
        match self.slot_mut(id) {
            Some(slot) => {
                slot.marked = true;
                true
            }
            None => false,
        }
    }

    /// Remove every marked value, returning them in index order
    pub fn sweep(&mut self) -> Vec<(AgentId, T)> {
        let marked: Vec<AgentId> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.marked && slot.value.is_some())
            .map(|(index, slot)| AgentId::new(index as u32, slot.generation))
            .collect();

        marked
            .into_iter()
            .filter_map(|id| self.remove(id).map(|value| (id, value)))
            .collect()
    }

    /// Ids of all stored values in index order
    pub fn ids(&self) -> Vec<AgentId> {
        self.iter().map(|(id, _)| id).collect()
    }

    /// Iterate over stored values in index order
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value
                .as_ref()
                .map(|value| (AgentId::new(index as u32, slot.generation), value))
        })
    }

    /// Iterate mutably over stored values in index order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (AgentId, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.value
                .as_mut()
                .map(|value| (AgentId::new(index as u32, generation), value))
        })
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Default for AgentArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
