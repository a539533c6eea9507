//! Entity arena owned by the pattern engine
//!
//! Slots are reused through a free list. Each reuse bumps the slot's
//! generation so a handle to a swept entity never resolves again.

use crate::core::types::EntityHandle;
use crate::entities::entity::SpawnedEntity;

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    entity: Option<SpawnedEntity>,
}

/// Generational storage for spawned entities
#[derive(Debug, Clone, Default)]
pub struct EntityArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl EntityArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: SpawnedEntity) -> EntityHandle {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entity = Some(entity);
            return EntityHandle {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entity: Some(entity),
        });
        EntityHandle { index, generation: 0 }
    }

    pub fn get(&self, handle: EntityHandle) -> Option<&SpawnedEntity> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entity.as_ref())
    }

    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut SpawnedEntity> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.entity.as_mut())
    }

    /// Is the handle still pointing at an active entity?
    pub fn is_live(&self, handle: EntityHandle) -> bool {
        self.get(handle).is_some_and(|e| e.active)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityHandle, &SpawnedEntity)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.entity.as_ref().map(|e| {
                (
                    EntityHandle {
                        index: i as u32,
                        generation: slot.generation,
                    },
                    e,
                )
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityHandle, &mut SpawnedEntity)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, slot)| {
            let generation = slot.generation;
            slot.entity.as_mut().map(|e| {
                (
                    EntityHandle {
                        index: i as u32,
                        generation,
                    },
                    e,
                )
            })
        })
    }

    /// Number of stored entities (active or awaiting sweep)
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.entity.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn active_count(&self) -> usize {
        self.iter().filter(|(_, e)| e.active).count()
    }

    /// Remove inactive entities, freeing their slots for reuse
    ///
    /// Returns how many entities were removed.
    pub fn sweep(&mut self) -> usize {
        let mut removed = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.entity.as_ref().is_some_and(|e| !e.active) {
                slot.entity = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
                removed += 1;
            }
        }
        removed
    }
}
