//! Generational table of live native handles.
//!
//! Slots are reused after removal, but every reuse bumps the
//! slot's generation, so a [`Handle`] that outlived its
//! native handle never resolves again.

use std::fmt;

use serde_derive::*;

/// Caller-facing identifier of a native handle owned by a
/// [`Bridge`][crate::bridge::Bridge].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

#[derive(Debug)]
struct Slot<H> {
    generation: u32,
    raw: Option<H>,
}

#[derive(Debug)]
pub(crate) struct HandleTable<H> {
    slots: Vec<Slot<H>>,
    free: Vec<u32>,
    live: usize,
}

impl<H: Copy> HandleTable<H> {
    pub fn new() -> Self {
        HandleTable {
            slots: vec![],
            free: vec![],
            live: 0,
        }
    }

    pub fn insert(&mut self, raw: H) -> Handle {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.raw = Some(raw);
            return Handle {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            raw: Some(raw),
        });
        Handle {
            index,
            generation: 0,
        }
    }

    pub fn get(&self, handle: Handle) -> Option<H> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.raw)
    }

    pub fn remove(&mut self, handle: Handle) -> Option<H> {
        let slot = self
            .slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation)?;
        let raw = slot.raw.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.live -= 1;
        Some(raw)
    }

    pub fn len(&self) -> usize {
        self.live
    }
}
