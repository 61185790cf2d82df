//! Slot arena with stable handles.
//!
//! Nodes of the ordering structures live here instead of in individual heap
//! allocations. Vacant slots form a singly linked free list threaded through
//! the slots themselves, so a cache running at capacity allocates nothing
//! after warm-up.
//!
//! ```text
//!   slots:  [Occupied(a)] [Vacant(next: -)] [Occupied(c)] [Vacant(next: 1)]
//!               id_0            id_1            id_2            id_3
//!   free_head: 3              ← next insert reuses id_3, then id_1
//! ```

/// Stable handle to a slot in a [`SlotArena`].
///
/// A handle stays valid until its slot is removed. After that the index may
/// be handed out again by a later insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

#[derive(Debug)]
enum Slot<T> {
    Occupied(T),
    Vacant { next_free: Option<usize> },
}

/// Vector-backed arena reusing vacated slots in LIFO order.
#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    /// Stores `value` in the most recently vacated slot, or a new one.
    pub fn insert(&mut self, value: T) -> SlotId {
        self.len += 1;
        match self.free_head {
            Some(idx) => {
                let old = std::mem::replace(&mut self.slots[idx], Slot::Occupied(value));
                self.free_head = match old {
                    Slot::Vacant { next_free } => next_free,
                    Slot::Occupied(_) => None,
                };
                SlotId(idx)
            },
            None => {
                self.slots.push(Slot::Occupied(value));
                SlotId(self.slots.len() - 1)
            },
        }
    }

    /// Vacates the slot and returns its value; `None` if already vacant.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slots.get_mut(id.0)?;
        if matches!(slot, Slot::Vacant { .. }) {
            return None;
        }
        let old = std::mem::replace(
            slot,
            Slot::Vacant {
                next_free: self.free_head,
            },
        );
        self.free_head = Some(id.0);
        self.len -= 1;
        match old {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        match self.slots.get(id.0)? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        match self.slots.get_mut(id.0)? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
