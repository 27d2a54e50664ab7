use crate::{ArenaError, Record, Records};

/// Write protocol state of an arena slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SlotState {
    /// Nothing was written for this slot yet.
    #[default]
    Unwritten,
    /// The slot was filled by an `assign_*` call.
    Assigned,
    /// The slot was opened by `append_begin` and is the slot currently appended to.
    Appending,
    /// The slot was opened by `append_begin` but another slot was written since.
    Closed,
}

/// An append-only arena storing a sequence of integer sets per slot.
///
/// See the [crate level documentation][crate] for the memory layout.
#[derive(Clone, Debug)]
pub struct PagedArena {
    extra: usize,
    data: Vec<u32>,
    offset: Vec<usize>,
    count: Vec<u32>,
    state: Vec<SlotState>,
    /// Slots in the order they were first written, their offsets are non-decreasing.
    write_order: Vec<u32>,
    open: Option<usize>,
}

impl PagedArena {
    /// Creates an arena with `slots` slots and `extra` payload words per record.
    pub fn new(slots: usize, extra: usize) -> Self {
        Self {
            extra,
            data: Vec::with_capacity(slots << 1),
            offset: vec![0; slots],
            count: vec![0; slots],
            state: vec![SlotState::Unwritten; slots],
            write_order: Vec::with_capacity(slots),
            open: None,
        }
    }

    /// Returns the number of slots fixed at construction.
    #[inline(always)]
    pub fn slot_count(&self) -> usize {
        self.offset.len()
    }

    /// Returns the number of extra payload words stored with every record.
    #[inline(always)]
    pub fn extra_count(&self) -> usize {
        self.extra
    }

    /// Returns the number of words written so far, which is also the address of the next record.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if no record was written yet.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of records stored for a slot.
    #[inline(always)]
    pub fn count(&self, slot: usize) -> usize {
        self.count[slot] as usize
    }

    /// Returns the number of records stored over all slots.
    pub fn total_count(&self) -> usize {
        self.count.iter().map(|&count| count as usize).sum()
    }

    /// Returns the write protocol state of a slot.
    #[inline(always)]
    pub fn state(&self, slot: usize) -> SlotState {
        self.state[slot]
    }

    /// Returns an iterator over the records of a slot.
    #[inline]
    pub fn sets(&self, slot: usize) -> Records<'_> {
        Records::new(&self.data, self.extra, self.offset[slot], self.count(slot))
    }

    /// Returns the record starting at the given address.
    ///
    /// Panics if the address is out of bounds. Passing an address that is in bounds but not the
    /// start of a record yields an unspecified record or panics.
    #[inline]
    pub fn record_at(&self, address: usize) -> Record<'_> {
        Record::at(&self.data, address, self.extra)
    }

    /// Returns the first record of a slot, or `None` if the slot has no records.
    pub fn first_record(&self, slot: usize) -> Option<Record<'_>> {
        (self.count[slot] > 0).then(|| self.record_at(self.offset[slot]))
    }

    /// Returns the slot owning the word at the given address.
    ///
    /// Returns `None` if the address is not below [`len`][Self::len].
    pub fn index(&self, address: usize) -> Option<usize> {
        if address >= self.data.len() {
            return None;
        }
        let pos = self
            .write_order
            .partition_point(|&slot| self.offset[slot as usize] <= address);
        Some(self.write_order[pos - 1] as usize)
    }

    /// Returns the approximate number of bytes used by the arena.
    pub fn memory(&self) -> usize {
        use std::mem::size_of;
        size_of::<Self>()
            + size_of::<u32>() * (self.data.len() + self.count.len() + self.write_order.len())
            + size_of::<usize>() * self.offset.len()
            + size_of::<SlotState>() * self.state.len()
    }

    fn check_slot(&self, slot: usize) -> Result<(), ArenaError> {
        if slot < self.slot_count() {
            Ok(())
        } else {
            Err(ArenaError::SlotOutOfRange {
                slot,
                slots: self.slot_count(),
            })
        }
    }

    fn check_extra(&self, extra: &[u32]) -> Result<(), ArenaError> {
        if extra.len() == self.extra {
            Ok(())
        } else {
            Err(ArenaError::ExtraLength {
                expected: self.extra,
                found: extra.len(),
            })
        }
    }

    /// Marks an unwritten slot as starting at the current end of the arena.
    fn open_slot(&mut self, slot: usize, new_state: SlotState) -> Result<(), ArenaError> {
        self.check_slot(slot)?;
        let state = self.state[slot];
        if state != SlotState::Unwritten {
            return Err(ArenaError::AlreadyWritten { slot, state });
        }
        if let Some(open) = self.open.take() {
            self.state[open] = SlotState::Closed;
        }
        self.state[slot] = new_state;
        self.offset[slot] = self.data.len();
        self.write_order.push(slot as u32);
        if new_state == SlotState::Appending {
            self.open = Some(slot);
        }
        Ok(())
    }

    fn check_appending(&self, slot: usize) -> Result<(), ArenaError> {
        self.check_slot(slot)?;
        match self.state[slot] {
            SlotState::Appending => Ok(()),
            SlotState::Closed => Err(ArenaError::SlotClosed { slot }),
            state => Err(ArenaError::NotAppending { slot, state }),
        }
    }

    fn push_record(&mut self, slot: usize, values: &[u32], extra: &[u32]) {
        self.data.push(values.len() as u32);
        self.data.extend_from_slice(extra);
        self.data.extend_from_slice(values);
        self.count[slot] += 1;
    }

    /// Fills an unwritten slot with a single empty set.
    pub fn try_assign_empty(&mut self, slot: usize, extra: &[u32]) -> Result<(), ArenaError> {
        self.check_extra(extra)?;
        self.open_slot(slot, SlotState::Assigned)?;
        self.push_record(slot, &[], extra);
        Ok(())
    }

    /// Fills an unwritten slot with a single singleton set.
    pub fn try_assign_singleton(
        &mut self,
        slot: usize,
        value: u32,
        extra: &[u32],
    ) -> Result<(), ArenaError> {
        self.check_extra(extra)?;
        self.open_slot(slot, SlotState::Assigned)?;
        self.push_record(slot, &[value], extra);
        Ok(())
    }

    /// Opens an unwritten slot for appending records at the current end of the arena.
    ///
    /// This closes the slot previously opened for appending.
    pub fn try_append_begin(&mut self, slot: usize) -> Result<(), ArenaError> {
        self.open_slot(slot, SlotState::Appending)
    }

    /// Appends a singleton set to the slot currently open for appending.
    pub fn try_append_singleton(
        &mut self,
        slot: usize,
        value: u32,
        extra: &[u32],
    ) -> Result<(), ArenaError> {
        self.try_append_set(slot, &[value], extra)
    }

    /// Appends a set to the slot currently open for appending.
    pub fn try_append_set(
        &mut self,
        slot: usize,
        values: &[u32],
        extra: &[u32],
    ) -> Result<(), ArenaError> {
        self.check_appending(slot)?;
        self.check_extra(extra)?;
        self.push_record(slot, values, extra);
        Ok(())
    }

    /// Fills an unwritten slot with a single empty set.
    ///
    /// Panics on protocol violations, see [`try_assign_empty`][Self::try_assign_empty].
    pub fn assign_empty(&mut self, slot: usize, extra: &[u32]) {
        self.try_assign_empty(slot, extra)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Fills an unwritten slot with a single singleton set.
    ///
    /// Panics on protocol violations, see [`try_assign_singleton`][Self::try_assign_singleton].
    pub fn assign_singleton(&mut self, slot: usize, value: u32, extra: &[u32]) {
        self.try_assign_singleton(slot, value, extra)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Opens an unwritten slot for appending.
    ///
    /// Panics on protocol violations, see [`try_append_begin`][Self::try_append_begin].
    pub fn append_begin(&mut self, slot: usize) {
        self.try_append_begin(slot)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Appends a singleton set to the slot currently open for appending.
    ///
    /// Panics on protocol violations, see [`try_append_singleton`][Self::try_append_singleton].
    pub fn append_singleton(&mut self, slot: usize, value: u32, extra: &[u32]) {
        self.try_append_singleton(slot, value, extra)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Appends a set to the slot currently open for appending.
    ///
    /// Panics on protocol violations, see [`try_append_set`][Self::try_append_set].
    pub fn append_set(&mut self, slot: usize, values: &[u32], extra: &[u32]) {
        self.try_append_set(slot, values, extra)
            .unwrap_or_else(|err| panic!("{err}"))
    }
}

#[cfg(test)]
#[path = "test_arena.rs"]
mod test_arena;
