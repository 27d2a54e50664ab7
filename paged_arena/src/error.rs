use crate::SlotState;

/// A violation of the arena's slot protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The slot index is not smaller than the slot count fixed at construction.
    SlotOutOfRange {
        /// The requested slot.
        slot: usize,
        /// The number of slots of the arena.
        slots: usize,
    },
    /// An `assign_*` or `append_begin` call for a slot that already holds data.
    AlreadyWritten {
        /// The requested slot.
        slot: usize,
        /// The state the slot was found in.
        state: SlotState,
    },
    /// An `append_*` call for a slot that was not opened with `append_begin`.
    NotAppending {
        /// The requested slot.
        slot: usize,
        /// The state the slot was found in.
        state: SlotState,
    },
    /// An `append_*` call for a slot that was closed because another slot was written since.
    SlotClosed {
        /// The requested slot.
        slot: usize,
    },
    /// The number of extra payload words does not match the arena's extra count.
    ExtraLength {
        /// The arena's extra count.
        expected: usize,
        /// The number of extra words passed.
        found: usize,
    },
}

impl std::fmt::Display for ArenaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            ArenaError::SlotOutOfRange { slot, slots } => {
                write!(f, "slot {slot} is out of range for an arena with {slots} slots")
            }
            ArenaError::AlreadyWritten { slot, state } => {
                write!(f, "slot {slot} already holds data (state {state:?})")
            }
            ArenaError::NotAppending { slot, state } => write!(
                f,
                "slot {slot} is not open for appending (state {state:?}), call append_begin first"
            ),
            ArenaError::SlotClosed { slot } => write!(
                f,
                "slot {slot} was closed by writing another slot, its records must stay contiguous"
            ),
            ArenaError::ExtraLength { expected, found } => {
                write!(f, "expected {expected} extra words per record, got {found}")
            }
        }
    }
}

impl std::error::Error for ArenaError {}
