//! A flat, append-only arena storing a sequence of small integer sets for every slot.
//!
//! All sets live in a single `Vec<u32>`. Each set is stored as a record consisting of its size,
//! a fixed number of extra payload words and the set's elements. The records of a slot are
//! contiguous, so a slot is fully described by the address of its first record and its record
//! count.
//!
//! For example, storing `[{A => {0, 2, 3}, B => {1, 3}}, {C => {2}}]` with one extra word per
//! record results in
//!
//! ```text
//! data:   | 3 | A | 0 | 2 | 3 | 2 | B | 1 | 3 | 1 | C | 2 |
//! offset: | 0 | 9 |
//! count:  | 2 | 1 |
//! ```
//!
//! Slots are filled either by a single `assign_*` call or by `append_begin` followed by any number
//! of `append_*` calls. Only the most recently begun slot can be appended to, which keeps the
//! records of every slot contiguous.
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(missing_docs)]

mod arena;
mod error;
mod record;

pub use arena::{PagedArena, SlotState};
pub use error::ArenaError;
pub use record::{Record, Records};
