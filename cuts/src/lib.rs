//! Priority cut enumeration for and-inverter graphs.
//!
//! A cut of a node `v` is a set of nodes, its leaves, such that every path from a primary input
//! to `v` passes through a leaf. [`AigCuts`] computes up to `priority` cuts with at most
//! `cut_size` leaves for every node of a graph, preferring cuts whose leaves sit at high levels,
//! and stores them in a [`PagedArena`].
//!
//! ```
//! use cutkit_aig::Aig;
//! use cutkit_cuts::{AigCuts, CutOptions};
//!
//! let mut aig = Aig::new();
//! let inputs = aig.add_inputs(3);
//! let n1 = aig.add_and(inputs[0], inputs[1]);
//! let n2 = aig.add_and(n1, inputs[2]);
//!
//! let cuts = AigCuts::new(&aig, CutOptions::default());
//! assert_eq!(cuts.count(n2), 3);
//! for cut in cuts.cuts(n2) {
//!     println!("{cut:?} {}", cuts.simulate(n2, cut.leaves()));
//! }
//! ```
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(missing_docs)]

mod cone;
mod cuts;
mod enumerate;
mod merge;
mod parallel;
mod truth_table;

pub use cone::{
    evaluate_cone, ConeEvaluation, ConeEvaluator, DepthEvaluator, QueryError, TruthTableEvaluator,
};
pub use cuts::{AigCuts, Cut, Cuts};
pub use truth_table::{TruthTable, MAX_VARS};

#[doc(no_inline)]
pub use cutkit_paged_arena::PagedArena;

/// Parameters of the cut enumeration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CutOptions {
    /// Maximal number of leaves of a non-trivial cut.
    pub cut_size: usize,
    /// Maximal number of non-trivial cuts kept per node.
    pub priority: usize,
    /// Enumerate on a pool of worker threads.
    pub parallel: bool,
    /// Number of worker threads, `0` uses the available parallelism.
    pub threads: usize,
}

impl Default for CutOptions {
    fn default() -> Self {
        Self {
            cut_size: 4,
            priority: 8,
            parallel: false,
            threads: 0,
        }
    }
}

impl CutOptions {
    /// Returns the number of worker threads used in parallel mode.
    pub fn thread_count(&self) -> usize {
        if self.threads != 0 {
            self.threads
        } else {
            std::thread::available_parallelism().map_or(1, |n| n.get())
        }
    }
}
