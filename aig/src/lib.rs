//! And-inverter graphs as consumed by cut enumeration.
//!
//! The enumerator does not depend on a concrete graph type. It is written against the
//! [`GraphView`] and [`LevelOracle`] capability traits, which this crate also implements for its
//! own minimal [`Aig`] container.
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(missing_docs)]

mod aig;
mod levels;
mod node;
pub mod random;
pub mod topo;

pub use aig::Aig;
pub use levels::Levels;
pub use node::{Edge, NodeId, NodeKind};

/// Read-only structural access to an and-inverter graph.
///
/// Nodes are identified by dense indices `0..node_count()`. The node with index 0 is expected to
/// be the constant false node, every other node is either a primary input or a 2-input AND.
pub trait GraphView {
    /// Returns the number of nodes, including the constant node.
    fn node_count(&self) -> usize;

    /// Returns the kind of a node together with its fan-in edges.
    fn kind(&self, node: NodeId) -> NodeKind;

    /// Returns the two fan-in edges of an AND node and `None` for inputs and the constant.
    #[inline]
    fn fanins(&self, node: NodeId) -> Option<[Edge; 2]> {
        match self.kind(node) {
            NodeKind::And(fanins) => Some(fanins),
            _ => None,
        }
    }

    /// Returns an iterator over all node ids in index order.
    fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.node_count()).map(NodeId::from_index)
    }
}

/// Maps every node to its level, used to rank cuts.
pub trait LevelOracle {
    /// Returns the level of a node.
    fn level(&self, node: NodeId) -> u32;
}

impl LevelOracle for [u32] {
    #[inline(always)]
    fn level(&self, node: NodeId) -> u32 {
        self[node.index()]
    }
}

impl LevelOracle for Vec<u32> {
    #[inline(always)]
    fn level(&self, node: NodeId) -> u32 {
        self[node.index()]
    }
}
