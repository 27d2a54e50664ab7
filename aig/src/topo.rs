//! Topological ordering and fanout lookup for [`GraphView`] implementations.

use std::collections::VecDeque;

use crate::{GraphView, NodeId};

/// Fanout lists of all nodes, stored in a single flat buffer.
///
/// An AND node with both fan-ins on the same node appears twice in that node's fanout list, so
/// the fanout list length always matches the number of fan-in edges pointing at a node.
pub struct Fanouts {
    offsets: Vec<u32>,
    targets: Vec<NodeId>,
}

impl Fanouts {
    /// Collects the fanouts of every node.
    ///
    /// Panics if a fan-in refers to a node outside of the graph.
    pub fn new(graph: &impl GraphView) -> Self {
        let node_count = graph.node_count();
        let mut offsets = vec![0u32; node_count + 1];

        for node in graph.nodes() {
            for fanin in graph.fanins(node).into_iter().flatten() {
                let source = fanin.node().index();
                assert!(
                    source < node_count,
                    "fan-in {fanin} of {node} is outside of the graph"
                );
                offsets[source + 1] += 1;
            }
        }
        for i in 0..node_count {
            offsets[i + 1] += offsets[i];
        }

        let mut fill = offsets.clone();
        let mut targets = vec![NodeId::CONST; offsets[node_count] as usize];
        for node in graph.nodes() {
            for fanin in graph.fanins(node).into_iter().flatten() {
                let slot = &mut fill[fanin.node().index()];
                targets[*slot as usize] = node;
                *slot += 1;
            }
        }

        Self { offsets, targets }
    }

    /// Returns the nodes that use `node` as a fan-in.
    #[inline]
    pub fn fanouts(&self, node: NodeId) -> &[NodeId] {
        let i = node.index();
        &self.targets[self.offsets[i] as usize..self.offsets[i + 1] as usize]
    }
}

/// Returns all nodes of the graph in an order where every AND node follows both of its fan-ins.
///
/// Nodes without fan-ins are emitted in index order first, every other node as soon as its
/// fan-ins are done. Panics if the graph has a cycle.
pub fn topological_order(graph: &impl GraphView) -> Vec<NodeId> {
    let fanouts = Fanouts::new(graph);
    let mut pending: Vec<u8> = graph
        .nodes()
        .map(|node| if graph.fanins(node).is_some() { 2 } else { 0 })
        .collect();

    let mut queue: VecDeque<NodeId> = graph.nodes().filter(|n| pending[n.index()] == 0).collect();
    let mut order = Vec::with_capacity(graph.node_count());

    while let Some(node) = queue.pop_front() {
        order.push(node);
        for &fanout in fanouts.fanouts(node) {
            let count = &mut pending[fanout.index()];
            *count -= 1;
            if *count == 0 {
                queue.push_back(fanout);
            }
        }
    }

    assert_eq!(
        order.len(),
        graph.node_count(),
        "graph contains a combinational cycle"
    );
    order
}
