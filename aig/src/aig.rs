use crate::{Edge, GraphView, NodeId, NodeKind};

/// A minimal and-inverter graph.
///
/// Nodes can only refer to previously added nodes, so index order is always a topological order.
/// Node 0 is the constant false node and exists from construction.
#[derive(Clone, Debug)]
pub struct Aig {
    nodes: Vec<NodeKind>,
    inputs: Vec<NodeId>,
}

impl Default for Aig {
    fn default() -> Self {
        Self::new()
    }
}

impl Aig {
    /// Creates a graph containing only the constant node.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeKind::Const],
            inputs: vec![],
        }
    }

    /// Adds a new primary input.
    pub fn add_input(&mut self) -> NodeId {
        let node = NodeId::from_index(self.nodes.len());
        self.nodes.push(NodeKind::Input);
        self.inputs.push(node);
        node
    }

    /// Adds `count` new primary inputs and returns them.
    pub fn add_inputs(&mut self, count: usize) -> Vec<NodeId> {
        (0..count).map(|_| self.add_input()).collect()
    }

    /// Adds a new AND node with the given fan-ins.
    ///
    /// Panics if a fan-in refers to a node that does not exist yet.
    pub fn add_and(&mut self, a: impl Into<Edge>, b: impl Into<Edge>) -> NodeId {
        let fanins = [a.into(), b.into()];
        for fanin in fanins {
            assert!(
                fanin.node().index() < self.nodes.len(),
                "fan-in {fanin} refers to an undefined node"
            );
        }
        let node = NodeId::from_index(self.nodes.len());
        self.nodes.push(NodeKind::And(fanins));
        node
    }

    /// Returns the primary inputs in creation order.
    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Returns the number of AND nodes.
    pub fn and_count(&self) -> usize {
        self.nodes.len() - 1 - self.inputs.len()
    }
}

impl GraphView for Aig {
    #[inline(always)]
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    fn kind(&self, node: NodeId) -> NodeKind {
        self.nodes[node.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_small_graph() {
        let mut aig = Aig::new();
        let inputs = aig.add_inputs(2);
        let (a, b) = (inputs[0], inputs[1]);
        let n = aig.add_and(a, Edge::neg(b));

        assert_eq!(aig.node_count(), 4);
        assert_eq!(aig.and_count(), 1);
        assert_eq!(aig.inputs(), &[a, b]);
        assert_eq!(aig.kind(NodeId::CONST), NodeKind::Const);
        assert_eq!(aig.kind(a), NodeKind::Input);
        assert_eq!(aig.fanins(n), Some([Edge::pos(a), Edge::neg(b)]));
        assert_eq!(aig.fanins(a), None);
    }

    #[test]
    #[should_panic(expected = "undefined node")]
    fn forward_reference_panics() {
        let mut aig = Aig::new();
        let a = aig.add_input();
        aig.add_and(a, NodeId::from_index(7));
    }
}
