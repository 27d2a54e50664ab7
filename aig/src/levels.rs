use crate::{topo::topological_order, GraphView, LevelOracle, NodeId};

/// Per-node logic levels.
///
/// Inputs and the constant are on level 0, an AND node is one level above its highest fan-in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Levels {
    levels: Vec<u32>,
}

impl Levels {
    /// Computes the levels of all nodes of a graph.
    pub fn compute(graph: &impl GraphView) -> Self {
        let mut levels = vec![0u32; graph.node_count()];
        for node in topological_order(graph) {
            if let Some([a, b]) = graph.fanins(node) {
                levels[node.index()] = 1 + levels[a.node().index()].max(levels[b.node().index()]);
            }
        }
        let levels = Self { levels };
        log::debug!("computed levels, max level {}", levels.max_level());
        levels
    }

    /// Returns the largest level of any node, or 0 for an empty graph.
    pub fn max_level(&self) -> u32 {
        self.levels.iter().copied().max().unwrap_or(0)
    }

    /// Returns the levels indexed by node index.
    pub fn as_slice(&self) -> &[u32] {
        &self.levels
    }
}

impl From<Vec<u32>> for Levels {
    fn from(levels: Vec<u32>) -> Self {
        Self { levels }
    }
}

impl LevelOracle for Levels {
    #[inline(always)]
    fn level(&self, node: NodeId) -> u32 {
        self.levels[node.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Aig, Edge};

    #[test]
    fn levels_of_chain() {
        let mut aig = Aig::new();
        let inputs = aig.add_inputs(3);
        let n1 = aig.add_and(inputs[0], inputs[1]);
        let n2 = aig.add_and(Edge::neg(n1), inputs[2]);
        let n3 = aig.add_and(n2, inputs[0]);
        let n4 = aig.add_and(Edge::TRUE, inputs[2]);

        let levels = Levels::compute(&aig);
        assert_eq!(levels.level(NodeId::CONST), 0);
        assert_eq!(levels.level(inputs[1]), 0);
        assert_eq!(levels.level(n1), 1);
        assert_eq!(levels.level(n2), 2);
        assert_eq!(levels.level(n3), 3);
        assert_eq!(levels.level(n4), 1);
        assert_eq!(levels.max_level(), 3);
    }
}
