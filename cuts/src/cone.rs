//! Evaluating the cone of a node down to a set of leaves.
use std::{fmt, hash::BuildHasherDefault};

use cutkit_aig::{GraphView, NodeId, NodeKind};
use hashbrown::HashMap;
use zwohash::ZwoHasher;

use crate::truth_table::{TruthTable, MAX_VARS};

type NodeMap<V> = HashMap<NodeId, V, BuildHasherDefault<ZwoHasher>>;

/// Error returned by cut queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryError {
    /// The cone of `root` reaches the primary input `input`, which is not among the leaves.
    ///
    /// The leaves do not form a cut of `root`.
    UncoveredInput {
        /// The node whose cone was evaluated.
        root: NodeId,
        /// The primary input reached.
        input: NodeId,
    },
    /// More leaves than a truth table can have variables.
    TooManyLeaves {
        /// Number of leaves passed.
        count: usize,
        /// Supported maximum.
        max: usize,
    },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::UncoveredInput { root, input } => write!(
                f,
                "primary input {input} is in the cone of {root} but not among the leaves"
            ),
            QueryError::TooManyLeaves { count, max } => {
                write!(f, "{count} leaves exceed the maximum of {max} truth table variables")
            }
        }
    }
}

impl std::error::Error for QueryError {}

/// A bottom-up interpretation of AND nodes, used to evaluate the cone of a cut.
pub trait ConeEvaluator {
    /// Value computed for every node of the cone.
    type Value;

    /// Returns the value of the `position`-th leaf.
    fn leaf(&mut self, position: usize, leaf: NodeId) -> Self::Value;

    /// Returns the value of the constant false node.
    fn constant(&mut self) -> Self::Value;

    /// Returns the value of an AND node given the values of its fan-ins and their inversion flags.
    fn and(
        &mut self,
        a: &Self::Value,
        a_inverted: bool,
        b: &Self::Value,
        b_inverted: bool,
    ) -> Self::Value;
}

/// Computes the function of a node in terms of its leaves, leaf `i` becoming variable `i`.
#[derive(Clone, Copy, Debug)]
pub struct TruthTableEvaluator {
    num_vars: usize,
}

impl TruthTableEvaluator {
    /// Creates an evaluator for a cut with `num_vars` leaves.
    pub fn new(num_vars: usize) -> Self {
        assert!(num_vars <= MAX_VARS, "too many truth table variables");
        Self { num_vars }
    }
}

impl ConeEvaluator for TruthTableEvaluator {
    type Value = TruthTable;

    fn leaf(&mut self, position: usize, _leaf: NodeId) -> TruthTable {
        TruthTable::nth_var(position, self.num_vars)
    }

    fn constant(&mut self) -> TruthTable {
        TruthTable::constant(false, self.num_vars)
    }

    fn and(
        &mut self,
        a: &TruthTable,
        a_inverted: bool,
        b: &TruthTable,
        b_inverted: bool,
    ) -> TruthTable {
        match (a_inverted, b_inverted) {
            (false, false) => a & b,
            (a_inverted, b_inverted) => &a.invert_if(a_inverted) & &b.invert_if(b_inverted),
        }
    }
}

/// Computes the longest path from any leaf to the node, counting AND nodes.
#[derive(Clone, Copy, Debug, Default)]
pub struct DepthEvaluator;

impl ConeEvaluator for DepthEvaluator {
    type Value = u32;

    fn leaf(&mut self, _position: usize, _leaf: NodeId) -> u32 {
        0
    }

    fn constant(&mut self) -> u32 {
        0
    }

    fn and(&mut self, a: &u32, _: bool, b: &u32, _: bool) -> u32 {
        1 + (*a).max(*b)
    }
}

/// Result of [`evaluate_cone`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConeEvaluation<V> {
    /// The value of the root.
    pub value: V,
    /// Number of distinct nodes visited, leaves and the root included, the constant excluded.
    pub cone_size: usize,
}

/// Evaluates the cone of `root`, stopping at the given leaves.
///
/// Nodes are visited depth first, every node at most once. Leaves that are not reached do not
/// count towards the cone size. Reaching a primary input that is not a leaf is an error.
pub fn evaluate_cone<G: GraphView, E: ConeEvaluator>(
    graph: &G,
    root: NodeId,
    leaves: &[NodeId],
    evaluator: &mut E,
) -> Result<ConeEvaluation<E::Value>, QueryError> {
    let mut leaf_values: NodeMap<E::Value> = NodeMap::default();
    for (position, &leaf) in leaves.iter().enumerate() {
        leaf_values.insert(leaf, evaluator.leaf(position, leaf));
    }

    let mut values: NodeMap<E::Value> = NodeMap::default();
    let mut stack = vec![root];

    while let Some(&node) = stack.last() {
        if values.contains_key(&node) {
            stack.pop();
            continue;
        }
        if let Some(value) = leaf_values.remove(&node) {
            values.insert(node, value);
            stack.pop();
            continue;
        }
        match graph.kind(node) {
            NodeKind::Const => {
                values.insert(node, evaluator.constant());
                stack.pop();
            }
            NodeKind::Input => return Err(QueryError::UncoveredInput { root, input: node }),
            NodeKind::And([a, b]) => {
                match (values.get(&a.node()), values.get(&b.node())) {
                    (Some(value_a), Some(value_b)) => {
                        let value =
                            evaluator.and(value_a, a.is_inverted(), value_b, b.is_inverted());
                        values.insert(node, value);
                        stack.pop();
                    }
                    (value_a, value_b) => {
                        if value_b.is_none() {
                            stack.push(b.node());
                        }
                        if value_a.is_none() {
                            stack.push(a.node());
                        }
                    }
                }
            }
        }
    }

    let cone_size = values.keys().filter(|&&node| node != NodeId::CONST).count();
    let value = values
        .remove(&root)
        .expect("root is evaluated once the stack is empty");
    Ok(ConeEvaluation { value, cone_size })
}

#[cfg(test)]
mod tests {
    use cutkit_aig::{Aig, Edge};

    use super::*;

    #[test]
    fn xor_from_three_ands() {
        let mut aig = Aig::new();
        let inputs = aig.add_inputs(2);
        let (x, y) = (inputs[0], inputs[1]);
        let both = aig.add_and(x, y);
        let neither = aig.add_and(Edge::neg(x), Edge::neg(y));
        let xor = aig.add_and(Edge::neg(both), Edge::neg(neither));

        let result = evaluate_cone(&aig, xor, &[x, y], &mut TruthTableEvaluator::new(2)).unwrap();
        assert_eq!(result.value.to_hex(), "6");
        assert_eq!(result.cone_size, 5);

        let depth = evaluate_cone(&aig, xor, &[x, y], &mut DepthEvaluator).unwrap();
        assert_eq!(depth.value, 2);

        let swapped = evaluate_cone(&aig, both, &[y, x], &mut TruthTableEvaluator::new(2));
        assert_eq!(swapped.unwrap().value.to_hex(), "8");
    }

    #[test]
    fn constant_fanin() {
        let mut aig = Aig::new();
        let x = aig.add_input();
        let one_and_x = aig.add_and(Edge::TRUE, x);
        let zero_and_x = aig.add_and(Edge::FALSE, x);

        let eval =
            |node| evaluate_cone(&aig, node, &[x], &mut TruthTableEvaluator::new(1)).unwrap();
        assert_eq!(eval(one_and_x).value.to_hex(), "2");
        assert_eq!(eval(one_and_x).cone_size, 2);
        assert_eq!(eval(zero_and_x).value.to_hex(), "0");
    }

    #[test]
    fn uncovered_input() {
        let mut aig = Aig::new();
        let inputs = aig.add_inputs(2);
        let (x, y) = (inputs[0], inputs[1]);
        let n = aig.add_and(x, y);

        let err = evaluate_cone(&aig, n, &[x], &mut DepthEvaluator).unwrap_err();
        assert_eq!(err, QueryError::UncoveredInput { root: n, input: y });
        assert_eq!(
            err.to_string(),
            "primary input n2 is in the cone of n3 but not among the leaves"
        );
    }

    #[test]
    fn leaf_shadows_cone() {
        let mut aig = Aig::new();
        let inputs = aig.add_inputs(2);
        let (x, y) = (inputs[0], inputs[1]);
        let n = aig.add_and(x, y);
        let m = aig.add_and(n, Edge::neg(x));

        let trivial = evaluate_cone(&aig, m, &[m], &mut TruthTableEvaluator::new(1)).unwrap();
        assert_eq!(trivial.value.to_hex(), "2");
        assert_eq!(trivial.cone_size, 1);

        let result = evaluate_cone(&aig, m, &[x, n], &mut TruthTableEvaluator::new(2)).unwrap();
        // !x & n
        assert_eq!(result.value.to_hex(), "4");
        assert_eq!(result.cone_size, 3);
    }
}
