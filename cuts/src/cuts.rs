//! Enumerated cuts of a graph and queries on them.
use std::{fmt, iter::FusedIterator, time::Duration};

use cutkit_aig::{GraphView, LevelOracle, Levels, NodeId};
use cutkit_paged_arena::{PagedArena, Record, Records};
use quanta::Instant;

use crate::{
    cone::{evaluate_cone, ConeEvaluator, DepthEvaluator, QueryError, TruthTableEvaluator},
    enumerate::{enumerate_sequential, NO_LEAF_LEVEL},
    parallel::enumerate_parallel,
    truth_table::{TruthTable, MAX_VARS},
    CutOptions,
};

/// A single enumerated cut, borrowed from the arena.
#[derive(Clone, Copy)]
pub struct Cut<'a> {
    leaves: &'a [NodeId],
    min_level: u32,
    address: usize,
}

impl<'a> Cut<'a> {
    fn from_record(record: Record<'a>) -> Self {
        Self {
            leaves: bytemuck::cast_slice(record.elements()),
            min_level: record.extra(0),
            address: record.address(),
        }
    }

    /// Returns the leaves in ascending order.
    #[inline(always)]
    pub fn leaves(&self) -> &'a [NodeId] {
        self.leaves
    }

    /// Returns the number of leaves.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Returns `true` for the empty cut of the constant node.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Returns the minimal level over all leaves, `None` for the empty cut.
    #[inline]
    pub fn min_level(&self) -> Option<u32> {
        (self.min_level != NO_LEAF_LEVEL).then_some(self.min_level)
    }

    /// Returns the arena address of the cut.
    #[inline(always)]
    pub fn address(&self) -> usize {
        self.address
    }
}

impl fmt::Debug for Cut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.leaves).finish()
    }
}

/// Iterator over the cuts of a node, see [`AigCuts::cuts`].
#[derive(Clone)]
pub struct Cuts<'a> {
    records: Records<'a>,
}

impl<'a> Iterator for Cuts<'a> {
    type Item = Cut<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.records.next().map(Cut::from_record)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

impl ExactSizeIterator for Cuts<'_> {}

impl FusedIterator for Cuts<'_> {}

/// The priority cuts of every node of a graph.
///
/// Every node has at least one cut. The constant node has only the empty cut and a primary input
/// only its trivial cut. An AND node has up to `priority` cuts with at most `cut_size` leaves,
/// ranked by descending minimal leaf level, followed by its trivial cut.
pub struct AigCuts<'g, G> {
    graph: &'g G,
    options: CutOptions,
    arena: PagedArena,
    enumeration_time: Duration,
}

impl<'g, G: GraphView + Sync> AigCuts<'g, G> {
    /// Enumerates the cuts of all nodes of `graph`.
    pub fn new(graph: &'g G, options: CutOptions) -> Self {
        let levels = Levels::compute(graph);
        Self::with_levels(graph, &levels, options)
    }

    /// Enumerates the cuts of all nodes of `graph`, ranking them using the given levels.
    pub fn with_levels<L: LevelOracle + Sync + ?Sized>(
        graph: &'g G,
        levels: &L,
        options: CutOptions,
    ) -> Self {
        let start_time = Instant::now();

        let arena = if options.parallel {
            enumerate_parallel(graph, levels, &options, options.thread_count())
        } else {
            enumerate_sequential(graph, levels, &options)
        };

        let enumeration_time = start_time.elapsed();
        log::debug!(
            "found {} cuts in {:.2?} ({} KB)",
            arena.total_count(),
            enumeration_time,
            arena.memory() >> 10
        );

        Self {
            graph,
            options,
            arena,
            enumeration_time,
        }
    }
}

impl<'g, G: GraphView> AigCuts<'g, G> {
    /// Returns the graph the cuts were enumerated for.
    #[inline(always)]
    pub fn graph(&self) -> &'g G {
        self.graph
    }

    /// Returns the options used for the enumeration.
    #[inline(always)]
    pub fn options(&self) -> &CutOptions {
        &self.options
    }

    /// Returns the maximal number of leaves of a non-trivial cut.
    #[inline(always)]
    pub fn cut_size(&self) -> usize {
        self.options.cut_size
    }

    /// Returns the maximal number of non-trivial cuts per node.
    #[inline(always)]
    pub fn priority(&self) -> usize {
        self.options.priority
    }

    /// Returns the arena holding all cuts.
    ///
    /// Each record carries one extra word, the minimal level of its leaves.
    #[inline(always)]
    pub fn arena(&self) -> &PagedArena {
        &self.arena
    }

    /// Returns the number of cuts over all nodes.
    pub fn total_cut_count(&self) -> usize {
        self.arena.total_count()
    }

    /// Returns the wall-clock time spent enumerating.
    #[inline(always)]
    pub fn enumeration_time(&self) -> Duration {
        self.enumeration_time
    }

    /// Returns the approximate number of bytes used to store the cuts.
    pub fn memory(&self) -> usize {
        self.arena.memory()
    }

    /// Returns the number of cuts of a node.
    #[inline]
    pub fn count(&self, node: NodeId) -> usize {
        self.arena.count(node.index())
    }

    /// Returns the cuts of a node, its trivial cut last.
    #[inline]
    pub fn cuts(&self, node: NodeId) -> Cuts<'_> {
        Cuts {
            records: self.arena.sets(node.index()),
        }
    }

    /// Returns the node a cut of this enumeration belongs to.
    ///
    /// Returns `None` if the address of the cut lies outside of the arena.
    pub fn owner(&self, cut: Cut<'_>) -> Option<NodeId> {
        self.arena.index(cut.address()).map(NodeId::from_index)
    }

    /// Evaluates the cone of `node` bounded by `leaves` with a custom evaluator.
    ///
    /// Returns the value of `node` and the number of nodes in the cone.
    pub fn try_evaluate<E: ConeEvaluator>(
        &self,
        node: NodeId,
        leaves: &[NodeId],
        evaluator: &mut E,
    ) -> Result<(E::Value, usize), QueryError> {
        let result = evaluate_cone(self.graph, node, leaves, evaluator)?;
        Ok((result.value, result.cone_size))
    }

    /// Computes the function of `node` in terms of `leaves`, leaf `i` becoming variable `i`.
    pub fn try_simulate(&self, node: NodeId, leaves: &[NodeId]) -> Result<TruthTable, QueryError> {
        if leaves.len() > MAX_VARS {
            return Err(QueryError::TooManyLeaves {
                count: leaves.len(),
                max: MAX_VARS,
            });
        }
        let mut evaluator = TruthTableEvaluator::new(leaves.len());
        Ok(evaluate_cone(self.graph, node, leaves, &mut evaluator)?.value)
    }

    /// Computes the function of `node` in terms of `leaves`.
    ///
    /// Panics if `leaves` is not a cut of `node`, see [`try_simulate`][Self::try_simulate].
    pub fn simulate(&self, node: NodeId, leaves: &[NodeId]) -> TruthTable {
        self.try_simulate(node, leaves)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Computes the number of AND nodes on the longest path from a leaf to `node`.
    pub fn try_depth(&self, node: NodeId, leaves: &[NodeId]) -> Result<u32, QueryError> {
        Ok(evaluate_cone(self.graph, node, leaves, &mut DepthEvaluator)?.value)
    }

    /// Computes the number of AND nodes on the longest path from a leaf to `node`.
    ///
    /// Panics if `leaves` is not a cut of `node`, see [`try_depth`][Self::try_depth].
    pub fn depth(&self, node: NodeId, leaves: &[NodeId]) -> u32 {
        self.try_depth(node, leaves)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Counts the nodes between `leaves` and `node`, both included.
    ///
    /// The constant node is never counted, the trivial cut has a cone size of 1.
    pub fn try_cone_size(&self, node: NodeId, leaves: &[NodeId]) -> Result<usize, QueryError> {
        Ok(evaluate_cone(self.graph, node, leaves, &mut DepthEvaluator)?.cone_size)
    }

    /// Counts the nodes between `leaves` and `node`, both included.
    ///
    /// Panics if `leaves` is not a cut of `node`, see [`try_cone_size`][Self::try_cone_size].
    pub fn cone_size(&self, node: NodeId, leaves: &[NodeId]) -> usize {
        self.try_cone_size(node, leaves)
            .unwrap_or_else(|err| panic!("{err}"))
    }
}
