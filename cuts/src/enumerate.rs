//! Filling the arena with the cuts of every node.

use cutkit_aig::{topo::topological_order, GraphView, LevelOracle, NodeId, NodeKind};
use cutkit_paged_arena::PagedArena;

use crate::{
    merge::{merge_cuts, Candidate},
    CutOptions,
};

/// Number of extra arena words stored with every cut: the minimum leaf level.
pub(crate) const CUT_EXTRA_WORDS: usize = 1;

/// Level stored for the empty cut of the constant node.
pub(crate) const NO_LEAF_LEVEL: u32 = u32::MAX;

/// Returns the leaf sets of all cuts stored for `node`.
pub(crate) fn leaf_sets(
    arena: &PagedArena,
    node: NodeId,
) -> impl Iterator<Item = &[NodeId]> + Clone + '_ {
    arena
        .sets(node.index())
        .map(|record| bytemuck::cast_slice(record.elements()))
}

/// Writes the empty cut of the constant node.
pub(crate) fn write_const_cut(arena: &mut PagedArena, node: NodeId) {
    arena.assign_empty(node.index(), &[NO_LEAF_LEVEL]);
}

/// Writes the trivial cut of a primary input, which is also its only cut.
pub(crate) fn write_input_cut<L: LevelOracle + ?Sized>(
    arena: &mut PagedArena,
    levels: &L,
    node: NodeId,
) {
    arena.assign_singleton(node.index(), node.as_u32(), &[levels.level(node)]);
}

/// Writes the merged cuts of an AND node followed by its trivial cut.
pub(crate) fn write_and_cuts<L: LevelOracle + ?Sized>(
    arena: &mut PagedArena,
    levels: &L,
    node: NodeId,
    candidates: &[Candidate],
) {
    let slot = node.index();
    arena.append_begin(slot);
    for candidate in candidates {
        arena.append_set(
            slot,
            bytemuck::cast_slice(candidate.leaves.as_slice()),
            &[candidate.min_level],
        );
    }
    arena.append_singleton(slot, node.as_u32(), &[levels.level(node)]);
}

/// Enumerates cuts on the current thread in topological order.
pub(crate) fn enumerate_sequential<G: GraphView, L: LevelOracle + ?Sized>(
    graph: &G,
    levels: &L,
    options: &CutOptions,
) -> PagedArena {
    let mut arena = PagedArena::new(graph.node_count(), CUT_EXTRA_WORDS);

    for node in topological_order(graph) {
        match graph.kind(node) {
            NodeKind::Const => write_const_cut(&mut arena, node),
            NodeKind::Input => write_input_cut(&mut arena, levels, node),
            NodeKind::And([a, b]) => {
                let candidates = merge_cuts(
                    leaf_sets(&arena, a.node()),
                    leaf_sets(&arena, b.node()),
                    options.cut_size,
                    options.priority,
                    levels,
                );
                write_and_cuts(&mut arena, levels, node, &candidates);
            }
        }
    }

    arena
}
