//! Concurrent cut enumeration on a bounded worker pool.
//!
//! Every node becomes ready once both of its fan-ins are enumerated. Ready nodes are passed
//! through a shared channel to a fixed number of workers. A worker copies the fan-in cuts out of
//! the arena, merges them without holding any lock and writes all records of the node in a single
//! critical section, so every slot stays contiguous.

use std::sync::{
    atomic::{AtomicU8, AtomicUsize, Ordering},
    mpsc, Mutex, MutexGuard, PoisonError,
};

use cutkit_aig::{topo::Fanouts, GraphView, LevelOracle, NodeId, NodeKind};
use cutkit_paged_arena::PagedArena;

use crate::{
    enumerate::{leaf_sets, write_and_cuts, write_const_cut, write_input_cut, CUT_EXTRA_WORDS},
    merge::merge_cuts,
    CutOptions,
};

/// `None` tells a worker to exit.
type ReadyMessage = Option<NodeId>;

struct Scheduler<'a, G, L: ?Sized> {
    graph: &'a G,
    levels: &'a L,
    options: &'a CutOptions,
    threads: usize,
    fanouts: Fanouts,
    /// Number of fan-ins of each node that are not enumerated yet.
    pending: Vec<AtomicU8>,
    /// Nodes that were queued but are not finished yet.
    in_flight: AtomicUsize,
    finished: AtomicUsize,
    arena: Mutex<PagedArena>,
    ready: Mutex<mpsc::Receiver<ReadyMessage>>,
}

/// Wakes up all workers when a worker unwinds, so that the scope can be joined and the panic
/// propagated instead of leaving the others blocked on the ready queue.
struct StopOnPanic<'a> {
    ready: &'a mpsc::Sender<ReadyMessage>,
    threads: usize,
}

impl Drop for StopOnPanic<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            stop_all(self.ready, self.threads);
        }
    }
}

fn stop_all(ready: &mpsc::Sender<ReadyMessage>, threads: usize) {
    for _ in 0..threads {
        // The receiver outlives every worker, a failed send means nobody is left to stop.
        let _ = ready.send(None);
    }
}

impl<'a, G: GraphView + Sync, L: LevelOracle + Sync + ?Sized> Scheduler<'a, G, L> {
    fn lock_arena(&self) -> MutexGuard<'_, PagedArena> {
        self.arena.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_node(&self) -> Option<NodeId> {
        let ready = self.ready.lock().unwrap_or_else(PoisonError::into_inner);
        ready.recv().ok().flatten()
    }

    fn run_worker(&self, ready: mpsc::Sender<ReadyMessage>) {
        let _guard = StopOnPanic {
            ready: &ready,
            threads: self.threads,
        };

        while let Some(node) = self.next_node() {
            self.enumerate_node(node);

            for &fanout in self.fanouts.fanouts(node) {
                if self.pending[fanout.index()].fetch_sub(1, Ordering::AcqRel) == 1 {
                    self.in_flight.fetch_add(1, Ordering::AcqRel);
                    let _ = ready.send(Some(fanout));
                }
            }

            self.finished.fetch_add(1, Ordering::Relaxed);
            if self.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
                stop_all(&ready, self.threads);
            }
        }
    }

    fn enumerate_node(&self, node: NodeId) {
        match self.graph.kind(node) {
            NodeKind::Const => write_const_cut(&mut self.lock_arena(), node),
            NodeKind::Input => write_input_cut(&mut self.lock_arena(), self.levels, node),
            NodeKind::And([a, b]) => {
                let (cuts_a, cuts_b) = {
                    let arena = self.lock_arena();
                    (snapshot(&arena, a.node()), snapshot(&arena, b.node()))
                };
                let candidates = merge_cuts(
                    cuts_a.iter().map(Vec::as_slice),
                    cuts_b.iter().map(Vec::as_slice),
                    self.options.cut_size,
                    self.options.priority,
                    self.levels,
                );
                write_and_cuts(&mut self.lock_arena(), self.levels, node, &candidates);
            }
        }
    }
}

fn snapshot(arena: &PagedArena, node: NodeId) -> Vec<Vec<NodeId>> {
    leaf_sets(arena, node).map(<[NodeId]>::to_vec).collect()
}

/// Enumerates cuts using `threads` worker threads.
///
/// The cut list of every node is identical to the one produced by the sequential enumerator,
/// only the placement of the slots within the arena differs. Panics if the graph has a cycle.
pub(crate) fn enumerate_parallel<G, L>(
    graph: &G,
    levels: &L,
    options: &CutOptions,
    threads: usize,
) -> PagedArena
where
    G: GraphView + Sync,
    L: LevelOracle + Sync + ?Sized,
{
    let node_count = graph.node_count();
    let threads = threads.max(1);
    log::debug!("enumerating cuts of {node_count} nodes on {threads} threads");

    let (ready_tx, ready_rx) = mpsc::channel::<ReadyMessage>();

    let pending: Vec<AtomicU8> = graph
        .nodes()
        .map(|node| AtomicU8::new(if graph.fanins(node).is_some() { 2 } else { 0 }))
        .collect();

    let mut seeds = 0;
    for node in graph.nodes() {
        if pending[node.index()].load(Ordering::Relaxed) == 0 {
            let _ = ready_tx.send(Some(node));
            seeds += 1;
        }
    }
    if seeds == 0 {
        stop_all(&ready_tx, threads);
    }

    let scheduler = Scheduler {
        graph,
        levels,
        options,
        threads,
        fanouts: Fanouts::new(graph),
        pending,
        in_flight: AtomicUsize::new(seeds),
        finished: AtomicUsize::new(0),
        arena: Mutex::new(PagedArena::new(node_count, CUT_EXTRA_WORDS)),
        ready: Mutex::new(ready_rx),
    };

    std::thread::scope(|scope| {
        for _ in 0..threads {
            let ready = ready_tx.clone();
            let scheduler = &scheduler;
            scope.spawn(move || scheduler.run_worker(ready));
        }
    });

    assert_eq!(
        scheduler.finished.into_inner(),
        node_count,
        "graph contains a combinational cycle"
    );

    scheduler
        .arena
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
}
