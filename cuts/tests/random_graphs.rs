#![allow(missing_docs)]
use cutkit_aig::{
    random::{random_aig, RandomAigOptions},
    Aig, GraphView, Levels, NodeId, NodeKind,
};
use cutkit_cuts::{AigCuts, CutOptions, TruthTable};
use rand::prelude::*;

fn random_graphs() -> impl Iterator<Item = Aig> {
    let mut rng = rand_pcg::Pcg64::seed_from_u64(0xc075);
    (0..12).map(move |_| {
        let options = RandomAigOptions {
            inputs: rng.gen_range(1..12),
            ands: rng.gen_range(0..300),
            window: rng.gen_range(0..24),
        };
        random_aig(&mut rng, options)
    })
}

type CutList = Vec<(Vec<NodeId>, Option<u32>)>;

fn cut_lists<G: GraphView>(cuts: &AigCuts<G>) -> Vec<CutList> {
    cuts.graph()
        .nodes()
        .map(|node| {
            cuts.cuts(node)
                .map(|cut| (cut.leaves().to_vec(), cut.min_level()))
                .collect()
        })
        .collect()
}

fn is_subset(small: &[NodeId], large: &[NodeId]) -> bool {
    small.iter().all(|leaf| large.contains(leaf))
}

/// Simulates 64 random input patterns through the whole graph.
fn simulate_patterns(aig: &Aig, rng: &mut impl Rng) -> Vec<u64> {
    let mut values = vec![0u64; aig.node_count()];
    for node in aig.nodes() {
        values[node.index()] = match aig.kind(node) {
            NodeKind::Const => 0,
            NodeKind::Input => rng.gen(),
            NodeKind::And([a, b]) => {
                let value_a = values[a.node().index()] ^ if a.is_inverted() { !0 } else { 0 };
                let value_b = values[b.node().index()] ^ if b.is_inverted() { !0 } else { 0 };
                value_a & value_b
            }
        };
    }
    values
}

#[test]
fn structural_properties() {
    cutkit_logger::setup_for_tests();

    for aig in random_graphs() {
        for (cut_size, priority) in [(2, 4), (4, 8), (6, 3)] {
            let options = CutOptions {
                cut_size,
                priority,
                ..CutOptions::default()
            };
            let cuts = AigCuts::new(&aig, options);
            let mut total = 0;

            for node in aig.nodes() {
                let list: Vec<_> = cuts.cuts(node).collect();
                assert_eq!(list.len(), cuts.count(node));
                assert!(!list.is_empty());
                total += list.len();

                let (last, merged) = list.split_last().unwrap();
                if node == NodeId::CONST {
                    assert!(last.is_empty());
                    continue;
                }
                assert_eq!(last.leaves(), &[node]);

                if matches!(aig.kind(node), NodeKind::Input) {
                    assert!(merged.is_empty());
                }
                assert!(merged.len() <= priority);

                for (i, cut) in merged.iter().enumerate() {
                    assert!(cut.len() <= cut_size);
                    assert!(cut.leaves().windows(2).all(|w| w[0] < w[1]));
                    for other in &merged[i + 1..] {
                        assert!(!is_subset(cut.leaves(), other.leaves()), "{cut:?} {other:?}");
                        assert!(!is_subset(other.leaves(), cut.leaves()), "{cut:?} {other:?}");
                    }
                }

                for pair in merged.windows(2) {
                    let (a, b) = (&pair[0], &pair[1]);
                    assert!(
                        a.min_level() > b.min_level()
                            || (a.min_level() == b.min_level() && a.len() <= b.len())
                    );
                }
            }

            assert_eq!(cuts.total_cut_count(), total);
        }
    }
}

#[test]
fn iteration_is_repeatable() {
    cutkit_logger::setup_for_tests();

    for aig in random_graphs().take(3) {
        let cuts = AigCuts::new(&aig, CutOptions::default());
        for node in aig.nodes() {
            let cut_iter = cuts.cuts(node);
            let first: Vec<_> = cut_iter.clone().map(|cut| cut.leaves()).collect();
            let second: Vec<_> = cut_iter.map(|cut| cut.leaves()).collect();
            let third: Vec<_> = cuts.cuts(node).map(|cut| cut.leaves()).collect();
            assert_eq!(first, second);
            assert_eq!(first, third);
        }
    }
}

#[test]
fn parallel_matches_sequential() {
    cutkit_logger::setup_for_tests();

    for aig in random_graphs() {
        let sequential = AigCuts::new(&aig, CutOptions::default());
        let expected = cut_lists(&sequential);

        for threads in [1, 2, 4, 0] {
            let parallel = AigCuts::new(
                &aig,
                CutOptions {
                    parallel: true,
                    threads,
                    ..CutOptions::default()
                },
            );
            assert_eq!(cut_lists(&parallel), expected, "threads: {threads}");
            assert_eq!(parallel.total_cut_count(), sequential.total_cut_count());
        }
    }
}

#[test]
fn parallel_with_external_levels() {
    cutkit_logger::setup_for_tests();

    for aig in random_graphs().take(4) {
        let levels = Levels::compute(&aig);
        let options = CutOptions {
            cut_size: 5,
            priority: 6,
            ..CutOptions::default()
        };
        let sequential = AigCuts::with_levels(&aig, levels.as_slice(), options.clone());
        let parallel = AigCuts::with_levels(
            &aig,
            levels.as_slice(),
            CutOptions {
                parallel: true,
                threads: 3,
                ..options
            },
        );
        assert_eq!(cut_lists(&parallel), cut_lists(&sequential));
    }
}

#[test]
fn cut_functions_match_global_simulation() {
    cutkit_logger::setup_for_tests();
    let mut rng = rand_pcg::Pcg64::seed_from_u64(0x51b);

    for aig in random_graphs() {
        let levels = Levels::compute(&aig);
        let patterns = simulate_patterns(&aig, &mut rng);
        let cuts = AigCuts::new(&aig, CutOptions::default());

        for node in aig.nodes() {
            for cut in cuts.cuts(node) {
                let function: TruthTable = cuts.simulate(node, cut.leaves());
                assert_eq!(function.num_vars(), cut.len());

                for bit in 0..64 {
                    let assignment = cut
                        .leaves()
                        .iter()
                        .enumerate()
                        .map(|(var, leaf)| (((patterns[leaf.index()] >> bit) & 1) as usize) << var)
                        .sum::<usize>();
                    assert_eq!(
                        function.bit(assignment),
                        (patterns[node.index()] >> bit) & 1 != 0,
                        "{node} {cut:?}"
                    );
                }

                assert!(cuts.depth(node, cut.leaves()) <= levels.as_slice()[node.index()]);
                let cone_size = cuts.cone_size(node, cut.leaves());
                if cut.leaves() == [node] {
                    assert_eq!(cone_size, 1);
                    assert_eq!(function.to_hex(), "2");
                } else if node != NodeId::CONST {
                    assert!(cone_size >= 2);
                }
            }
        }
    }
}
