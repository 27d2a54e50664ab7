//! Random graph generation for benchmarks and randomized tests.

use rand::Rng;

use crate::{Aig, Edge, NodeId};

/// Parameters for [`random_aig`].
#[derive(Clone, Copy, Debug)]
pub struct RandomAigOptions {
    /// Number of primary inputs, must be at least 1.
    pub inputs: usize,
    /// Number of AND nodes.
    pub ands: usize,
    /// Fan-ins are picked from the most recent `window` nodes half of the time, which produces
    /// deeper graphs with more reconvergence than uniform sampling.
    pub window: usize,
}

impl Default for RandomAigOptions {
    fn default() -> Self {
        Self {
            inputs: 16,
            ands: 256,
            window: 16,
        }
    }
}

/// Generates a random graph with the given number of inputs and AND nodes.
///
/// Fan-ins never use the constant node and are inverted with probability 1/2.
pub fn random_aig(rng: &mut impl Rng, options: RandomAigOptions) -> Aig {
    assert!(options.inputs > 0, "a random graph needs at least one input");

    let mut aig = Aig::new();
    aig.add_inputs(options.inputs);

    for _ in 0..options.ands {
        let len = aig.inputs().len() + aig.and_count() + 1;
        let a = pick_fanin(rng, len, options.window);
        let b = pick_fanin(rng, len, options.window);
        aig.add_and(a, b);
    }

    log::debug!(
        "generated random graph with {} inputs and {} ands",
        options.inputs,
        options.ands
    );

    aig
}

fn pick_fanin(rng: &mut impl Rng, len: usize, window: usize) -> Edge {
    let low = if window > 0 && rng.gen_bool(0.5) {
        len.saturating_sub(window).max(1)
    } else {
        1
    };
    let node = NodeId::from_index(rng.gen_range(low..len));
    Edge::new(node, rng.gen_bool(0.5))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::{GraphView, NodeKind};

    #[test]
    fn generated_graph_shape() {
        let mut rng = rand_pcg::Pcg64::seed_from_u64(7);
        let aig = random_aig(
            &mut rng,
            RandomAigOptions {
                inputs: 5,
                ands: 40,
                window: 4,
            },
        );

        assert_eq!(aig.node_count(), 46);
        assert_eq!(aig.and_count(), 40);
        for node in aig.nodes() {
            if let NodeKind::And(fanins) = aig.kind(node) {
                for fanin in fanins {
                    assert_ne!(fanin.node(), NodeId::CONST);
                    assert!(fanin.node() < node);
                }
            }
        }
    }

    #[test]
    fn same_seed_same_graph() {
        let options = RandomAigOptions::default();
        let a = random_aig(&mut rand_pcg::Pcg64::seed_from_u64(3), options);
        let b = random_aig(&mut rand_pcg::Pcg64::seed_from_u64(3), options);
        for node in a.nodes() {
            assert_eq!(a.kind(node), b.kind(node));
        }
    }
}
