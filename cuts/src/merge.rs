//! Priority cut merging for a single AND node.

use std::cmp::Ordering;

use cutkit_aig::{LevelOracle, NodeId};

/// A merged cut of the node currently being enumerated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Candidate {
    /// Leaves in ascending order.
    pub leaves: Vec<NodeId>,
    /// Minimum level over all leaves, `u32::MAX` for the empty cut.
    pub min_level: u32,
}

/// Writes the union of two sorted leaf sets to `out`.
///
/// Returns `false` as soon as the union would exceed `limit` leaves, leaving `out` in an
/// unspecified state.
fn union_within(a: &[NodeId], b: &[NodeId], limit: usize, out: &mut Vec<NodeId>) -> bool {
    out.clear();
    let (mut i, mut j) = (0, 0);
    loop {
        let next = match (a.get(i), b.get(j)) {
            (None, None) => return true,
            (Some(&x), None) => {
                i += 1;
                x
            }
            (None, Some(&y)) => {
                j += 1;
                y
            }
            (Some(&x), Some(&y)) => match x.cmp(&y) {
                Ordering::Less => {
                    i += 1;
                    x
                }
                Ordering::Greater => {
                    j += 1;
                    y
                }
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                    x
                }
            },
        };
        if out.len() == limit {
            return false;
        }
        out.push(next);
    }
}

/// Returns `true` if every element of the sorted set `small` is contained in the sorted set
/// `large`.
fn is_subset(small: &[NodeId], large: &[NodeId]) -> bool {
    if small.len() > large.len() {
        return false;
    }
    let mut large = large.iter();
    'outer: for x in small {
        for y in large.by_ref() {
            match y.cmp(x) {
                Ordering::Less => continue,
                Ordering::Equal => continue 'outer,
                Ordering::Greater => return false,
            }
        }
        return false;
    }
    true
}

/// Adds a cut to the candidate list unless an equal or smaller cut is already present.
///
/// Candidates that are strict supersets of the new cut are removed, the first one is replaced in
/// place. The list stays free of subset relations.
fn insert_candidate(candidates: &mut Vec<Candidate>, leaves: &[NodeId], min_level: u32) {
    let mut inserted = false;
    let mut i = 0;
    while i < candidates.len() {
        let existing = &candidates[i].leaves;
        if is_subset(existing, leaves) {
            debug_assert!(!inserted);
            return;
        }
        if is_subset(leaves, existing) {
            if inserted {
                candidates.swap_remove(i);
                continue;
            }
            candidates[i] = Candidate {
                leaves: leaves.to_vec(),
                min_level,
            };
            inserted = true;
        }
        i += 1;
    }
    if !inserted {
        candidates.push(Candidate {
            leaves: leaves.to_vec(),
            min_level,
        });
    }
}

/// Merges the cuts of the two fan-ins of an AND node.
///
/// Every pair of fan-in cuts is combined, unions with more than `cut_size` leaves are dropped and
/// dominated cuts are pruned. The survivors are ranked by descending minimum leaf level, then by
/// ascending size, and the first `priority` of them are returned. The sort is stable, so exact
/// ties keep the order in which they were found.
pub(crate) fn merge_cuts<'a, L: LevelOracle + ?Sized>(
    cuts_a: impl IntoIterator<Item = &'a [NodeId]>,
    cuts_b: impl IntoIterator<Item = &'a [NodeId]> + Clone,
    cut_size: usize,
    priority: usize,
    levels: &L,
) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = vec![];
    let mut union = Vec::with_capacity(cut_size);

    for cut_a in cuts_a {
        debug_assert!(cut_a.windows(2).all(|w| w[0] < w[1]));
        for cut_b in cuts_b.clone() {
            if !union_within(cut_a, cut_b, cut_size, &mut union) {
                continue;
            }
            let min_level = union
                .iter()
                .map(|&leaf| levels.level(leaf))
                .min()
                .unwrap_or(u32::MAX);
            insert_candidate(&mut candidates, &union, min_level);
        }
    }

    candidates.sort_by(|a, b| {
        b.min_level
            .cmp(&a.min_level)
            .then_with(|| a.leaves.len().cmp(&b.leaves.len()))
    });
    candidates.truncate(priority);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(indices: &[u32]) -> Vec<NodeId> {
        indices.iter().map(|&i| NodeId::from_u32(i)).collect()
    }

    fn merge(a: &[&[u32]], b: &[&[u32]], cut_size: usize, priority: usize) -> Vec<Vec<u32>> {
        let a: Vec<Vec<NodeId>> = a.iter().map(|cut| nodes(cut)).collect();
        let b: Vec<Vec<NodeId>> = b.iter().map(|cut| nodes(cut)).collect();
        let levels = vec![0u32; 64];
        merge_cuts(
            a.iter().map(Vec::as_slice),
            b.iter().map(Vec::as_slice),
            cut_size,
            priority,
            &levels,
        )
        .into_iter()
        .map(|c| c.leaves.iter().map(|n| n.as_u32()).collect())
        .collect()
    }

    #[test]
    fn union_respects_limit() {
        let mut out = vec![];
        assert!(union_within(&nodes(&[1, 3]), &nodes(&[2, 3]), 3, &mut out));
        assert_eq!(out, nodes(&[1, 2, 3]));
        assert!(!union_within(&nodes(&[1, 3]), &nodes(&[2, 4]), 3, &mut out));
        assert!(union_within(&[], &[], 0, &mut out));
        assert!(out.is_empty());
    }

    #[test]
    fn subset_checks() {
        assert!(is_subset(&nodes(&[]), &nodes(&[1])));
        assert!(is_subset(&nodes(&[2, 5]), &nodes(&[1, 2, 3, 5])));
        assert!(is_subset(&nodes(&[2, 5]), &nodes(&[2, 5])));
        assert!(!is_subset(&nodes(&[2, 6]), &nodes(&[1, 2, 3, 5])));
        assert!(!is_subset(&nodes(&[0, 2]), &nodes(&[1, 2])));
        assert!(!is_subset(&nodes(&[1, 2, 3]), &nodes(&[1, 2])));
    }

    #[test]
    fn smaller_cut_wins_in_either_order() {
        assert_eq!(merge(&[&[1]], &[&[2, 3], &[2]], 4, 8), [vec![1, 2]]);
        assert_eq!(merge(&[&[1]], &[&[2], &[2, 3]], 4, 8), [vec![1, 2]]);
    }

    #[test]
    fn duplicates_are_dropped() {
        assert_eq!(merge(&[&[1], &[1, 2]], &[&[2]], 4, 8), [vec![1, 2]]);
    }

    #[test]
    fn one_subset_replaces_several_supersets() {
        let mut candidates = vec![];
        for cut in [&[1, 2, 3][..], &[4, 5], &[1, 2, 4], &[1, 2, 5]] {
            insert_candidate(&mut candidates, &nodes(cut), 0);
        }
        insert_candidate(&mut candidates, &nodes(&[1, 2]), 0);

        let sets: Vec<Vec<u32>> = candidates
            .iter()
            .map(|c| c.leaves.iter().map(|n| n.as_u32()).collect())
            .collect();
        assert_eq!(sets, [vec![1, 2], vec![4, 5]]);
    }

    #[test]
    fn oversized_unions_are_dropped() {
        assert_eq!(merge(&[&[1, 2]], &[&[3]], 2, 8), Vec::<Vec<u32>>::new());
        assert_eq!(merge(&[&[1, 2]], &[&[3]], 3, 8), [vec![1, 2, 3]]);
    }

    #[test]
    fn ranking_and_truncation() {
        let levels = vec![0, 3, 1, 2, 0, 0, 0, 0];
        let a = [nodes(&[1]), nodes(&[2]), nodes(&[4, 5])];
        let b = [nodes(&[3]), nodes(&[6])];
        let merged = merge_cuts(
            a.iter().map(Vec::as_slice),
            b.iter().map(Vec::as_slice),
            4,
            4,
            &levels,
        );
        let ranked: Vec<(Vec<u32>, u32)> = merged
            .into_iter()
            .map(|c| (c.leaves.iter().map(|n| n.as_u32()).collect(), c.min_level))
            .collect();
        assert_eq!(
            ranked,
            [
                (vec![1, 3], 2),
                (vec![2, 3], 1),
                (vec![1, 6], 0),
                (vec![2, 6], 0),
            ]
        );
    }
}
