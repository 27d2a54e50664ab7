#![allow(missing_docs)]
use rand::prelude::*;
use rand::SeedableRng;

use super::*;

fn collect(arena: &PagedArena, slot: usize) -> Vec<(Vec<u32>, Vec<u32>)> {
    arena
        .sets(slot)
        .map(|record| (record.extras().to_vec(), record.elements().to_vec()))
        .collect()
}

#[test]
fn documented_layout() {
    let (a, b, c) = (100, 101, 102);
    let mut arena = PagedArena::new(2, 1);

    arena.append_begin(0);
    arena.append_set(0, &[0, 2, 3], &[a]);
    arena.append_set(0, &[1, 3], &[b]);
    arena.assign_singleton(1, 2, &[c]);

    assert_eq!(arena.data, [3, a, 0, 2, 3, 2, b, 1, 3, 1, c, 2]);
    assert_eq!(arena.offset, [0, 9]);
    assert_eq!(arena.count, [2, 1]);
    assert_eq!(arena.total_count(), 3);

    assert_eq!(
        collect(&arena, 0),
        [(vec![a], vec![0, 2, 3]), (vec![b], vec![1, 3])]
    );
    assert_eq!(collect(&arena, 1), [(vec![c], vec![2])]);
}

#[test]
fn trivial_assignments() {
    let mut arena = PagedArena::new(3, 0);
    arena.assign_empty(0, &[]);
    arena.assign_singleton(2, 2, &[]);

    let empty = arena.first_record(0).unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.elements(), &[] as &[u32]);
    assert_eq!(arena.count(0), 1);

    assert_eq!(arena.first_record(2).unwrap().elements(), &[2]);
    assert_eq!(arena.first_record(1).map(|r| r.address()), None);
    assert_eq!(arena.sets(1).len(), 0);
    assert_eq!(arena.state(1), SlotState::Unwritten);
}

#[test]
fn iteration_is_restartable() {
    let mut arena = PagedArena::new(1, 0);
    arena.append_begin(0);
    arena.append_set(0, &[4, 5], &[]);
    arena.append_singleton(0, 0, &[]);

    let records = arena.sets(0);
    let first: Vec<_> = records.clone().map(|r| r.elements().to_vec()).collect();
    let second: Vec<_> = records.map(|r| r.elements().to_vec()).collect();
    assert_eq!(first, second);
    assert_eq!(first, [vec![4, 5], vec![0]]);
}

#[test]
fn protocol_violations() {
    let mut arena = PagedArena::new(3, 1);

    assert_eq!(
        arena.try_assign_empty(3, &[0]),
        Err(ArenaError::SlotOutOfRange { slot: 3, slots: 3 })
    );
    assert_eq!(
        arena.try_assign_empty(0, &[]),
        Err(ArenaError::ExtraLength {
            expected: 1,
            found: 0
        })
    );
    assert_eq!(
        arena.try_append_set(0, &[1], &[0]),
        Err(ArenaError::NotAppending {
            slot: 0,
            state: SlotState::Unwritten
        })
    );

    arena.assign_empty(0, &[7]);
    assert_eq!(
        arena.try_assign_singleton(0, 1, &[7]),
        Err(ArenaError::AlreadyWritten {
            slot: 0,
            state: SlotState::Assigned
        })
    );
    assert_eq!(
        arena.try_append_begin(0),
        Err(ArenaError::AlreadyWritten {
            slot: 0,
            state: SlotState::Assigned
        })
    );
    assert_eq!(
        arena.try_append_singleton(0, 1, &[7]),
        Err(ArenaError::NotAppending {
            slot: 0,
            state: SlotState::Assigned
        })
    );

    arena.append_begin(1);
    arena.append_singleton(1, 1, &[0]);
    arena.append_begin(2);
    assert_eq!(arena.state(1), SlotState::Closed);
    assert_eq!(
        arena.try_append_singleton(1, 2, &[0]),
        Err(ArenaError::SlotClosed { slot: 1 })
    );

    // failed calls leave no trace
    assert_eq!(arena.count(0), 1);
    assert_eq!(arena.count(1), 1);
    assert_eq!(arena.len(), 2 + 3);
}

#[test]
#[should_panic(expected = "already holds data")]
fn double_assignment_panics() {
    let mut arena = PagedArena::new(1, 0);
    arena.assign_singleton(0, 0, &[]);
    arena.assign_empty(0, &[]);
}

#[test]
fn index_lookup_with_out_of_order_slots() {
    let mut arena = PagedArena::new(4, 1);
    arena.assign_singleton(3, 3, &[0]);
    arena.append_begin(1);
    arena.append_begin(0);
    arena.append_set(0, &[1, 2], &[0]);
    arena.append_singleton(0, 0, &[0]);
    arena.assign_empty(2, &[0]);

    for slot in [0, 2, 3] {
        for record in arena.sets(slot) {
            assert_eq!(arena.index(record.address()), Some(slot));
            assert_eq!(arena.index(record.address() + record.extras().len()), Some(slot));
        }
    }
    assert_eq!(arena.count(1), 0);
    assert_eq!(arena.index(arena.len()), None);
}

#[test]
fn record_at_matches_iteration() {
    let mut arena = PagedArena::new(2, 2);
    arena.append_begin(1);
    arena.append_set(1, &[9, 8, 7], &[1, 2]);
    arena.append_set(1, &[], &[3, 4]);

    for record in arena.sets(1) {
        let again = arena.record_at(record.address());
        assert_eq!(again.elements(), record.elements());
        assert_eq!(again.extra(1), record.extra(1));
    }
    assert!(arena.memory() >= arena.len() * std::mem::size_of::<u32>());
}

#[test]
fn random_against_model() {
    let mut rng = rand_pcg::Pcg64::seed_from_u64(0x5eed);

    for _ in 0..20 {
        let slots = rng.gen_range(1..64);
        let extra = rng.gen_range(0..3);
        let mut arena = PagedArena::new(slots, extra);
        let mut model: Vec<Vec<(Vec<u32>, Vec<u32>)>> = vec![vec![]; slots];

        let mut order: Vec<usize> = (0..slots).collect();
        order.shuffle(&mut rng);

        for &slot in &order {
            let extras: Vec<u32> = (0..extra).map(|_| rng.gen()).collect();
            match rng.gen_range(0..3) {
                0 => {
                    arena.assign_empty(slot, &extras);
                    model[slot].push((extras, vec![]));
                }
                1 => {
                    let value = rng.gen_range(0..1000);
                    arena.assign_singleton(slot, value, &extras);
                    model[slot].push((extras, vec![value]));
                }
                _ => {
                    arena.append_begin(slot);
                    for _ in 0..rng.gen_range(0..6) {
                        let extras: Vec<u32> = (0..extra).map(|_| rng.gen()).collect();
                        let values: Vec<u32> =
                            (0..rng.gen_range(0..8)).map(|_| rng.gen()).collect();
                        arena.append_set(slot, &values, &extras);
                        model[slot].push((extras, values));
                    }
                }
            }
        }

        for slot in 0..slots {
            assert_eq!(arena.count(slot), model[slot].len());
            assert_eq!(collect(&arena, slot), model[slot]);
            for record in arena.sets(slot) {
                assert_eq!(arena.index(record.address()), Some(slot));
            }
        }
        assert_eq!(
            arena.total_count(),
            model.iter().map(|sets| sets.len()).sum::<usize>()
        );
    }
}
