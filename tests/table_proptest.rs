// HashTable property tests.
//
// Model: a std HashMap<u32, u32> from key to payload.
// Operations: add, get_or_add, remove, take-by-handle, filtered cursor walk,
// reserve, clear.
// Invariant after each step: len matches the model, every model key is found
// with its payload, every stored record is in the model, and the load factor
// never exceeds 0.7.
use std::collections::HashMap as ModelMap;
use std::collections::HashSet;

use proptest::prelude::*;
use slot_table::HashTable;
use slot_table::Pair;
use slot_table::capacity;
use slot_table::hasher::KeyHasher;
use slot_table::hasher::MixHasher;

/// Sends runs of four consecutive keys to the same home slot, so removals
/// always have colliding neighbours to shift back.
#[derive(Clone, Copy, Default)]
struct Clustered;

impl KeyHasher for Clustered {
    fn hash_word(&self, word: u64) -> u64 {
        word & !3
    }
}

#[derive(Debug, Clone)]
enum Op {
    Add(u32, u32),
    GetOrAdd(u32),
    Remove(u32),
    TakeFound(u32),
    WalkRemove { modulus: u32, residue: u32 },
    Reserve(u8),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0u32..96, any::<u32>()).prop_map(|(k, v)| Op::Add(k, v)),
        3 => (0u32..96).prop_map(Op::GetOrAdd),
        4 => (0u32..96).prop_map(Op::Remove),
        2 => (0u32..96).prop_map(Op::TakeFound),
        1 => (2u32..5, 0u32..5).prop_map(|(modulus, residue)| Op::WalkRemove {
            modulus,
            residue: residue % modulus,
        }),
        1 => any::<u8>().prop_map(Op::Reserve),
        1 => Just(Op::Clear),
    ]
}

fn check<H: KeyHasher>(
    table: &HashTable<Pair<u32, u32>, H>,
    model: &ModelMap<u32, u32>,
) -> Result<(), TestCaseError> {
    prop_assert_eq!(table.len(), model.len());
    prop_assert!(!capacity::exceeds_max_load(table.len(), table.capacity()));
    for (k, v) in model {
        let record = table.get(k);
        prop_assert!(record.is_some(), "key {} missing", k);
        prop_assert_eq!(record.map(|p| p.value), Some(*v));
    }
    for pair in table.iter() {
        prop_assert_eq!(model.get(&pair.key), Some(&pair.value));
    }
    Ok(())
}

fn run<H: KeyHasher>(
    mut table: HashTable<Pair<u32, u32>, H>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: ModelMap<u32, u32> = ModelMap::new();

    for op in ops {
        match op {
            Op::Add(k, v) => {
                if model.insert(k, v).is_some() {
                    let (pair, found) = table.get_or_add(k).unwrap();
                    prop_assert!(found);
                    pair.value = v;
                } else {
                    table.add(k).unwrap().value = v;
                }
            }
            Op::GetOrAdd(k) => {
                let (pair, found) = table.get_or_add(k).unwrap();
                prop_assert_eq!(found, model.contains_key(&k));
                if !found {
                    prop_assert_eq!(pair.value, 0);
                    model.insert(k, 0);
                }
            }
            Op::Remove(k) => {
                prop_assert_eq!(table.remove(&k), model.remove(&k).is_some());
            }
            Op::TakeFound(k) => match table.find(&k) {
                Some(handle) => {
                    prop_assert_eq!(table.record(handle).key, k);
                    let taken = table.remove_node(handle);
                    prop_assert_eq!(Some(taken.value), model.remove(&k));
                }
                None => prop_assert!(!model.contains_key(&k)),
            },
            Op::WalkRemove { modulus, residue } => {
                let mut seen = HashSet::new();
                let mut cursor = table.first();
                while let Some(handle) = cursor {
                    let key = table.record(handle).key;
                    seen.insert(key);
                    cursor = if key % modulus == residue {
                        table.remove_and_next(handle)
                    } else {
                        table.next(handle)
                    };
                }
                // Nothing present at the start of the walk was skipped.
                for k in model.keys() {
                    prop_assert!(seen.contains(k), "walk skipped key {}", k);
                }
                model.retain(|k, _| k % modulus != residue);
            }
            Op::Reserve(extra) => {
                let slots = table.capacity();
                table.reserve(extra as usize).unwrap();
                prop_assert!(table.capacity() >= slots);
                prop_assert!(!capacity::exceeds_max_load(
                    table.len() + extra as usize,
                    table.capacity()
                ));
            }
            Op::Clear => {
                let slots = table.capacity();
                table.clear();
                model.clear();
                prop_assert_eq!(table.capacity(), slots);
            }
        }

        check(&table, &model)?;
    }

    Ok(())
}

proptest! {
    #[test]
    fn prop_table_matches_model(ops in proptest::collection::vec(op(), 1..200)) {
        let table = HashTable::with_capacity_and_hasher(capacity::MIN_SLOTS, MixHasher).unwrap();
        run(table, ops)?;
    }

    #[test]
    fn prop_clustered_table_matches_model(ops in proptest::collection::vec(op(), 1..200)) {
        let table = HashTable::with_capacity_and_hasher(capacity::MIN_SLOTS, Clustered).unwrap();
        run(table, ops)?;
    }

    #[test]
    fn prop_presized_table_never_grows(
        keys in proptest::collection::hash_set(any::<u32>(), 0..300)
    ) {
        let mut table: HashTable<Pair<u32, u32>> = HashTable::for_max_items(keys.len()).unwrap();
        let slots = table.capacity();
        for &k in &keys {
            table.add(k).unwrap().value = k;
        }
        prop_assert_eq!(table.capacity(), slots);
        prop_assert_eq!(table.len(), keys.len());
        for &k in &keys {
            prop_assert_eq!(table.get(&k).map(|p| p.value), Some(k));
        }
    }
}
