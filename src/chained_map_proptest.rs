#![cfg(test)]

// Property tests for ChainedMap kept inside the crate so they can run the
// structural self-check after every step.

use crate::chained_map::ChainedMap;
use crate::config::TableConfig;
use crate::kernel::MapError;
use crate::list_map::ListMap;
use core::hash::BuildHasher;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hasher;

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Add(usize, i32),
    Remove(usize),
    RemoveAny,
    Value(usize),
    HasKey(String),
    Replace(usize, i32),
    Iterate,
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let has_key_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Add(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => Just(OpI::RemoveAny),
            1 => idx.clone().prop_map(OpI::Value),
            1 => prop_oneof![
                has_key_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::HasKey),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Replace(i, v)),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn small_config() -> TableConfig {
    TableConfig::new()
        .with_initial_buckets(1)
        .and_then(|c| c.with_max_load_factor(1.0))
        .expect("valid config")
}

// Drive one scenario against the ListMap model.
// Invariants exercised across random operation sequences:
// - Duplicate adds are rejected and leave both maps unchanged.
// - `remove`/`value` agree with the model, including KeyNotFound.
// - `remove_any` returns a pair the model held with the same value, and the
//   map afterwards equals the model minus that pair.
// - Chains stay consistent with stored hashes and the count after every op;
//   the table never shrinks.
fn run<S>(
    mut sut: ChainedMap<Key, i32, S>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    S: BuildHasher + Clone,
{
    let mut model: ListMap<Key, i32> = ListMap::new();
    let mut buckets = sut.bucket_count();

    for op in ops {
        match op {
            OpI::Add(i, v) => {
                let k = key_from(&pool, i);
                let already = model.has_key(&k);
                match sut.add(k.clone(), v) {
                    Ok(()) => {
                        prop_assert!(!already, "add must fail on duplicate");
                        model.add(k, v).expect("model accepts fresh key");
                    }
                    Err(MapError::DuplicateKey) => {
                        prop_assert!(already, "duplicate error only when key exists");
                    }
                    Err(e) => prop_assert!(false, "unexpected error {:?}", e),
                }
            }
            OpI::Remove(i) => {
                let k = key_from(&pool, i);
                match (sut.remove(&k), model.remove(&k)) {
                    (Ok(p), Ok(mp)) => prop_assert_eq!(p, mp),
                    (Err(e), Err(me)) => {
                        prop_assert_eq!(e, MapError::KeyNotFound);
                        prop_assert_eq!(me, MapError::KeyNotFound);
                    }
                    (s, m) => prop_assert!(false, "remove diverged: {:?} vs {:?}", s, m),
                }
            }
            OpI::RemoveAny => match sut.remove_any() {
                Ok(p) => {
                    prop_assert_eq!(model.value(p.key()), Ok(p.value()));
                    model.remove(p.key()).expect("model held pair");
                    prop_assert!(!sut.has_key(p.key()));
                }
                Err(e) => {
                    prop_assert_eq!(e, MapError::EmptyContainer);
                    prop_assert!(model.is_empty());
                }
            },
            OpI::Value(i) => {
                let k = key_from(&pool, i);
                prop_assert_eq!(sut.value(&k), model.value(&k));
            }
            OpI::HasKey(s) => {
                prop_assert_eq!(sut.has_key(s.as_str()), model.has_key(s.as_str()));
            }
            OpI::Replace(i, v) => {
                let k = key_from(&pool, i);
                match (sut.value_mut(&k), model.value_mut(&k)) {
                    (Ok(a), Ok(b)) => {
                        prop_assert_eq!(*a, *b);
                        *a = v;
                        *b = v;
                    }
                    (Err(_), Err(_)) => {}
                    _ => prop_assert!(false, "value_mut diverged"),
                }
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<_> = sut.iter().map(|(k, _)| k.clone()).collect();
                let m_keys: BTreeSet<_> = model.iter().map(|(k, _)| k.clone()).collect();
                prop_assert_eq!(s_keys, m_keys);
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
            }
        }

        // Post-conditions after each op
        sut.check_invariants();
        prop_assert!(sut == model, "map diverged from model");
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.bucket_count() >= buckets, "table shrank");
        prop_assert!(sut.load_factor() <= sut.config().max_load_factor());
        buckets = sut.bucket_count();
    }
    Ok(())
}

// Property: state-machine equivalence against ListMap, starting from a
// single bucket so rehashing happens early and often.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run(ChainedMap::with_config(small_config()), pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: same invariants under worst-case collisions, where every pair
// shares one chain no matter how far the table grows.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run(
            ChainedMap::with_config_and_hasher(small_config(), ConstBuildHasher),
            pool,
            ops,
        )?;
    }
}

// Property: inserting one at a time through many rehashes gives the same map
// as bulk construction from the same pairs.
proptest! {
    #[test]
    fn prop_rehash_transparency(keys in proptest::collection::btree_set(any::<u32>(), 0..300)) {
        let pairs: Vec<(u32, u32)> = keys.iter().map(|&k| (k, k ^ 0x5a5a)).collect();
        let mut one_by_one: ChainedMap<u32, u32> = ChainedMap::with_config(small_config());
        for &(k, v) in &pairs {
            one_by_one.add(k, v).expect("distinct keys");
        }
        let bulk = ChainedMap::from_pairs(pairs.iter().copied()).expect("distinct keys");
        one_by_one.check_invariants();
        bulk.check_invariants();
        prop_assert!(one_by_one == bulk);
        for &(k, v) in &pairs {
            prop_assert_eq!(one_by_one.value(&k), Ok(&v));
            prop_assert_eq!(bulk.value(&k), Ok(&v));
        }
    }
}
