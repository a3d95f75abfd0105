//! chained-map: a key/value map built on an explicit bucket array with
//! separate chaining, plus a sequence-backed reference map with the same
//! contract.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: own every piece of the associative container (bucket array,
//!   collision chains, rehash policy) instead of delegating to a library
//!   hash map, while keeping the contract small and checkable.
//! - Layers:
//!   - `MapKernel<K, V>`: the contract. `add`, `remove`, `remove_any`,
//!     `value`, `has_key`, `len`, plus `value_mut`, `replace_value`,
//!     `key_of`, `has_value`, `clear`, `transfer_from` and `iter`.
//!   - `ChainedMap<K, V, S>`: bucket heads over a generational node arena;
//!     each bucket is a singly linked chain.
//!   - `ListMap<K, V>`: flat `Vec` of pairs with linear search. No hashing;
//!     used as the independent model in equivalence tests.
//!
//! Constraints
//! - Single-threaded, in-memory; no interior mutability.
//! - Unique keys: `add` on a present key fails with `DuplicateKey` and
//!   never overwrites.
//! - Failed operations (`DuplicateKey`, `KeyNotFound`, `EmptyContainer`)
//!   perform no mutation.
//! - Equality is set equality of pairs, across implementations and
//!   regardless of table length, hasher or rehash history.
//!
//! Hashing and rehashing
//! - Each node stores the `u64` hash computed when it was added. Bucket
//!   selection is `hash % bucket_count`; rehashing relinks nodes by their
//!   stored hash, so `K: Hash` is never invoked after insertion and no pair
//!   moves in memory.
//! - Once `len / buckets` exceeds `max_load_factor` the bucket count is
//!   multiplied by `growth_factor` until the bound holds again, followed by
//!   a single rehash (see `TableConfig`). It never shrinks.
//! - The new head array is allocated in full before any relinking; if that
//!   allocation fails the old table is kept and the map stays valid.
//!
//! remove_any
//! - Takes the head of the first non-empty bucket at or after a rotating
//!   cursor. Callers get no ordering guarantee; only that the returned pair
//!   was present and is now gone.
//!
//! Notes and non-goals
//! - No concurrent access; wrap in a lock if shared.
//! - No serialization or persistence.
//! - Keys are immutable once stored; there is no `key_mut`.

mod chained_map;
mod chained_map_proptest;
pub mod config;
mod kernel;
mod list_map;
mod pair;

// Public surface
pub use chained_map::{ChainedMap, IntoIter, Iter, IterMut};
pub use config::{ConfigError, TableConfig};
pub use kernel::{same_pairs, MapError, MapKernel};
pub use list_map::ListMap;
pub use pair::Pair;
