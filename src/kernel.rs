//! MapKernel: the contract shared by every map implementation in the crate.

use crate::pair::Pair;
use core::borrow::Borrow;
use core::fmt;
use core::hash::Hash;

/// Precondition violations reported by map operations.
///
/// A failing operation never mutates the map.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MapError {
    /// `add` was called with a key that is already present.
    DuplicateKey,
    /// The requested key is not in the map.
    KeyNotFound,
    /// `remove_any` was called on an empty map.
    EmptyContainer,
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::DuplicateKey => f.write_str("key is already present in the map"),
            MapError::KeyNotFound => f.write_str("key is not present in the map"),
            MapError::EmptyContainer => f.write_str("map is empty"),
        }
    }
}

impl std::error::Error for MapError {}

/// Key/value container with unique keys.
///
/// Implementations differ only in representation; two maps holding the same
/// pairs are equal no matter how either one stores them.
pub trait MapKernel<K, V> {
    /// Insert a pair whose key is not yet present.
    fn add(&mut self, key: K, value: V) -> Result<(), MapError>;

    /// Remove and return the pair for `key`.
    fn remove<Q>(&mut self, key: &Q) -> Result<Pair<K, V>, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq;

    /// Remove and return some pair. Which one is unspecified.
    fn remove_any(&mut self) -> Result<Pair<K, V>, MapError>;

    fn value<Q>(&self, key: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq;

    fn value_mut<Q>(&mut self, key: &Q) -> Result<&mut V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq;

    fn has_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq;

    /// Number of pairs.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every pair.
    fn clear(&mut self);

    /// Move all of `source` into `self`, replacing whatever `self` held.
    /// `source` is left empty.
    fn transfer_from(&mut self, source: &mut Self)
    where
        Self: Sized;

    /// Borrowing traversal of every pair, in unspecified order.
    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a;

    /// Swap in a new value for an existing key and return the old one.
    fn replace_value<Q>(&mut self, key: &Q, value: V) -> Result<V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.value_mut(key)?;
        Ok(core::mem::replace(slot, value))
    }

    /// Some key currently associated with `value`.
    fn key_of<'a>(&'a self, value: &V) -> Option<&'a K>
    where
        K: 'a,
        V: PartialEq + 'a,
    {
        self.iter().find(|(_, v)| *v == value).map(|(k, _)| k)
    }

    fn has_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.key_of(value).is_some()
    }
}

/// Set equality of the pairs held by two maps, whatever their representation.
///
/// Keys are unique on both sides, so equal sizes plus one-way inclusion is
/// enough.
pub fn same_pairs<K, V, A, B>(a: &A, b: &B) -> bool
where
    K: Hash + Eq,
    V: PartialEq,
    A: MapKernel<K, V>,
    B: MapKernel<K, V>,
{
    a.len() == b.len()
        && a
            .iter()
            .all(|(k, v)| b.value(k).map(|w| w == v).unwrap_or(false))
}

/// Render pairs as `{(k,v),(k,v)}`.
pub(crate) fn fmt_pairs<'a, K, V, I>(f: &mut fmt::Formatter<'_>, pairs: I) -> fmt::Result
where
    K: fmt::Display + 'a,
    V: fmt::Display + 'a,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    f.write_str("{")?;
    for (i, (k, v)) in pairs.enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "({},{})", k, v)?;
    }
    f.write_str("}")
}
