//! ListMap: a flat sequence of pairs searched linearly.
//!
//! No hashing and no table; every operation is a scan. It exists as the
//! independent reference the hash-table map is checked against.

use crate::chained_map::ChainedMap;
use crate::kernel::{fmt_pairs, same_pairs, MapError, MapKernel};
use crate::pair::Pair;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

#[derive(Clone)]
pub struct ListMap<K, V> {
    pairs: Vec<Pair<K, V>>,
}

impl<K, V> Default for ListMap<K, V> {
    fn default() -> Self {
        Self { pairs: Vec::new() }
    }
}

impl<K: Eq, V> ListMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I>(pairs: I) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut m = Self::new();
        for (k, v) in pairs {
            m.add(k, v)?;
        }
        Ok(m)
    }

    fn position<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.pairs.iter().position(|p| p.key().borrow() == q)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn has_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.position(q).is_some()
    }

    pub fn add(&mut self, key: K, value: V) -> Result<(), MapError> {
        if self.has_key(&key) {
            return Err(MapError::DuplicateKey);
        }
        self.pairs.push(Pair::new(key, value));
        Ok(())
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Result<Pair<K, V>, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let i = self.position(q).ok_or(MapError::KeyNotFound)?;
        Ok(self.pairs.swap_remove(i))
    }

    /// Removes the last pair in storage order.
    pub fn remove_any(&mut self) -> Result<Pair<K, V>, MapError> {
        self.pairs.pop().ok_or(MapError::EmptyContainer)
    }

    pub fn value<Q>(&self, q: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let i = self.position(q).ok_or(MapError::KeyNotFound)?;
        Ok(self.pairs[i].value())
    }

    pub fn value_mut<Q>(&mut self, q: &Q) -> Result<&mut V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let i = self.position(q).ok_or(MapError::KeyNotFound)?;
        Ok(self.pairs[i].value_mut())
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    pub fn transfer_from(&mut self, source: &mut Self) {
        self.pairs = core::mem::take(&mut source.pairs);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.pairs.iter().map(|p| (p.key(), p.value()))
    }
}

impl<K, V> MapKernel<K, V> for ListMap<K, V>
where
    K: Eq,
{
    fn add(&mut self, key: K, value: V) -> Result<(), MapError> {
        ListMap::add(self, key, value)
    }

    fn remove<Q>(&mut self, key: &Q) -> Result<Pair<K, V>, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        ListMap::remove(self, key)
    }

    fn remove_any(&mut self) -> Result<Pair<K, V>, MapError> {
        ListMap::remove_any(self)
    }

    fn value<Q>(&self, key: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        ListMap::value(self, key)
    }

    fn value_mut<Q>(&mut self, key: &Q) -> Result<&mut V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        ListMap::value_mut(self, key)
    }

    fn has_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        ListMap::has_key(self, key)
    }

    fn len(&self) -> usize {
        ListMap::len(self)
    }

    fn clear(&mut self) {
        ListMap::clear(self)
    }

    fn transfer_from(&mut self, source: &mut Self) {
        ListMap::transfer_from(self, source)
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a,
    {
        ListMap::iter(self)
    }
}

impl<K, V> IntoIterator for ListMap<K, V> {
    type Item = Pair<K, V>;
    type IntoIter = std::vec::IntoIter<Pair<K, V>>;
    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl<K, V> PartialEq for ListMap<K, V>
where
    K: Eq + Hash,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        same_pairs(self, other)
    }
}

impl<K: Eq + Hash, V: Eq> Eq for ListMap<K, V> {}

impl<K, V, S> PartialEq<ChainedMap<K, V, S>> for ListMap<K, V>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher + Clone,
{
    fn eq(&self, other: &ChainedMap<K, V, S>) -> bool {
        same_pairs(self, other)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ListMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.pairs.iter().map(|p| (p.key(), p.value())))
            .finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for ListMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_pairs(f, self.pairs.iter().map(|p| (p.key(), p.value())))
    }
}
