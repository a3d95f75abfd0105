//! ChainedMap: bucket array with singly linked collision chains.
//!
//! Nodes live in a generational arena and each bucket holds the head link of
//! its chain. Every node stores the hash computed at insertion, so rehashing
//! relinks nodes without calling `K: Hash` again and without moving pairs.

use crate::config::TableConfig;
use crate::kernel::{fmt_pairs, same_pairs, MapError, MapKernel};
use crate::list_map::ListMap;
use crate::pair::Pair;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;
use slotmap::{DefaultKey, SlotMap};

#[derive(Clone, Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    hash: u64,
    next: Option<DefaultKey>,
}

/// Position of a node inside its chain.
#[derive(Copy, Clone, Debug)]
struct Link {
    bucket: usize,
    prev: Option<DefaultKey>,
    node: DefaultKey,
}

#[derive(Clone)]
pub struct ChainedMap<K, V, S = DefaultHashBuilder> {
    hasher: S,
    config: TableConfig,
    buckets: Vec<Option<DefaultKey>>, // chain heads
    nodes: SlotMap<DefaultKey, Node<K, V>>,
    // Bucket where the last remove_any found a pair.
    any_cursor: usize,
}

impl<K, V> ChainedMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    /// Empty map sized so that `capacity` pairs fit without a rehash.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut m = Self::new();
        m.buckets = vec![None; m.config.buckets_for(capacity)];
        m
    }

    pub fn with_config(config: TableConfig) -> Self {
        Self::with_config_and_hasher(config, Default::default())
    }

    /// Build a map from pairs with pairwise distinct keys.
    ///
    /// The table is sized for the whole input up front. A repeated key fails
    /// the whole construction with `DuplicateKey`.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::from_pairs_with(pairs, TableConfig::default(), Default::default())
    }
}

impl<K, V> Default for ChainedMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Chain walk starting at a bucket head.
struct Chain<'a, K, V> {
    nodes: &'a SlotMap<DefaultKey, Node<K, V>>,
    cur: Option<DefaultKey>,
}

impl<'a, K, V> Iterator for Chain<'a, K, V> {
    type Item = (DefaultKey, &'a Node<K, V>);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cur?;
        let n = self.nodes.get(k)?;
        self.cur = n.next;
        Some((k, n))
    }
}

/// Iterator over immutable entries in `ChainedMap`.
pub struct Iter<'a, K, V> {
    it: slotmap::basic::Iter<'a, DefaultKey, Node<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, n)| (&n.key, &n.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

/// Iterator over entries in `ChainedMap` with mutable values.
pub struct IterMut<'a, K, V> {
    it: slotmap::basic::IterMut<'a, DefaultKey, Node<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, n)| (&n.key, &mut n.value))
    }
}

/// Owning iterator yielding every `Pair`.
pub struct IntoIter<K, V> {
    it: slotmap::basic::IntoIter<DefaultKey, Node<K, V>>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = Pair<K, V>;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, n)| Pair::new(n.key, n.value))
    }
}

impl<K, V, S> ChainedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_config_and_hasher(TableConfig::default(), hasher)
    }

    pub fn with_config_and_hasher(config: TableConfig, hasher: S) -> Self {
        Self {
            hasher,
            config,
            buckets: vec![None; config.initial_buckets()],
            nodes: SlotMap::with_key(),
            any_cursor: 0,
        }
    }

    pub fn from_pairs_with<I>(pairs: I, config: TableConfig, hasher: S) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let pairs: Vec<(K, V)> = pairs.into_iter().collect();
        let mut m = Self::with_config_and_hasher(config, hasher);
        m.buckets = vec![None; config.buckets_for(pairs.len())];
        for (k, v) in pairs {
            m.add(k, v)?;
        }
        Ok(m)
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    #[inline]
    fn bucket_of(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    fn chain(&self, bucket: usize) -> Chain<'_, K, V> {
        Chain {
            nodes: &self.nodes,
            cur: self.buckets[bucket],
        }
    }

    fn find_link<Q>(&self, q: &Q) -> Option<Link>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        let bucket = self.bucket_of(hash);
        let mut prev = None;
        for (k, n) in self.chain(bucket) {
            if n.hash == hash && n.key.borrow() == q {
                return Some(Link {
                    bucket,
                    prev,
                    node: k,
                });
            }
            prev = Some(k);
        }
        None
    }

    fn unlink(&mut self, link: Link) -> Option<Pair<K, V>> {
        let next = self.nodes.get(link.node)?.next;
        match link.prev {
            None => self.buckets[link.bucket] = next,
            Some(p) => self.nodes.get_mut(p)?.next = next,
        }
        self.nodes
            .remove(link.node)
            .map(|n| Pair::new(n.key, n.value))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.bucket_count() as f64
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn has_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_link(q).is_some()
    }

    pub fn value<Q>(&self, q: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let link = self.find_link(q).ok_or(MapError::KeyNotFound)?;
        self.nodes
            .get(link.node)
            .map(|n| &n.value)
            .ok_or(MapError::KeyNotFound)
    }

    pub fn value_mut<Q>(&mut self, q: &Q) -> Result<&mut V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let link = self.find_link(q).ok_or(MapError::KeyNotFound)?;
        self.nodes
            .get_mut(link.node)
            .map(|n| &mut n.value)
            .ok_or(MapError::KeyNotFound)
    }

    pub fn add(&mut self, key: K, value: V) -> Result<(), MapError> {
        let hash = self.make_hash(&key);
        let bucket = self.bucket_of(hash);
        if self
            .chain(bucket)
            .any(|(_, n)| n.hash == hash && n.key == key)
        {
            return Err(MapError::DuplicateKey);
        }

        let head = self.buckets[bucket];
        let k = self.nodes.insert(Node {
            key,
            value,
            hash,
            next: head,
        });
        self.buckets[bucket] = Some(k);

        if self.config.over_threshold(self.len(), self.bucket_count()) {
            self.grow();
        }
        Ok(())
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Result<Pair<K, V>, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let link = self.find_link(q).ok_or(MapError::KeyNotFound)?;
        self.unlink(link).ok_or(MapError::KeyNotFound)
    }

    /// Remove the head of the first non-empty bucket at or after the cursor.
    ///
    /// The cursor stays on the bucket it found, so draining a map costs
    /// O(len + buckets) overall rather than rescanning from bucket 0.
    pub fn remove_any(&mut self) -> Result<Pair<K, V>, MapError> {
        if self.is_empty() {
            return Err(MapError::EmptyContainer);
        }
        let n = self.buckets.len();
        let start = self.any_cursor % n;
        for step in 0..n {
            let bucket = (start + step) % n;
            if let Some(head) = self.buckets[bucket] {
                if bucket != self.any_cursor {
                    log::trace!("remove_any cursor {} -> {}", self.any_cursor, bucket);
                    self.any_cursor = bucket;
                }
                return self
                    .unlink(Link {
                        bucket,
                        prev: None,
                        node: head,
                    })
                    .ok_or(MapError::EmptyContainer);
            }
        }
        Err(MapError::EmptyContainer)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.buckets.iter_mut().for_each(|b| *b = None);
        self.any_cursor = 0;
    }

    /// Take over `source`'s pairs, hasher and config; `source` is left empty
    /// with a fresh table built from its own config.
    pub fn transfer_from(&mut self, source: &mut Self) {
        let fresh = Self::with_config_and_hasher(source.config, source.hasher.clone());
        *self = core::mem::replace(source, fresh);
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.nodes.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.nodes.iter_mut(),
        }
    }

    /// Multiply the bucket count until the load factor holds again, then
    /// rehash once.
    fn grow(&mut self) {
        let old = self.buckets.len();
        let mut new_len = old;
        while self.config.over_threshold(self.len(), new_len) {
            let next = new_len.saturating_mul(self.config.growth_factor());
            if next == new_len {
                break;
            }
            new_len = next;
        }
        if new_len > old {
            self.rehash_to(new_len);
        }
    }

    /// Redistribute every node into a table of `new_len` buckets.
    ///
    /// The new head array is fully allocated before any node is relinked; if
    /// that allocation fails the current table stays in place untouched.
    fn rehash_to(&mut self, new_len: usize) {
        let mut table: Vec<Option<DefaultKey>> = Vec::new();
        if let Err(e) = table.try_reserve_exact(new_len) {
            log::warn!(
                "table growth to {} buckets skipped ({} pairs): {}",
                new_len,
                self.len(),
                e
            );
            return;
        }
        table.resize(new_len, None);

        for head in self.buckets.iter_mut() {
            let mut cur = head.take();
            while let Some(k) = cur {
                let Some(node) = self.nodes.get_mut(k) else {
                    break;
                };
                cur = node.next;
                let idx = (node.hash % new_len as u64) as usize;
                node.next = table[idx];
                table[idx] = Some(k);
            }
        }

        log::debug!(
            "rehashed {} pairs: {} -> {} buckets",
            self.len(),
            self.buckets.len(),
            new_len
        );
        self.buckets = table;
        self.any_cursor = 0;
    }

    /// Structural self-check used by the test suites.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let mut reachable = 0usize;
        for b in 0..self.buckets.len() {
            for (_k, n) in self.chain(b) {
                assert_eq!(
                    self.bucket_of(n.hash),
                    b,
                    "node reachable from the wrong bucket"
                );
                assert_eq!(n.hash, self.make_hash(&n.key), "stored hash is stale");
                reachable += 1;
            }
        }
        assert_eq!(reachable, self.len(), "count disagrees with chains");
        assert!(!self.buckets.is_empty(), "table must have a bucket");
        for (i, (k, _)) in self.iter().enumerate() {
            let dupes = self.iter().skip(i + 1).filter(|(k2, _)| *k2 == k).count();
            assert_eq!(dupes, 0, "duplicate key stored");
        }
    }
}

impl<K, V, S> MapKernel<K, V> for ChainedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone,
{
    fn add(&mut self, key: K, value: V) -> Result<(), MapError> {
        ChainedMap::add(self, key, value)
    }

    fn remove<Q>(&mut self, key: &Q) -> Result<Pair<K, V>, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        ChainedMap::remove(self, key)
    }

    fn remove_any(&mut self) -> Result<Pair<K, V>, MapError> {
        ChainedMap::remove_any(self)
    }

    fn value<Q>(&self, key: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        ChainedMap::value(self, key)
    }

    fn value_mut<Q>(&mut self, key: &Q) -> Result<&mut V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        ChainedMap::value_mut(self, key)
    }

    fn has_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        ChainedMap::has_key(self, key)
    }

    fn len(&self) -> usize {
        ChainedMap::len(self)
    }

    fn clear(&mut self) {
        ChainedMap::clear(self)
    }

    fn transfer_from(&mut self, source: &mut Self) {
        ChainedMap::transfer_from(self, source)
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (&'a K, &'a V)>
    where
        K: 'a,
        V: 'a,
    {
        ChainedMap::iter(self)
    }
}

impl<K, V, S> IntoIterator for ChainedMap<K, V, S> {
    type Item = Pair<K, V>;
    type IntoIter = IntoIter<K, V>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            it: self.nodes.into_iter(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S, T> PartialEq<ChainedMap<K, V, T>> for ChainedMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher + Clone,
    T: BuildHasher + Clone,
{
    fn eq(&self, other: &ChainedMap<K, V, T>) -> bool {
        same_pairs(self, other)
    }
}

impl<K, V, S> Eq for ChainedMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher + Clone,
{
}

impl<K, V, S> PartialEq<ListMap<K, V>> for ChainedMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher + Clone,
{
    fn eq(&self, other: &ListMap<K, V>) -> bool {
        same_pairs(self, other)
    }
}

impl<K, V, S> fmt::Debug for ChainedMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.nodes.values().map(|n| (&n.key, &n.value)))
            .finish()
    }
}

impl<K, V, S> fmt::Display for ChainedMap<K, V, S>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_pairs(f, self.nodes.values().map(|n| (&n.key, &n.value)))
    }
}
