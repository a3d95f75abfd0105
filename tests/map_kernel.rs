// MapKernel fixture suite.
//
// Every scenario runs twice: once against ChainedMap (the map under test)
// and once against ListMap, and each result is compared with a ListMap
// built directly from the expected pairs. The invariants exercised:
// - Construction: a new map is empty.
// - add: a fresh key becomes visible through has_key/value and len.
// - remove: returns the removed pair; the rest of the map is untouched.
// - remove_any: returns some pair that was present, and the map afterwards
//   equals the prior map minus that pair. Which pair is never assumed.
// - value/has_key/len: pure reads leave the map equal to its prior state.
use chained_map::{ChainedMap, ListMap, MapError, MapKernel, Pair, TableConfig};
use std::fmt::Debug;

type S = String;

fn s(x: &str) -> String {
    x.to_string()
}

/// Map under test holding `args` as (key, value) pairs.
fn create_from_args<M>(args: &[(&str, &str)]) -> M
where
    M: MapKernel<S, S> + Default,
{
    let mut map = M::default();
    for (k, v) in args {
        assert!(!map.has_key(*k), "keys in args must be unique");
        map.add(s(k), s(v)).expect("fresh key");
    }
    map
}

fn expected(args: &[(&str, &str)]) -> ListMap<S, S> {
    ListMap::from_pairs(args.iter().map(|(k, v)| (s(k), s(v)))).expect("unique keys")
}

// Runs a generic scenario against both implementations.
macro_rules! both {
    ($name:ident, $body:ident) => {
        mod $name {
            use super::*;
            #[test]
            fn chained() {
                $body::<ChainedMap<S, S>>();
            }
            #[test]
            fn list() {
                $body::<ListMap<S, S>>();
            }
        }
    };
}

fn no_argument_constructor<M>()
where
    M: MapKernel<S, S> + Default + PartialEq<ListMap<S, S>> + Debug,
{
    let map: M = create_from_args(&[]);
    assert_eq!(map, expected(&[]));
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
}
both!(constructor, no_argument_constructor);

fn add_to_empty<M>()
where
    M: MapKernel<S, S> + Default + PartialEq<ListMap<S, S>> + Debug,
{
    let mut map: M = create_from_args(&[]);
    map.add(s("1"), s("one")).unwrap();
    assert!(map.has_key("1"));
    assert_eq!(map.value("1"), Ok(&s("one")));
    assert_eq!(map.len(), 1);
    assert_eq!(map, expected(&[("1", "one")]));
}
both!(add_empty, add_to_empty);

fn add_to_non_empty<M>()
where
    M: MapKernel<S, S> + Default + PartialEq<ListMap<S, S>> + Debug,
{
    let mut map: M = create_from_args(&[("1", "one")]);
    map.add(s("2"), s("two")).unwrap();
    assert_eq!(map, expected(&[("1", "one"), ("2", "two")]));
}
both!(add_non_empty, add_to_non_empty);

fn add_duplicate_is_rejected<M>()
where
    M: MapKernel<S, S> + Default + PartialEq<ListMap<S, S>> + Debug,
{
    let mut map: M = create_from_args(&[("1", "one")]);
    assert_eq!(map.add(s("1"), s("uno")), Err(MapError::DuplicateKey));
    assert_eq!(map, expected(&[("1", "one")]));
}
both!(add_duplicate, add_duplicate_is_rejected);

fn remove_resulting_in_empty<M>()
where
    M: MapKernel<S, S> + Default + PartialEq<ListMap<S, S>> + Debug,
{
    let mut map: M = create_from_args(&[("1", "one")]);
    let p = map.remove("1").unwrap();
    assert_eq!(p, Pair::new(s("1"), s("one")));
    assert_eq!(map, expected(&[]));
}
both!(remove_empty, remove_resulting_in_empty);

fn remove_resulting_in_non_empty<M>()
where
    M: MapKernel<S, S> + Default + PartialEq<ListMap<S, S>> + Debug,
{
    let mut map: M = create_from_args(&[("1", "one"), ("2", "two")]);
    let p = map.remove("1").unwrap();
    assert_eq!(p.value(), "one");
    assert_eq!(map, expected(&[("2", "two")]));
}
both!(remove_non_empty, remove_resulting_in_non_empty);

fn remove_missing_key<M>()
where
    M: MapKernel<S, S> + Default + PartialEq<ListMap<S, S>> + Debug,
{
    let mut map: M = create_from_args(&[("1", "one")]);
    assert_eq!(map.remove("9").unwrap_err(), MapError::KeyNotFound);
    assert_eq!(map, expected(&[("1", "one")]));
}
both!(remove_missing, remove_missing_key);

fn remove_any_resulting_in_empty<M>()
where
    M: MapKernel<S, S> + Default + PartialEq<ListMap<S, S>> + Debug,
{
    let mut map: M = create_from_args(&[("1", "one")]);
    let pair = map.remove_any().unwrap();
    let mut map_expected = expected(&[("1", "one")]);
    assert!(map_expected.has_key(pair.key()));
    assert_eq!(map_expected.remove(pair.key()).unwrap(), pair);
    assert_eq!(map, map_expected);
    assert!(map.is_empty());
}
both!(remove_any_empty, remove_any_resulting_in_empty);

fn remove_any_resulting_in_non_empty<M>()
where
    M: MapKernel<S, S> + Default + PartialEq<ListMap<S, S>> + Debug,
{
    let mut map: M = create_from_args(&[("1", "one"), ("2", "two"), ("3", "three")]);
    let pair = map.remove_any().unwrap();
    let mut map_expected = expected(&[("1", "one"), ("2", "two"), ("3", "three")]);
    assert!(["1", "2", "3"].contains(&pair.key().as_str()));
    assert_eq!(map_expected.remove(pair.key()).unwrap(), pair);
    assert_eq!(map, map_expected);
    assert_eq!(map.len(), 2);
}
both!(remove_any_non_empty, remove_any_resulting_in_non_empty);

fn remove_any_on_empty<M>()
where
    M: MapKernel<S, S> + Default + PartialEq<ListMap<S, S>> + Debug,
{
    let mut map: M = create_from_args(&[]);
    assert_eq!(map.remove_any().unwrap_err(), MapError::EmptyContainer);
    assert_eq!(map, expected(&[]));
}
both!(remove_any_empty_map, remove_any_on_empty);

fn value_lookup<M>()
where
    M: MapKernel<S, S> + Default + PartialEq<ListMap<S, S>> + Debug,
{
    let map: M = create_from_args(&[("1", "one"), ("2", "two")]);
    assert_eq!(map.value("1").map(String::as_str), Ok("one"));
    assert_eq!(map.value("3"), Err(MapError::KeyNotFound));
    assert_eq!(map, expected(&[("1", "one"), ("2", "two")]));
}
both!(value, value_lookup);

fn has_key_true_and_false<M>()
where
    M: MapKernel<S, S> + Default + PartialEq<ListMap<S, S>> + Debug,
{
    let map: M = create_from_args(&[("1", "one"), ("2", "two")]);
    assert!(map.has_key("1"));
    assert!(!map.has_key("3"));
    assert_eq!(map, expected(&[("1", "one"), ("2", "two")]));

    let empty: M = create_from_args(&[]);
    assert!(!empty.has_key("x"));
}
both!(has_key, has_key_true_and_false);

fn size_empty_and_non_empty<M>()
where
    M: MapKernel<S, S> + Default + PartialEq<ListMap<S, S>> + Debug,
{
    let empty: M = create_from_args(&[]);
    assert_eq!(empty.len(), 0);
    let map: M = create_from_args(&[("1", "one"), ("2", "two")]);
    assert_eq!(map.len(), 2);
    assert_eq!(map, expected(&[("1", "one"), ("2", "two")]));
}
both!(size, size_empty_and_non_empty);

fn replace_and_reverse_lookup<M>()
where
    M: MapKernel<S, S> + Default + PartialEq<ListMap<S, S>> + Debug,
{
    let mut map: M = create_from_args(&[("1", "one"), ("2", "two")]);
    assert_eq!(map.replace_value("1", s("uno")), Ok(s("one")));
    assert_eq!(map.key_of(&s("uno")).map(String::as_str), Some("1"));
    assert!(map.has_value(&s("two")));
    assert!(!map.has_value(&s("one")));
    assert_eq!(map, expected(&[("1", "uno"), ("2", "two")]));
}
both!(replace_value, replace_and_reverse_lookup);

fn transfer_and_clear<M>()
where
    M: MapKernel<S, S> + Default + PartialEq<ListMap<S, S>> + Debug,
{
    let mut source: M = create_from_args(&[("1", "one"), ("2", "two")]);
    let mut target: M = create_from_args(&[("9", "nine")]);
    target.transfer_from(&mut source);
    assert_eq!(source, expected(&[]));
    assert_eq!(target, expected(&[("1", "one"), ("2", "two")]));
    target.clear();
    assert_eq!(target, expected(&[]));
    target.add(s("3"), s("three")).unwrap();
    assert_eq!(target, expected(&[("3", "three")]));
}
both!(transfer, transfer_and_clear);

// Equality holds across implementations, bucket counts and insertion order.
#[test]
fn equality_across_layouts() {
    let pairs = [("a", "1"), ("b", "2"), ("c", "3"), ("d", "4"), ("e", "5")];
    let mut tiny: ChainedMap<S, S> = ChainedMap::with_config(
        TableConfig::new()
            .with_initial_buckets(1)
            .and_then(|c| c.with_max_load_factor(4.0))
            .unwrap(),
    );
    for (k, v) in pairs.iter().rev() {
        tiny.add(s(k), s(v)).unwrap();
    }
    let big: ChainedMap<S, S> = create_from_args(&pairs);
    let wide: ChainedMap<S, S> = {
        let mut m = ChainedMap::with_capacity(1000);
        for (k, v) in &pairs {
            m.add(s(k), s(v)).unwrap();
        }
        m
    };
    let list: ListMap<S, S> = create_from_args(&pairs);
    assert_ne!(tiny.bucket_count(), wide.bucket_count());
    assert_eq!(tiny, big);
    assert_eq!(big, wide);
    assert_eq!(wide, list);
    assert_eq!(list, tiny);
}

#[test]
fn display_lists_every_pair() {
    let map: ChainedMap<S, S> = create_from_args(&[("1", "one"), ("2", "two")]);
    let text = map.to_string();
    assert!(text == "{(1,one),(2,two)}" || text == "{(2,two),(1,one)}", "{}", text);
}
