//! Property tests run against the public API of every tree variant.

use std::collections::BTreeMap;
use std::sync::Once;

use bstrees::{Balance, Tree};
use quickcheck::{Arbitrary, Gen};

mod avl;
mod bst;

/// An enum for the various kinds of "things" to do to
/// binary search trees in a quicktest.
#[derive(Copy, Clone, Debug)]
pub enum Op<K> {
    /// Insert one instance of K into the data structure
    Insert(K),
    /// Remove one instance of K from the data structure
    Remove(K),
}

impl<K> Arbitrary for Op<K>
where
    K: Arbitrary,
{
    /// Tells quickcheck how to randomly choose an operation
    fn arbitrary(g: &mut Gen) -> Self {
        if bool::arbitrary(g) {
            Op::Insert(K::arbitrary(g))
        } else {
            Op::Remove(K::arbitrary(g))
        }
    }
}

static TRACING: Once = Once::new();

/// Routes the trees' trace events to the test output. Set `RUST_LOG=trace` to see them.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Applies a set of operations to a tree and a map of key counts.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we have the same multiset of keys in both. Returns `false`
/// as soon as `remove` disagrees with the map or the tree stops validating.
pub fn do_ops<K, B>(ops: &[Op<K>], tree: &mut Tree<K, B>, map: &mut BTreeMap<K, usize>) -> bool
where
    K: Ord + Clone,
    B: Balance,
{
    for op in ops {
        match op {
            Op::Insert(k) => {
                tree.insert(k.clone());
                *map.entry(k.clone()).or_default() += 1;
            }
            Op::Remove(k) => {
                let expected = match map.get(k).copied() {
                    Some(1) => map.remove(k).is_some(),
                    Some(count) => map.insert(k.clone(), count - 1).is_some(),
                    None => false,
                };
                if tree.remove(k) != expected {
                    return false;
                }
            }
        }
        if tree.validate().is_err() {
            return false;
        }
    }
    true
}

/// Whether the tree holds exactly the multiset in `map`.
pub fn matches<K, B>(tree: &Tree<K, B>, map: &BTreeMap<K, usize>) -> bool
where
    K: Ord,
    B: Balance,
{
    tree.size() == map.values().sum::<usize>()
        && tree.inorder().into_iter().eq(map.keys())
        && map.iter().all(|(k, count)| tree.count(k) == *count)
}
