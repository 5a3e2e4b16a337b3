use bstrees::BinarySearchTree;

use std::collections::{BTreeMap, HashSet};

use crate::{do_ops, init_tracing, matches, Op};

quickcheck::quickcheck! {
    fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
        init_tracing();
        let mut tree = BinarySearchTree::new();
        let mut map = BTreeMap::new();

        do_ops(&ops, &mut tree, &mut map) && matches(&tree, &map)
    }
}

quickcheck::quickcheck! {
    fn contains(xs: Vec<i8>) -> bool {
        let tree: BinarySearchTree<_> = xs.iter().copied().collect();

        xs.iter().all(|x| tree.contains(x))
    }
}

quickcheck::quickcheck! {
    fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
        let tree: BinarySearchTree<_> = xs.iter().copied().collect();
        let added: HashSet<_> = xs.into_iter().collect();
        let nots: HashSet<_> = nots.into_iter().collect();
        let mut nots = nots.difference(&added);

        nots.all(|x| !tree.contains(x) && tree.count(x) == 0)
    }
}

quickcheck::quickcheck! {
    fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
        let mut tree: BinarySearchTree<_> = xs.iter().copied().collect();
        for delete in &deletes {
            // We may have inserted the same value multiple times - delete each one.
            while tree.remove(delete) {}
        }

        let mut still_present = xs;
        still_present.retain(|x| !deletes.contains(x));

        deletes.iter().all(|x| !tree.contains(x))
            && still_present.iter().all(|x| tree.contains(x))
            && tree.size() == still_present.len()
    }
}

quickcheck::quickcheck! {
    fn min_max_match_sorted_keys(xs: Vec<i16>) -> bool {
        let tree: BinarySearchTree<_> = xs.iter().copied().collect();

        tree.min() == xs.iter().min() && tree.max() == xs.iter().max()
    }
}

quickcheck::quickcheck! {
    fn neighbours_match_range_queries(xs: Vec<i16>, probes: Vec<i16>) -> bool {
        let tree: BinarySearchTree<_> = xs.iter().copied().collect();
        let map: BTreeMap<i16, ()> = xs.iter().map(|x| (*x, ())).collect();

        probes.iter().all(|p| {
            let above = match p.checked_add(1) {
                Some(next) => map.range(next..).next().map(|(k, _)| k),
                None => None,
            };

            tree.predecessor(p) == map.range(..*p).next_back().map(|(k, _)| k)
                && tree.successor(p) == above
        })
    }
}

quickcheck::quickcheck! {
    fn traversals_visit_every_key_once(xs: Vec<i8>) -> bool {
        let tree: BinarySearchTree<_> = xs.iter().copied().collect();
        let mut distinct = xs;
        distinct.sort_unstable();
        distinct.dedup();

        fn sorted(mut keys: Vec<&i8>) -> Vec<&i8> {
            keys.sort_unstable();
            keys
        }
        let expected: Vec<&i8> = distinct.iter().collect();

        tree.inorder() == expected
            && sorted(tree.preorder()) == expected
            && sorted(tree.postorder()) == expected
            && sorted(tree.level_order()) == expected
    }
}

quickcheck::quickcheck! {
    fn preorder_starts_and_postorder_ends_at_root(xs: Vec<i8>) -> bool {
        let tree: BinarySearchTree<_> = xs.iter().copied().collect();

        // Without rotations the first key inserted stays at the root.
        match xs.first() {
            Some(root) => {
                tree.preorder().first() == Some(&root)
                    && tree.postorder().last() == Some(&root)
                    && tree.level_order().first() == Some(&root)
            }
            None => tree.is_empty(),
        }
    }
}

#[test]
fn sorted_input_degenerates() {
    let tree: BinarySearchTree<_> = (0..10).collect();

    assert_eq!(tree.height(), Some(9));
    assert_eq!(tree.validate(), Ok(()));
}

#[test]
fn duplicates_count_up_and_down() {
    let mut tree = BinarySearchTree::new();
    for _ in 0..5 {
        tree.insert(7);
    }
    assert_eq!(tree.count(&7), 5);
    assert_eq!(tree.size(), 5);

    for _ in 0..5 {
        assert!(tree.remove(&7));
    }
    assert!(!tree.contains(&7));
    assert!(!tree.remove(&7));
    assert!(tree.is_empty());
}
