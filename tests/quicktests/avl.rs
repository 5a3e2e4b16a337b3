use bstrees::AvlTree;

use std::collections::BTreeMap;

use crate::{do_ops, init_tracing, matches, Op};

/// The AVL height bound, `1.44 * lg(n + 2)`, counted in edges.
fn within_avl_bound(height: usize, size: usize) -> bool {
    (height as f64) < 1.45 * ((size + 2) as f64).log2()
}

quickcheck::quickcheck! {
    fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
        init_tracing();
        let mut tree = AvlTree::new();
        let mut map = BTreeMap::new();

        do_ops(&ops, &mut tree, &mut map)
            && matches(&tree, &map)
            && (-1..=1).contains(&tree.balance_factor())
    }
}

quickcheck::quickcheck! {
    fn height_stays_logarithmic(xs: Vec<i16>) -> bool {
        let tree: AvlTree<_> = xs.into_iter().collect();
        let nodes = tree.inorder().len();

        match tree.height() {
            Some(height) => within_avl_bound(height, nodes),
            None => nodes == 0,
        }
    }
}

quickcheck::quickcheck! {
    fn insert_then_remove_keeps_contents(xs: Vec<i8>, x: i8) -> bool {
        let mut tree: AvlTree<_> = xs.iter().copied().filter(|k| *k != x).collect();
        let before: Vec<(i8, usize)> = tree.inorder().into_iter().map(|k| (*k, tree.count(k))).collect();

        tree.insert(x);
        let removed = tree.remove(&x);
        let after: Vec<(i8, usize)> = tree.inorder().into_iter().map(|k| (*k, tree.count(k))).collect();

        removed && before == after && tree.validate().is_ok()
    }
}

#[test]
fn sorted_input_stays_shallow() {
    let tree: AvlTree<_> = (0..1023).collect();

    // A perfect tree of 1023 nodes is nine edges tall, and that's what
    // ascending AVL inserts build.
    assert_eq!(tree.height(), Some(9));
    assert_eq!(tree.balance_factor(), 0);
    assert_eq!(tree.validate(), Ok(()));
}

#[test]
fn deleting_everything_in_order_stays_valid() {
    let mut tree: AvlTree<_> = (0..200).collect();
    for k in 0..200 {
        assert!(tree.remove(&k));
        assert_eq!(tree.validate(), Ok(()));
        assert!(within_avl_bound(tree.height().unwrap_or(0), tree.size()));
    }
    assert!(tree.is_empty());
    assert_eq!(tree.height(), None);
    assert_eq!(tree.balance_factor(), 0);
}
