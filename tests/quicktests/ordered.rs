use ordered_tree::{Order, OrderedTree, TreeError};
use quickcheck_macros::quickcheck;

use std::collections::{BTreeMap, HashSet};

use crate::Op;

/// Applies a set of operations to a tree and a `BTreeMap`.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we have the same set of keys in the map.
fn do_ops<K, V>(ops: &[Op<K, V>], bst: &mut OrderedTree<K, V>, map: &mut BTreeMap<K, V>)
where
    K: Clone + Ord,
    V: Clone,
{
    for op in ops {
        match op {
            Op::Insert(k, v) => {
                bst.insert(k.clone(), v.clone());
                map.insert(k.clone(), v.clone());
            }
            Op::Remove(k) => {
                let _ = bst.delete(k);
                map.remove(k);
            }
        }
    }
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8, i8>>) -> bool {
    let mut tree = OrderedTree::new();
    let mut map = BTreeMap::new();

    do_ops(&ops, &mut tree, &mut map);
    map.keys().all(|key| tree.find(key) == map.get(key)) && tree.iter().eq(map.iter())
}

#[quickcheck]
fn inorder_is_strictly_ascending(ops: Vec<Op<i16, ()>>) -> bool {
    let mut tree = OrderedTree::new();
    do_ops(&ops, &mut tree, &mut BTreeMap::new());

    let keys: Vec<_> = tree.traverse(Order::InOrder).map(|(k, _)| *k).collect();
    keys.windows(2).all(|w| w[0] < w[1])
}

#[quickcheck]
fn size_is_distinct_inserts_minus_deletes(ops: Vec<Op<i8, ()>>) -> bool {
    let mut tree = OrderedTree::new();
    let mut expected: usize = 0;
    for op in &ops {
        match op {
            Op::Insert(k, v) => {
                if tree.insert(*k, *v).is_none() {
                    expected += 1;
                }
            }
            Op::Remove(k) => {
                if tree.delete(k).is_ok() {
                    expected -= 1;
                }
            }
        }
    }

    tree.len() == expected && tree.iter().count() == expected
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let mut tree = OrderedTree::new();
    for x in &xs {
        tree.insert(*x, *x);
    }

    xs.iter().all(|x| tree.find(x) == Some(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let mut tree = OrderedTree::new();
    for x in &xs {
        tree.insert(*x, *x);
    }
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.search(x).is_none() && !tree.contains(x))
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree = OrderedTree::new();
    for x in &xs {
        tree.insert(*x, *x);
    }

    let mut still_present: HashSet<_> = xs.iter().copied().collect();
    for delete in &deletes {
        let expected = if still_present.remove(delete) {
            Ok(*delete)
        } else {
            Err(TreeError::KeyNotFound)
        };
        if tree.delete(delete) != expected {
            return false;
        }
    }

    deletes.iter().all(|x| !tree.contains(x))
        && still_present.iter().all(|x| tree.find(x) == Some(x))
}

#[quickcheck]
fn preorder_rebuilds_same_shape(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree = OrderedTree::new();
    for x in &xs {
        tree.insert(*x, ());
    }
    for delete in &deletes {
        let _ = tree.delete(delete);
    }

    let rebuilt: OrderedTree<_, _> = tree
        .traverse(Order::PreOrder)
        .map(|(k, v)| (*k, *v))
        .collect();
    let same = rebuilt.traverse(Order::PostOrder).eq(tree.traverse(Order::PostOrder));
    same
}
