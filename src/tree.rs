//! An unbalanced BST whose nodes keep a pointer back to their parent. The tree owns every node
//! through its child links; the parent link is only used to walk back up when a node has to be
//! spliced out.
//!
//! # Examples
//!
//! ```
//! use ordered_tree::{Order, OrderedTree, TreeError};
//!
//! let mut tree = OrderedTree::new();
//!
//! // Nothing in here yet.
//! assert!(tree.search(&1).is_none());
//!
//! tree.insert(1, "one");
//! assert_eq!(tree.find(&1), Some(&"one"));
//!
//! // Inserting a new value for the same key overwrites the value.
//! tree.insert(1, "uno");
//! assert_eq!(tree.search(&1).map(|n| *n.value()), Some("uno"));
//!
//! // Deleting a node returns its value, deleting it again is an error.
//! assert_eq!(tree.delete(&1), Ok("uno"));
//! assert_eq!(tree.delete(&1), Err(TreeError::KeyNotFound));
//!
//! tree.extend([(2, "two"), (1, "one"), (3, "three")]);
//! let keys: Vec<_> = tree.traverse(Order::PostOrder).map(|(k, _)| *k).collect();
//! assert_eq!(keys, [1, 3, 2]);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use tracing::{debug, trace};

use crate::error::{TreeError, TreeResult};
use crate::traverse::{Order, Traverse};

/// An unbalanced Binary Search Tree mapping unique keys to values. The shape of the tree depends
/// entirely on insertion order so operations are `O(height)`, which is `O(n)` in the worst case.
pub struct OrderedTree<K, V> {
    root: Link<K, V>,
    len: usize,
    /// The tree owns its nodes even though it only holds raw pointers to them.
    _owns: PhantomData<Box<Node<K, V>>>,
}

// SAFETY: The tree exclusively owns every node reachable from `root` and never shares them with
// anything but borrows of the tree itself, so it is exactly as thread safe as `Box<(K, V)>`.
unsafe impl<K: Send, V: Send> Send for OrderedTree<K, V> {}
// SAFETY: Shared access only hands out `&K`/`&V` and no interior mutability is involved.
unsafe impl<K: Sync, V: Sync> Sync for OrderedTree<K, V> {}

impl<K, V> Default for OrderedTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for OrderedTree<K, V> {
    fn drop(&mut self) {
        self.free_all();
    }
}

impl<K, V> Clone for OrderedTree<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    /// Re-inserting the nodes in pre-order reproduces the exact same shape.
    fn clone(&self) -> Self {
        let mut tree = Self::new();
        for (key, value) in self.traverse(Order::PreOrder) {
            tree.insert(key.clone(), value.clone());
        }
        tree
    }
}

impl<K, V> fmt::Debug for OrderedTree<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrderedTree<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V> Extend<(K, V)> for OrderedTree<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Traverse<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> OrderedTree<K, V> {
    /// Generate a new, empty `OrderedTree`.
    pub fn new() -> Self {
        Self {
            root: Link(None),
            len: 0,
            _owns: PhantomData,
        }
    }

    /// The number of keys stored in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no keys at all.
    pub fn is_empty(&self) -> bool {
        debug_assert!(self.len != 0 || self.root.0.is_none());
        self.len == 0
    }

    /// Removes every node from the tree.
    pub fn clear(&mut self) {
        debug!(len = self.len, "clearing tree");
        self.free_all();
    }

    /// The root node, if the tree isn't empty.
    pub fn root(&self) -> Option<&Node<K, V>> {
        self.root.node()
    }

    /// Potentially finds the node holding the given key. A missing key is not an error, it just
    /// gives `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    /// tree.insert(30, "hello");
    ///
    /// let node = tree.search(&30).unwrap();
    /// assert_eq!(node.to_string(), "(30, hello)");
    /// assert!(tree.search(&42).is_none());
    /// ```
    pub fn search(&self, key: &K) -> Option<&Node<K, V>>
    where
        K: Ord,
    {
        let mut current = self.root();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left(),
                Ordering::Equal => return Some(node),
                Ordering::Greater => node.right(),
            };
        }
        None
    }

    /// Potentially finds the value associated with the given key.
    pub fn find(&self, key: &K) -> Option<&V>
    where
        K: Ord,
    {
        self.search(key).map(Node::value)
    }

    /// Whether some node holds the given key.
    pub fn contains(&self, key: &K) -> bool
    where
        K: Ord,
    {
        self.search(key).is_some()
    }

    /// The entry with the smallest key.
    pub fn min(&self) -> Option<(&K, &V)> {
        self.root.leftmost().node().map(Node::entry)
    }

    /// The entry with the largest key.
    pub fn max(&self) -> Option<(&K, &V)> {
        self.root.rightmost().node().map(Node::entry)
    }

    /// Inserts the given value into the tree stored at the given key. Inserting a new value for an
    /// existing key overwrites its value in place and hands back the old one.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::OrderedTree;
    ///
    /// let mut tree = OrderedTree::new();
    ///
    /// assert_eq!(tree.insert(10, "a"), None);
    /// assert_eq!(tree.insert(10, "b"), Some("a"));
    /// assert_eq!(tree.find(&10), Some(&"b"));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        K: Ord,
    {
        let Some(mut parent) = self.root.0 else {
            self.root = Node::new_link(key, value, Link(None));
            self.len += 1;
            trace!("inserted root");
            return None;
        };

        loop {
            // SAFETY: `parent` is reachable from `self.root` and we hold `&mut self`, so no other
            // reference into the tree exists while this one is alive.
            let node = unsafe { parent.as_mut() };
            let slot = match key.cmp(&node.key) {
                Ordering::Less => &mut node.left,
                Ordering::Equal => {
                    trace!("overwrote value");
                    return Some(mem::replace(&mut node.value, value));
                }
                Ordering::Greater => &mut node.right,
            };

            match slot.0 {
                Some(child) => parent = child,
                None => {
                    *slot = Node::new_link(key, value, Link(Some(parent)));
                    self.len += 1;
                    trace!("inserted");
                    return None;
                }
            }
        }
    }

    /// Deletes the node containing the given key and returns its value.
    ///
    /// A node with two children is not unlinked itself. Instead it takes over the key and value of
    /// its in-order successor and the successor's node, which has no left child, is removed.
    ///
    /// # Errors
    ///
    /// [`TreeError::KeyNotFound`] if no node holds `key`. The tree is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::{OrderedTree, TreeError};
    ///
    /// let mut tree: OrderedTree<_, _> = [(2, 'b'), (1, 'a'), (3, 'c')].into_iter().collect();
    ///
    /// assert_eq!(tree.delete(&2), Ok('b'));
    /// assert_eq!(tree.root().map(|n| *n.key()), Some(3));
    /// assert_eq!(tree.delete(&2), Err(TreeError::KeyNotFound));
    /// ```
    pub fn delete(&mut self, key: &K) -> TreeResult<V>
    where
        K: Ord,
    {
        let target = self.locate(key).ok_or(TreeError::KeyNotFound)?;
        // SAFETY: `locate` only returns nodes that are currently linked into this tree.
        let value = unsafe { self.unlink(target) };
        self.len -= 1;
        Ok(value)
    }

    /// Lazily walks the tree in the given order, yielding each key and value once.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordered_tree::{Order, OrderedTree};
    ///
    /// let tree: OrderedTree<_, _> = [(2, ()), (1, ()), (3, ())].into_iter().collect();
    ///
    /// let keys = |order| tree.traverse(order).map(|(k, _)| *k).collect::<Vec<_>>();
    /// assert_eq!(keys(Order::InOrder), [1, 2, 3]);
    /// assert_eq!(keys(Order::PreOrder), [2, 1, 3]);
    /// assert_eq!(keys(Order::PostOrder), [1, 3, 2]);
    /// ```
    pub fn traverse(&self, order: Order) -> Traverse<'_, K, V> {
        Traverse::new(self.root(), self.len, order)
    }

    /// Like [`traverse`][Self::traverse] but with the order given by name: `inorder`,
    /// `preorder` or `postorder`.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnknownOrder`] for any other name.
    pub fn traverse_by_name(&self, name: &str) -> TreeResult<Traverse<'_, K, V>> {
        Ok(self.traverse(name.parse()?))
    }

    /// Iterates over the entries in ascending key order.
    pub fn iter(&self) -> Traverse<'_, K, V> {
        self.traverse(Order::InOrder)
    }

    /// Finds the node holding `key` without ever creating a reference to it so the pointer can
    /// later be written through.
    fn locate(&self, key: &K) -> Option<NonNull<Node<K, V>>>
    where
        K: Ord,
    {
        let mut current = self.root.0;
        while let Some(ptr) = current {
            // SAFETY: Every linked pointer is a live node and we hold `&self`.
            let node = unsafe { ptr.as_ref() };
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left.0,
                Ordering::Equal => return Some(ptr),
                Ordering::Greater => node.right.0,
            };
        }
        None
    }

    /// Removes `target` from the tree and returns its value. Two-child nodes swap payloads with
    /// their successor and the loop then removes the successor, which has at most a right child.
    ///
    /// # Safety
    ///
    /// `target` must be a node currently linked into this tree.
    unsafe fn unlink(&mut self, mut target: NonNull<Node<K, V>>) -> V {
        loop {
            let node = target.as_mut();
            match (node.left.0, node.right.0) {
                (None, None) => {
                    trace!(case = "leaf", "deleting node");
                    self.replace_child(node.parent, target, Link(None));
                    return Node::free(target);
                }
                (Some(mut child), None) | (None, Some(mut child)) => {
                    trace!(case = "one_child", "deleting node");
                    child.as_mut().parent = node.parent;
                    self.replace_child(node.parent, target, Link(Some(child)));
                    return Node::free(target);
                }
                (Some(_), Some(_)) => {
                    trace!(case = "two_children", "deleting node");
                    let Some(mut successor) = node.successor_link().0 else {
                        unreachable!("a node with a right child has a successor");
                    };
                    let displaced = successor.as_mut();
                    mem::swap(&mut node.key, &mut displaced.key);
                    mem::swap(&mut node.value, &mut displaced.value);
                    target = successor;
                }
            }
        }
    }

    /// Points whichever link of `parent` referenced `old` (or the root, when there is no parent)
    /// at `new` instead.
    ///
    /// # Safety
    ///
    /// `parent` must be `old`'s current parent link.
    unsafe fn replace_child(
        &mut self,
        parent: Link<K, V>,
        old: NonNull<Node<K, V>>,
        new: Link<K, V>,
    ) {
        match parent.0 {
            None => self.root = new,
            Some(mut parent) => {
                let parent = parent.as_mut();
                if parent.left.0 == Some(old) {
                    parent.left = new;
                } else {
                    debug_assert_eq!(parent.right.0, Some(old));
                    parent.right = new;
                }
            }
        }
    }

    /// Frees every node with an explicit stack so list-shaped trees can't overflow the call stack.
    fn free_all(&mut self) {
        let mut stack: Vec<_> = self.root.take().0.into_iter().collect();
        while let Some(ptr) = stack.pop() {
            // SAFETY: We own every node reachable from the old root and each one is reached
            // exactly once, since it has a single parent. It was allocated by `Node::new_link`.
            let node = unsafe { Box::from_raw(ptr.as_ptr()) };
            stack.extend(node.left.0);
            stack.extend(node.right.0);
        }
        self.len = 0;
    }
}

struct Link<K, V>(Option<NonNull<Node<K, V>>>);

impl<K, V> Clone for Link<K, V> {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}
impl<K, V> Copy for Link<K, V> {}

impl<K, V> Link<K, V> {
    fn node<'a>(self) -> Option<&'a Node<K, V>> {
        // SAFETY: If the pointer is not `None` then it is a live `Node`. The returned reference is
        // only ever handed out with the lifetime of a borrow of the owning tree (or of a node in
        // it), during which nothing can mutate the tree.
        self.0.map(|ptr| unsafe { &*ptr.as_ptr() })
    }

    fn take(&mut self) -> Self {
        Link(self.0.take())
    }

    /// Follows left children from here, advancing the cursor each step.
    fn leftmost(self) -> Self {
        let mut current = self;
        while let Some(next) = current.node().map(|n| n.left).filter(|l| l.0.is_some()) {
            current = next;
        }
        current
    }

    /// Follows right children from here, advancing the cursor each step.
    fn rightmost(self) -> Self {
        let mut current = self;
        while let Some(next) = current.node().map(|n| n.right).filter(|r| r.0.is_some()) {
            current = next;
        }
        current
    }
}

/// A stored key/value pair and its position in the tree.
pub struct Node<K, V> {
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
    parent: Link<K, V>,
}

impl<K, V> fmt::Debug for Node<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Node")
            .field(&self.key)
            .field(&self.value)
            .finish()
    }
}

impl<K, V> fmt::Display for Node<K, V>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.key, self.value)
    }
}

impl<K, V> Node<K, V> {
    fn new_link(key: K, value: V, parent: Link<K, V>) -> Link<K, V> {
        let node = Box::new(Node {
            key,
            value,
            left: Link(None),
            right: Link(None),
            parent,
        });
        Link(Some(NonNull::from(Box::leak(node))))
    }

    /// Takes the value out of a node that is no longer linked into any tree.
    ///
    /// # Safety
    ///
    /// Nothing may reference `node` afterwards. It must have come from `Node::new_link`.
    unsafe fn free(node: NonNull<Self>) -> V {
        let node = Box::from_raw(node.as_ptr());
        node.value
    }

    /// The key this node is stored under.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The value stored with the key.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// The key and value as a pair.
    pub fn entry(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }

    /// The root of the left subtree.
    pub fn left(&self) -> Option<&Self> {
        self.left.node()
    }

    /// The root of the right subtree.
    pub fn right(&self) -> Option<&Self> {
        self.right.node()
    }

    /// The node this one hangs off of. `None` for the root.
    pub fn parent(&self) -> Option<&Self> {
        self.parent.node()
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.left.0.is_none() && self.right.0.is_none()
    }

    /// The node with the smallest key in the right subtree. `None` if there is no right subtree,
    /// even if a larger key exists further up the tree.
    pub fn successor(&self) -> Option<&Self> {
        self.successor_link().node()
    }

    /// The node with the largest key in the left subtree. `None` if there is no left subtree.
    pub fn predecessor(&self) -> Option<&Self> {
        self.left.rightmost().node()
    }

    fn successor_link(&self) -> Link<K, V> {
        self.right.leftmost()
    }
}

#[cfg(test)]
impl<K: Ord, V> OrderedTree<K, V> {
    /// Walks the whole tree checking ordering, parent links and the cached length.
    fn assert_invariants(&self) {
        let mut count = 0;
        let mut stack: Vec<&Node<K, V>> = self.root().into_iter().collect();
        if let Some(root) = self.root() {
            assert!(root.parent().is_none());
        }
        while let Some(node) = stack.pop() {
            count += 1;
            if let Some(left) = node.left() {
                assert!(left.key < node.key);
                assert_eq!(left.parent.0, Some(NonNull::from(node)));
                stack.push(left);
            }
            if let Some(right) = node.right() {
                assert!(right.key > node.key);
                assert_eq!(right.parent.0, Some(NonNull::from(node)));
                stack.push(right);
            }
        }
        assert_eq!(count, self.len);

        let keys: Vec<_> = self.iter().map(|(k, _)| k).collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }
}
