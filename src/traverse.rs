//! Lazy depth-first walks over an [`OrderedTree`][crate::OrderedTree].

use std::fmt;
use std::iter::FusedIterator;
use std::str::FromStr;

use crate::error::TreeError;
use crate::tree::Node;

/// When a node is yielded relative to its two subtrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Order {
    /// Left subtree, node, right subtree. Keys come out in ascending order.
    #[default]
    InOrder,
    /// Node, left subtree, right subtree. Re-inserting in this order rebuilds the same shape.
    PreOrder,
    /// Left subtree, right subtree, node. Children always come before their parent.
    PostOrder,
}

impl Order {
    /// The name accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InOrder => "inorder",
            Self::PreOrder => "preorder",
            Self::PostOrder => "postorder",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Order {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inorder" => Ok(Self::InOrder),
            "preorder" => Ok(Self::PreOrder),
            "postorder" => Ok(Self::PostOrder),
            _ => Err(TreeError::UnknownOrder(s.to_string())),
        }
    }
}

enum Frame<'a, K, V> {
    /// Expand this subtree according to the order.
    Visit(&'a Node<K, V>),
    /// Yield this node.
    Emit(&'a Node<K, V>),
}

/// An iterator over `(&K, &V)` in a fixed [`Order`], created by
/// [`OrderedTree::traverse`][crate::OrderedTree::traverse].
///
/// It keeps an explicit stack of pending frames, at most two per level of the tree, instead of
/// recursing. Borrowing the tree means it cannot be mutated mid-walk.
pub struct Traverse<'a, K, V> {
    stack: Vec<Frame<'a, K, V>>,
    order: Order,
    remaining: usize,
}

impl<'a, K, V> Traverse<'a, K, V> {
    pub(crate) fn new(root: Option<&'a Node<K, V>>, len: usize, order: Order) -> Self {
        Self {
            stack: root.map(Frame::Visit).into_iter().collect(),
            order,
            remaining: len,
        }
    }

    /// The order this iterator walks in.
    pub fn order(&self) -> Order {
        self.order
    }

    /// Pushes the frames for `node` so that popping them reproduces the order.
    fn expand(&mut self, node: &'a Node<K, V>) {
        let left = node.left().map(Frame::Visit);
        let right = node.right().map(Frame::Visit);
        let emit = Some(Frame::Emit(node));

        // Last pushed is first popped.
        let frames = match self.order {
            Order::InOrder => [right, emit, left],
            Order::PreOrder => [right, left, emit],
            Order::PostOrder => [emit, right, left],
        };
        self.stack.extend(frames.into_iter().flatten());
    }
}

impl<'a, K, V> Iterator for Traverse<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Visit(node) => self.expand(node),
                Frame::Emit(node) => {
                    self.remaining -= 1;
                    return Some(node.entry());
                }
            }
        }
        debug_assert_eq!(self.remaining, 0);
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Traverse<'_, K, V> {}

impl<K, V> FusedIterator for Traverse<'_, K, V> {}

impl<K, V> fmt::Debug for Traverse<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Traverse")
            .field("order", &self.order)
            .field("remaining", &self.remaining)
            .finish()
    }
}
