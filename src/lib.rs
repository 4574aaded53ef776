//! This crate exposes an unbalanced ordered map built on a Binary Search Tree (BST) whose nodes
//! keep a pointer back to their parent, mostly for educational purposes.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will typically store
//! some sort of key (the key that was inserted, for example) and will
//! sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for keys in the tree takes `O(height)` (where `height` is defined as the longest
//! path from the root `Node` to a leaf `Node`). [`OrderedTree`] never rebalances, so inserting
//! keys in sorted order degrades it into a linked list with `O(N)` height. BSTs also naturally
//! support sorted iteration by visiting the left subtree, then the subtree root, then the right
//! subtree; see [`Order`] for the other visiting orders.
//!
//! ## Deleting
//!
//! Removing a node falls into one of three cases:
//!
//! 1. It is a leaf: it is simply detached from its parent.
//! 2. It has one child: the child takes its place under its parent.
//! 3. It has two children: it takes the key and value of its in-order successor (the smallest
//!    key in its right subtree) and the successor's node, which can't have a left child, is
//!    removed instead using case 1 or 2.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod error;
pub mod traverse;
pub mod tree;


pub use error::{TreeError, TreeResult};
pub use traverse::{Order, Traverse};
pub use tree::{Node, OrderedTree};
