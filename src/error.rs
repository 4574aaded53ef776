//! Errors returned by [`OrderedTree`][crate::OrderedTree] operations.

use thiserror::Error;

/// The ways an operation on an [`OrderedTree`][crate::OrderedTree] can fail. Both variants signal
/// caller misuse rather than a transient condition. A failing operation never mutates the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// `delete` was asked to remove a key the tree does not hold.
    #[error("key not found")]
    KeyNotFound,

    /// A traversal order name other than `inorder`, `preorder` or `postorder`.
    #[error("unknown traversal order `{0}`")]
    UnknownOrder(String),
}

/// Shorthand for results produced by this crate.
pub type TreeResult<T> = Result<T, TreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(TreeError::KeyNotFound.to_string(), "key not found");
        assert_eq!(
            TreeError::UnknownOrder("sideways".to_string()).to_string(),
            "unknown traversal order `sideways`"
        );
    }
}
