/// Errors returned by [`AvlTree`](crate::AvlTree) accessors that require a key to be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("key not found")]
    KeyNotFound,
}
