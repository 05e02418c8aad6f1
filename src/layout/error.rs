use thiserror::Error;

/// Failure reported by a [`LayoutDelegate`](super::LayoutDelegate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DelegateError {
    #[error("layout delegate panicked: {0}")]
    Panicked(String),
    #[error("layout delegate failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid layout config: {0}")]
    InvalidConfig(String),
    #[error("layout of group {group} failed")]
    Delegate {
        group: usize,
        #[source]
        source: DelegateError,
    },
}
