//! Error types for the pool.

use crate::PoolKey;

/// Caller contract violations. Finding no free member is not an error:
/// [`Pool::reuse`](crate::Pool::reuse) returns `None` for that.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// Generation needs at least one template.
    #[error("pool has no templates to instantiate from")]
    NoTemplates,

    /// The requested template index does not exist.
    #[error("template index {index} out of range (pool has {len} templates)")]
    TemplateOutOfRange { index: usize, len: usize },

    /// The key does not name a member of this pool.
    #[error("{0} is not a member of this pool")]
    UnknownMember(PoolKey),
}
