//! Reusable-object pool for Barrage.
//!
//! Spawning a bullet, an enemy or a UI card should not allocate in steady
//! state. A [`Pool`] keeps every entity it ever built; "spawning" first
//! looks for a member that is no longer in use and recycles it, and only
//! builds a new one from a template when every member is busy.
//!
//! # Key types
//!
//! - [`Poolable`]: the lifecycle contract every pooled entity implements
//! - [`Pool`]: owns the members and the templates they are cloned from
//! - [`PoolKey`]: stable handle to a member (membership never shrinks)
//! - [`PoolError`]: precondition violations (no templates, bad index)

mod entity;
mod error;
mod pool;

pub use entity::Poolable;
pub use error::PoolError;
pub use pool::{Pool, PoolHook, PoolKey};
