//! The contract between a pool and the entities it manages.

use barrage_math::Vec2;

/// An entity that can be recycled by a [`Pool`](crate::Pool).
///
/// Implementors provide storage for the active flag and the world
/// position; everything else has a default. Hook call order on each
/// generation path:
///
/// ```text
/// new member:    on_before_constructed (pool) → on_constructed
///                → set_position → on_before_acquired (pool) → on_acquired → activate
/// reused member: on_reacquired
///                → set_position → on_before_acquired (pool) → on_acquired → activate
/// release:       on_released → set_active(false)
/// ```
pub trait Poolable {
    fn is_active(&self) -> bool;

    fn set_active(&mut self, active: bool);

    fn set_position(&mut self, position: Vec2);

    /// Whether the member is busy. Free members are reuse candidates.
    ///
    /// Override to narrow reuse further, e.g. item pickups that may only
    /// be recycled as the same kind.
    fn is_in_use(&self) -> bool {
        self.is_active()
    }

    fn activate(&mut self) {
        self.set_active(true);
    }

    /// Returns the member to the pool. Anyone holding the member may call
    /// this; the next reuse scan will find it free.
    fn deactivate(&mut self) {
        self.on_released();
        self.set_active(false);
    }

    /// Runs once, right after the pool builds this member from a template.
    fn on_constructed(&mut self) {}

    /// Runs on every generation, new or reused, before activation.
    fn on_acquired(&mut self) {}

    /// Runs when a free member is picked for reuse.
    fn on_reacquired(&mut self) {}

    /// Runs when the member is deactivated.
    fn on_released(&mut self) {}
}
