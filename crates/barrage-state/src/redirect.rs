//! Mid-tick label change requests.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// A shared slot through which callbacks ask their machine to switch
/// state.
///
/// Behaviours, guards and hooks cannot borrow the machine that is running
/// them. They capture a `Redirect` instead (obtained from
/// [`StateManager::redirect`](crate::StateManager::redirect)) and call
/// [`to`](Self::to). The machine applies the request as soon as the
/// callback returns.
///
/// A request made outside a tick is applied at the start of the next
/// `behave` or right after the next `set_current_label`.
pub struct Redirect<L>(Rc<Cell<Option<L>>>);

impl<L: Copy> Redirect<L> {
    pub(crate) fn new() -> Self {
        Self(Rc::new(Cell::new(None)))
    }

    /// Requests a switch to `label`. A later request replaces an earlier
    /// one that has not been applied yet.
    pub fn to(&self, label: L) {
        self.0.set(Some(label));
    }

    /// Drops a pending request.
    pub fn cancel(&self) {
        self.0.set(None);
    }

    pub fn is_pending(&self) -> bool {
        self.0.get().is_some()
    }

    pub fn pending(&self) -> Option<L> {
        self.0.get()
    }

    pub(crate) fn take(&self) -> Option<L> {
        self.0.take()
    }
}

impl<L> Clone for Redirect<L> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<L: Copy + fmt::Debug> fmt::Debug for Redirect<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Redirect").field(&self.0.get()).finish()
    }
}
