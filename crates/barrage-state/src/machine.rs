//! The state manager and its per-state wiring.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt::{self, Debug};
use std::hash::Hash;

use tracing::{debug, trace, warn};

use crate::error::StateError;
use crate::redirect::Redirect;

/// Upper bound on redirects applied back to back before the machine
/// gives up on the chain and settles where it is.
pub const MAX_REDIRECT_CHAIN: usize = 32;

/// Anything usable as a state label. Usually a fieldless enum.
pub trait Label: Copy + Eq + Hash + Debug + 'static {}

impl<T: Copy + Eq + Hash + Debug + 'static> Label for T {}

/// Per-tick work of a state.
pub type Behavior<C> = Box<dyn FnMut(&mut C)>;

/// A transition condition. Returning `true` fires the transition.
pub type Guard<C> = Box<dyn FnMut(&mut C) -> bool>;

/// An enter or exit hook.
pub type Hook<C> = Box<dyn FnMut(&mut C)>;

struct State<L, C> {
    behavior: Behavior<C>,
    // Kept in registration order: the first holding guard wins.
    transitions: Vec<(L, Vec<Guard<C>>)>,
    on_enter: Option<Hook<C>>,
    on_exit: Option<Hook<C>>,
}

impl<L: Label, C> State<L, C> {
    fn new(behavior: Behavior<C>) -> Self {
        Self {
            behavior,
            transitions: Vec::new(),
            on_enter: None,
            on_exit: None,
        }
    }
}

/// Mutable access to one registered state, for wiring transitions and
/// hooks. All setters return `&mut Self` so calls chain.
pub struct StateHandle<'a, L, C> {
    label: L,
    state: &'a mut State<L, C>,
}

impl<L: Label, C> StateHandle<'_, L, C> {
    pub fn label(&self) -> L {
        self.label
    }

    /// Adds a guard toward `dest`. Several guards toward the same
    /// destination are evaluated in the order they were added. A new
    /// destination goes after every existing one.
    pub fn add_transition(
        &mut self,
        dest: L,
        guard: impl FnMut(&mut C) -> bool + 'static,
    ) -> &mut Self {
        let guard: Guard<C> = Box::new(guard);
        match self.state.transitions.iter_mut().find(|(d, _)| *d == dest) {
            Some((_, guards)) => guards.push(guard),
            None => self.state.transitions.push((dest, vec![guard])),
        }
        self
    }

    /// Drops every guard toward `dest`. Returns whether any existed.
    pub fn remove_transition(&mut self, dest: L) -> bool {
        let before = self.state.transitions.len();
        self.state.transitions.retain(|(d, _)| *d != dest);
        self.state.transitions.len() != before
    }

    /// Replaces the enter hook.
    pub fn on_enter(&mut self, hook: impl FnMut(&mut C) + 'static) -> &mut Self {
        self.state.on_enter = Some(Box::new(hook));
        self
    }

    /// Replaces the exit hook.
    pub fn on_exit(&mut self, hook: impl FnMut(&mut C) + 'static) -> &mut Self {
        self.state.on_exit = Some(Box::new(hook));
        self
    }

    /// Destination labels in evaluation order.
    pub fn destinations(&self) -> Vec<L> {
        self.state.transitions.iter().map(|(d, _)| *d).collect()
    }
}

/// A finite-state machine keyed by `L`, driving a context of type `C`.
///
/// The machine starts with no current state; [`behave`](Self::behave) is
/// a no-op until [`set_current_label`](Self::set_current_label) succeeds.
pub struct StateManager<L, C> {
    states: HashMap<L, State<L, C>>,
    current: Option<L>,
    redirect: Redirect<L>,
    switches: u64,
}

impl<L: Label, C> StateManager<L, C> {
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            current: None,
            redirect: Redirect::new(),
            switches: 0,
        }
    }

    /// Registers a state.
    ///
    /// # Errors
    ///
    /// [`StateError::DuplicateState`] if `label` is taken. The existing
    /// state keeps its behaviour, hooks and transitions.
    pub fn add_state(
        &mut self,
        label: L,
        behavior: impl FnMut(&mut C) + 'static,
    ) -> Result<StateHandle<'_, L, C>, StateError> {
        match self.states.entry(label) {
            Entry::Occupied(_) => {
                warn!(label = ?label, "duplicate state registration rejected");
                Err(StateError::DuplicateState(format!("{label:?}")))
            }
            Entry::Vacant(slot) => {
                let state = slot.insert(State::new(Box::new(behavior)));
                trace!(label = ?label, "state registered");
                Ok(StateHandle { label, state })
            }
        }
    }

    /// Wiring access to a registered state.
    pub fn state_mut(&mut self, label: L) -> Option<StateHandle<'_, L, C>> {
        self.states
            .get_mut(&label)
            .map(|state| StateHandle { label, state })
    }

    /// A handle callbacks can capture to request a switch mid-tick.
    pub fn redirect(&self) -> Redirect<L> {
        self.redirect.clone()
    }

    pub fn current_label(&self) -> Option<L> {
        self.current
    }

    pub fn is_in(&self, label: L) -> bool {
        self.current == Some(label)
    }

    pub fn contains(&self, label: L) -> bool {
        self.states.contains_key(&label)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// How many times the current state has changed since construction.
    pub fn switch_count(&self) -> u64 {
        self.switches
    }

    /// Switches to `label`: the current state's exit hook runs, then
    /// `label`'s enter hook. Setting the label already current re-runs
    /// both hooks.
    ///
    /// # Errors
    ///
    /// [`StateError::UnknownState`] if `label` is not registered. No hook
    /// runs and the current state is unchanged.
    pub fn set_current_label(&mut self, label: L, ctx: &mut C) -> Result<(), StateError> {
        self.switch_to(label, ctx)?;
        self.follow_redirects(ctx)
    }

    /// Runs one tick.
    ///
    /// Pending redirects are applied first. Then the current behaviour
    /// runs, and the guards are evaluated in registration order until one
    /// holds; that transition is taken and evaluation stops. A redirect
    /// raised by the behaviour or a guard ends evaluation the same way.
    ///
    /// Returns the label entered during this tick, if any.
    ///
    /// # Errors
    ///
    /// [`StateError::UnknownState`] if a redirect names an unregistered
    /// label. The machine stays in the state it was in.
    pub fn behave(&mut self, ctx: &mut C) -> Result<Option<L>, StateError> {
        let switches_before = self.switches;
        self.follow_redirects(ctx)?;

        let Some(label) = self.current else {
            return Ok(None);
        };
        let Some(state) = self.states.get_mut(&label) else {
            return Ok(None);
        };

        (state.behavior)(ctx);

        let mut chosen = None;
        if !self.redirect.is_pending() {
            'guards: for (dest, guards) in state.transitions.iter_mut() {
                for guard in guards.iter_mut() {
                    let holds = guard(ctx);
                    if self.redirect.is_pending() {
                        break 'guards;
                    }
                    if holds {
                        chosen = Some(*dest);
                        break 'guards;
                    }
                }
            }
        }

        if self.redirect.is_pending() {
            self.follow_redirects(ctx)?;
        } else if let Some(dest) = chosen {
            self.set_current_label(dest, ctx)?;
        }

        Ok((self.switches != switches_before)
            .then_some(self.current)
            .flatten())
    }

    fn switch_to(&mut self, label: L, ctx: &mut C) -> Result<(), StateError> {
        if !self.states.contains_key(&label) {
            warn!(label = ?label, "switch to unregistered state");
            return Err(StateError::UnknownState(format!("{label:?}")));
        }

        if let Some(prev) = self.current {
            if let Some(hook) = self.states.get_mut(&prev).and_then(|s| s.on_exit.as_mut()) {
                hook(ctx);
            }
        }

        let prev = self.current.replace(label);
        self.switches += 1;
        debug!(from = ?prev, to = ?label, "state changed");

        if let Some(hook) = self.states.get_mut(&label).and_then(|s| s.on_enter.as_mut()) {
            hook(ctx);
        }
        Ok(())
    }

    fn follow_redirects(&mut self, ctx: &mut C) -> Result<(), StateError> {
        let mut hops = 0;
        while let Some(next) = self.redirect.take() {
            if hops == MAX_REDIRECT_CHAIN {
                warn!(
                    label = ?self.current,
                    dropped = ?next,
                    "redirect chain too long, settling"
                );
                return Ok(());
            }
            hops += 1;
            self.switch_to(next, ctx)?;
        }
        Ok(())
    }
}

impl<L: Label, C> Default for StateManager<L, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Label, C> fmt::Debug for StateManager<L, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateManager")
            .field("current", &self.current)
            .field("states", &self.states.len())
            .field("redirect", &self.redirect)
            .finish()
    }
}
