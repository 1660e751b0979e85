//! Label-indexed finite-state machine for Barrage.
//!
//! A [`StateManager`] owns named states. Each state has a per-tick
//! behaviour, optional enter/exit hooks, and guarded transitions to other
//! labels. The owner calls [`StateManager::behave`] once per tick: the
//! current behaviour runs, then guards are evaluated in registration order
//! and the first one that holds moves the machine. At most one guarded
//! transition fires per tick.
//!
//! Callbacks receive the owning actor's context `&mut C` instead of
//! capturing it, so the actor keeps its data in plain fields:
//!
//! ```
//! use barrage_state::StateManager;
//! use barrage_timer::Timer;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Phase { Charge, Fire }
//!
//! struct Beam { timer: Timer, shots: u32 }
//!
//! let mut machine = StateManager::new();
//! machine
//!     .add_state(Phase::Charge, |b: &mut Beam| { b.timer.advance(0.5); })?
//!     .add_transition(Phase::Fire, |b: &mut Beam| b.timer.is_terminated())
//!     .on_enter(|b: &mut Beam| b.timer.restart_with(1.0));
//! machine.add_state(Phase::Fire, |b: &mut Beam| b.shots += 1)?;
//!
//! let mut beam = Beam { timer: Timer::new(), shots: 0 };
//! machine.set_current_label(Phase::Charge, &mut beam)?;
//! assert_eq!(machine.behave(&mut beam)?, None);
//! assert_eq!(machine.behave(&mut beam)?, Some(Phase::Fire));
//! machine.behave(&mut beam)?;
//! assert_eq!(beam.shots, 1);
//! # Ok::<(), barrage_state::StateError>(())
//! ```
//!
//! # Key types
//!
//! - [`StateManager`]: drives the current state
//! - [`StateHandle`]: wires transitions and hooks onto a registered state
//! - [`Redirect`]: lets callbacks request a label change mid-tick
//! - [`StateError`]: duplicate or unknown labels

mod error;
mod machine;
mod redirect;

pub use error::StateError;
pub use machine::{Behavior, Guard, Hook, Label, MAX_REDIRECT_CHAIN, StateHandle, StateManager};
pub use redirect::Redirect;
