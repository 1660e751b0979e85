//! Deterministic interval timer for Barrage.
//!
//! A [`Timer`] counts caller-supplied frame time against a target
//! interval. It never reads a clock: whoever owns it calls
//! [`Timer::advance`] once per tick with that tick's delta, and gates
//! effects on the boolean it returns. That return value is
//! edge-triggered: `true` only on the tick the interval is crossed.
//!
//! ```
//! use barrage_timer::Timer;
//!
//! let mut shot = Timer::new().with_interval(0.5).looping().started();
//! let fired: Vec<bool> = (0..4).map(|_| shot.advance(0.25)).collect();
//! assert_eq!(fired, [false, true, false, true]);
//! ```
//!
//! Frame time comes in as a [`FrameDelta`] when a timer needs to tell
//! scaled game time from unscaled real time (pause menus keep animating
//! while the game is frozen).

mod delta;
mod timer;

pub use delta::FrameDelta;
pub use timer::{Timer, TimerSpec};
