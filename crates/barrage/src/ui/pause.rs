//! Pausing and resuming the game through the pause menu.

use barrage_state::StateError;
use barrage_timer::{FrameDelta, Timer};
use tracing::debug;

use super::menu::{MenuDecision, MenuKind, MenuOverlay};
use crate::config::PauseConfig;
use crate::services::{Cue, Outbox};

/// Toggles the pause menu.
///
/// While a transition plays, further toggles are ignored. The game stays
/// frozen until the unpause transition has finished.
#[derive(Debug, Clone)]
pub struct PauseControl {
    transition: Timer,
    transition_seconds: f32,
    /// The pause transition has finished and the menu is up.
    pausing: bool,
    /// Set from the moment a pause is requested until it ends.
    paused: bool,
}

impl PauseControl {
    pub fn new(cfg: &PauseConfig) -> Self {
        Self {
            transition: Timer::new().unscaled(),
            transition_seconds: cfg.transition_seconds,
            pausing: false,
            paused: false,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_counting()
    }

    /// Pauses or resumes. Returns whether the request was taken: it is
    /// refused mid-transition and once the player is dead.
    pub fn toggle(
        &mut self,
        player_alive: bool,
        menu: &mut MenuOverlay,
        outbox: &mut Outbox,
    ) -> Result<bool, StateError> {
        if self.transition.is_counting() || !player_alive {
            return Ok(false);
        }

        if self.pausing {
            debug!("resuming");
            menu.exit()?;
        } else {
            debug!("pausing");
            outbox.push(Cue::TimeScale(0.0));
            self.paused = true;
            menu.call(MenuKind::Pause)?;
        }
        self.transition.restart_with(self.transition_seconds);
        Ok(true)
    }

    pub fn update(&mut self, delta: FrameDelta, outbox: &mut Outbox) {
        if !self.transition.advance_frame(delta) {
            return;
        }
        if self.pausing {
            outbox.push(Cue::Menu(MenuDecision::Resume));
            self.end(outbox);
        } else {
            self.pausing = true;
        }
    }

    /// Leaves the pause at once, e.g. after a retry was picked from the
    /// pause menu.
    pub fn end(&mut self, outbox: &mut Outbox) {
        if !self.paused {
            return;
        }
        self.transition.reset(true);
        self.pausing = false;
        self.paused = false;
        outbox.push(Cue::TimeScale(1.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MenuConfig;
    use crate::ui::MenuPhase;

    const FROZEN: FrameDelta = FrameDelta {
        scaled: 0.0,
        unscaled: 0.25,
    };

    fn setup() -> (PauseControl, MenuOverlay, Outbox) {
        let pause = PauseControl::new(&PauseConfig {
            transition_seconds: 0.5,
        });
        let menu = MenuOverlay::new(&MenuConfig::default()).unwrap();
        (pause, menu, Outbox::new())
    }

    #[test]
    fn test_pause_and_resume() {
        let (mut pause, mut menu, mut outbox) = setup();
        assert!(pause.toggle(true, &mut menu, &mut outbox).unwrap());
        assert!(pause.is_paused());
        assert_eq!(menu.phase(), Some(MenuPhase::FadeIn));
        assert_eq!(outbox.drain().next(), Some(Cue::TimeScale(0.0)));

        // Mid-transition toggles are refused.
        assert!(!pause.toggle(true, &mut menu, &mut outbox).unwrap());
        pause.update(FROZEN, &mut outbox);
        pause.update(FROZEN, &mut outbox);
        assert!(!pause.is_transitioning());

        assert!(pause.toggle(true, &mut menu, &mut outbox).unwrap());
        assert_eq!(menu.phase(), Some(MenuPhase::Exiting));
        assert!(pause.is_paused());
        pause.update(FROZEN, &mut outbox);
        pause.update(FROZEN, &mut outbox);
        assert!(!pause.is_paused());
        let cues: Vec<_> = outbox.drain().collect();
        assert_eq!(cues, [Cue::Menu(MenuDecision::Resume), Cue::TimeScale(1.0)]);
    }

    #[test]
    fn test_dead_player_cannot_pause() {
        let (mut pause, mut menu, mut outbox) = setup();
        assert!(!pause.toggle(false, &mut menu, &mut outbox).unwrap());
        assert!(!pause.is_paused());
        assert!(menu.is_hidden());
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_end_is_idempotent() {
        let (mut pause, mut menu, mut outbox) = setup();
        pause.end(&mut outbox);
        assert!(outbox.is_empty());

        pause.toggle(true, &mut menu, &mut outbox).unwrap();
        outbox.drain().for_each(drop);
        pause.end(&mut outbox);
        pause.end(&mut outbox);
        assert_eq!(outbox.len(), 1);
        assert!(!pause.is_transitioning());
    }
}
