//! The pause, game-over and stage-clear menu.

use std::fmt;

use barrage_math::{Ratio, easing};
use barrage_state::{Redirect, StateError, StateManager};
use barrage_timer::{FrameDelta, Timer};
use tracing::{debug, info};

use crate::config::MenuConfig;
use crate::services::{Cue, Outbox, SoundCue};

/// Why the menu was called. Changes the title and the right-hand entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuKind {
    Pause,
    Gameover,
    Clear,
}

impl MenuKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Pause => "Pause Menu",
            Self::Gameover => "Game Over",
            Self::Clear => "Clear!",
        }
    }

    /// What picking `choice` means for this menu.
    pub fn decision(self, choice: MenuChoice) -> MenuDecision {
        match (self, choice) {
            (_, MenuChoice::Left) => MenuDecision::ToTitle,
            (Self::Clear, MenuChoice::Right) => MenuDecision::NextLevel,
            (_, MenuChoice::Right) => MenuDecision::Retry,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuPhase {
    Hidden,
    /// The playfield darkens.
    FadeIn,
    /// Entries slide in.
    Approaching,
    Select,
    /// A short wait between confirming and acting on it.
    Decided,
    /// Entries slide out. Only the pause menu leaves this way.
    Exiting,
}

/// The two entries. The cursor starts on the right one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MenuChoice {
    Left,
    #[default]
    Right,
}

impl MenuChoice {
    pub fn toggled(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuInput {
    Left,
    Right,
    Confirm,
}

/// What the player chose. Reaches the game as [`Cue::Menu`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuDecision {
    Retry,
    NextLevel,
    ToTitle,
    /// The pause menu was dismissed.
    Resume,
}

#[derive(Debug)]
struct MenuBody {
    cfg: MenuConfig,
    kind: MenuKind,
    choice: MenuChoice,
    pending: Option<MenuInput>,
    /// How far the entries have slid in.
    reveal: Ratio,
    timer: Timer,
    dt: f32,
    redirect: Redirect<MenuPhase>,
    outbox: Outbox,
}

/// Menu overlay driven by its own state machine.
///
/// The game is frozen while the menu is up, so every timer here runs on
/// unscaled time.
pub struct MenuOverlay {
    machine: StateManager<MenuPhase, MenuBody>,
    body: MenuBody,
}

impl MenuOverlay {
    pub fn new(cfg: &MenuConfig) -> Result<Self, StateError> {
        let mut machine = StateManager::new();

        machine
            .add_state(MenuPhase::Hidden, |_: &mut MenuBody| {})?
            .on_enter(|m: &mut MenuBody| {
                m.reveal = Ratio::ZERO;
                m.choice = MenuChoice::default();
                m.pending = None;
            });

        machine
            .add_state(MenuPhase::FadeIn, |_: &mut MenuBody| {})?
            .add_transition(MenuPhase::Approaching, |m: &mut MenuBody| m.timer.advance(m.dt))
            .on_enter(|m: &mut MenuBody| m.timer.restart_with(m.cfg.fade_in_seconds))
            .on_exit(|m: &mut MenuBody| m.outbox.push(Cue::TimeScale(0.0)));

        machine
            .add_state(MenuPhase::Approaching, |m: &mut MenuBody| {
                m.timer.advance(m.dt);
                m.reveal = easing::quad_out(m.timer.progress());
            })?
            .add_transition(MenuPhase::Select, |m: &mut MenuBody| m.timer.is_terminated())
            .on_enter(|m: &mut MenuBody| {
                m.reveal = Ratio::ZERO;
                m.timer.restart_with(m.cfg.approach_seconds);
            })
            .on_exit(|m: &mut MenuBody| m.reveal = Ratio::ONE);

        machine.add_state(MenuPhase::Select, |m: &mut MenuBody| match m.pending.take() {
            Some(MenuInput::Left | MenuInput::Right) => {
                m.choice = m.choice.toggled();
                m.outbox.push(Cue::Sound(SoundCue::CursorMoved));
            }
            Some(MenuInput::Confirm) => {
                m.outbox.push(Cue::Sound(SoundCue::MenuDecided));
                m.redirect.to(MenuPhase::Decided);
            }
            None => {}
        })?;

        machine
            .add_state(MenuPhase::Decided, |m: &mut MenuBody| {
                if m.timer.advance(m.dt) {
                    let decision = m.kind.decision(m.choice);
                    info!(?decision, "menu decided");
                    m.outbox.push(Cue::Menu(decision));
                    m.outbox.push(Cue::TimeScale(1.0));
                }
            })?
            .add_transition(MenuPhase::Hidden, |m: &mut MenuBody| m.timer.is_terminated())
            .on_enter(|m: &mut MenuBody| m.timer.restart_with(m.cfg.decided_wait_seconds));

        machine
            .add_state(MenuPhase::Exiting, |m: &mut MenuBody| {
                m.timer.advance(m.dt);
                m.reveal = easing::quad_out(m.timer.progress()).reversed();
            })?
            .add_transition(MenuPhase::Hidden, |m: &mut MenuBody| m.timer.is_terminated())
            .on_enter(|m: &mut MenuBody| {
                m.reveal = Ratio::ONE;
                m.timer.restart_with(m.cfg.approach_seconds);
            });

        let mut body = MenuBody {
            cfg: cfg.clone(),
            kind: MenuKind::Pause,
            choice: MenuChoice::default(),
            pending: None,
            reveal: Ratio::ZERO,
            timer: Timer::new().unscaled(),
            dt: 0.0,
            redirect: machine.redirect(),
            outbox: Outbox::new(),
        };
        machine.set_current_label(MenuPhase::Hidden, &mut body)?;
        Ok(Self { machine, body })
    }

    /// Opens the menu as `kind`, starting with the fade.
    pub fn call(&mut self, kind: MenuKind) -> Result<(), StateError> {
        debug!(?kind, "menu called");
        self.body.kind = kind;
        self.machine.set_current_label(MenuPhase::FadeIn, &mut self.body)
    }

    /// Slides the menu out without deciding anything. A hidden menu stays
    /// hidden.
    pub fn exit(&mut self) -> Result<(), StateError> {
        if self.is_hidden() {
            return Ok(());
        }
        self.machine.set_current_label(MenuPhase::Exiting, &mut self.body)
    }

    /// Queues a key press. Only the selection phase reads it; it is
    /// dropped at the end of the next update otherwise.
    pub fn input(&mut self, input: MenuInput) {
        self.body.pending = Some(input);
    }

    pub fn update(&mut self, delta: FrameDelta, outbox: &mut Outbox) -> Result<(), StateError> {
        self.body.dt = delta.pick(self.body.timer.ignores_time_scale());
        let entered = self.machine.behave(&mut self.body);
        self.body.pending = None;
        outbox.append(&mut self.body.outbox);
        if let Some(phase) = entered? {
            debug!(?phase, "menu phase");
        }
        Ok(())
    }

    pub fn phase(&self) -> Option<MenuPhase> {
        self.machine.current_label()
    }

    pub fn is_hidden(&self) -> bool {
        self.machine.is_in(MenuPhase::Hidden)
    }

    pub fn kind(&self) -> MenuKind {
        self.body.kind
    }

    pub fn choice(&self) -> MenuChoice {
        self.body.choice
    }

    /// How far the entries have slid in, 0 hidden and 1 in place.
    pub fn reveal(&self) -> Ratio {
        self.body.reveal
    }

    /// Where an entry that rests at offset 0 is drawn right now.
    pub fn slide_offset(&self) -> f32 {
        self.body.cfg.slide_distance * self.body.reveal.reversed().to_fraction()
    }
}

impl fmt::Debug for MenuOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuOverlay")
            .field("phase", &self.phase())
            .field("kind", &self.body.kind)
            .field("choice", &self.body.choice)
            .finish_non_exhaustive()
    }
}
