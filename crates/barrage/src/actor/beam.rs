//! Charged beams: they grow, burn for a while, then fade and release
//! themselves.

use barrage_math::{Degree, Limit, Ratio, Vec2};
use barrage_pool::Poolable;
use barrage_state::{StateError, StateManager};
use barrage_timer::{FrameDelta, Timer};
use tracing::{trace, warn};

use crate::body::{Body, Contacts, Damaging, Target, Team, WeaponKind};
use crate::config::BeamConfig;

/// Phases of one beam shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BeamPhase {
    /// Widening, harmless.
    Charging,
    /// Full width, hurts what it touches.
    Firing,
    /// Shrinking to nothing, harmless.
    Fading,
}

/// What the phase callbacks read and write.
#[derive(Debug, Clone)]
struct BeamBody {
    body: Body,
    team: Team,
    damage: f32,
    damage_buff: f32,
    dt: f32,
    timer: Timer,
    charge_seconds: f32,
    fire_seconds: f32,
    fade_seconds: f32,
    initial_width: f32,
    max_width: Limit,
    target_width: f32,
    width: f32,
    attacking: bool,
    finished: bool,
    contacts: Contacts,
}

impl BeamBody {
    fn eased_width(&self, from: f32, to: f32) -> f32 {
        from + (to - from) * self.timer.progress().to_fraction()
    }
}

type BeamMachine = StateManager<BeamPhase, BeamBody>;

/// A pooled beam.
///
/// The owner calls [`follow`](Self::follow) with the muzzle position and
/// then [`update`](Self::update) every tick.
pub struct Beam {
    core: BeamBody,
    /// Built on construction. Clones start without one.
    machine: Option<BeamMachine>,
}

impl Beam {
    pub fn new(cfg: &BeamConfig) -> Self {
        Self {
            core: BeamBody {
                body: Body::default(),
                team: Team::Player,
                damage: cfg.damage,
                damage_buff: 1.0,
                dt: 0.0,
                timer: Timer::new(),
                charge_seconds: cfg.charge_seconds,
                fire_seconds: cfg.fire_seconds,
                fade_seconds: cfg.fade_seconds,
                initial_width: cfg.initial_width,
                max_width: cfg.max_width,
                target_width: cfg.max_width.min,
                width: cfg.initial_width,
                attacking: false,
                finished: false,
                contacts: Contacts::default(),
            },
            machine: None,
        }
    }

    fn build_machine() -> Result<BeamMachine, StateError> {
        let mut machine = StateManager::new();

        machine
            .add_state(BeamPhase::Charging, |b: &mut BeamBody| {
                b.timer.advance(b.dt);
                b.width = b.eased_width(b.initial_width, b.target_width);
            })?
            .add_transition(BeamPhase::Firing, |b: &mut BeamBody| b.timer.is_terminated())
            .on_enter(|b: &mut BeamBody| {
                b.timer.restart_with(b.charge_seconds);
                b.width = b.initial_width;
            })
            .on_exit(|b: &mut BeamBody| b.width = b.target_width);

        machine
            .add_state(BeamPhase::Firing, |_: &mut BeamBody| {})?
            .add_transition(BeamPhase::Fading, |b: &mut BeamBody| b.timer.advance(b.dt))
            .on_enter(|b: &mut BeamBody| {
                b.attacking = true;
                b.timer.restart_with(b.fire_seconds);
            })
            .on_exit(|b: &mut BeamBody| b.attacking = false);

        machine
            .add_state(BeamPhase::Fading, |b: &mut BeamBody| {
                b.timer.advance(b.dt);
                b.width = b.eased_width(b.target_width, 0.0);
            })?
            .add_transition(BeamPhase::Charging, |b: &mut BeamBody| b.timer.is_terminated())
            .on_enter(|b: &mut BeamBody| b.timer.restart_with(b.fade_seconds))
            .on_exit(|b: &mut BeamBody| {
                b.width = 0.0;
                b.finished = true;
            });

        Ok(machine)
    }

    fn ensure_machine(&mut self) -> Result<(), StateError> {
        if self.machine.is_none() {
            self.machine = Some(Self::build_machine()?);
        }
        Ok(())
    }

    pub fn set_team(&mut self, team: Team) {
        self.core.team = team;
    }

    pub fn set_damage_buff(&mut self, buff: f32) {
        self.core.damage_buff = buff;
    }

    /// Sets the full width from how long the shot was charged.
    pub fn set_charge(&mut self, charge: Ratio) {
        self.core.target_width = self.core.max_width.lerp(charge);
    }

    /// Points the beam. Beams start out facing right.
    pub fn aim(&mut self, angle: Degree) {
        self.core.body.set_angle(angle);
    }

    pub fn direction(&self) -> Vec2 {
        self.core.body.direction()
    }

    /// Whether a circle at `point` lies within the beam's current width.
    pub fn reaches(&self, point: Vec2, radius: f32) -> bool {
        let to_point = point - self.core.body.position;
        let along = to_point.dot(self.core.body.direction());
        if along < 0.0 {
            return false;
        }
        let across = (to_point - self.core.body.direction() * along).length();
        across <= self.core.width * 0.5 + radius
    }

    /// Records a hit on `target`; each target is burned once per shot.
    pub fn touch(&mut self, target: Target) -> bool {
        self.core.contacts.first_touch(target)
    }

    /// Pins the beam's origin to `anchor`.
    pub fn follow(&mut self, anchor: Vec2) {
        self.core.body.position = anchor;
    }

    pub fn position(&self) -> Vec2 {
        self.core.body.position
    }

    pub fn width(&self) -> f32 {
        self.core.width
    }

    pub fn phase(&self) -> Option<BeamPhase> {
        self.machine.as_ref().and_then(|m| m.current_label())
    }

    /// Runs one tick of the current phase. The beam releases itself when
    /// fading ends.
    pub fn update(&mut self, delta: FrameDelta) -> Result<(), StateError> {
        if !self.core.body.active {
            return Ok(());
        }
        self.ensure_machine()?;
        self.core.dt = delta.scaled;
        if let Some(machine) = self.machine.as_mut() {
            if let Some(phase) = machine.behave(&mut self.core)? {
                trace!(?phase, "beam phase");
            }
        }
        if self.core.finished {
            self.deactivate();
        }
        Ok(())
    }
}

impl Clone for Beam {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            machine: None,
        }
    }
}

impl std::fmt::Debug for Beam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Beam")
            .field("phase", &self.phase())
            .field("width", &self.core.width)
            .field("active", &self.core.body.active)
            .finish_non_exhaustive()
    }
}

impl Poolable for Beam {
    fn is_active(&self) -> bool {
        self.core.body.active
    }

    fn set_active(&mut self, active: bool) {
        self.core.body.active = active;
    }

    fn set_position(&mut self, position: Vec2) {
        self.core.body.position = position;
    }

    fn on_constructed(&mut self) {
        if let Err(err) = self.ensure_machine() {
            warn!(%err, "beam phases could not be wired");
        }
    }

    fn on_acquired(&mut self) {
        self.core.target_width = self.core.max_width.min;
        self.core.attacking = false;
        self.core.finished = false;
        self.core.contacts.clear();
        let started = match self.ensure_machine() {
            Ok(()) => match self.machine.as_mut() {
                Some(machine) => machine.set_current_label(BeamPhase::Charging, &mut self.core),
                None => Ok(()),
            },
            Err(err) => Err(err),
        };
        if let Err(err) = started {
            warn!(%err, "beam could not start charging");
        }
    }
}

impl Damaging for Beam {
    fn damage(&self) -> f32 {
        self.core.damage * self.core.damage_buff
    }

    fn team(&self) -> Team {
        self.core.team
    }

    fn weapon(&self) -> WeaponKind {
        WeaponKind::Beam
    }

    fn is_attacking(&self) -> bool {
        self.core.attacking
    }
}
