//! Side effects actors hand to the rest of the game.
//!
//! Actors never call audio, camera or scoring code directly. They push
//! [`Cue`]s into an [`Outbox`]; the owner of the game loop dispatches the
//! outbox through its [`Services`] once the tick is done.

use std::slice;
use std::vec;

use barrage_math::Vec2;
use tracing::{debug, info};

use crate::actor::{EnemyKind, ItemKind};
use crate::body::WeaponKind;
use crate::ui::MenuDecision;

/// Sound effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    EnemyDamaged,
    EnemyDestroyed,
    EnemyShot,
    BeamCharge,
    BeamFire,
    CursorMoved,
    MenuDecided,
    PlayerShot,
    ChargeShot,
    /// A sub-weapon reached full charge.
    Charged,
    /// A sub-weapon gained one stock.
    Recast,
    BombFire,
    Explosion,
    ItemCaught,
    PlayerDamaged,
    PlayerDestroyed,
}

/// One side effect requested during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cue {
    Sound(SoundCue),
    CameraShake { amplitude: f32, seconds: f32 },
    EnemyDestroyed {
        kind: EnemyKind,
        weakness: Option<WeaponKind>,
    },
    ItemDropped { kind: ItemKind, position: Vec2 },
    BossDefeated,
    /// The player has been dead long enough to end the run.
    Gameover,
    Menu(MenuDecision),
    /// The game-time multiplier should change (pause, menus).
    TimeScale(f32),
}

/// Cues queued during a tick, in the order they were raised.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    cues: Vec<Cue>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Cue> {
        self.cues.iter()
    }

    pub fn drain(&mut self) -> vec::Drain<'_, Cue> {
        self.cues.drain(..)
    }

    /// Moves every cue of `other` to the end of this outbox.
    pub fn append(&mut self, other: &mut Outbox) {
        self.cues.append(&mut other.cues);
    }

    /// Routes every queued cue to `services` and empties the outbox.
    pub fn dispatch<S: Services + ?Sized>(&mut self, services: &mut S) {
        for cue in self.cues.drain(..) {
            match cue {
                Cue::Sound(sound) => services.play_sound(sound),
                Cue::CameraShake { amplitude, seconds } => {
                    services.shake_camera(amplitude, seconds)
                }
                Cue::EnemyDestroyed { kind, weakness } => services.record_kill(kind, weakness),
                Cue::ItemDropped { kind, position } => services.drop_item(kind, position),
                Cue::BossDefeated => services.boss_defeated(),
                Cue::Gameover => services.gameover(),
                Cue::Menu(decision) => services.menu_decided(decision),
                Cue::TimeScale(scale) => services.set_time_scale(scale),
            }
        }
    }
}

impl<'a> IntoIterator for &'a Outbox {
    type Item = &'a Cue;
    type IntoIter = slice::Iter<'a, Cue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Collaborators that carry out cues. Every method defaults to doing
/// nothing, so an implementation only handles what it cares about.
pub trait Services {
    fn play_sound(&mut self, _sound: SoundCue) {}

    fn shake_camera(&mut self, _amplitude: f32, _seconds: f32) {}

    fn record_kill(&mut self, _kind: EnemyKind, _weakness: Option<WeaponKind>) {}

    fn drop_item(&mut self, _kind: ItemKind, _position: Vec2) {}

    fn boss_defeated(&mut self) {}

    fn gameover(&mut self) {}

    fn menu_decided(&mut self, _decision: MenuDecision) {}

    fn set_time_scale(&mut self, _scale: f32) {}
}

/// Logs every cue. Useful headless and in tests.
#[derive(Debug, Default)]
pub struct TracingServices;

impl Services for TracingServices {
    fn play_sound(&mut self, sound: SoundCue) {
        debug!(?sound, "sound");
    }

    fn shake_camera(&mut self, amplitude: f32, seconds: f32) {
        debug!(amplitude, seconds, "camera shake");
    }

    fn record_kill(&mut self, kind: EnemyKind, weakness: Option<WeaponKind>) {
        info!(?kind, ?weakness, "enemy destroyed");
    }

    fn drop_item(&mut self, kind: ItemKind, position: Vec2) {
        debug!(?kind, x = position.x, y = position.y, "item dropped");
    }

    fn boss_defeated(&mut self) {
        info!("boss defeated");
    }

    fn gameover(&mut self) {
        info!("game over");
    }

    fn menu_decided(&mut self, decision: MenuDecision) {
        info!(?decision, "menu decision");
    }

    fn set_time_scale(&mut self, scale: f32) {
        debug!(scale, "time scale requested");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        sounds: Vec<SoundCue>,
        kills: u32,
        gameovers: u32,
        scale: Option<f32>,
    }

    impl Services for Recorder {
        fn play_sound(&mut self, sound: SoundCue) {
            self.sounds.push(sound);
        }
        fn record_kill(&mut self, _kind: EnemyKind, _weakness: Option<WeaponKind>) {
            self.kills += 1;
        }
        fn gameover(&mut self) {
            self.gameovers += 1;
        }
        fn set_time_scale(&mut self, scale: f32) {
            self.scale = Some(scale);
        }
    }

    #[test]
    fn test_dispatch_routes_in_order_and_empties() {
        let mut outbox = Outbox::new();
        outbox.push(Cue::Sound(SoundCue::EnemyShot));
        outbox.push(Cue::EnemyDestroyed {
            kind: EnemyKind::Straight,
            weakness: None,
        });
        outbox.push(Cue::Sound(SoundCue::EnemyDestroyed));
        outbox.push(Cue::BossDefeated);
        outbox.push(Cue::Gameover);
        outbox.push(Cue::TimeScale(0.0));

        let mut recorder = Recorder::default();
        outbox.dispatch(&mut recorder);

        assert!(outbox.is_empty());
        assert_eq!(
            recorder.sounds,
            vec![SoundCue::EnemyShot, SoundCue::EnemyDestroyed]
        );
        assert_eq!(recorder.kills, 1);
        assert_eq!(recorder.gameovers, 1);
        assert_eq!(recorder.scale, Some(0.0));
    }

    #[test]
    fn test_append_moves_cues() {
        let mut a = Outbox::new();
        let mut b = Outbox::new();
        b.push(Cue::BossDefeated);
        a.append(&mut b);
        assert_eq!(a.len(), 1);
        assert!(b.is_empty());
        assert_eq!(a.iter().next(), Some(&Cue::BossDefeated));
    }
}
