//! Gameplay actors built on pools, timers and state machines.

mod beam;
mod bomb;
mod boss;
mod bullet;
mod enemy;
mod item;
mod player;
mod wave;

pub use beam::{Beam, BeamPhase};
pub use bomb::{Blast, Bomb};
pub use boss::{Boss, BossPhase, Summon};
pub use bullet::{Bullet, Flight, update_bullets};
pub use enemy::{Enemy, EnemyKind, HitOutcome};
pub use item::{Item, ItemDrops, ItemKind, Pickup};
pub use player::{Player, PlayerBuffs, ShotKind};
pub use wave::{EnemyWave, WaveSignal};
