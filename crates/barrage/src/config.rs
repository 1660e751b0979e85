//! Tuning values.
//!
//! Every struct here derives `Default` with the stock values and carries
//! `#[serde(default)]`, so a JSON document only needs the fields it
//! overrides:
//!
//! ```
//! use barrage::config::GameConfig;
//!
//! let cfg = GameConfig::from_json_str(r#"{ "wave": { "count_max": 8 } }"#)?;
//! assert_eq!(cfg.wave.count_max, 8);
//! assert_eq!(cfg.boss.aim_shot_count, 3);
//! # Ok::<(), barrage::BarrageError>(())
//! ```

use std::path::Path;

use barrage_math::{Degree, Limit, Percentage, Ratio, Vec2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actor::ItemKind;
use crate::body::WeaponKind;
use crate::buff::{DecayBuff, GrowthBuff};
use crate::error::BarrageError;

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// All tuning values of one game.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerConfig,
    pub bomb: BombConfig,
    pub wave: WaveConfig,
    pub enemy: EnemyConfig,
    pub boss: BossConfig,
    pub beam: BeamConfig,
    pub item: ItemConfig,
    pub mission_ui: MissionUiConfig,
    pub menu: MenuConfig,
    pub pause: PauseConfig,
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, BarrageError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, BarrageError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let cfg = Self::from_json_str(&text)?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(cfg)
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// The ship, its main weapons and its stat buffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub start_position: Vec2,
    pub life: f32,
    pub hit_radius: f32,
    /// Damage taken when an enemy rams the ship.
    pub contact_damage: f32,
    pub move_speed: f32,
    /// The ship stays within this distance of the centre line.
    pub move_limit: f32,
    /// How long the ship stays flashed after a hit.
    pub reaction_seconds: f32,
    /// Delay between death and the game-over menu.
    pub gameover_seconds: f32,
    /// Length of the colour fade after catching an item.
    pub catch_reaction_seconds: f32,

    /// Seconds between volleys without rapid-fire buffs.
    pub shot_seconds: f32,
    /// Share of `shot_seconds` removed at full rapid fire.
    pub shot_reduction: Percentage,
    pub bullet_speed: f32,
    pub bullet_damage: f32,
    pub bullet_radius: f32,
    /// Spread between the bullets of one volley.
    pub bullet_angle: Degree,
    /// Bullets appear this far from the ship.
    pub bullet_distance: f32,
    pub chase_accuracy: Ratio,
    /// Extra damage for a charged chase volley, which does not pierce.
    pub charged_chase_buff: f32,
    pub wave_amplitude: f32,
    pub wave_period: f32,

    /// Time to a full charge of the main weapon.
    pub charge_seconds: f32,
    /// Extra damage multiplier at a full charge.
    pub charge_damage_buff: f32,

    pub rapid_fire: Limit,
    pub damage: Limit,
    /// Extra bullets on each side of a volley, and extra sub-weapon stock.
    pub way: Limit,
    /// Extra maximum life.
    pub extra_life: Limit,

    pub bomb: SubWeaponConfig,
    pub beam: SubWeaponConfig,
    /// Where the beam starts relative to the ship.
    pub beam_offset: Vec2,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start_position: Vec2::new(-8.0, 0.0),
            life: 100.0,
            hit_radius: 0.4,
            contact_damage: 3.0,
            move_speed: 8.0,
            move_limit: 4.5,
            reaction_seconds: 0.1,
            gameover_seconds: 3.0,
            catch_reaction_seconds: 0.5,

            shot_seconds: 0.1,
            shot_reduction: Percentage::new(80.0),
            bullet_speed: 15.0,
            bullet_damage: 1.0,
            bullet_radius: 0.15,
            bullet_angle: Degree::new(10.0),
            bullet_distance: 0.5,
            chase_accuracy: Ratio::new(0.7),
            charged_chase_buff: 0.1,
            wave_amplitude: 1.0,
            wave_period: 0.4,

            charge_seconds: 4.0,
            charge_damage_buff: 2.0,

            rapid_fire: Limit::new(0.0, 1.0),
            damage: Limit::new(1.0, 2.0),
            way: Limit::up_to(5.0),
            extra_life: Limit::up_to(50.0),

            bomb: SubWeaponConfig {
                recast_seconds: 5.0,
                charge_seconds: 1.0,
            },
            beam: SubWeaponConfig {
                recast_seconds: 8.0,
                charge_seconds: 1.0,
            },
            beam_offset: Vec2::new(0.8, 0.0),
        }
    }
}

/// Stock and charge timing of one sub-weapon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubWeaponConfig {
    /// Seconds to gain one stock.
    pub recast_seconds: f32,
    /// Seconds to a full charge once the stock is full.
    pub charge_seconds: f32,
}

impl Default for SubWeaponConfig {
    fn default() -> Self {
        Self {
            recast_seconds: 5.0,
            charge_seconds: 1.0,
        }
    }
}

/// The player's bomb and its blast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BombConfig {
    /// Flight time to the landing point.
    pub move_seconds: f32,
    /// Flight distance, picked by the charge ratio.
    pub move_distance: Limit,
    pub radius: f32,
    pub damage: f32,
    pub blast_radius: f32,
    pub blast_grow_seconds: f32,
    pub blast_fade_seconds: f32,
    pub shake_amplitude: f32,
    pub shake_seconds: f32,
}

impl Default for BombConfig {
    fn default() -> Self {
        Self {
            move_seconds: 0.5,
            move_distance: Limit::new(3.0, 6.0),
            radius: 0.3,
            damage: 3.0,
            blast_radius: 2.0,
            blast_grow_seconds: 0.2,
            blast_fade_seconds: 1.0,
            shake_amplitude: 0.2,
            shake_seconds: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Enemies
// ---------------------------------------------------------------------------

/// The spawner that feeds enemies until the boss shows up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Base seconds between spawns.
    pub spawn_seconds: f32,
    /// Spawn interval reduction at the highest level.
    pub spawn_level_buff: Ratio,
    /// Spawn interval reduction right before the boss.
    pub spawn_progress_buff: Ratio,
    /// Base number of enemies alive at once.
    pub count_max: u32,
    pub count_max_level_buff: f32,
    pub count_max_progress_buff: f32,
    /// Enemies enter at this x.
    pub spawn_x: f32,
    pub spawn_y: Limit,
    /// Every n-th spawn builds a fresh enemy instead of recycling one.
    pub instantiate_every: u32,
    /// Seconds of waves before the boss is due.
    pub boss_seconds: f32,
    pub weakness_chance: Percentage,
    /// Weapons an enemy may be weak to, if the player has unlocked them.
    pub weakness_weapons: Vec<WeaponKind>,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            spawn_seconds: 1.0,
            spawn_level_buff: Ratio::new(0.5),
            spawn_progress_buff: Ratio::new(0.3),
            count_max: 5,
            count_max_level_buff: 3.0,
            count_max_progress_buff: 2.0,
            spawn_x: 12.0,
            spawn_y: Limit::new(-4.0, 4.0),
            instantiate_every: 10,
            boss_seconds: 60.0,
            weakness_chance: Percentage::new(10.0),
            weakness_weapons: WeaponKind::ALL.to_vec(),
        }
    }
}

/// Shared enemy stats. The kind decides how they are used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub life: f32,
    pub speed: f32,
    pub hit_radius: f32,
    pub weakness_multiplier: f32,
    /// How long a damaged enemy stays flashed.
    pub flash_seconds: f32,
    pub shot_seconds: f32,
    /// Bullets appear this far ahead of the enemy.
    pub bullet_distance: f32,
    pub bullet_speed: f32,
    pub bullet_damage: f32,
    /// How far a stay-shot enemy travels before it stops to shoot.
    pub stay_distance: Limit,
    /// Cone in which a move-shot enemy sees the player.
    pub viewing_angle: Degree,
    pub drop_chance: Percentage,
    pub drop_count: Limit,
    /// Extra drops for an enemy carrying a weakness.
    pub weakness_bonus_drops: u32,
    pub drop_kinds: Vec<ItemKind>,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            life: 1.0,
            speed: 4.0,
            hit_radius: 0.5,
            weakness_multiplier: 1.2,
            flash_seconds: 0.5,
            shot_seconds: 1.0,
            bullet_distance: 1.0,
            bullet_speed: 8.0,
            bullet_damage: 1.0,
            stay_distance: Limit::new(2.0, 5.0),
            viewing_angle: Degree::new(45.0),
            drop_chance: Percentage::new(30.0),
            drop_count: Limit::new(0.0, 1.0),
            weakness_bonus_drops: 2,
            drop_kinds: ItemKind::ALL.to_vec(),
        }
    }
}

// ---------------------------------------------------------------------------
// Boss
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    pub life: f32,
    /// Extra life at the highest level, as a multiple of `life`.
    pub life_level_buff: f32,
    pub hit_radius: f32,

    pub approach_seconds: f32,
    pub approach_from: Vec2,
    pub approach_to: Vec2,

    pub move_seconds: f32,
    pub move_seconds_buff: DecayBuff,
    pub patrol_speed: f32,
    /// Half the patrol span around `approach_to`.
    pub patrol_distance: f32,

    pub aim_shot_count: u32,
    pub aim_shot_count_buff: GrowthBuff,
    pub aim_shot_seconds: f32,
    pub aim_shot_seconds_buff: DecayBuff,

    pub move_shot_count: u32,
    pub move_shot_count_buff: GrowthBuff,
    pub move_shot_seconds: f32,
    pub move_shot_seconds_buff: DecayBuff,
    pub move_shot_speed: f32,

    /// Muzzles relative to the boss; shots alternate between them.
    pub muzzles: [Vec2; 2],
    pub bullet_speed: f32,
    pub bullet_damage: f32,

    pub beam_offset: Vec2,
    pub beam_damage_debuff: f32,
    pub beam_damage_buff: GrowthBuff,
    pub beam_wait_seconds: f32,
    pub beam_wait_buff: DecayBuff,
    pub shake_amplitude: f32,
    pub shake_seconds: f32,

    pub summon_count: u32,
    pub summon_count_buff: GrowthBuff,
    pub summon_wait_seconds: f32,
    pub summon_wait_buff: DecayBuff,
    pub summon_distance: f32,
    pub summon_angle: Degree,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            life: 50.0,
            life_level_buff: 1.0,
            hit_radius: 1.5,

            approach_seconds: 5.0,
            approach_from: Vec2::new(15.0, 0.0),
            approach_to: Vec2::new(7.0, 0.0),

            move_seconds: 3.0,
            move_seconds_buff: DecayBuff::new(0.5, 0.3),
            patrol_speed: 3.0,
            patrol_distance: 2.5,

            aim_shot_count: 3,
            aim_shot_count_buff: GrowthBuff::new(2.0, 3.0),
            aim_shot_seconds: 0.5,
            aim_shot_seconds_buff: DecayBuff::new(0.5, 0.5),

            move_shot_count: 10,
            move_shot_count_buff: GrowthBuff::new(1.0, 2.0),
            move_shot_seconds: 0.25,
            move_shot_seconds_buff: DecayBuff::new(0.5, 0.7),
            move_shot_speed: 6.0,

            muzzles: [Vec2::new(-1.0, 0.8), Vec2::new(-1.0, -0.8)],
            bullet_speed: 8.0,
            bullet_damage: 1.0,

            beam_offset: Vec2::new(-1.5, 0.0),
            beam_damage_debuff: 0.5,
            beam_damage_buff: GrowthBuff::new(0.5, 2.5),
            beam_wait_seconds: 1.5,
            beam_wait_buff: DecayBuff::new(0.75, 0.5),
            shake_amplitude: 0.1,
            shake_seconds: 1.5,

            summon_count: 2,
            summon_count_buff: GrowthBuff::new(2.0, 2.0),
            summon_wait_seconds: 3.0,
            summon_wait_buff: DecayBuff::new(0.5, 0.5),
            summon_distance: 10.0,
            summon_angle: Degree::new(90.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamConfig {
    pub charge_seconds: f32,
    pub fire_seconds: f32,
    pub fade_seconds: f32,
    pub initial_width: f32,
    /// Firing width, picked by the charge ratio.
    pub max_width: Limit,
    pub damage: f32,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            charge_seconds: 0.15,
            fire_seconds: 0.5,
            fade_seconds: 0.2,
            initial_width: 0.01,
            max_width: Limit::new(0.6, 1.0),
            damage: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Pickups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemConfig {
    /// How far a drop scatters from where it fell.
    pub drop_distance: Limit,
    pub drop_seconds: f32,
    /// Homing speed toward the player.
    pub speed: f32,
    pub rise_amount: f32,
    pub amount_buff: Limit,
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            drop_distance: Limit::new(1.0, 2.5),
            drop_seconds: 0.5,
            speed: 20.0,
            rise_amount: 1.0,
            amount_buff: Limit::new(1.0, 2.0),
        }
    }
}

// ---------------------------------------------------------------------------
// UI
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionUiConfig {
    pub approach_distance: f32,
    pub approach_seconds: f32,
    pub approach_direction: Vec2,
    pub exit_distance: f32,
    pub exit_seconds: f32,
    pub exit_direction: Vec2,
    /// Missions shown at once.
    pub max_missions: usize,
    /// Kill count a new mission asks for.
    pub required_kills: Limit,
    /// Screen position of the first slot.
    pub base_position: Vec2,
    /// Distance between neighbouring slots.
    pub slot_spacing: f32,
    /// Slide into a freed slot.
    pub move_seconds: f32,
    /// Extra delay per slot index, so the row closes up one by one.
    pub move_stagger_seconds: f32,
}

impl Default for MissionUiConfig {
    fn default() -> Self {
        Self {
            approach_distance: 100.0,
            approach_seconds: 0.3,
            approach_direction: Vec2::UP,
            exit_distance: 200.0,
            exit_seconds: 0.5,
            exit_direction: Vec2::DOWN,
            max_missions: 3,
            required_kills: Limit::new(5.0, 15.0),
            base_position: Vec2::ZERO,
            slot_spacing: 130.0,
            move_seconds: 0.8,
            move_stagger_seconds: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub fade_in_seconds: f32,
    pub approach_seconds: f32,
    pub decided_wait_seconds: f32,
    /// How far the menu entries slide while appearing.
    pub slide_distance: f32,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            fade_in_seconds: 0.2,
            approach_seconds: 0.75,
            decided_wait_seconds: 0.5,
            slide_distance: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PauseConfig {
    /// Length of the pause and unpause transitions.
    pub transition_seconds: f32,
}

impl Default for PauseConfig {
    fn default() -> Self {
        Self {
            transition_seconds: 0.5,
        }
    }
}
