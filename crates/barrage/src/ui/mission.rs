//! Kill missions that unlock weapons, and the cards that show them.

use std::fmt;

use barrage_math::{Ratio, Vec2, easing};
use barrage_pool::{Pool, PoolKey, Poolable};
use barrage_state::{StateError, StateManager};
use barrage_timer::{FrameDelta, Timer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::actor::EnemyKind;
use crate::body::WeaponKind;
use crate::config::MissionUiConfig;
use crate::error::BarrageError;

// ---------------------------------------------------------------------------
// Missions
// ---------------------------------------------------------------------------

/// Which kills a mission counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissionTarget {
    Straight,
    Aimer,
    MoveShot,
    StayShot,
    /// Enemies carrying a weakness, whatever their kind.
    Weakness,
    All,
}

impl MissionTarget {
    pub const ALL: [Self; 6] = [
        Self::Straight,
        Self::Aimer,
        Self::MoveShot,
        Self::StayShot,
        Self::Weakness,
        Self::All,
    ];
}

impl From<EnemyKind> for MissionTarget {
    fn from(kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Straight => Self::Straight,
            EnemyKind::Aimer => Self::Aimer,
            EnemyKind::StayShot => Self::StayShot,
            EnemyKind::MoveShot => Self::MoveShot,
        }
    }
}

/// Destroyed-enemy counters per [`MissionTarget`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KillLedger {
    counts: [u32; MissionTarget::ALL.len()],
}

impl KillLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one kill toward its kind, `All`, and `Weakness` if the enemy
    /// had one.
    pub fn record(&mut self, kind: EnemyKind, weakness: Option<WeaponKind>) {
        self.counts[MissionTarget::from(kind) as usize] += 1;
        self.counts[MissionTarget::All as usize] += 1;
        if weakness.is_some() {
            self.counts[MissionTarget::Weakness as usize] += 1;
        }
    }

    pub fn count(&self, target: MissionTarget) -> u32 {
        self.counts[target as usize]
    }
}

/// "Destroy `required` enemies of `target`", rewarded with a weapon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mission {
    target: MissionTarget,
    required: u32,
    reward: WeaponKind,
    ledger: KillLedger,
}

impl Mission {
    /// A `required` of zero is raised to one.
    pub fn new(target: MissionTarget, required: u32, reward: WeaponKind) -> Self {
        Self {
            target,
            required: required.max(1),
            reward,
            ledger: KillLedger::new(),
        }
    }

    pub fn target(&self) -> MissionTarget {
        self.target
    }

    pub fn required(&self) -> u32 {
        self.required
    }

    pub fn reward(&self) -> WeaponKind {
        self.reward
    }

    pub fn record(&mut self, kind: EnemyKind, weakness: Option<WeaponKind>) {
        self.ledger.record(kind, weakness);
    }

    pub fn count(&self) -> u32 {
        self.ledger.count(self.target)
    }

    pub fn progress(&self) -> Ratio {
        Ratio::new(self.count() as f32 / self.required as f32)
    }

    pub fn is_achieved(&self) -> bool {
        self.count() >= self.required
    }
}

impl fmt::Display for Mission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "destroy {} {:?} enemies to unlock {:?}",
            self.required, self.target, self.reward
        )
    }
}

// ---------------------------------------------------------------------------
// MissionUi
// ---------------------------------------------------------------------------

/// Card animation phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissionPhase {
    Stay,
    /// Slides in to its slot.
    Approach,
    /// Slides away; the card releases itself when done.
    Exit,
    /// Slides to a new slot.
    Move,
}

#[derive(Debug, Clone)]
struct MissionBody {
    cfg: MissionUiConfig,
    position: Vec2,
    stay: Vec2,
    approach_from: Vec2,
    exit_to: Vec2,
    move_from: Vec2,
    move_seconds: f32,
    timer: Timer,
    dt: f32,
    fill: Ratio,
    active: bool,
    exited: bool,
}

impl MissionBody {
    fn set_stay(&mut self, stay: Vec2) {
        self.stay = stay;
        self.approach_from = stay - self.cfg.approach_direction * self.cfg.approach_distance;
        self.exit_to = stay + self.cfg.exit_direction * self.cfg.exit_distance;
    }

    fn slide(&mut self, from: Vec2, to: Vec2) {
        self.timer.advance(self.dt);
        let t = easing::quad_out(self.timer.progress()).to_fraction();
        self.position = from.lerp(to, t);
    }
}

type MissionMachine = StateManager<MissionPhase, MissionBody>;

/// A pooled mission card.
pub struct MissionUi {
    core: MissionBody,
    machine: Option<MissionMachine>,
    /// Counts down to the start of a requested move.
    move_delay: Timer,
}

impl MissionUi {
    pub fn new(cfg: &MissionUiConfig) -> Self {
        let mut core = MissionBody {
            cfg: cfg.clone(),
            position: Vec2::ZERO,
            stay: Vec2::ZERO,
            approach_from: Vec2::ZERO,
            exit_to: Vec2::ZERO,
            move_from: Vec2::ZERO,
            move_seconds: cfg.move_seconds,
            timer: Timer::new(),
            dt: 0.0,
            fill: Ratio::ZERO,
            active: false,
            exited: false,
        };
        core.set_stay(Vec2::ZERO);
        Self {
            core,
            machine: None,
            move_delay: Timer::new(),
        }
    }

    fn build_machine() -> Result<MissionMachine, StateError> {
        let mut machine = StateManager::new();

        machine.add_state(MissionPhase::Stay, |_: &mut MissionBody| {})?;

        machine
            .add_state(MissionPhase::Approach, |m: &mut MissionBody| {
                let (from, to) = (m.approach_from, m.stay);
                m.slide(from, to);
            })?
            .add_transition(MissionPhase::Stay, |m: &mut MissionBody| m.timer.is_terminated())
            .on_enter(|m: &mut MissionBody| {
                m.position = m.approach_from;
                m.timer.restart_with(m.cfg.approach_seconds);
            })
            .on_exit(|m: &mut MissionBody| m.position = m.stay);

        machine
            .add_state(MissionPhase::Exit, |m: &mut MissionBody| {
                let (from, to) = (m.stay, m.exit_to);
                m.slide(from, to);
            })?
            .add_transition(MissionPhase::Stay, |m: &mut MissionBody| m.timer.is_terminated())
            .on_enter(|m: &mut MissionBody| m.timer.restart_with(m.cfg.exit_seconds))
            .on_exit(|m: &mut MissionBody| {
                m.position = m.exit_to;
                m.exited = true;
            });

        machine
            .add_state(MissionPhase::Move, |m: &mut MissionBody| {
                let (from, to) = (m.move_from, m.stay);
                m.slide(from, to);
            })?
            .add_transition(MissionPhase::Stay, |m: &mut MissionBody| m.timer.is_terminated())
            .on_enter(|m: &mut MissionBody| {
                m.move_from = m.position;
                m.timer.restart_with(m.move_seconds);
            })
            .on_exit(|m: &mut MissionBody| m.position = m.stay);

        Ok(machine)
    }

    fn switch(&mut self, phase: MissionPhase) -> Result<(), StateError> {
        if self.machine.is_none() {
            self.machine = Some(Self::build_machine()?);
        }
        match self.machine.as_mut() {
            Some(machine) => machine.set_current_label(phase, &mut self.core),
            None => Ok(()),
        }
    }

    /// Where the card rests. Approach and exit paths are measured from
    /// here.
    pub fn set_stay_position(&mut self, stay: Vec2) {
        self.core.set_stay(stay);
    }

    pub fn stay_position(&self) -> Vec2 {
        self.core.stay
    }

    pub fn position(&self) -> Vec2 {
        self.core.position
    }

    pub fn set_fill(&mut self, fill: Ratio) {
        self.core.fill = fill;
    }

    pub fn fill(&self) -> Ratio {
        self.core.fill
    }

    pub fn phase(&self) -> Option<MissionPhase> {
        self.machine.as_ref().and_then(|m| m.current_label())
    }

    pub fn to_approach(&mut self) -> Result<(), StateError> {
        self.switch(MissionPhase::Approach)
    }

    pub fn to_exit(&mut self) -> Result<(), StateError> {
        self.move_delay.stop();
        self.switch(MissionPhase::Exit)
    }

    /// Slides to `target` over `seconds`, starting after `delay` seconds.
    pub fn move_to(&mut self, target: Vec2, seconds: f32, delay: f32) {
        self.core.set_stay(target);
        self.core.move_seconds = seconds;
        self.move_delay.restart_with(delay.max(Timer::MIN_INTERVAL));
    }

    /// Whether the card finished its exit since the last call.
    pub fn take_exited(&mut self) -> bool {
        std::mem::take(&mut self.core.exited)
    }

    pub fn update(&mut self, delta: FrameDelta) -> Result<(), StateError> {
        if !self.core.active {
            return Ok(());
        }
        if self.move_delay.advance_frame(delta) {
            self.switch(MissionPhase::Move)?;
        }
        self.core.dt = delta.scaled;
        if let Some(machine) = self.machine.as_mut() {
            machine.behave(&mut self.core)?;
        }
        if self.core.exited {
            self.deactivate();
        }
        Ok(())
    }
}

impl Clone for MissionUi {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            machine: None,
            move_delay: self.move_delay,
        }
    }
}

impl fmt::Debug for MissionUi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MissionUi")
            .field("phase", &self.phase())
            .field("position", &self.core.position)
            .field("active", &self.core.active)
            .finish_non_exhaustive()
    }
}

impl Poolable for MissionUi {
    fn is_active(&self) -> bool {
        self.core.active
    }

    fn set_active(&mut self, active: bool) {
        self.core.active = active;
    }

    fn set_position(&mut self, position: Vec2) {
        self.core.position = position;
    }

    fn on_acquired(&mut self) {
        self.core.exited = false;
        self.core.fill = Ratio::ZERO;
        self.move_delay.reset(true);
        if let Err(err) = self.switch(MissionPhase::Stay) {
            warn!(%err, "mission card could not settle");
        }
    }
}

// ---------------------------------------------------------------------------
// MissionBoard
// ---------------------------------------------------------------------------

/// The row of open missions.
///
/// Each mission locks away one weapon as its reward. A finished mission's
/// card slides out, the reward is granted once it is gone, and the cards
/// to its right close the gap one after another.
#[derive(Debug)]
pub struct MissionBoard {
    cfg: MissionUiConfig,
    open: Vec<(Mission, PoolKey)>,
    leaving: Vec<(WeaponKind, PoolKey)>,
    locked: Vec<WeaponKind>,
    cards: Pool<MissionUi>,
    rng: StdRng,
}

impl MissionBoard {
    pub fn new(cfg: &MissionUiConfig, seed: u64) -> Self {
        Self {
            cfg: cfg.clone(),
            open: Vec::new(),
            leaving: Vec::new(),
            locked: Vec::new(),
            cards: Pool::with_seed(vec![MissionUi::new(cfg)], seed),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn slot(&self, index: usize) -> Vec2 {
        self.cfg.base_position + Vec2::RIGHT * (self.cfg.slot_spacing * index as f32)
    }

    /// Clears the board and deals fresh missions for the `locked` weapons.
    pub fn restart(&mut self, locked: Vec<WeaponKind>) -> Result<(), BarrageError> {
        self.cards.deactivate_all();
        self.open.clear();
        self.leaving.clear();
        self.locked = locked;
        self.fill()
    }

    /// Opens missions until the board is full or no weapon is left to
    /// reward.
    pub fn fill(&mut self) -> Result<(), BarrageError> {
        while self.open.len() < self.cfg.max_missions && !self.locked.is_empty() {
            let index = self.rng.random_range(0..self.locked.len());
            let reward = self.locked.swap_remove(index);
            // Any target but `All`.
            let target = MissionTarget::ALL[self.rng.random_range(0..MissionTarget::ALL.len() - 1)];
            let required = self.cfg.required_kills.sample_int(&mut self.rng).max(1) as u32;
            let mission = Mission::new(target, required, reward);

            let slot = self.slot(self.open.len());
            let key = self.cards.generate(slot)?;
            let card = &mut self.cards[key];
            card.set_stay_position(slot);
            card.to_approach()?;

            info!(%mission, "mission opened");
            self.open.push((mission, key));
        }
        Ok(())
    }

    /// Counts a kill toward every open mission. Finished missions start
    /// leaving. Returns how many finished.
    pub fn record(
        &mut self,
        kind: EnemyKind,
        weakness: Option<WeaponKind>,
    ) -> Result<usize, StateError> {
        let mut finished = Vec::new();
        for (index, (mission, key)) in self.open.iter_mut().enumerate() {
            mission.record(kind, weakness);
            self.cards[*key].set_fill(mission.progress());
            if mission.is_achieved() {
                finished.push(index);
            }
        }

        for &index in finished.iter().rev() {
            let (mission, key) = self.open.remove(index);
            self.cards[key].to_exit()?;
            debug!(%mission, "mission achieved");
            self.leaving.push((mission.reward(), key));
        }

        if !finished.is_empty() {
            for index in 0..self.open.len() {
                let slot = self.slot(index);
                let key = self.open[index].1;
                let delay = self.cfg.move_stagger_seconds * index as f32;
                self.cards[key].move_to(slot, self.cfg.move_seconds, delay);
            }
        }
        Ok(finished.len())
    }

    /// Animates the cards. Returns the weapons whose cards finished
    /// leaving during this tick.
    pub fn update(&mut self, delta: FrameDelta) -> Result<Vec<WeaponKind>, StateError> {
        for (_, card) in self.cards.iter_mut() {
            card.update(delta)?;
        }

        let mut unlocked = Vec::new();
        let cards = &mut self.cards;
        self.leaving.retain(|&(reward, key)| {
            if cards[key].take_exited() {
                unlocked.push(reward);
                false
            } else {
                true
            }
        });
        for reward in &unlocked {
            info!(?reward, "weapon unlocked");
        }
        Ok(unlocked)
    }

    pub fn missions(&self) -> impl Iterator<Item = &Mission> {
        self.open.iter().map(|(mission, _)| mission)
    }

    pub fn card(&self, index: usize) -> Option<&MissionUi> {
        self.open.get(index).map(|&(_, key)| &self.cards[key])
    }

    /// Weapons no open mission has claimed yet.
    pub fn locked(&self) -> &[WeaponKind] {
        &self.locked
    }

    pub fn cards(&self) -> &Pool<MissionUi> {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barrage_math::Limit;

    const DT: FrameDelta = FrameDelta::fixed(0.25);

    fn quick() -> MissionUiConfig {
        MissionUiConfig {
            approach_seconds: 0.5,
            exit_seconds: 0.5,
            move_seconds: 0.5,
            move_stagger_seconds: 0.25,
            required_kills: Limit::new(2.0, 2.0),
            ..MissionUiConfig::default()
        }
    }

    // ====================================================================
    // Mission
    // ====================================================================

    #[test]
    fn test_ledger_counts_kind_all_and_weakness() {
        let mut ledger = KillLedger::new();
        ledger.record(EnemyKind::Aimer, None);
        ledger.record(EnemyKind::Aimer, Some(WeaponKind::Bomb));
        ledger.record(EnemyKind::Straight, None);
        assert_eq!(ledger.count(MissionTarget::Aimer), 2);
        assert_eq!(ledger.count(MissionTarget::Straight), 1);
        assert_eq!(ledger.count(MissionTarget::Weakness), 1);
        assert_eq!(ledger.count(MissionTarget::All), 3);
        assert_eq!(ledger.count(MissionTarget::MoveShot), 0);
    }

    #[test]
    fn test_mission_progress() {
        let mut mission = Mission::new(MissionTarget::StayShot, 4, WeaponKind::Beam);
        mission.record(EnemyKind::StayShot, None);
        mission.record(EnemyKind::Aimer, None);
        assert_eq!(mission.count(), 1);
        assert_eq!(mission.progress(), Ratio::new(0.25));
        assert!(!mission.is_achieved());
        for _ in 0..3 {
            mission.record(EnemyKind::StayShot, None);
        }
        assert!(mission.is_achieved());
        assert_eq!(mission.progress(), Ratio::ONE);
        assert_eq!(
            mission.to_string(),
            "destroy 4 StayShot enemies to unlock Beam"
        );
    }

    #[test]
    fn test_zero_required_is_raised() {
        let mission = Mission::new(MissionTarget::All, 0, WeaponKind::Bomb);
        assert_eq!(mission.required(), 1);
    }

    // ====================================================================
    // MissionUi
    // ====================================================================

    fn card(cfg: &MissionUiConfig) -> (Pool<MissionUi>, PoolKey) {
        let mut pool = Pool::with_seed(vec![MissionUi::new(cfg)], 1);
        let key = pool.generate(Vec2::ZERO).unwrap();
        (pool, key)
    }

    #[test]
    fn test_card_approaches_then_stays() {
        let cfg = quick();
        let (mut pool, key) = card(&cfg);
        let ui = &mut pool[key];
        ui.set_stay_position(Vec2::new(10.0, 0.0));
        ui.to_approach().unwrap();
        let start = Vec2::new(10.0, 0.0) - cfg.approach_direction * cfg.approach_distance;
        assert_eq!(ui.position(), start);

        ui.update(DT).unwrap();
        assert_eq!(ui.phase(), Some(MissionPhase::Approach));
        assert!(ui.position().distance(start) > 0.0);
        ui.update(DT).unwrap();
        assert_eq!(ui.phase(), Some(MissionPhase::Stay));
        assert_eq!(ui.position(), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_card_exits_and_releases() {
        let cfg = quick();
        let (mut pool, key) = card(&cfg);
        let ui = &mut pool[key];
        ui.to_exit().unwrap();
        ui.update(DT).unwrap();
        assert!(ui.is_active());
        ui.update(DT).unwrap();
        assert!(!ui.is_active());
        assert_eq!(ui.position(), cfg.exit_direction * cfg.exit_distance);
        assert!(ui.take_exited());
        assert!(!ui.take_exited());
    }

    #[test]
    fn test_card_move_waits_for_delay() {
        let cfg = quick();
        let (mut pool, key) = card(&cfg);
        let ui = &mut pool[key];
        ui.set_stay_position(Vec2::new(100.0, 0.0));
        ui.move_to(Vec2::ZERO, 0.5, 0.25);
        assert_eq!(ui.position(), Vec2::ZERO);

        ui.set_position(Vec2::new(100.0, 0.0));
        ui.update(DT).unwrap();
        assert_eq!(ui.phase(), Some(MissionPhase::Move));
        ui.update(DT).unwrap();
        ui.update(DT).unwrap();
        assert_eq!(ui.phase(), Some(MissionPhase::Stay));
        assert_eq!(ui.position(), Vec2::ZERO);
    }

    // ====================================================================
    // MissionBoard
    // ====================================================================

    #[test]
    fn test_board_fills_from_locked_weapons() {
        let mut board = MissionBoard::new(&quick(), 3);
        board
            .restart(vec![WeaponKind::Bomb, WeaponKind::Beam])
            .unwrap();
        assert_eq!(board.missions().count(), 2);
        assert!(board.locked().is_empty());
        assert!(board.missions().all(|m| m.target() != MissionTarget::All));
        assert_eq!(board.cards().active_count(), 2);
    }

    #[test]
    fn test_board_respects_max_missions() {
        let cfg = MissionUiConfig {
            max_missions: 1,
            ..quick()
        };
        let mut board = MissionBoard::new(&cfg, 3);
        board
            .restart(vec![WeaponKind::Bomb, WeaponKind::Beam])
            .unwrap();
        assert_eq!(board.missions().count(), 1);
        assert_eq!(board.locked().len(), 1);
    }

    #[test]
    fn test_achieved_mission_unlocks_after_exit() {
        let mut board = MissionBoard::new(&quick(), 9);
        board.restart(vec![WeaponKind::Bomb]).unwrap();
        let target = board.missions().next().unwrap().target();
        let kind = match target {
            MissionTarget::Straight => EnemyKind::Straight,
            MissionTarget::Aimer => EnemyKind::Aimer,
            MissionTarget::MoveShot => EnemyKind::MoveShot,
            _ => EnemyKind::StayShot,
        };
        let weakness = (target == MissionTarget::Weakness).then_some(WeaponKind::Shot);

        assert_eq!(board.record(kind, weakness).unwrap(), 0);
        assert_eq!(board.card(0).unwrap().fill(), Ratio::HALF);
        assert_eq!(board.record(kind, weakness).unwrap(), 1);
        assert_eq!(board.missions().count(), 0);

        assert!(board.update(DT).unwrap().is_empty());
        assert_eq!(board.update(DT).unwrap(), [WeaponKind::Bomb]);
        assert!(board.update(DT).unwrap().is_empty());
    }
}
