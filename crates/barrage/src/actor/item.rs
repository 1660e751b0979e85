//! Pickups dropped by destroyed enemies.

use std::cell::Cell;
use std::rc::Rc;

use barrage_math::{Degree, Vec2, easing};
use barrage_pool::{Pool, PoolError, PoolKey, Poolable};
use barrage_timer::{FrameDelta, Timer};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::body::{Body, Movable};
use crate::config::ItemConfig;
use crate::world::WorldView;

/// What a pickup raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Damage,
    Way,
    RapidFire,
    Life,
    Heal,
}

impl ItemKind {
    pub const ALL: [Self; 5] = [
        Self::Damage,
        Self::Way,
        Self::RapidFire,
        Self::Life,
        Self::Heal,
    ];

    /// Position in [`ALL`](Self::ALL), which is also the template index in
    /// [`ItemDrops`].
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A collected pickup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pickup {
    pub kind: ItemKind,
    pub amount: f32,
}

/// A pooled pickup.
///
/// Scatters away from where it fell, then homes in on the player.
#[derive(Debug, Clone)]
pub struct Item {
    kind: ItemKind,
    body: Body,
    rise_amount: f32,
    amount_buff: f32,
    drop_timer: Timer,
    dropped_at: Vec2,
    drop_target: Vec2,
    /// Kind the owning [`ItemDrops`] is generating right now.
    wanted: Rc<Cell<ItemKind>>,
}

impl Item {
    fn template(kind: ItemKind, cfg: &ItemConfig, wanted: Rc<Cell<ItemKind>>) -> Self {
        Self {
            kind,
            body: Body::default().with_speed(cfg.speed),
            rise_amount: cfg.rise_amount,
            amount_buff: 1.0,
            drop_timer: Timer::new().with_interval(cfg.drop_seconds),
            dropped_at: Vec2::ZERO,
            drop_target: Vec2::ZERO,
            wanted,
        }
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// How much the pickup raises its stat.
    pub fn amount(&self) -> f32 {
        self.rise_amount * self.amount_buff
    }

    /// Whether the scatter animation is still running.
    pub fn is_dropping(&self) -> bool {
        self.drop_timer.is_counting()
    }

    pub fn drop_target(&self) -> Vec2 {
        self.drop_target
    }

    fn scatter(&mut self, offset: Vec2, amount_buff: f32) {
        self.dropped_at = self.body.position;
        self.drop_target = self.body.position + offset;
        self.amount_buff = amount_buff;
    }

    pub fn update(&mut self, delta: FrameDelta, world: &WorldView) {
        if !self.body.active {
            return;
        }
        if self.drop_timer.is_counting() {
            self.drop_timer.advance_frame(delta);
            let t = easing::quad_out(self.drop_timer.progress()).to_fraction();
            self.body.position = self.dropped_at.lerp(self.drop_target, t);
        } else if world.player_alive {
            self.look_at(world.player);
            self.advance_position(delta.scaled);
        }
    }

    /// Collects the item.
    pub fn pick_up(&mut self) -> Pickup {
        let pickup = Pickup {
            kind: self.kind,
            amount: self.amount(),
        };
        self.deactivate();
        pickup
    }
}

impl Poolable for Item {
    fn is_active(&self) -> bool {
        self.body.active
    }

    fn set_active(&mut self, active: bool) {
        self.body.active = active;
    }

    fn set_position(&mut self, position: Vec2) {
        self.body.position = position;
    }

    /// Only a free item of the kind being dropped may be recycled.
    fn is_in_use(&self) -> bool {
        self.body.active || self.kind != self.wanted.get()
    }

    fn on_acquired(&mut self) {
        self.drop_timer.restart();
    }
}

impl Movable for Item {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

/// Owns every pickup on the field.
#[derive(Debug)]
pub struct ItemDrops {
    items: Pool<Item>,
    wanted: Rc<Cell<ItemKind>>,
}

impl ItemDrops {
    pub fn new(cfg: &ItemConfig, seed: u64) -> Self {
        let wanted = Rc::new(Cell::new(ItemKind::Damage));
        let templates = ItemKind::ALL
            .iter()
            .map(|&kind| Item::template(kind, cfg, Rc::clone(&wanted)))
            .collect();
        let mut items = Pool::with_seed(templates, seed);

        let mut rng = StdRng::seed_from_u64(seed);
        let drop_distance = cfg.drop_distance;
        let amount_buff = cfg.amount_buff;
        items.set_on_before_acquired(move |item: &mut Item| {
            let offset = Degree::random(&mut rng).unit_vector() * drop_distance.sample(&mut rng);
            item.scatter(offset, amount_buff.sample(&mut rng));
        });

        Self { items, wanted }
    }

    /// Drops one `kind` pickup at `position`.
    pub fn drop_item(&mut self, kind: ItemKind, position: Vec2) -> Result<PoolKey, PoolError> {
        self.wanted.set(kind);
        let key = self.items.generate_with(position, kind.index())?;
        trace!(?kind, %key, "item dropped");
        Ok(key)
    }

    pub fn update(&mut self, delta: FrameDelta, world: &WorldView) {
        for (_, item) in self.items.iter_mut() {
            item.update(delta, world);
        }
    }

    /// Collects every item within `radius` of `point`.
    pub fn pick_up(&mut self, point: Vec2, radius: f32) -> Vec<Pickup> {
        self.items
            .iter_mut()
            .filter(|(_, item)| item.is_active() && item.position().distance(point) <= radius)
            .map(|(_, item)| item.pick_up())
            .collect()
    }

    /// Items on the field.
    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|(_, item)| item.is_active()).count()
    }

    pub fn items(&self) -> &Pool<Item> {
        &self.items
    }

    /// Clears the field for a new stage.
    pub fn restart(&mut self) {
        let mut cleared = 0;
        for (_, item) in self.items.iter_mut() {
            if item.is_active() {
                item.deactivate();
                cleared += 1;
            }
        }
        debug!(cleared, "items cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drops() -> ItemDrops {
        ItemDrops::new(&ItemConfig::default(), 11)
    }

    #[test]
    fn test_scatter_lands_within_drop_distance() {
        let mut drops = drops();
        let key = drops.drop_item(ItemKind::Heal, Vec2::ZERO).unwrap();
        let world = WorldView {
            player_alive: false,
            ..WorldView::default()
        };
        for _ in 0..10 {
            drops.update(FrameDelta::fixed(0.1), &world);
        }
        let item = &drops.items()[key];
        assert!(!item.is_dropping());
        assert_eq!(item.position(), item.drop_target());
        let distance = item.position().length();
        assert!((1.0 - 1e-3..=2.5 + 1e-3).contains(&distance));
        assert!((1.0..=2.0).contains(&item.amount()));
    }

    #[test]
    fn test_homes_in_on_living_player() {
        let mut drops = drops();
        let key = drops.drop_item(ItemKind::Way, Vec2::ZERO).unwrap();
        let world = WorldView::default();
        for _ in 0..10 {
            drops.update(FrameDelta::fixed(0.1), &world);
        }
        let before = drops.items()[key].position().distance(world.player);
        drops.update(FrameDelta::fixed(0.05), &world);
        let after = drops.items()[key].position().distance(world.player);
        assert!(after < before);
    }

    #[test]
    fn test_reuse_is_limited_to_same_kind() {
        let mut drops = drops();
        let heal = drops.drop_item(ItemKind::Heal, Vec2::ZERO).unwrap();
        drops.restart();
        assert_eq!(drops.active_count(), 0);

        let life = drops.drop_item(ItemKind::Life, Vec2::ZERO).unwrap();
        assert_ne!(life, heal);
        assert_eq!(drops.items()[life].kind(), ItemKind::Life);

        let again = drops.drop_item(ItemKind::Heal, Vec2::ZERO).unwrap();
        assert_eq!(again, heal);
        assert_eq!(drops.items().len(), 2);
    }

    #[test]
    fn test_pick_up_collects_nearby_items() {
        let mut drops = drops();
        drops.drop_item(ItemKind::Damage, Vec2::ZERO).unwrap();
        drops.drop_item(ItemKind::Damage, Vec2::new(10.0, 0.0)).unwrap();

        let got = drops.pick_up(Vec2::ZERO, 0.5);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].kind, ItemKind::Damage);
        assert_eq!(drops.active_count(), 1);
    }
}
