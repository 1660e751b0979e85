//! Integration tests for the reusable-object pool.

use std::cell::Cell;
use std::rc::Rc;

use barrage_math::Vec2;
use barrage_pool::{Pool, PoolError, PoolKey, Poolable};

// =========================================================================
// Test entity
// =========================================================================

#[derive(Debug, Clone)]
struct Shard {
    active: bool,
    position: Vec2,
    template: usize,
    generations: u32,
}

impl Shard {
    fn template(template: usize) -> Self {
        Self {
            active: false,
            position: Vec2::ZERO,
            template,
            generations: 0,
        }
    }
}

impl Poolable for Shard {
    fn is_active(&self) -> bool {
        self.active
    }
    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }
    fn on_acquired(&mut self) {
        self.generations += 1;
    }
}

// =========================================================================
// Helpers
// =========================================================================

/// Two templates, zero members, and a counter of constructions.
fn two_template_pool() -> (Pool<Shard>, Rc<Cell<u32>>) {
    let mut pool = Pool::with_seed(vec![Shard::template(0), Shard::template(1)], 42);
    let constructed = Rc::new(Cell::new(0));
    let counter = Rc::clone(&constructed);
    pool.set_on_before_constructed(move |_| counter.set(counter.get() + 1));
    (pool, constructed)
}

fn p(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}

// =========================================================================
// Generation
// =========================================================================

#[test]
fn test_generate_builds_when_empty() {
    let (mut pool, constructed) = two_template_pool();
    let key = pool.generate(p(1.0, 1.0)).unwrap();
    assert_eq!(constructed.get(), 1);
    assert_eq!(pool.len(), 1);
    assert!(pool[key].is_active());
    assert_eq!(pool[key].position, p(1.0, 1.0));
}

#[test]
fn test_generate_with_uses_requested_template() {
    let (mut pool, _) = two_template_pool();
    let key = pool.generate_with(Vec2::ZERO, 1).unwrap();
    assert_eq!(pool[key].template, 1);
}

#[test]
fn test_generate_on_empty_templates_fails() {
    let mut pool: Pool<Shard> = Pool::with_seed(Vec::new(), 0);
    assert_eq!(pool.generate(Vec2::ZERO), Err(PoolError::NoTemplates));
    assert_eq!(pool.generate_with(Vec2::ZERO, 0), Err(PoolError::NoTemplates));
    assert!(pool.is_empty());
}

#[test]
fn test_empty_templates_fail_even_with_free_members() {
    let mut pool: Pool<Shard> = Pool::with_seed(Vec::new(), 0);
    let key = pool.register(Shard::template(9));
    assert_eq!(pool.generate(Vec2::ZERO), Err(PoolError::NoTemplates));
    // The registered member is still reachable through reuse.
    assert_eq!(pool.reuse(Vec2::ZERO), Some(key));
}

#[test]
fn test_template_index_out_of_range() {
    let (mut pool, _) = two_template_pool();
    assert_eq!(
        pool.instantiate_new(Vec2::ZERO, 5),
        Err(PoolError::TemplateOutOfRange { index: 5, len: 2 })
    );
    assert_eq!(pool.len(), 0);
}

#[test]
fn test_generate_with_checks_template_only_when_building() {
    let (mut pool, constructed) = two_template_pool();
    let key = pool.generate_with(Vec2::ZERO, 0).unwrap();
    pool.release(key).unwrap();

    // A free member is reused without looking at the template index.
    assert_eq!(pool.generate_with(p(2.0, 0.0), 7), Ok(key));
    assert_eq!(pool[key].position, p(2.0, 0.0));
    assert_eq!(constructed.get(), 1);

    // Nothing free: the index matters now.
    assert_eq!(
        pool.generate_with(Vec2::ZERO, 7),
        Err(PoolError::TemplateOutOfRange { index: 7, len: 2 })
    );
    assert_eq!(pool.len(), 1);
}

#[test]
fn test_same_seed_picks_same_templates() {
    let picks = |seed| {
        let mut pool = Pool::with_seed(vec![Shard::template(0), Shard::template(1)], seed);
        (0..16)
            .map(|_| {
                let key = pool.instantiate(Vec2::ZERO).unwrap();
                pool[key].template
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(picks(7), picks(7));
}

#[test]
fn test_instantiate_always_grows() {
    let (mut pool, constructed) = two_template_pool();
    let a = pool.generate(Vec2::ZERO).unwrap();
    pool.release(a).unwrap();

    let b = pool.instantiate(Vec2::ZERO).unwrap();
    assert_ne!(a, b);
    assert_eq!(constructed.get(), 2);
}

// =========================================================================
// Reuse
// =========================================================================

#[test]
fn test_reuse_returns_none_when_all_busy() {
    let (mut pool, _) = two_template_pool();
    pool.generate(Vec2::ZERO).unwrap();
    pool.generate(Vec2::ZERO).unwrap();
    assert_eq!(pool.reuse(Vec2::ZERO), None);
}

#[test]
fn test_reuse_first_after_deactivate_all() {
    let (mut pool, constructed) = two_template_pool();
    for _ in 0..5 {
        pool.generate(Vec2::ZERO).unwrap();
    }
    assert_eq!(constructed.get(), 5);

    assert_eq!(pool.deactivate_all(), 5);
    assert_eq!(pool.active_count(), 0);

    for _ in 0..5 {
        pool.generate(p(3.0, 3.0)).unwrap();
    }
    assert_eq!(constructed.get(), 5, "no new constructions expected");
    assert_eq!(pool.len(), 5);
    assert_eq!(pool.active_count(), 5);
}

#[test]
fn test_reuse_scans_in_registration_order() {
    let (mut pool, _) = two_template_pool();
    let keys: Vec<PoolKey> = (0..4).map(|_| pool.generate(Vec2::ZERO).unwrap()).collect();
    pool.release(keys[3]).unwrap();
    pool.release(keys[1]).unwrap();
    assert_eq!(pool.reuse(Vec2::ZERO), Some(keys[1]));
    assert_eq!(pool.reuse(Vec2::ZERO), Some(keys[3]));
}

#[test]
fn test_deactivate_all_is_idempotent() {
    let (mut pool, _) = two_template_pool();
    pool.generate(Vec2::ZERO).unwrap();
    assert_eq!(pool.deactivate_all(), 1);
    assert_eq!(pool.deactivate_all(), 0);
}

#[test]
fn test_holder_deactivation_frees_member() {
    let (mut pool, _) = two_template_pool();
    let key = pool.generate(Vec2::ZERO).unwrap();
    pool[key].deactivate();
    assert_eq!(pool.reuse(Vec2::UP), Some(key));
    assert_eq!(pool[key].generations, 2);
}

// =========================================================================
// Iteration
// =========================================================================

#[test]
fn test_for_each_active_visits_in_order_and_may_release() {
    let (mut pool, _) = two_template_pool();
    let keys: Vec<PoolKey> = (0..4).map(|_| pool.generate(Vec2::ZERO).unwrap()).collect();
    pool.release(keys[2]).unwrap();

    let mut visited = Vec::new();
    pool.for_each_active(|key, shard| {
        visited.push(key);
        if key == keys[0] {
            shard.deactivate();
        }
    });

    assert_eq!(visited, vec![keys[0], keys[1], keys[3]]);
    assert_eq!(pool.active_keys(), vec![keys[1], keys[3]]);
}

// =========================================================================
// End-to-end
// =========================================================================

#[test]
fn test_reuses_released_member_instead_of_constructing() {
    let (mut pool, constructed) = two_template_pool();
    let p1 = p(0.0, 0.0);
    let p2 = p(5.0, -2.0);

    let e1 = pool.generate(p1).unwrap();
    let e2 = pool.generate(p1).unwrap();
    let e3 = pool.generate(p1).unwrap();
    assert_eq!(pool.active_count(), 3);
    assert_eq!(constructed.get(), 3);

    pool[e2].deactivate();

    let again = pool.generate(p2).unwrap();
    assert_eq!(again, e2);
    assert_eq!(constructed.get(), 3);
    assert_eq!(pool.len(), 3);
    assert_eq!(pool[again].position, p2);
    assert!(pool[e1].is_active() && pool[e3].is_active());
}
