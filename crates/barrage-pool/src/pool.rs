//! The pool itself.

use std::fmt;
use std::ops::{Index, IndexMut};

use barrage_math::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::{PoolError, Poolable};

/// Callback a pool owner installs to tag entities (team, color, parent
/// group) before the entity's own hook runs.
pub type PoolHook<T> = Box<dyn FnMut(&mut T)>;

/// Stable handle to a pool member.
///
/// Members are never removed, so a key stays valid for the pool's
/// lifetime. Keys from one pool mean nothing to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolKey(usize);

impl PoolKey {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "member #{}", self.0)
    }
}

/// Owns entities of one kind and recycles them.
///
/// ```text
/// generate(pos) ──→ reuse(pos) ──Some──→ key
///                      │
///                     None
///                      ▼
///               instantiate_new(pos, template) ──→ key
/// ```
///
/// Reuse is a linear scan in registration order. Gameplay pools stay
/// small (tens of bullets, a handful of enemies), so nothing smarter is
/// needed.
pub struct Pool<T> {
    templates: Vec<T>,
    members: Vec<T>,
    on_before_constructed: Option<PoolHook<T>>,
    on_before_acquired: Option<PoolHook<T>>,
    rng: StdRng,
}

impl<T> Pool<T> {
    /// A pool that builds new members by cloning `templates`.
    pub fn new(templates: Vec<T>) -> Self {
        Self::with_rng(templates, StdRng::from_os_rng())
    }

    /// Like [`new`](Self::new) with a fixed seed for the random template
    /// choice, for reproducible runs.
    pub fn with_seed(templates: Vec<T>, seed: u64) -> Self {
        Self::with_rng(templates, StdRng::seed_from_u64(seed))
    }

    fn with_rng(templates: Vec<T>, rng: StdRng) -> Self {
        Self {
            templates,
            members: Vec::new(),
            on_before_constructed: None,
            on_before_acquired: None,
            rng,
        }
    }

    /// Runs on a new member before its `on_constructed`.
    pub fn set_on_before_constructed(&mut self, hook: impl FnMut(&mut T) + 'static) {
        self.on_before_constructed = Some(Box::new(hook));
    }

    /// Runs on every generated member before its `on_acquired`.
    pub fn set_on_before_acquired(&mut self, hook: impl FnMut(&mut T) + 'static) {
        self.on_before_acquired = Some(Box::new(hook));
    }

    pub fn templates(&self) -> &[T] {
        &self.templates
    }

    pub fn add_template(&mut self, template: T) {
        self.templates.push(template);
    }

    /// Number of members ever built or registered.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, key: PoolKey) -> Option<&T> {
        self.members.get(key.0)
    }

    pub fn get_mut(&mut self, key: PoolKey) -> Option<&mut T> {
        self.members.get_mut(key.0)
    }

    /// All members in registration order, busy or not.
    pub fn iter(&self) -> impl Iterator<Item = (PoolKey, &T)> {
        self.members.iter().enumerate().map(|(i, m)| (PoolKey(i), m))
    }

    /// Mutable access to all members, busy or not. Membership itself
    /// cannot change through this iterator.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PoolKey, &mut T)> {
        self.members
            .iter_mut()
            .enumerate()
            .map(|(i, m)| (PoolKey(i), m))
    }

    /// Adds an externally built entity without running construction hooks.
    pub fn register(&mut self, entity: T) -> PoolKey {
        let key = PoolKey(self.members.len());
        self.members.push(entity);
        debug!(%key, members = self.members.len(), "entity registered into pool");
        key
    }

    fn random_template_index(&mut self) -> Result<usize, PoolError> {
        if self.templates.is_empty() {
            return Err(PoolError::NoTemplates);
        }
        Ok(self.rng.random_range(0..self.templates.len()))
    }

    fn check_template(&self, index: usize) -> Result<(), PoolError> {
        match self.templates.len() {
            0 => Err(PoolError::NoTemplates),
            len if index >= len => Err(PoolError::TemplateOutOfRange { index, len }),
            _ => Ok(()),
        }
    }
}

impl<T: Poolable> Pool<T> {
    /// Number of members currently in use.
    pub fn active_count(&self) -> usize {
        self.members.iter().filter(|m| m.is_in_use()).count()
    }

    /// Members currently in use, in registration order.
    pub fn iter_active(&self) -> impl Iterator<Item = (PoolKey, &T)> {
        self.iter().filter(|(_, m)| m.is_in_use())
    }

    /// Keys of the members currently in use. A snapshot: later changes to
    /// activity do not affect the returned list.
    pub fn active_keys(&self) -> Vec<PoolKey> {
        self.iter_active().map(|(key, _)| key).collect()
    }

    /// Recycles the first free member, or returns `None` when every
    /// member is busy (the caller should instantiate).
    pub fn reuse(&mut self, position: Vec2) -> Option<PoolKey> {
        let index = self.members.iter().position(|m| !m.is_in_use())?;
        self.members[index].on_reacquired();
        let key = PoolKey(index);
        self.finish_generation(key, position);
        trace!(%key, "pool member reused");
        Some(key)
    }

    /// Calls `f` on every member in use, in registration order. `f` may
    /// deactivate the member it is handed.
    pub fn for_each_active(&mut self, mut f: impl FnMut(PoolKey, &mut T)) {
        for (i, member) in self.members.iter_mut().enumerate() {
            if member.is_in_use() {
                f(PoolKey(i), member);
            }
        }
    }

    /// Deactivates every member in use. Returns how many were released.
    pub fn deactivate_all(&mut self) -> usize {
        let mut released = 0;
        for member in self.members.iter_mut().filter(|m| m.is_in_use()) {
            member.deactivate();
            released += 1;
        }
        if released > 0 {
            debug!(released, "pool members deactivated");
        }
        released
    }

    /// Force-releases one member. Returns whether it was in use.
    pub fn release(&mut self, key: PoolKey) -> Result<bool, PoolError> {
        let member = self
            .members
            .get_mut(key.0)
            .ok_or(PoolError::UnknownMember(key))?;
        if !member.is_in_use() {
            return Ok(false);
        }
        member.deactivate();
        Ok(true)
    }

    fn finish_generation(&mut self, key: PoolKey, position: Vec2) {
        let member = &mut self.members[key.0];
        member.set_position(position);
        if let Some(hook) = self.on_before_acquired.as_mut() {
            hook(member);
        }
        member.on_acquired();
        member.activate();
    }
}

impl<T: Poolable + Clone> Pool<T> {
    /// Spawns at `position` from a random template: reuses a free member
    /// when there is one, otherwise builds a new one.
    ///
    /// # Errors
    /// [`PoolError::NoTemplates`] if the pool has no templates, even when
    /// a free member exists.
    pub fn generate(&mut self, position: Vec2) -> Result<PoolKey, PoolError> {
        let index = self.random_template_index()?;
        self.generate_with(position, index)
    }

    /// Like [`generate`](Self::generate); `template` is used only when a
    /// new member has to be built.
    ///
    /// # Errors
    /// A bad `template` is reported only when no free member could be
    /// reused.
    pub fn generate_with(&mut self, position: Vec2, template: usize) -> Result<PoolKey, PoolError> {
        match self.reuse(position) {
            Some(key) => Ok(key),
            None => self.instantiate_new(position, template),
        }
    }

    /// Always builds a new member from a random template.
    pub fn instantiate(&mut self, position: Vec2) -> Result<PoolKey, PoolError> {
        let index = self.random_template_index()?;
        self.instantiate_new(position, index)
    }

    /// Always builds a new member from `templates[template]`.
    pub fn instantiate_new(&mut self, position: Vec2, template: usize) -> Result<PoolKey, PoolError> {
        self.check_template(template)?;
        let mut member = self.templates[template].clone();
        if let Some(hook) = self.on_before_constructed.as_mut() {
            hook(&mut member);
        }
        member.on_constructed();

        let key = PoolKey(self.members.len());
        self.members.push(member);
        self.finish_generation(key, position);
        debug!(%key, template, members = self.members.len(), "pool grew");
        Ok(key)
    }
}

impl<T> Index<PoolKey> for Pool<T> {
    type Output = T;

    fn index(&self, key: PoolKey) -> &T {
        &self.members[key.0]
    }
}

impl<T> IndexMut<PoolKey> for Pool<T> {
    fn index_mut(&mut self, key: PoolKey) -> &mut T {
        &mut self.members[key.0]
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("templates", &self.templates.len())
            .field("members", &self.members.len())
            .field("on_before_constructed", &self.on_before_constructed.is_some())
            .field("on_before_acquired", &self.on_before_acquired.is_some())
            .finish()
    }
}
