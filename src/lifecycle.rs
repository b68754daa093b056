//! Entity pools and state migration.
//!
//! Every entity lives in one owning store and is referenced from exactly one
//! working set:
//!
//! | State | Working set | Per-frame work |
//! |-------|-------------|----------------|
//! | [`EntityState::Active`] | `active` | forces, integration, boundary test |
//! | [`EntityState::Settled`] | `settled` | mouse sweep test only |
//! | [`EntityState::Dropped`] | none | slot freed, id reusable |
//!
//! Passes over a working set never mutate the sets themselves. They record
//! transitions into a [`Migrations`] batch which [`EntityPools::apply`]
//! executes once the pass is over.
//!
//! ```ignore
//! let mut migrations = Migrations::default();
//! pools.sweep_settled(|e| physics::interact_settled(e, &sweep, &frame, &mut rng), &mut migrations);
//! pools.apply(&mut migrations);
//! pools.step_active(|e| physics::integrate_active(e, &frame), &mut migrations);
//! pools.apply(&mut migrations);
//! ```

use crate::entity::{EntityId, RectEntity};
use crate::physics::StepOutcome;
use std::collections::HashSet;

/// Lifecycle state of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityState {
    Active,
    Settled,
    /// Terminal. The entity no longer exists.
    Dropped,
}

/// Transitions collected during a pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Migrations {
    pub settle: Vec<EntityId>,
    pub drop: Vec<EntityId>,
    pub reactivate: Vec<EntityId>,
}

impl Migrations {
    pub fn is_empty(&self) -> bool {
        self.settle.is_empty() && self.drop.is_empty() && self.reactivate.is_empty()
    }

    pub fn clear(&mut self) {
        self.settle.clear();
        self.drop.clear();
        self.reactivate.clear();
    }
}

/// Counts applied by one [`EntityPools::apply`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationCounts {
    pub settled: usize,
    pub dropped: usize,
    pub reactivated: usize,
}

impl std::ops::AddAssign for MigrationCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.settled += rhs.settled;
        self.dropped += rhs.dropped;
        self.reactivated += rhs.reactivated;
    }
}

/// Owning store plus the active and settled working sets.
#[derive(Debug, Clone, Default)]
pub struct EntityPools {
    store: Vec<Option<RectEntity>>,
    free: Vec<u32>,
    active: Vec<EntityId>,
    settled: Vec<EntityId>,
}

impl EntityPools {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity. Moving entities go to the active set, others to settled.
    pub fn insert(&mut self, entity: RectEntity) -> EntityId {
        let moving = entity.moving;
        let id = match self.free.pop() {
            Some(slot) => {
                self.store[slot as usize] = Some(entity);
                EntityId(slot)
            }
            None => {
                self.store.push(Some(entity));
                EntityId((self.store.len() - 1) as u32)
            }
        };
        if moving {
            self.active.push(id);
        } else {
            self.settled.push(id);
        }
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&RectEntity> {
        self.store.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut RectEntity> {
        self.store.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Current state, judged by working-set membership.
    pub fn state(&self, id: EntityId) -> EntityState {
        if self.get(id).is_none() {
            EntityState::Dropped
        } else if self.active.contains(&id) {
            EntityState::Active
        } else {
            EntityState::Settled
        }
    }

    pub fn active(&self) -> &[EntityId] {
        &self.active
    }

    pub fn settled(&self) -> &[EntityId] {
        &self.settled
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn settled_len(&self) -> usize {
        self.settled.len()
    }

    /// Live entities (active plus settled).
    pub fn len(&self) -> usize {
        self.active.len() + self.settled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live entities, active first then settled.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &RectEntity)> + '_ {
        self.active
            .iter()
            .chain(self.settled.iter())
            .filter_map(move |&id| self.get(id).map(|e| (id, e)))
    }

    // ========== Passes ==========

    /// Run `step` over every active entity, recording settles and drops.
    pub fn step_active<F>(&mut self, mut step: F, migrations: &mut Migrations)
    where
        F: FnMut(&mut RectEntity) -> StepOutcome,
    {
        for &id in &self.active {
            let Some(entity) = self.store.get_mut(id.index()).and_then(Option::as_mut) else {
                continue;
            };
            match step(entity) {
                StepOutcome::Moving => {}
                StepOutcome::Settled => migrations.settle.push(id),
                StepOutcome::Dropped => migrations.drop.push(id),
            }
        }
    }

    /// Run `test` over every settled entity, recording the ones it reactivates.
    pub fn sweep_settled<F>(&mut self, mut test: F, migrations: &mut Migrations)
    where
        F: FnMut(&mut RectEntity) -> bool,
    {
        for &id in &self.settled {
            let Some(entity) = self.store.get_mut(id.index()).and_then(Option::as_mut) else {
                continue;
            };
            if test(entity) {
                migrations.reactivate.push(id);
            }
        }
    }

    /// Execute and clear a migration batch.
    ///
    /// Settled entities leave `active` for `settled`, reactivated ones go the
    /// other way, and dropped ones are removed from `active` and freed.
    /// Order within each working set is preserved.
    pub fn apply(&mut self, migrations: &mut Migrations) -> MigrationCounts {
        let mut counts = MigrationCounts::default();
        if migrations.is_empty() {
            return counts;
        }

        let leaving_active: HashSet<EntityId> = migrations
            .settle
            .iter()
            .chain(migrations.drop.iter())
            .copied()
            .collect();
        if !leaving_active.is_empty() {
            self.active.retain(|id| !leaving_active.contains(id));
        }

        let leaving_settled: HashSet<EntityId> = migrations.reactivate.iter().copied().collect();
        if !leaving_settled.is_empty() {
            self.settled.retain(|id| !leaving_settled.contains(id));
        }

        for &id in &migrations.drop {
            if let Some(slot) = self.store.get_mut(id.index()) {
                if slot.take().is_some() {
                    self.free.push(id.0);
                    counts.dropped += 1;
                }
            }
        }

        self.settled.extend_from_slice(&migrations.settle);
        counts.settled = migrations.settle.len();
        self.active.extend_from_slice(&migrations.reactivate);
        counts.reactivated = migrations.reactivate.len();

        if counts != MigrationCounts::default() {
            log::debug!(
                "Migrated {} settled, {} dropped, {} reactivated",
                counts.settled,
                counts.dropped,
                counts.reactivated
            );
        }
        migrations.clear();
        counts
    }

    /// Remove every entity.
    pub fn clear(&mut self) {
        self.store.clear();
        self.free.clear();
        self.active.clear();
        self.settled.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::Rgba;
    use crate::rectangle::Rectangle;
    use glam::Vec2;

    fn entity(x: f32) -> RectEntity {
        RectEntity::new(
            Rectangle::centered(Vec2::new(x, 10.0), 3.0, 3.0, Rgba::WHITE),
            Vec2::ZERO,
            0.0,
        )
    }

    #[test]
    fn test_insert_routes_by_moving_flag() {
        let mut pools = EntityPools::new();
        let a = pools.insert(entity(1.0));
        let mut resting = entity(2.0);
        resting.settle(0.0);
        let b = pools.insert(resting);
        assert_eq!(pools.state(a), EntityState::Active);
        assert_eq!(pools.state(b), EntityState::Settled);
        assert_eq!(pools.len(), 2);
    }

    #[test]
    fn test_deferred_settle_and_drop() {
        let mut pools = EntityPools::new();
        let ids: Vec<_> = (0..4).map(|i| pools.insert(entity(i as f32))).collect();
        let mut migrations = Migrations::default();

        pools.step_active(
            |e| {
                if e.center().x < 1.5 {
                    e.settle(1.0);
                    StepOutcome::Settled
                } else if e.center().x > 2.5 {
                    StepOutcome::Dropped
                } else {
                    StepOutcome::Moving
                }
            },
            &mut migrations,
        );
        // Nothing moves until apply.
        assert_eq!(pools.active_len(), 4);

        let counts = pools.apply(&mut migrations);
        assert_eq!(counts.settled, 2);
        assert_eq!(counts.dropped, 1);
        assert!(migrations.is_empty());

        assert_eq!(pools.active(), &[ids[2]]);
        assert_eq!(pools.settled(), &[ids[0], ids[1]]);
        assert_eq!(pools.state(ids[3]), EntityState::Dropped);
        assert!(pools.get(ids[3]).is_none());
    }

    #[test]
    fn test_dropped_slot_is_reused() {
        let mut pools = EntityPools::new();
        let a = pools.insert(entity(0.0));
        let mut migrations = Migrations {
            drop: vec![a],
            ..Default::default()
        };
        pools.apply(&mut migrations);
        let b = pools.insert(entity(5.0));
        assert_eq!(a, b);
        assert_eq!(pools.len(), 1);
    }

    #[test]
    fn test_reactivation_moves_back() {
        let mut pools = EntityPools::new();
        let mut resting = entity(0.0);
        resting.settle(0.0);
        let id = pools.insert(resting);

        let mut migrations = Migrations::default();
        pools.sweep_settled(
            |e| {
                e.reactivate(2.0);
                true
            },
            &mut migrations,
        );
        pools.apply(&mut migrations);
        assert_eq!(pools.state(id), EntityState::Active);
        assert_eq!(pools.settled_len(), 0);
    }

    #[test]
    fn test_clear() {
        let mut pools = EntityPools::new();
        for i in 0..10 {
            pools.insert(entity(i as f32));
        }
        pools.clear();
        assert!(pools.is_empty());
        assert_eq!(pools.iter().count(), 0);
    }
}
