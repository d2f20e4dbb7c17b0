//! Rider contact handling: turns narrow-phase contacts into velocity corrections.
//!
//! Contacts are gathered into [`RiderCorrections`] first and applied in a
//! separate pass, so each rider receives exactly one additive write per tick
//! no matter how many contact pairs or platforms touch it.

use bevy_ecs::prelude::*;
use glam::Vec3;
use rapier3d::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use shuttle_platform::{EntityClass, RiderBody, apply_correction};

use crate::platform::{BodyHandle, MovingPlatform, RapierRider};
use crate::scene::Classification;
use crate::{FixedStep, PhysicsWorld, to_glam};

/// Contacts with a separation at or below this distance (meters) count as touching.
const CONTACT_TOLERANCE: f32 = 0.01;

/// How corrections from several platforms touching one rider combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Add every platform's correction.
    #[default]
    Sum,
    /// Keep only the largest-magnitude correction.
    Strongest,
}

/// Per-tick ledger of rider corrections, keyed by rider then platform.
#[derive(Resource, Debug, Default)]
pub struct RiderCorrections {
    /// Combination rule for riders touched by several platforms.
    pub policy: ConflictPolicy,
    pending: FxHashMap<Entity, Vec<(Entity, Vec3)>>,
}

impl RiderCorrections {
    /// Creates an empty ledger using `policy`.
    pub fn new(policy: ConflictPolicy) -> Self {
        Self {
            policy,
            pending: FxHashMap::default(),
        }
    }

    /// Records `delta` from `platform` for `rider`.
    ///
    /// Returns `false` if this platform already recorded a correction for
    /// this rider this tick; the duplicate is dropped.
    pub fn record(&mut self, platform: Entity, rider: Entity, delta: Vec3) -> bool {
        let entries = self.pending.entry(rider).or_default();
        if entries.iter().any(|(p, _)| *p == platform) {
            return false;
        }
        entries.push((platform, delta));
        true
    }

    /// Combined correction for `rider` under the current policy.
    pub fn resolve(&self, rider: Entity) -> Option<Vec3> {
        self.pending
            .get(&rider)
            .map(|entries| combine(self.policy, entries))
    }

    /// Number of riders with pending corrections.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True when no corrections are pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Removes every pending correction, returning one combined delta per
    /// rider in entity order.
    pub fn drain(&mut self) -> Vec<(Entity, Vec3)> {
        let policy = self.policy;
        let mut out: Vec<(Entity, Vec3)> = self
            .pending
            .drain()
            .map(|(rider, entries)| (rider, combine(policy, &entries)))
            .collect();
        out.sort_by_key(|(rider, _)| *rider);
        out
    }
}

fn combine(policy: ConflictPolicy, entries: &[(Entity, Vec3)]) -> Vec3 {
    match policy {
        ConflictPolicy::Sum => entries.iter().map(|(_, d)| *d).sum(),
        ConflictPolicy::Strongest => entries
            .iter()
            .map(|(_, d)| *d)
            .max_by(|a, b| a.length_squared().total_cmp(&b.length_squared()))
            .unwrap_or(Vec3::ZERO),
    }
}

/// Runs **after** the physics step. Records a correction for every
/// platform/rider pair that is touching.
pub fn rider_contact_system(
    step: Res<FixedStep>,
    physics: Res<PhysicsWorld>,
    mut corrections: ResMut<RiderCorrections>,
    platforms: Query<(Entity, &MovingPlatform, &BodyHandle)>,
    riders: Query<(Entity, &Classification, &BodyHandle), Without<MovingPlatform>>,
) {
    let platform_bodies: FxHashMap<RigidBodyHandle, (Entity, &MovingPlatform)> = platforms
        .iter()
        .map(|(entity, platform, handle)| (handle.0, (entity, platform)))
        .collect();
    if platform_bodies.is_empty() {
        return;
    }
    let rider_bodies: FxHashMap<RigidBodyHandle, (Entity, EntityClass)> = riders
        .iter()
        .filter(|(_, class, _)| class.0.is_rider())
        .map(|(entity, class, handle)| (handle.0, (entity, class.0)))
        .collect();

    let parent_of = |collider: ColliderHandle| {
        physics
            .collider_set
            .get(collider)
            .and_then(|c| c.parent())
    };

    for pair in physics.narrow_phase.contact_pairs() {
        let touching = pair.manifolds.iter().any(|m| {
            m.contacts()
                .iter()
                .any(|c| c.dist <= CONTACT_TOLERANCE)
        });
        if !touching {
            continue;
        }
        let (Some(b1), Some(b2)) = (parent_of(pair.collider1), parent_of(pair.collider2)) else {
            continue;
        };

        let matched = match (platform_bodies.get(&b1), rider_bodies.get(&b2)) {
            (Some(p), Some(r)) => Some((b1, *p, *r)),
            _ => match (platform_bodies.get(&b2), rider_bodies.get(&b1)) {
                (Some(p), Some(r)) => Some((b2, *p, *r)),
                _ => None,
            },
        };
        let Some((platform_body, (platform_entity, platform), (rider_entity, _))) = matched else {
            continue;
        };

        let Some(body) = physics.rigid_body_set.get(platform_body) else {
            continue;
        };
        let position = to_glam(&body.translation());
        if let Some(correction) = platform.controller.rider_correction(step.dt, position) {
            corrections.record(platform_entity, rider_entity, correction.delta_velocity);
        }
    }
}

/// Applies and clears the pending corrections, one additive write per rider.
///
/// A rider without a dynamic body has no velocity to correct, which means
/// it was misclassified; debug builds assert on it.
pub fn apply_rider_corrections(
    mut corrections: ResMut<RiderCorrections>,
    mut physics: ResMut<PhysicsWorld>,
    riders: Query<(&Classification, &BodyHandle)>,
) {
    for (entity, delta) in corrections.drain() {
        let Ok((class, handle)) = riders.get(entity) else {
            continue;
        };
        let mut rider = RapierRider::new(class.0, physics.rigid_body_set.get_mut(handle.0));
        debug_assert!(
            rider.linear_velocity().is_some(),
            "rider {entity:?} has no linear velocity; contact was misclassified"
        );
        if let Err(err) = apply_correction(&mut rider, delta) {
            tracing::error!(?entity, %err, "Rider velocity correction could not be applied");
        }
    }
}
