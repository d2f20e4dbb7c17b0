//! Minimal ECS scene graph used to author platforms and their waypoints.
//!
//! Waypoints are spawned as children of the platform entity; setup detaches
//! them through [`EcsScene`], the [`SceneHost`] implementation over a `World`.

use bevy_ecs::prelude::*;
use glam::Vec3;
use shuttle_platform::{EntityClass, SceneHost};

/// Host classification of an entity (waypoint, player, agent, other).
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Classification(pub EntityClass);

/// World-space position of a scene entity, in meters.
///
/// For entities with a rigid body this mirrors the body translation after
/// every physics step.
#[derive(Component, Clone, Copy, Debug, PartialEq, Default)]
pub struct ScenePosition(pub Vec3);

/// Ordered direct children of an entity.
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct SceneChildren(pub Vec<Entity>);

/// Parent of an entity.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneParent(pub Entity);

/// Attaches `child` to `parent`, appending it to the parent's child list.
pub fn add_child(world: &mut World, parent: Entity, child: Entity) {
    world.entity_mut(child).insert(SceneParent(parent));
    if let Some(mut children) = world.get_mut::<SceneChildren>(parent) {
        children.0.push(child);
        return;
    }
    world.entity_mut(parent).insert(SceneChildren(vec![child]));
}

/// [`SceneHost`] view of an ECS world.
pub struct EcsScene<'w> {
    world: &'w mut World,
}

impl<'w> EcsScene<'w> {
    /// Wraps `world` for one setup pass.
    pub fn new(world: &'w mut World) -> Self {
        Self { world }
    }
}

impl SceneHost for EcsScene<'_> {
    type Node = Entity;

    fn children(&self, parent: Entity) -> Vec<Entity> {
        self.world
            .get::<SceneChildren>(parent)
            .map(|c| c.0.clone())
            .unwrap_or_default()
    }

    fn classify(&self, node: Entity) -> EntityClass {
        self.world
            .get::<Classification>(node)
            .map(|c| c.0)
            .unwrap_or_default()
    }

    fn world_position(&self, node: Entity) -> Vec3 {
        self.world
            .get::<ScenePosition>(node)
            .map(|p| p.0)
            .unwrap_or(Vec3::ZERO)
    }

    fn detach(&mut self, node: Entity) {
        let Some(parent) = self.world.get::<SceneParent>(node).map(|p| p.0) else {
            return;
        };
        if let Some(mut children) = self.world.get_mut::<SceneChildren>(parent) {
            children.0.retain(|&c| c != node);
        }
        self.world.entity_mut(node).remove::<SceneParent>();
    }
}
