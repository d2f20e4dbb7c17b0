//! Waypoint collection: the ordered list of target positions a platform visits.
//!
//! Waypoints are authored as children of the platform entity so they can be
//! placed relative to it, then detached at setup so the platform's own motion
//! does not drag them along.

use glam::Vec3;

/// Host-supplied classification of a scene entity.
///
/// Replaces string tags: the host decides what each entity is once, and the
/// controller only ever matches on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntityClass {
    /// A waypoint marker belonging to a platform.
    Waypoint,
    /// A player-controlled body.
    Player,
    /// A non-player agent (enemy, NPC).
    Agent,
    /// Anything else.
    #[default]
    Other,
}

impl EntityClass {
    /// Whether bodies of this class receive velocity from platforms they touch.
    pub fn is_rider(self) -> bool {
        matches!(self, Self::Player | Self::Agent)
    }
}

/// Scene-graph operations needed once, at platform setup.
pub trait SceneHost {
    /// Opaque entity handle.
    type Node: Copy;

    /// Direct children of `parent`, in scene order.
    fn children(&self, parent: Self::Node) -> Vec<Self::Node>;

    /// Classification of `node`.
    fn classify(&self, node: Self::Node) -> EntityClass;

    /// Current world-space position of `node`.
    fn world_position(&self, node: Self::Node) -> Vec3;

    /// Detach `node` from its parent, keeping its world position.
    fn detach(&mut self, node: Self::Node);
}

/// Ordered, immutable sequence of waypoint positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaypointSet {
    positions: Vec<Vec3>,
}

impl WaypointSet {
    /// Builds a set from explicit world positions.
    pub fn from_positions(positions: impl IntoIterator<Item = Vec3>) -> Self {
        Self {
            positions: positions.into_iter().collect(),
        }
    }

    /// Collects every direct child of `owner` classified as a waypoint, in
    /// scene order, then detaches them from `owner`.
    ///
    /// An empty result is a configuration error: it is logged, and the
    /// returned set leaves any controller built on it inert.
    pub fn collect<H: SceneHost>(host: &mut H, owner: H::Node) -> Self {
        let nodes: Vec<H::Node> = host
            .children(owner)
            .into_iter()
            .filter(|&child| host.classify(child) == EntityClass::Waypoint)
            .collect();

        let positions = nodes.iter().map(|&n| host.world_position(n)).collect();

        for &node in &nodes {
            host.detach(node);
        }

        if nodes.is_empty() {
            tracing::error!(
                "No waypoints found for moving platform. Add child entities classified as waypoints"
            );
        } else {
            tracing::debug!(count = nodes.len(), "Collected platform waypoints");
        }

        Self { positions }
    }

    /// Number of waypoints.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when no waypoints were found.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of waypoint `index`, if it exists.
    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.positions.get(index).copied()
    }

    /// All positions in order.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Iterates positions in order.
    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal in-memory scene: node 0 is the platform.
    struct TestScene {
        parents: Vec<Option<usize>>,
        classes: Vec<EntityClass>,
        positions: Vec<Vec3>,
    }

    impl TestScene {
        fn new() -> Self {
            Self {
                parents: vec![None],
                classes: vec![EntityClass::Other],
                positions: vec![Vec3::ZERO],
            }
        }

        fn add_child(&mut self, class: EntityClass, pos: Vec3) -> usize {
            self.parents.push(Some(0));
            self.classes.push(class);
            self.positions.push(pos);
            self.parents.len() - 1
        }
    }

    impl SceneHost for TestScene {
        type Node = usize;

        fn children(&self, parent: usize) -> Vec<usize> {
            (0..self.parents.len())
                .filter(|&i| self.parents[i] == Some(parent))
                .collect()
        }

        fn classify(&self, node: usize) -> EntityClass {
            self.classes[node]
        }

        fn world_position(&self, node: usize) -> Vec3 {
            self.positions[node]
        }

        fn detach(&mut self, node: usize) {
            self.parents[node] = None;
        }
    }

    #[test]
    fn test_collect_keeps_scene_order_and_skips_non_waypoints() {
        let mut scene = TestScene::new();
        scene.add_child(EntityClass::Waypoint, Vec3::new(1.0, 0.0, 0.0));
        let other = scene.add_child(EntityClass::Other, Vec3::new(9.0, 9.0, 9.0));
        scene.add_child(EntityClass::Waypoint, Vec3::new(2.0, 0.0, 0.0));

        let set = WaypointSet::collect(&mut scene, 0);

        assert_eq!(
            set.positions(),
            &[Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)]
        );
        // Only waypoints are detached.
        assert_eq!(scene.children(0), vec![other]);
    }

    #[test]
    fn test_collect_with_no_waypoints_is_empty() {
        let mut scene = TestScene::new();
        scene.add_child(EntityClass::Player, Vec3::ONE);

        let set = WaypointSet::collect(&mut scene, 0);
        assert!(set.is_empty());
        assert_eq!(set.get(0), None);
    }

    #[test]
    fn test_rider_classes() {
        assert!(EntityClass::Player.is_rider());
        assert!(EntityClass::Agent.is_rider());
        assert!(!EntityClass::Waypoint.is_rider());
        assert!(!EntityClass::Other.is_rider());
    }
}
