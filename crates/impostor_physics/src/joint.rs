//! Joints between impostors

use crate::error::{PhysicsError, Result};
use crate::impostor::ImpostorId;
use crate::plugin::{PhysicsPlugin, SharedPlugin};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

static NEXT_JOINT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a joint. Clones of a joint share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JointId(u64);

impl JointId {
    fn next() -> Self {
        Self(NEXT_JOINT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Type of constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JointKind {
    /// Keeps the pivots within a maximum distance
    Distance,
    /// Rotation around a single axis
    Hinge,
    /// Free rotation around the pivot
    BallAndSocket,
    /// Translation along a single axis
    Slider,
    /// No relative motion
    Lock,
    /// Elastic link with a rest length
    Spring,
}

impl JointKind {
    /// Number of independent motors the joint exposes
    pub fn motor_count(&self) -> usize {
        match self {
            Self::Hinge | Self::Slider => 1,
            Self::BallAndSocket => 3,
            Self::Distance | Self::Lock | Self::Spring => 0,
        }
    }

    pub fn is_motor_enabled(&self) -> bool {
        self.motor_count() > 0
    }
}

/// Constraint parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointData {
    /// Anchor in the main impostor's local space
    pub main_pivot: [f32; 3],
    /// Anchor in the connected impostor's local space
    pub connected_pivot: [f32; 3],
    /// Hinge/slider axis in the main impostor's local space
    pub main_axis: [f32; 3],
    /// Hinge/slider axis in the connected impostor's local space
    pub connected_axis: [f32; 3],
    /// Whether the two impostors still collide with each other
    pub collision: bool,
    /// Maximum distance (distance joints) or rest length (springs)
    pub length: f32,
    /// Spring stiffness
    pub stiffness: f32,
    /// Spring damping
    pub damping: f32,
}

impl Default for JointData {
    fn default() -> Self {
        Self {
            main_pivot: [0.0, 0.0, 0.0],
            connected_pivot: [0.0, 0.0, 0.0],
            main_axis: [0.0, 1.0, 0.0],
            connected_axis: [0.0, 1.0, 0.0],
            collision: true,
            length: 1.0,
            stiffness: 1.0,
            damping: 0.0,
        }
    }
}

impl JointData {
    pub fn with_pivots(mut self, main: [f32; 3], connected: [f32; 3]) -> Self {
        self.main_pivot = main;
        self.connected_pivot = connected;
        self
    }

    pub fn with_axes(mut self, main: [f32; 3], connected: [f32; 3]) -> Self {
        self.main_axis = main;
        self.connected_axis = connected;
        self
    }

    pub fn with_collision(mut self, collision: bool) -> Self {
        self.collision = collision;
        self
    }
}

/// A constraint descriptor.
///
/// Once added to an engine the joint keeps a weak reference to that
/// engine's plugin and can push live updates (distance, motors, limits)
/// straight to it.
#[derive(Clone)]
pub struct PhysicsJoint {
    id: JointId,
    kind: JointKind,
    data: JointData,
    plugin: Option<Weak<Mutex<dyn PhysicsPlugin>>>,
}

impl PhysicsJoint {
    pub fn new(kind: JointKind, data: JointData) -> Self {
        Self {
            id: JointId::next(),
            kind,
            data,
            plugin: None,
        }
    }

    /// Distance joint with the given maximum distance
    pub fn distance(max_distance: f32) -> Self {
        Self::new(
            JointKind::Distance,
            JointData {
                length: max_distance,
                ..Default::default()
            },
        )
    }

    pub fn hinge(data: JointData) -> Self {
        Self::new(JointKind::Hinge, data)
    }

    pub fn ball_and_socket(data: JointData) -> Self {
        Self::new(JointKind::BallAndSocket, data)
    }

    pub fn slider(data: JointData) -> Self {
        Self::new(JointKind::Slider, data)
    }

    pub fn lock(data: JointData) -> Self {
        Self::new(JointKind::Lock, data)
    }

    pub fn spring(rest_length: f32, stiffness: f32, damping: f32) -> Self {
        Self::new(
            JointKind::Spring,
            JointData {
                length: rest_length,
                stiffness,
                damping,
                ..Default::default()
            },
        )
    }

    pub fn id(&self) -> JointId {
        self.id
    }

    pub fn kind(&self) -> JointKind {
        self.kind
    }

    pub fn data(&self) -> &JointData {
        &self.data
    }

    pub(crate) fn bind(&mut self, plugin: &SharedPlugin) {
        self.plugin = Some(Arc::downgrade(plugin));
    }

    /// Whether the joint is bound to a plugin that is still alive
    pub fn is_bound(&self) -> bool {
        self.plugin.as_ref().is_some_and(|p| p.strong_count() > 0)
    }

    fn bound_plugin(&self) -> Result<SharedPlugin> {
        self.plugin
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or(PhysicsError::JointNotBound)
    }

    fn check_motor(&self, motor_index: usize, operation: &'static str) -> Result<()> {
        if !self.kind.is_motor_enabled() {
            return Err(PhysicsError::UnsupportedJointOperation {
                kind: self.kind,
                operation,
            });
        }
        if motor_index >= self.kind.motor_count() {
            return Err(PhysicsError::InvalidMotorIndex {
                kind: self.kind,
                index: motor_index,
            });
        }
        Ok(())
    }

    /// Change the distance range of a distance joint
    pub fn update_distance(&self, max_distance: f32, min_distance: Option<f32>) -> Result<()> {
        if self.kind != JointKind::Distance {
            return Err(PhysicsError::UnsupportedJointOperation {
                kind: self.kind,
                operation: "update_distance",
            });
        }
        let plugin = self.bound_plugin()?;
        let mut plugin = plugin.lock();
        plugin.update_distance_joint(self, max_distance, min_distance)
    }

    /// Drive a motor at `speed`, optionally capping its force
    pub fn set_motor(&self, speed: f32, max_force: Option<f32>, motor_index: usize) -> Result<()> {
        self.check_motor(motor_index, "set_motor")?;
        let plugin = self.bound_plugin()?;
        let mut plugin = plugin.lock();
        plugin.set_motor(self, speed, max_force, motor_index)
    }

    /// Limit a motor axis. `lower` defaults to `-upper`.
    pub fn set_limit(&self, upper: f32, lower: Option<f32>, motor_index: usize) -> Result<()> {
        self.check_motor(motor_index, "set_limit")?;
        let plugin = self.bound_plugin()?;
        let mut plugin = plugin.lock();
        plugin.set_limit(self, upper, lower, motor_index)
    }
}

impl fmt::Debug for PhysicsJoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicsJoint")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("data", &self.data)
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// Key identifying an impostor-joint record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointKey {
    pub main: ImpostorId,
    pub connected: ImpostorId,
    pub joint: JointId,
}

/// A joint bound to the two impostors it connects
#[derive(Debug, Clone)]
pub struct ImpostorJoint {
    pub main: ImpostorId,
    pub connected: ImpostorId,
    pub joint: PhysicsJoint,
}

impl ImpostorJoint {
    pub fn key(&self) -> JointKey {
        JointKey {
            main: self.main,
            connected: self.connected,
            joint: self.joint.id(),
        }
    }

    /// Exact triple match
    pub fn matches(&self, main: ImpostorId, connected: ImpostorId, joint: JointId) -> bool {
        self.main == main && self.connected == connected && self.joint.id() == joint
    }
}
