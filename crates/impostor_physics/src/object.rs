//! Simulated objects wrapped by impostors

use parking_lot::RwLock;
use std::sync::Arc;

/// Pose and size of a simulated object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World position
    pub position: [f32; 3],
    /// Rotation quaternion (x, y, z, w)
    pub rotation: [f32; 4],
    /// Per-axis scale
    pub scale: [f32; 3],
    /// Unscaled size of the object's bounding box
    pub extents: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0, 1.0, 1.0],
            extents: [1.0, 1.0, 1.0],
        }
    }
}

impl Transform {
    pub fn from_position(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z],
            ..Default::default()
        }
    }

    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = [x, y, z];
        self
    }

    pub fn with_extents(mut self, x: f32, y: f32, z: f32) -> Self {
        self.extents = [x, y, z];
        self
    }

    /// Extents after scaling
    pub fn scaled_extents(&self) -> [f32; 3] {
        [
            (self.extents[0] * self.scale[0]).abs(),
            (self.extents[1] * self.scale[1]).abs(),
            (self.extents[2] * self.scale[2]).abs(),
        ]
    }
}

/// Shared handle to the object an impostor simulates.
///
/// Clones refer to the same object; equality is identity, never value.
#[derive(Debug, Clone, Default)]
pub struct PhysicsObject(Arc<RwLock<Transform>>);

impl PhysicsObject {
    pub fn new(transform: Transform) -> Self {
        Self(Arc::new(RwLock::new(transform)))
    }

    /// Snapshot of the current transform
    pub fn transform(&self) -> Transform {
        *self.0.read()
    }

    pub fn set_transform(&self, transform: Transform) {
        *self.0.write() = transform;
    }

    pub fn set_pose(&self, position: [f32; 3], rotation: [f32; 4]) {
        let mut transform = self.0.write();
        transform.position = position;
        transform.rotation = rotation;
    }

    /// Whether both handles point at the same object
    pub fn same_as(&self, other: &PhysicsObject) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for PhysicsObject {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for PhysicsObject {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_not_value() {
        let a = PhysicsObject::new(Transform::default());
        let b = PhysicsObject::new(Transform::default());
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_clones_share_state() {
        let a = PhysicsObject::default();
        let b = a.clone();
        b.set_pose([1.0, 2.0, 3.0], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(a.transform().position, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_scaled_extents() {
        let t = Transform::default().with_extents(2.0, 1.0, 1.0).with_scale(0.5, -3.0, 1.0);
        assert_eq!(t.scaled_extents(), [1.0, 3.0, 1.0]);
    }
}
