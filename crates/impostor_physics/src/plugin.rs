//! Solver backend contract
//!
//! Every operation the engine (or a bound joint) can ask of a solver lives
//! on [`PhysicsPlugin`]. Backends are selected when the engine is built and
//! can be swapped without touching the engine.

use crate::error::Result;
use crate::impostor::Impostor;
use crate::joint::{ImpostorJoint, PhysicsJoint};
use crate::rapier::RapierPlugin;
use parking_lot::Mutex;
use std::sync::Arc;

/// Plugin as held by the engine. Joints keep a weak reference to it.
pub type SharedPlugin = Arc<Mutex<dyn PhysicsPlugin>>;

/// A physics solver backend
pub trait PhysicsPlugin: Send {
    // ==================== Global ====================

    /// Human-readable backend name
    fn name(&self) -> &str;

    /// Whether the backend can run in the current environment
    fn is_supported(&self) -> bool {
        true
    }

    fn set_gravity(&mut self, gravity: [f32; 3]);

    fn set_time_step(&mut self, time_step: f32);

    fn time_step(&self) -> f32;

    /// Advance the simulation by `delta` seconds over every impostor
    fn execute_step(&mut self, delta: f32, impostors: &mut [Impostor]) -> Result<()>;

    /// Release every backend resource
    fn dispose(&mut self);

    // ==================== Body lifecycle ====================

    /// Build (or rebuild) the body for an impostor and store its handle
    fn generate_physics_body(&mut self, impostor: &mut Impostor) -> Result<()>;

    /// Drop the impostor's body and clear its handle
    fn remove_physics_body(&mut self, impostor: &mut Impostor);

    /// Whether the body has to be (re)generated before the next step
    fn is_body_init_required(&self, impostor: &Impostor) -> bool {
        impostor.is_body_init_required()
    }

    /// Copy the body pose into the impostor's object
    fn set_transformation_from_physics_body(&mut self, impostor: &Impostor) -> Result<()>;

    /// Move the body to the given pose
    fn set_physics_body_transformation(
        &mut self,
        impostor: &Impostor,
        position: [f32; 3],
        rotation: [f32; 4],
    ) -> Result<()>;

    // ==================== Body properties ====================

    fn set_linear_velocity(&mut self, impostor: &Impostor, velocity: [f32; 3]) -> Result<()>;

    fn linear_velocity(&self, impostor: &Impostor) -> Result<[f32; 3]>;

    fn set_angular_velocity(&mut self, impostor: &Impostor, velocity: [f32; 3]) -> Result<()>;

    fn angular_velocity(&self, impostor: &Impostor) -> Result<[f32; 3]>;

    fn set_body_mass(&mut self, impostor: &Impostor, mass: f32) -> Result<()>;

    fn body_mass(&self, impostor: &Impostor) -> Result<f32>;

    fn set_body_friction(&mut self, impostor: &Impostor, friction: f32) -> Result<()>;

    fn body_friction(&self, impostor: &Impostor) -> Result<f32>;

    fn set_body_restitution(&mut self, impostor: &Impostor, restitution: f32) -> Result<()>;

    fn body_restitution(&self, impostor: &Impostor) -> Result<f32>;

    fn sleep_body(&mut self, impostor: &Impostor) -> Result<()>;

    fn wake_up_body(&mut self, impostor: &Impostor) -> Result<()>;

    fn is_sleeping(&self, impostor: &Impostor) -> Result<bool>;

    /// Bounding radius of the body's shape
    fn radius(&self, impostor: &Impostor) -> Result<f32>;

    /// Full size of the body's local bounding box
    fn box_size(&self, impostor: &Impostor) -> Result<[f32; 3]>;

    // ==================== Forces ====================

    /// Instantaneous impulse at a world-space contact point
    fn apply_impulse(&mut self, impostor: &Impostor, impulse: [f32; 3], contact_point: [f32; 3]) -> Result<()>;

    /// Force at a world-space contact point, applied over the next step
    fn apply_force(&mut self, impostor: &Impostor, force: [f32; 3], contact_point: [f32; 3]) -> Result<()>;

    // ==================== Joints ====================

    /// Build the backend constraint for a record
    fn generate_joint(&mut self, record: &ImpostorJoint, main: &Impostor, connected: &Impostor) -> Result<()>;

    /// Drop the backend constraint for a record
    fn remove_joint(&mut self, record: &ImpostorJoint);

    fn update_distance_joint(&mut self, joint: &PhysicsJoint, max_distance: f32, min_distance: Option<f32>) -> Result<()>;

    fn set_motor(&mut self, joint: &PhysicsJoint, speed: f32, max_force: Option<f32>, motor_index: usize) -> Result<()>;

    fn set_limit(&mut self, joint: &PhysicsJoint, upper: f32, lower: Option<f32>, motor_index: usize) -> Result<()>;
}

/// The backend used when the caller does not pick one
pub fn default_plugin() -> RapierPlugin {
    RapierPlugin::default()
}
