//! Rapier 3D backend - the default physics plugin

use crate::config::{RapierConfig, DEFAULT_GRAVITY, DEFAULT_TIME_STEP};
use crate::error::{PhysicsError, Result};
use crate::impostor::{BodyHandle, Impostor, ImpostorKind};
use crate::joint::{ImpostorJoint, JointData, JointKey, JointKind, PhysicsJoint};
use crate::plugin::PhysicsPlugin;
use rapier3d::na::{Quaternion, Unit, UnitQuaternion};
use rapier3d::prelude as rapier;
use std::collections::HashMap;
use std::num::NonZeroUsize;

/// Smallest collider dimension, degenerate extents are bumped up to it
const MIN_EXTENT: f32 = 0.001;

/// Physics plugin backed by a Rapier pipeline
pub struct RapierPlugin {
    /// Configuration
    config: RapierConfig,

    /// Rapier physics pipeline
    pipeline: rapier::PhysicsPipeline,

    /// Gravity
    gravity: rapier::Vector<f32>,

    /// Integration parameters (dt is the fixed time step)
    integration_params: rapier::IntegrationParameters,

    islands: rapier::IslandManager,
    broad_phase: rapier::DefaultBroadPhase,
    narrow_phase: rapier::NarrowPhase,
    impulse_joints: rapier::ImpulseJointSet,
    multibody_joints: rapier::MultibodyJointSet,
    ccd_solver: rapier::CCDSolver,
    bodies: rapier::RigidBodySet,
    colliders: rapier::ColliderSet,

    /// Rapier joint built for each impostor-joint record
    joints: HashMap<JointKey, rapier::ImpulseJointHandle>,

    /// Accumulated time for fixed timestep
    accumulated_time: f32,
}

impl RapierPlugin {
    pub const NAME: &'static str = "rapier";

    /// Create a new Rapier backend
    pub fn new(config: RapierConfig) -> Self {
        let mut integration_params = rapier::IntegrationParameters::default();
        integration_params.dt = DEFAULT_TIME_STEP;
        integration_params.num_solver_iterations =
            NonZeroUsize::new(config.solver_iterations).unwrap_or(NonZeroUsize::MIN);

        Self {
            config,
            pipeline: rapier::PhysicsPipeline::new(),
            gravity: to_vector(DEFAULT_GRAVITY),
            integration_params,
            islands: rapier::IslandManager::new(),
            broad_phase: rapier::DefaultBroadPhase::new(),
            narrow_phase: rapier::NarrowPhase::new(),
            impulse_joints: rapier::ImpulseJointSet::new(),
            multibody_joints: rapier::MultibodyJointSet::new(),
            ccd_solver: rapier::CCDSolver::new(),
            bodies: rapier::RigidBodySet::new(),
            colliders: rapier::ColliderSet::new(),
            joints: HashMap::new(),
            accumulated_time: 0.0,
        }
    }

    pub fn config(&self) -> &RapierConfig {
        &self.config
    }

    /// Get number of rigid bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Get number of colliders
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Get number of live joints
    pub fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }

    fn body(&self, impostor: &Impostor) -> Result<&rapier::RigidBody> {
        let handle = impostor.require_body()?;
        self.bodies
            .get(to_rapier_handle(handle))
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    fn body_mut(&mut self, impostor: &Impostor) -> Result<&mut rapier::RigidBody> {
        let handle = impostor.require_body()?;
        self.bodies
            .get_mut(to_rapier_handle(handle))
            .ok_or(PhysicsError::BodyNotFound(handle))
    }

    fn collider_handle(&self, impostor: &Impostor) -> Result<rapier::ColliderHandle> {
        self.body(impostor)?
            .colliders()
            .first()
            .copied()
            .ok_or(PhysicsError::NoBody(impostor.id()))
    }

    fn collider(&self, impostor: &Impostor) -> Result<&rapier::Collider> {
        let handle = self.collider_handle(impostor)?;
        self.colliders
            .get(handle)
            .ok_or(PhysicsError::NoBody(impostor.id()))
    }

    fn collider_mut(&mut self, impostor: &Impostor) -> Result<&mut rapier::Collider> {
        let handle = self.collider_handle(impostor)?;
        self.colliders
            .get_mut(handle)
            .ok_or(PhysicsError::NoBody(impostor.id()))
    }

    /// Apply `update` to every Rapier joint built from `joint`
    fn update_joint_data(
        &mut self,
        joint: &PhysicsJoint,
        mut update: impl FnMut(&mut rapier::GenericJoint),
    ) -> Result<()> {
        let handles: Vec<_> = self
            .joints
            .iter()
            .filter(|(key, _)| key.joint == joint.id())
            .map(|(_, handle)| *handle)
            .collect();
        if handles.is_empty() {
            return Err(PhysicsError::JointNotFound(joint.id()));
        }

        for handle in handles {
            if let Some(rapier_joint) = self.impulse_joints.get_mut(handle) {
                update(&mut rapier_joint.data);
            }
        }
        Ok(())
    }

    /// Internal fixed timestep
    fn step_internal(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }
}

impl Default for RapierPlugin {
    fn default() -> Self {
        Self::new(RapierConfig::default())
    }
}

impl PhysicsPlugin for RapierPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn set_gravity(&mut self, gravity: [f32; 3]) {
        self.gravity = to_vector(gravity);
    }

    fn set_time_step(&mut self, time_step: f32) {
        self.integration_params.dt = time_step;
    }

    fn time_step(&self) -> f32 {
        self.integration_params.dt
    }

    fn execute_step(&mut self, delta: f32, impostors: &mut [Impostor]) -> Result<()> {
        self.accumulated_time += delta;

        let dt = self.integration_params.dt;
        let mut steps = 0;
        while self.accumulated_time >= dt && steps < self.config.max_substeps {
            self.step_internal();
            self.accumulated_time -= dt;
            steps += 1;
        }

        // Time the substep cap could not cover is dropped
        if self.accumulated_time >= dt {
            log::trace!("Dropping {}s of unsimulated time", self.accumulated_time);
            self.accumulated_time = if dt > 0.0 { self.accumulated_time % dt } else { 0.0 };
        }

        // Forces last until a substep has consumed them
        if steps > 0 {
            for (_, body) in self.bodies.iter_mut() {
                body.reset_forces(false);
            }
        }

        for impostor in impostors.iter().filter(|i| i.body().is_some()) {
            self.set_transformation_from_physics_body(impostor)?;
        }
        Ok(())
    }

    fn dispose(&mut self) {
        log::debug!(
            "Disposing Rapier backend ({} bodies, {} joints)",
            self.bodies.len(),
            self.impulse_joints.len()
        );
        let config = self.config.clone();
        *self = Self::new(config);
    }

    // ==================== Body lifecycle ====================

    fn generate_physics_body(&mut self, impostor: &mut Impostor) -> Result<()> {
        if impostor.body().is_some() {
            self.remove_physics_body(impostor);
        }

        let transform = impostor.object().transform();
        let params = *impostor.params();
        let body_type = if params.mass > 0.0 {
            rapier::RigidBodyType::Dynamic
        } else {
            rapier::RigidBodyType::Fixed
        };

        let mut builder = rapier::RigidBodyBuilder::new(body_type)
            .position(to_isometry(transform.position, transform.rotation))
            .ccd_enabled(self.config.ccd_enabled)
            .can_sleep(self.config.sleeping_enabled)
            .user_data(impostor.id().raw() as u128);
        if params.mass > 0.0 {
            builder = builder.additional_mass(params.mass);
        }
        let body_handle = self.bodies.insert(builder);

        let collider = rapier::ColliderBuilder::new(shape_for(impostor.kind(), transform.scaled_extents()))
            .density(0.0)
            .friction(params.material.friction)
            .restitution(params.material.restitution)
            .friction_combine_rule(params.material.friction_combine.into())
            .restitution_combine_rule(params.material.restitution_combine.into())
            .user_data(impostor.id().raw() as u128);
        self.colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies);

        // Mass is otherwise only known after the next pipeline step
        if let Some(body) = self.bodies.get_mut(body_handle) {
            body.recompute_mass_properties_from_colliders(&self.colliders);
        }

        impostor.set_body(Some(from_rapier_handle(body_handle)));
        log::debug!("Generated {:?} body for impostor {}", impostor.kind(), impostor.id());
        Ok(())
    }

    fn remove_physics_body(&mut self, impostor: &mut Impostor) {
        let Some(handle) = impostor.body() else {
            return;
        };

        let removed = self.bodies.remove(
            to_rapier_handle(handle),
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true, // Remove attached colliders
        );
        if removed.is_none() {
            log::warn!("Impostor {} referenced a body Rapier no longer knows", impostor.id());
        }

        // Rapier drops the joints attached to the body
        let impulse_joints = &self.impulse_joints;
        self.joints.retain(|_, h| impulse_joints.get(*h).is_some());

        impostor.set_body(None);
    }

    fn set_transformation_from_physics_body(&mut self, impostor: &Impostor) -> Result<()> {
        let body = self.body(impostor)?;
        let position = body.translation();
        let rotation = body.rotation();
        impostor.object().set_pose(
            [position.x, position.y, position.z],
            [rotation.i, rotation.j, rotation.k, rotation.w],
        );
        Ok(())
    }

    fn set_physics_body_transformation(
        &mut self,
        impostor: &Impostor,
        position: [f32; 3],
        rotation: [f32; 4],
    ) -> Result<()> {
        self.body_mut(impostor)?
            .set_position(to_isometry(position, rotation), true);
        Ok(())
    }

    // ==================== Body properties ====================

    fn set_linear_velocity(&mut self, impostor: &Impostor, velocity: [f32; 3]) -> Result<()> {
        self.body_mut(impostor)?.set_linvel(to_vector(velocity), true);
        Ok(())
    }

    fn linear_velocity(&self, impostor: &Impostor) -> Result<[f32; 3]> {
        let vel = self.body(impostor)?.linvel();
        Ok([vel.x, vel.y, vel.z])
    }

    fn set_angular_velocity(&mut self, impostor: &Impostor, velocity: [f32; 3]) -> Result<()> {
        self.body_mut(impostor)?.set_angvel(to_vector(velocity), true);
        Ok(())
    }

    fn angular_velocity(&self, impostor: &Impostor) -> Result<[f32; 3]> {
        let vel = self.body(impostor)?.angvel();
        Ok([vel.x, vel.y, vel.z])
    }

    fn set_body_mass(&mut self, impostor: &Impostor, mass: f32) -> Result<()> {
        let body = self.body_mut(impostor)?;
        if mass > 0.0 {
            body.set_body_type(rapier::RigidBodyType::Dynamic, true);
            body.set_additional_mass(mass, true);
        } else {
            body.set_body_type(rapier::RigidBodyType::Fixed, true);
        }
        Ok(())
    }

    fn body_mass(&self, impostor: &Impostor) -> Result<f32> {
        Ok(self.body(impostor)?.mass())
    }

    fn set_body_friction(&mut self, impostor: &Impostor, friction: f32) -> Result<()> {
        self.collider_mut(impostor)?.set_friction(friction);
        Ok(())
    }

    fn body_friction(&self, impostor: &Impostor) -> Result<f32> {
        Ok(self.collider(impostor)?.friction())
    }

    fn set_body_restitution(&mut self, impostor: &Impostor, restitution: f32) -> Result<()> {
        self.collider_mut(impostor)?.set_restitution(restitution);
        Ok(())
    }

    fn body_restitution(&self, impostor: &Impostor) -> Result<f32> {
        Ok(self.collider(impostor)?.restitution())
    }

    fn sleep_body(&mut self, impostor: &Impostor) -> Result<()> {
        self.body_mut(impostor)?.sleep();
        Ok(())
    }

    fn wake_up_body(&mut self, impostor: &Impostor) -> Result<()> {
        self.body_mut(impostor)?.wake_up(true);
        Ok(())
    }

    fn is_sleeping(&self, impostor: &Impostor) -> Result<bool> {
        Ok(self.body(impostor)?.is_sleeping())
    }

    fn radius(&self, impostor: &Impostor) -> Result<f32> {
        let sphere = self.collider(impostor)?.shape().compute_local_bounding_sphere();
        Ok(sphere.radius())
    }

    fn box_size(&self, impostor: &Impostor) -> Result<[f32; 3]> {
        let extents = self.collider(impostor)?.shape().compute_local_aabb().extents();
        Ok([extents.x, extents.y, extents.z])
    }

    // ==================== Forces ====================

    fn apply_impulse(&mut self, impostor: &Impostor, impulse: [f32; 3], contact_point: [f32; 3]) -> Result<()> {
        self.body_mut(impostor)?
            .apply_impulse_at_point(to_vector(impulse), to_point(contact_point), true);
        Ok(())
    }

    fn apply_force(&mut self, impostor: &Impostor, force: [f32; 3], contact_point: [f32; 3]) -> Result<()> {
        self.body_mut(impostor)?
            .add_force_at_point(to_vector(force), to_point(contact_point), true);
        Ok(())
    }

    // ==================== Joints ====================

    fn generate_joint(&mut self, record: &ImpostorJoint, main: &Impostor, connected: &Impostor) -> Result<()> {
        let body1 = to_rapier_handle(main.require_body()?);
        let body2 = to_rapier_handle(connected.require_body()?);
        let data = joint_data_for(record.joint.kind(), record.joint.data());

        let handle = self.impulse_joints.insert(body1, body2, data, true);
        if let Some(previous) = self.joints.insert(record.key(), handle) {
            self.impulse_joints.remove(previous, true);
        }
        log::debug!("Generated {:?} joint {:?}", record.joint.kind(), record.joint.id());
        Ok(())
    }

    fn remove_joint(&mut self, record: &ImpostorJoint) {
        match self.joints.remove(&record.key()) {
            Some(handle) => {
                self.impulse_joints.remove(handle, true);
            }
            None => log::debug!("No Rapier joint for {:?}", record.key()),
        }
    }

    fn update_distance_joint(&mut self, joint: &PhysicsJoint, max_distance: f32, min_distance: Option<f32>) -> Result<()> {
        if joint.kind() != JointKind::Distance {
            return Err(PhysicsError::UnsupportedJointOperation {
                kind: joint.kind(),
                operation: "update_distance",
            });
        }
        let min_distance = min_distance.unwrap_or(0.0);
        self.update_joint_data(joint, |data| {
            data.set_limits(rapier::JointAxis::LinX, [min_distance, max_distance]);
        })
    }

    fn set_motor(&mut self, joint: &PhysicsJoint, speed: f32, max_force: Option<f32>, motor_index: usize) -> Result<()> {
        let axis = motor_axis(joint.kind(), motor_index)?;
        self.update_joint_data(joint, |data| {
            data.set_motor_velocity(axis, speed, 1.0);
            if let Some(max_force) = max_force {
                data.set_motor_max_force(axis, max_force);
            }
        })
    }

    fn set_limit(&mut self, joint: &PhysicsJoint, upper: f32, lower: Option<f32>, motor_index: usize) -> Result<()> {
        let axis = motor_axis(joint.kind(), motor_index)?;
        let lower = lower.unwrap_or(-upper);
        self.update_joint_data(joint, |data| {
            data.set_limits(axis, [lower, upper]);
        })
    }
}

/// Joint axis driven by a motor index
fn motor_axis(kind: JointKind, motor_index: usize) -> Result<rapier::JointAxis> {
    use rapier::JointAxis;
    match (kind, motor_index) {
        (JointKind::Hinge, 0) => Ok(JointAxis::AngX),
        (JointKind::Slider, 0) => Ok(JointAxis::LinX),
        (JointKind::BallAndSocket, 0) => Ok(JointAxis::AngX),
        (JointKind::BallAndSocket, 1) => Ok(JointAxis::AngY),
        (JointKind::BallAndSocket, 2) => Ok(JointAxis::AngZ),
        (kind, _) if !kind.is_motor_enabled() => Err(PhysicsError::UnsupportedJointOperation {
            kind,
            operation: "motor",
        }),
        (kind, index) => Err(PhysicsError::InvalidMotorIndex { kind, index }),
    }
}

/// Build the Rapier joint for a descriptor
fn joint_data_for(kind: JointKind, data: &JointData) -> rapier::GenericJoint {
    let anchor1 = to_point(data.main_pivot);
    let anchor2 = to_point(data.connected_pivot);

    let mut joint = match kind {
        JointKind::Distance => rapier::RopeJointBuilder::new(data.length)
            .local_anchor1(anchor1)
            .local_anchor2(anchor2)
            .build()
            .data,
        JointKind::Hinge => rapier::RevoluteJointBuilder::new(to_axis(data.main_axis))
            .local_anchor1(anchor1)
            .local_anchor2(anchor2)
            .build()
            .data,
        JointKind::BallAndSocket => rapier::SphericalJointBuilder::new()
            .local_anchor1(anchor1)
            .local_anchor2(anchor2)
            .build()
            .data,
        JointKind::Slider => rapier::PrismaticJointBuilder::new(to_axis(data.main_axis))
            .local_anchor1(anchor1)
            .local_anchor2(anchor2)
            .build()
            .data,
        JointKind::Lock => rapier::FixedJointBuilder::new()
            .local_anchor1(anchor1)
            .local_anchor2(anchor2)
            .build()
            .data,
        JointKind::Spring => rapier::SpringJointBuilder::new(data.length, data.stiffness, data.damping)
            .local_anchor1(anchor1)
            .local_anchor2(anchor2)
            .build()
            .data,
    };

    if matches!(kind, JointKind::Hinge | JointKind::Slider) {
        joint.set_local_axis2(to_axis(data.connected_axis));
    }
    joint.set_contacts_enabled(data.collision);
    joint
}

/// Collider shape for an impostor kind and its scaled extents
fn shape_for(kind: ImpostorKind, extents: [f32; 3]) -> rapier::SharedShape {
    let [hx, hy, hz] = extents.map(|e| (e * 0.5).max(MIN_EXTENT));
    match kind {
        ImpostorKind::Sphere => rapier::SharedShape::ball(hx.max(hy).max(hz)),
        ImpostorKind::Box => rapier::SharedShape::cuboid(hx, hy, hz),
        ImpostorKind::Capsule => {
            let radius = hx.max(hz);
            rapier::SharedShape::capsule_y((hy - radius).max(0.0), radius)
        }
        ImpostorKind::Cylinder => rapier::SharedShape::cylinder(hy, hx.max(hz)),
    }
}

fn to_rapier_handle(handle: BodyHandle) -> rapier::RigidBodyHandle {
    let (index, generation) = handle.into_raw_parts();
    rapier::RigidBodyHandle::from_raw_parts(index, generation)
}

fn from_rapier_handle(handle: rapier::RigidBodyHandle) -> BodyHandle {
    let (index, generation) = handle.into_raw_parts();
    BodyHandle::from_raw_parts(index, generation)
}

fn to_vector(v: [f32; 3]) -> rapier::Vector<f32> {
    rapier::Vector::new(v[0], v[1], v[2])
}

fn to_point(p: [f32; 3]) -> rapier::Point<f32> {
    rapier::Point::new(p[0], p[1], p[2])
}

/// Normalized axis, Y for degenerate input
fn to_axis(v: [f32; 3]) -> rapier::UnitVector<f32> {
    Unit::try_new(to_vector(v), 1.0e-6).unwrap_or_else(|| rapier::Vector::y_axis())
}

fn to_isometry(position: [f32; 3], rotation: [f32; 4]) -> rapier::Isometry<f32> {
    let [x, y, z, w] = rotation;
    rapier::Isometry::from_parts(
        rapier::Translation::new(position[0], position[1], position[2]),
        UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z)),
    )
}
