//! Physics engine - owner of impostors, joints and the active plugin

use crate::config::{PhysicsConfig, DEFAULT_GRAVITY, DEFAULT_TIME_STEP};
use crate::error::{PhysicsError, Result};
use crate::impostor::{BodyHandle, Impostor, ImpostorId};
use crate::joint::{ImpostorJoint, PhysicsJoint};
use crate::object::PhysicsObject;
use crate::plugin::{default_plugin, PhysicsPlugin, SharedPlugin};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// Largest delta handed to the plugin in one step
pub const MAX_STEP_DELTA: f32 = 0.1;

/// Delta used when the frame time is zero, negative or NaN
pub const FALLBACK_STEP_DELTA: f32 = 1.0 / 60.0;

/// Normalize a frame delta before it reaches the solver
pub fn clamp_step_delta(delta: f32) -> f32 {
    if delta > MAX_STEP_DELTA {
        MAX_STEP_DELTA
    } else if delta > 0.0 {
        delta
    } else {
        // also catches NaN
        FALLBACK_STEP_DELTA
    }
}

/// Coordinates impostors and joints with one solver plugin.
///
/// The engine keeps the registries and forwards all simulation work to its
/// plugin. It is driven from a single simulation thread: `step` once per
/// frame, everything else in between.
pub struct PhysicsEngine {
    gravity: [f32; 3],
    plugin: SharedPlugin,
    impostors: Vec<Impostor>,
    joints: Vec<ImpostorJoint>,
    last_impostor_id: u64,
}

impl PhysicsEngine {
    /// Create an engine around `plugin`.
    ///
    /// Fails with `UnsupportedPlugin` when the plugin cannot run here.
    /// Gravity defaults to (0, -9.807, 0), the time step to 1/60.
    pub fn new<P: PhysicsPlugin + 'static>(gravity: Option<[f32; 3]>, plugin: P) -> Result<Self> {
        if !plugin.is_supported() {
            return Err(PhysicsError::UnsupportedPlugin {
                name: plugin.name().to_string(),
            });
        }

        let plugin: SharedPlugin = Arc::new(Mutex::new(plugin));
        let mut engine = Self {
            gravity: DEFAULT_GRAVITY,
            plugin,
            impostors: Vec::new(),
            joints: Vec::new(),
            last_impostor_id: 0,
        };
        engine.set_gravity(gravity.unwrap_or(DEFAULT_GRAVITY));
        engine.set_time_step(DEFAULT_TIME_STEP);

        log::info!("Physics engine started with plugin '{}'", engine.plugin_name());
        Ok(engine)
    }

    /// Create an engine using the default backend
    pub fn with_default_plugin(gravity: Option<[f32; 3]>) -> Result<Self> {
        Self::new(gravity, default_plugin())
    }

    /// Create an engine from a configuration
    pub fn with_config<P: PhysicsPlugin + 'static>(config: &PhysicsConfig, plugin: P) -> Result<Self> {
        let mut engine = Self::new(Some(config.gravity), plugin)?;
        engine.set_time_step(config.time_step);
        Ok(engine)
    }

    // ==================== Configuration ====================

    pub fn set_gravity(&mut self, gravity: [f32; 3]) {
        self.gravity = gravity;
        self.plugin.lock().set_gravity(gravity);
    }

    pub fn gravity(&self) -> [f32; 3] {
        self.gravity
    }

    pub fn set_time_step(&mut self, time_step: f32) {
        self.plugin.lock().set_time_step(time_step);
    }

    pub fn time_step(&self) -> f32 {
        self.plugin.lock().time_step()
    }

    pub fn plugin_name(&self) -> String {
        self.plugin.lock().name().to_string()
    }

    /// Lock the active plugin
    pub fn plugin(&self) -> MutexGuard<'_, dyn PhysicsPlugin> {
        self.plugin.lock()
    }

    // ==================== Impostors ====================

    /// Register an impostor and have the plugin build its body.
    ///
    /// The impostor stays registered even if body generation fails; the
    /// next `step` retries it.
    pub fn add_impostor(&mut self, mut impostor: Impostor) -> Result<ImpostorId> {
        self.last_impostor_id += 1;
        let id = ImpostorId(self.last_impostor_id);
        impostor.assign_id(id);
        self.impostors.push(impostor);
        log::debug!("Added impostor {} ({:?})", id, self.impostors[self.impostors.len() - 1].kind());

        let mut plugin = self.plugin.lock();
        if let Some(impostor) = self.impostors.last_mut() {
            plugin.generate_physics_body(impostor)?;
        }
        Ok(id)
    }

    /// Unregister an impostor and release its body.
    ///
    /// Returns `None` and leaves the registry untouched for unknown ids.
    pub fn remove_impostor(&mut self, id: ImpostorId) -> Option<Impostor> {
        let index = self.index_of(id)?;
        let mut impostor = self.impostors.remove(index);
        self.plugin.lock().remove_physics_body(&mut impostor);
        impostor.set_body(None);
        log::debug!("Removed impostor {}", id);
        Some(impostor)
    }

    /// Impostors in simulation order
    pub fn impostors(&self) -> &[Impostor] {
        &self.impostors
    }

    pub fn impostor(&self, id: ImpostorId) -> Option<&Impostor> {
        self.impostors.iter().find(|i| i.id() == id)
    }

    pub fn impostor_mut(&mut self, id: ImpostorId) -> Option<&mut Impostor> {
        self.impostors.iter_mut().find(|i| i.id() == id)
    }

    /// First impostor wrapping `object`
    pub fn impostor_for_object(&self, object: &PhysicsObject) -> Option<&Impostor> {
        self.impostors.iter().find(|i| i.object().same_as(object))
    }

    /// First impostor owning `body`
    pub fn impostor_for_body(&self, body: BodyHandle) -> Option<&Impostor> {
        self.impostors.iter().find(|i| i.body() == Some(body))
    }

    fn index_of(&self, id: ImpostorId) -> Option<usize> {
        self.impostors.iter().position(|i| i.id() == id)
    }

    fn registered(&self, id: ImpostorId) -> Result<&Impostor> {
        self.impostor(id).ok_or(PhysicsError::ImpostorNotFound(id))
    }

    // ==================== Joints ====================

    /// Connect two impostors with `joint`.
    ///
    /// The record is registered and the joint bound to the plugin before
    /// generation, so a failure reported by the plugin leaves both in place.
    /// Adding a triple that is already registered keeps the single record
    /// and asks the plugin to build it again.
    pub fn add_joint(&mut self, main: ImpostorId, connected: ImpostorId, joint: &mut PhysicsJoint) -> Result<()> {
        joint.bind(&self.plugin);
        let index = match self
            .joints
            .iter()
            .position(|r| r.matches(main, connected, joint.id()))
        {
            Some(index) => {
                log::debug!("Joint {:?} between {} and {} already registered", joint.id(), main, connected);
                index
            }
            None => {
                self.joints.push(ImpostorJoint {
                    main,
                    connected,
                    joint: joint.clone(),
                });
                log::debug!("Added {:?} joint {:?} between {} and {}", joint.kind(), joint.id(), main, connected);
                self.joints.len() - 1
            }
        };

        let record = &self.joints[index];
        let main = self.registered(main)?;
        let connected = self.registered(connected)?;
        self.plugin.lock().generate_joint(record, main, connected)
    }

    /// Remove the first record matching (main, connected, joint).
    ///
    /// The record leaves the registry and the plugin is asked once to drop
    /// its constraint. Returns `None` when nothing matches.
    pub fn remove_joint(&mut self, main: ImpostorId, connected: ImpostorId, joint: &PhysicsJoint) -> Option<ImpostorJoint> {
        let index = self
            .joints
            .iter()
            .position(|r| r.matches(main, connected, joint.id()))?;
        let record = self.joints.remove(index);
        self.plugin.lock().remove_joint(&record);
        log::debug!("Removed joint {:?} between {} and {}", joint.id(), main, connected);
        Some(record)
    }

    pub fn joints(&self) -> &[ImpostorJoint] {
        &self.joints
    }

    // ==================== Simulation ====================

    /// Advance the simulation by one frame.
    ///
    /// Pending bodies are (re)generated first, then the clamped delta is
    /// handed to the plugin together with every impostor.
    pub fn step(&mut self, delta: f32) -> Result<()> {
        let mut plugin = self.plugin.lock();
        let mut regenerated = Vec::new();
        for impostor in self.impostors.iter_mut() {
            if plugin.is_body_init_required(impostor) {
                plugin.generate_physics_body(impostor)?;
                regenerated.push(impostor.id());
            }
        }

        // A rebuilt body loses the constraints attached to it
        for record in self
            .joints
            .iter()
            .filter(|r| regenerated.contains(&r.main) || regenerated.contains(&r.connected))
        {
            let main = self.impostors.iter().find(|i| i.id() == record.main);
            let connected = self.impostors.iter().find(|i| i.id() == record.connected);
            match (main, connected) {
                (Some(main), Some(connected)) if main.body().is_some() && connected.body().is_some() => {
                    plugin.generate_joint(record, main, connected)?;
                    log::debug!("Regenerated joint {:?} between {} and {}", record.joint.id(), main.id(), connected.id());
                }
                _ => log::debug!("Skipped regenerating joint {:?}, an impostor has no body", record.joint.id()),
            }
        }

        let clamped = clamp_step_delta(delta);
        if clamped != delta {
            log::trace!("Clamped step delta {} -> {}", delta, clamped);
        }
        plugin.execute_step(clamped, &mut self.impostors)
    }

    /// Dispose every impostor, then the plugin.
    ///
    /// Consumes the engine. Joints still holding a reference to the plugin
    /// report `JointNotBound` afterwards.
    pub fn dispose(mut self) -> Vec<Impostor> {
        let mut impostors = std::mem::take(&mut self.impostors);
        {
            let mut plugin = self.plugin.lock();
            for impostor in impostors.iter_mut() {
                plugin.remove_physics_body(impostor);
                impostor.dispose();
            }
            plugin.dispose();
        }
        log::info!("Physics engine disposed ({} impostors)", impostors.len());
        impostors
    }

    // ==================== Impostor forwarding ====================

    /// Rebuild the impostor's body on the next step
    pub fn force_update(&mut self, id: ImpostorId) -> Result<()> {
        self.impostor_mut(id)
            .ok_or(PhysicsError::ImpostorNotFound(id))?
            .force_update();
        Ok(())
    }

    pub fn apply_impulse(&mut self, id: ImpostorId, impulse: [f32; 3], contact_point: [f32; 3]) -> Result<()> {
        let impostor = self.registered(id)?;
        self.plugin.lock().apply_impulse(impostor, impulse, contact_point)
    }

    pub fn apply_force(&mut self, id: ImpostorId, force: [f32; 3], contact_point: [f32; 3]) -> Result<()> {
        let impostor = self.registered(id)?;
        self.plugin.lock().apply_force(impostor, force, contact_point)
    }

    pub fn set_linear_velocity(&mut self, id: ImpostorId, velocity: [f32; 3]) -> Result<()> {
        let impostor = self.registered(id)?;
        self.plugin.lock().set_linear_velocity(impostor, velocity)
    }

    pub fn linear_velocity(&self, id: ImpostorId) -> Result<[f32; 3]> {
        self.plugin.lock().linear_velocity(self.registered(id)?)
    }

    pub fn set_angular_velocity(&mut self, id: ImpostorId, velocity: [f32; 3]) -> Result<()> {
        let impostor = self.registered(id)?;
        self.plugin.lock().set_angular_velocity(impostor, velocity)
    }

    pub fn angular_velocity(&self, id: ImpostorId) -> Result<[f32; 3]> {
        self.plugin.lock().angular_velocity(self.registered(id)?)
    }

    pub fn set_mass(&mut self, id: ImpostorId, mass: f32) -> Result<()> {
        let index = self.index_of(id).ok_or(PhysicsError::ImpostorNotFound(id))?;
        self.plugin.lock().set_body_mass(&self.impostors[index], mass)?;
        self.impostors[index].params_mut().mass = mass;
        Ok(())
    }

    pub fn mass(&self, id: ImpostorId) -> Result<f32> {
        self.plugin.lock().body_mass(self.registered(id)?)
    }

    pub fn set_friction(&mut self, id: ImpostorId, friction: f32) -> Result<()> {
        let index = self.index_of(id).ok_or(PhysicsError::ImpostorNotFound(id))?;
        self.plugin.lock().set_body_friction(&self.impostors[index], friction)?;
        self.impostors[index].params_mut().material.friction = friction;
        Ok(())
    }

    pub fn friction(&self, id: ImpostorId) -> Result<f32> {
        self.plugin.lock().body_friction(self.registered(id)?)
    }

    pub fn set_restitution(&mut self, id: ImpostorId, restitution: f32) -> Result<()> {
        let index = self.index_of(id).ok_or(PhysicsError::ImpostorNotFound(id))?;
        self.plugin.lock().set_body_restitution(&self.impostors[index], restitution)?;
        self.impostors[index].params_mut().material.restitution = restitution;
        Ok(())
    }

    pub fn restitution(&self, id: ImpostorId) -> Result<f32> {
        self.plugin.lock().body_restitution(self.registered(id)?)
    }

    pub fn sleep(&mut self, id: ImpostorId) -> Result<()> {
        let impostor = self.registered(id)?;
        self.plugin.lock().sleep_body(impostor)
    }

    pub fn wake_up(&mut self, id: ImpostorId) -> Result<()> {
        let impostor = self.registered(id)?;
        self.plugin.lock().wake_up_body(impostor)
    }

    pub fn is_sleeping(&self, id: ImpostorId) -> Result<bool> {
        self.plugin.lock().is_sleeping(self.registered(id)?)
    }

    pub fn radius(&self, id: ImpostorId) -> Result<f32> {
        self.plugin.lock().radius(self.registered(id)?)
    }

    pub fn box_size(&self, id: ImpostorId) -> Result<[f32; 3]> {
        self.plugin.lock().box_size(self.registered(id)?)
    }

    /// Write the body pose into the impostor's object
    pub fn sync_object_from_body(&mut self, id: ImpostorId) -> Result<()> {
        let impostor = self.registered(id)?;
        self.plugin.lock().set_transformation_from_physics_body(impostor)
    }

    /// Teleport the impostor's body
    pub fn set_body_transform(&mut self, id: ImpostorId, position: [f32; 3], rotation: [f32; 4]) -> Result<()> {
        let impostor = self.registered(id)?;
        self.plugin
            .lock()
            .set_physics_body_transformation(impostor, position, rotation)
    }
}
