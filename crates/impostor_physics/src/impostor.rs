//! Impostors: the engine-side stand-in for one simulated object

use crate::error::{PhysicsError, Result};
use crate::material::PhysicsMaterial;
use crate::object::PhysicsObject;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned to an impostor when the engine registers it.
///
/// Identifiers start at 1 and are never reused; `UNASSIGNED` marks an
/// impostor that was never registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ImpostorId(pub(crate) u64);

impl ImpostorId {
    pub const UNASSIGNED: Self = Self(0);

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ImpostorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque handle to a backend body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

impl BodyHandle {
    /// Create from a backend's raw index/generation pair
    pub fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Get the raw index/generation pair
    pub fn into_raw_parts(self) -> (u32, u32) {
        (self.index, self.generation)
    }
}

/// Shape family the backend derives the collider from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImpostorKind {
    /// Sphere fitting the largest extent
    Sphere,
    /// Box matching the extents
    #[default]
    Box,
    /// Y-aligned capsule
    Capsule,
    /// Y-aligned cylinder
    Cylinder,
}

/// Physical parameters of an impostor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpostorParams {
    /// Mass in kg (0 = static)
    pub mass: f32,
    /// Surface properties
    pub material: PhysicsMaterial,
}

impl Default for ImpostorParams {
    fn default() -> Self {
        Self {
            mass: 0.0,
            material: PhysicsMaterial::default(),
        }
    }
}

impl ImpostorParams {
    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass.max(0.0);
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.material = self.material.with_friction(friction);
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.material = self.material.with_restitution(restitution);
        self
    }

    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = material;
        self
    }
}

/// A simulated object together with its backend body
#[derive(Debug, Clone)]
pub struct Impostor {
    id: ImpostorId,
    object: PhysicsObject,
    kind: ImpostorKind,
    params: ImpostorParams,
    body: Option<BodyHandle>,
    body_update_required: bool,
    disposed: bool,
}

impl Impostor {
    pub fn new(object: PhysicsObject, kind: ImpostorKind, params: ImpostorParams) -> Self {
        Self {
            id: ImpostorId::UNASSIGNED,
            object,
            kind,
            params,
            body: None,
            body_update_required: false,
            disposed: false,
        }
    }

    /// Create a static box impostor
    pub fn fixed(object: PhysicsObject) -> Self {
        Self::new(object, ImpostorKind::Box, ImpostorParams::default())
    }

    /// Create a dynamic impostor with the given mass
    pub fn dynamic(object: PhysicsObject, kind: ImpostorKind, mass: f32) -> Self {
        Self::new(object, kind, ImpostorParams::default().with_mass(mass))
    }

    pub fn id(&self) -> ImpostorId {
        self.id
    }

    pub fn is_registered(&self) -> bool {
        self.id != ImpostorId::UNASSIGNED
    }

    pub(crate) fn assign_id(&mut self, id: ImpostorId) {
        self.id = id;
    }

    pub fn object(&self) -> &PhysicsObject {
        &self.object
    }

    pub fn kind(&self) -> ImpostorKind {
        self.kind
    }

    pub fn params(&self) -> &ImpostorParams {
        &self.params
    }

    /// Replace the parameters; the body is rebuilt on the next step
    pub fn set_params(&mut self, params: ImpostorParams) {
        self.params = params;
        self.body_update_required = true;
    }

    /// Parameter access that does not invalidate the body.
    ///
    /// Used when the backend already applied the change to the live body.
    pub fn params_mut(&mut self) -> &mut ImpostorParams {
        &mut self.params
    }

    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    /// Body handle, or `NoBody` when none was generated
    pub fn require_body(&self) -> Result<BodyHandle> {
        self.body.ok_or(PhysicsError::NoBody(self.id))
    }

    /// Record the backend body. Setting a body satisfies any pending update.
    pub fn set_body(&mut self, body: Option<BodyHandle>) {
        if body.is_some() {
            self.body_update_required = false;
        }
        self.body = body;
    }

    /// Whether the backend has to (re)generate the body before stepping
    pub fn is_body_init_required(&self) -> bool {
        self.body_update_required || self.body.is_none()
    }

    /// Request body regeneration on the next step
    pub fn force_update(&mut self) {
        self.body_update_required = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub(crate) fn dispose(&mut self) {
        self.body = None;
        self.body_update_required = false;
        self.disposed = true;
    }
}
