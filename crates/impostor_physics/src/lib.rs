//! Impostor Physics - physics orchestration over swappable solvers
//!
//! This crate keeps the bookkeeping of a physics simulation (which objects
//! are simulated, how they are jointed, when bodies have to be rebuilt) and
//! hands the dynamics to a solver plugin. Rapier 3D is the default plugin.
//!
//! # Features
//!
//! - Impostor registry with stable, never-reused ids
//! - Joints (distance, hinge, ball-and-socket, slider, lock, spring) with
//!   live motor/limit updates
//! - Frame-delta clamping for stable stepping after hitches
//! - Pluggable backends through [`PhysicsPlugin`]
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 PhysicsEngine                    │
//! │  ┌───────────────┐  ┌──────────────────────────┐ │
//! │  │ Vec<Impostor> │  │ Vec<ImpostorJoint>       │ │
//! │  └───────────────┘  └──────────────────────────┘ │
//! └─────────────────────────────────────────────────┘
//!                        │ Arc<Mutex<dyn PhysicsPlugin>>
//!         ┌──────────────┼──────────────┐
//!         ▼              ▼              ▼
//!    ┌──────────┐  ┌───────────┐  ┌───────────┐
//!    │  Rapier  │  │  custom   │  │ joints    │
//!    │  plugin  │  │  backend  │  │ (weak ref)│
//!    └──────────┘  └───────────┘  └───────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use impostor_physics::prelude::*;
//!
//! let mut engine = PhysicsEngine::with_default_plugin(None)?;
//!
//! let ball = PhysicsObject::new(Transform::from_position(0.0, 10.0, 0.0));
//! let id = engine.add_impostor(Impostor::dynamic(ball.clone(), ImpostorKind::Sphere, 1.0))?;
//!
//! // Once per frame
//! engine.step(frame_delta)?;
//! let y = ball.transform().position[1];
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod impostor;
pub mod joint;
pub mod material;
pub mod object;
pub mod plugin;
pub mod rapier;

pub mod prelude {
    //! Common imports for physics functionality
    pub use crate::config::{PhysicsConfig, RapierConfig};
    pub use crate::engine::PhysicsEngine;
    pub use crate::error::{PhysicsError, Result};
    pub use crate::impostor::{BodyHandle, Impostor, ImpostorId, ImpostorKind, ImpostorParams};
    pub use crate::joint::{ImpostorJoint, JointData, JointId, JointKind, PhysicsJoint};
    pub use crate::material::{CombineRule, PhysicsMaterial};
    pub use crate::object::{PhysicsObject, Transform};
    pub use crate::plugin::{default_plugin, PhysicsPlugin};
    pub use crate::rapier::RapierPlugin;
}

pub use prelude::*;
