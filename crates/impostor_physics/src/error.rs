//! Error types for the physics system

use crate::impostor::{BodyHandle, ImpostorId};
use crate::joint::{JointId, JointKind};
use thiserror::Error;

/// Physics system errors
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// The selected backend cannot run in this environment
    #[error("Physics plugin '{name}' is not supported in this environment")]
    UnsupportedPlugin { name: String },

    /// Impostor is not registered with the engine
    #[error("Impostor not found: {0:?}")]
    ImpostorNotFound(ImpostorId),

    /// Impostor has no generated body
    #[error("Impostor {0:?} has no physics body")]
    NoBody(ImpostorId),

    /// Backend no longer knows this body
    #[error("Physics body not found: {0:?}")]
    BodyNotFound(BodyHandle),

    /// Joint is not bound to a live plugin
    #[error("Joint is not bound to a physics plugin")]
    JointNotBound,

    /// Backend never generated this joint
    #[error("Joint not found: {0:?}")]
    JointNotFound(JointId),

    /// Operation not available for this kind of joint
    #[error("{operation} is not supported by {kind:?} joints")]
    UnsupportedJointOperation {
        kind: JointKind,
        operation: &'static str,
    },

    /// Motor index out of range for this kind of joint
    #[error("Motor index {index} is out of range for {kind:?} joints")]
    InvalidMotorIndex { kind: JointKind, index: usize },

    /// Invalid configuration
    #[error("Invalid physics configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
