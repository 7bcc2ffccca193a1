//! Surface materials for impostors

use serde::{Deserialize, Serialize};

/// Friction and restitution of an impostor's surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsMaterial {
    /// Friction coefficient (0 = frictionless)
    pub friction: f32,
    /// Restitution/bounciness (0 = no bounce, 1 = perfect bounce)
    pub restitution: f32,
    /// How friction is combined with the other surface of a contact
    pub friction_combine: CombineRule,
    /// How restitution is combined with the other surface of a contact
    pub restitution_combine: CombineRule,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            friction: 0.2,
            restitution: 0.2,
            friction_combine: CombineRule::Average,
            restitution_combine: CombineRule::Average,
        }
    }
}

impl PhysicsMaterial {
    pub fn new(friction: f32, restitution: f32) -> Self {
        Self {
            friction,
            restitution,
            ..Default::default()
        }
    }

    /// Near-frictionless surface
    pub fn ice() -> Self {
        Self::new(0.05, 0.0)
    }

    /// Grippy, bouncy surface
    pub fn rubber() -> Self {
        Self {
            restitution_combine: CombineRule::Max,
            ..Self::new(0.8, 0.8)
        }
    }

    pub fn metal() -> Self {
        Self::new(0.3, 0.2)
    }

    pub fn wood() -> Self {
        Self::new(0.5, 0.3)
    }

    /// Set friction, negative values clamp to zero
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction.max(0.0);
        self
    }

    /// Set restitution (clamped to 0..=1)
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution.clamp(0.0, 1.0);
        self
    }
}

/// Rule for combining a property of two touching surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CombineRule {
    #[default]
    Average,
    Min,
    Max,
    Multiply,
}

impl From<CombineRule> for rapier3d::prelude::CoefficientCombineRule {
    fn from(rule: CombineRule) -> Self {
        use rapier3d::prelude::CoefficientCombineRule as Rapier;
        match rule {
            CombineRule::Average => Rapier::Average,
            CombineRule::Min => Rapier::Min,
            CombineRule::Max => Rapier::Max,
            CombineRule::Multiply => Rapier::Multiply,
        }
    }
}
