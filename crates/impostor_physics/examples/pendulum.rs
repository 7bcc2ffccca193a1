//! Pendulum demonstration
//!
//! This example shows:
//! - Static and dynamic impostors
//! - A hinge joint with a live motor and limit
//! - Frame deltas being clamped after a hitch

use impostor_physics::prelude::*;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    println!("Impostor Physics Pendulum Demo");
    println!("==============================\n");

    let mut engine = PhysicsEngine::with_default_plugin(None)?;

    let pivot = PhysicsObject::new(Transform::from_position(0.0, 5.0, 0.0).with_extents(0.2, 0.2, 0.2));
    let bob = PhysicsObject::new(Transform::from_position(2.0, 5.0, 0.0).with_extents(0.5, 0.5, 0.5));

    let anchor = engine.add_impostor(Impostor::fixed(pivot))?;
    let weight = engine.add_impostor(Impostor::dynamic(bob.clone(), ImpostorKind::Sphere, 2.0))?;

    let mut hinge = PhysicsJoint::hinge(
        JointData::default()
            .with_pivots([0.0, 0.0, 0.0], [-2.0, 0.0, 0.0])
            .with_axes([0.0, 0.0, 1.0], [0.0, 0.0, 1.0])
            .with_collision(false),
    );
    engine.add_joint(anchor, weight, &mut hinge)?;
    hinge.set_limit(1.2, None, 0)?;

    for frame in 0..180 {
        if frame == 90 {
            println!("Engaging motor");
            hinge.set_motor(-2.0, Some(50.0), 0)?;
        }

        // Simulate a hitch every second
        let delta = if frame % 60 == 59 { 0.5 } else { 1.0 / 60.0 };
        engine.step(delta)?;

        if frame % 30 == 0 {
            let position = bob.transform().position;
            println!(
                "frame {:3}: bob at ({:6.2}, {:6.2}, {:6.2})",
                frame, position[0], position[1], position[2]
            );
        }
    }

    let impostors = engine.dispose();
    println!("\nDisposed {} impostors", impostors.len());
    Ok(())
}
