//! Integration tests for impostor_physics

use approx::assert_relative_eq;
use impostor_physics::joint::JointKey;
use impostor_physics::*;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    SetGravity([f32; 3]),
    SetTimeStep(f32),
    ExecuteStep { delta: f32, impostors: Vec<ImpostorId> },
    GenerateBody(ImpostorId),
    RemoveBody(ImpostorId),
    GenerateJoint(JointKey),
    RemoveJoint(JointKey),
    UpdateDistance { joint: JointId, max: f32, min: Option<f32> },
    SetMotor { joint: JointId, speed: f32, max_force: Option<f32>, index: usize },
    SetLimit { joint: JointId, upper: f32, lower: Option<f32>, index: usize },
    SetMass(ImpostorId, f32),
    Dispose,
}

// Mock backend recording every call the engine makes
struct MockPlugin {
    calls: Arc<Mutex<Vec<Call>>>,
    fail_bodies: Arc<AtomicBool>,
    supported: bool,
    time_step: f32,
    next_body: u32,
}

impl MockPlugin {
    fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_bodies: Arc::new(AtomicBool::new(false)),
            supported: true,
            time_step: 0.0,
            next_body: 0,
        }
    }

    fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

impl PhysicsPlugin for MockPlugin {
    fn name(&self) -> &str {
        "mock"
    }

    fn is_supported(&self) -> bool {
        self.supported
    }

    fn set_gravity(&mut self, gravity: [f32; 3]) {
        self.record(Call::SetGravity(gravity));
    }

    fn set_time_step(&mut self, time_step: f32) {
        self.time_step = time_step;
        self.record(Call::SetTimeStep(time_step));
    }

    fn time_step(&self) -> f32 {
        self.time_step
    }

    fn execute_step(&mut self, delta: f32, impostors: &mut [Impostor]) -> Result<()> {
        let impostors = impostors.iter().map(|i| i.id()).collect();
        self.record(Call::ExecuteStep { delta, impostors });
        Ok(())
    }

    fn dispose(&mut self) {
        self.record(Call::Dispose);
    }

    fn generate_physics_body(&mut self, impostor: &mut Impostor) -> Result<()> {
        self.record(Call::GenerateBody(impostor.id()));
        if self.fail_bodies.load(Ordering::SeqCst) {
            return Err(PhysicsError::NoBody(impostor.id()));
        }
        self.next_body += 1;
        impostor.set_body(Some(BodyHandle::from_raw_parts(self.next_body, 0)));
        Ok(())
    }

    fn remove_physics_body(&mut self, impostor: &mut Impostor) {
        self.record(Call::RemoveBody(impostor.id()));
        impostor.set_body(None);
    }

    fn set_transformation_from_physics_body(&mut self, _impostor: &Impostor) -> Result<()> {
        Ok(())
    }

    fn set_physics_body_transformation(&mut self, impostor: &Impostor, position: [f32; 3], rotation: [f32; 4]) -> Result<()> {
        impostor.object().set_pose(position, rotation);
        Ok(())
    }

    fn set_linear_velocity(&mut self, impostor: &Impostor, _velocity: [f32; 3]) -> Result<()> {
        impostor.require_body().map(|_| ())
    }

    fn linear_velocity(&self, impostor: &Impostor) -> Result<[f32; 3]> {
        impostor.require_body().map(|_| [0.0; 3])
    }

    fn set_angular_velocity(&mut self, _impostor: &Impostor, _velocity: [f32; 3]) -> Result<()> {
        Ok(())
    }

    fn angular_velocity(&self, _impostor: &Impostor) -> Result<[f32; 3]> {
        Ok([0.0; 3])
    }

    fn set_body_mass(&mut self, impostor: &Impostor, mass: f32) -> Result<()> {
        self.record(Call::SetMass(impostor.id(), mass));
        Ok(())
    }

    fn body_mass(&self, impostor: &Impostor) -> Result<f32> {
        Ok(impostor.params().mass)
    }

    fn set_body_friction(&mut self, _impostor: &Impostor, _friction: f32) -> Result<()> {
        Ok(())
    }

    fn body_friction(&self, impostor: &Impostor) -> Result<f32> {
        Ok(impostor.params().material.friction)
    }

    fn set_body_restitution(&mut self, _impostor: &Impostor, _restitution: f32) -> Result<()> {
        Ok(())
    }

    fn body_restitution(&self, impostor: &Impostor) -> Result<f32> {
        Ok(impostor.params().material.restitution)
    }

    fn sleep_body(&mut self, _impostor: &Impostor) -> Result<()> {
        Ok(())
    }

    fn wake_up_body(&mut self, _impostor: &Impostor) -> Result<()> {
        Ok(())
    }

    fn is_sleeping(&self, _impostor: &Impostor) -> Result<bool> {
        Ok(false)
    }

    fn radius(&self, _impostor: &Impostor) -> Result<f32> {
        Ok(0.5)
    }

    fn box_size(&self, _impostor: &Impostor) -> Result<[f32; 3]> {
        Ok([1.0; 3])
    }

    fn apply_impulse(&mut self, _impostor: &Impostor, _impulse: [f32; 3], _contact_point: [f32; 3]) -> Result<()> {
        Ok(())
    }

    fn apply_force(&mut self, _impostor: &Impostor, _force: [f32; 3], _contact_point: [f32; 3]) -> Result<()> {
        Ok(())
    }

    fn generate_joint(&mut self, record: &ImpostorJoint, _main: &Impostor, _connected: &Impostor) -> Result<()> {
        self.record(Call::GenerateJoint(record.key()));
        Ok(())
    }

    fn remove_joint(&mut self, record: &ImpostorJoint) {
        self.record(Call::RemoveJoint(record.key()));
    }

    fn update_distance_joint(&mut self, joint: &PhysicsJoint, max_distance: f32, min_distance: Option<f32>) -> Result<()> {
        self.record(Call::UpdateDistance {
            joint: joint.id(),
            max: max_distance,
            min: min_distance,
        });
        Ok(())
    }

    fn set_motor(&mut self, joint: &PhysicsJoint, speed: f32, max_force: Option<f32>, motor_index: usize) -> Result<()> {
        self.record(Call::SetMotor {
            joint: joint.id(),
            speed,
            max_force,
            index: motor_index,
        });
        Ok(())
    }

    fn set_limit(&mut self, joint: &PhysicsJoint, upper: f32, lower: Option<f32>, motor_index: usize) -> Result<()> {
        self.record(Call::SetLimit {
            joint: joint.id(),
            upper,
            lower,
            index: motor_index,
        });
        Ok(())
    }
}

fn mock_engine() -> (PhysicsEngine, Arc<Mutex<Vec<Call>>>) {
    let plugin = MockPlugin::new();
    let calls = plugin.calls.clone();
    let engine = PhysicsEngine::new(None, plugin).unwrap();
    calls.lock().clear();
    (engine, calls)
}

fn sphere() -> Impostor {
    Impostor::dynamic(PhysicsObject::default(), ImpostorKind::Sphere, 1.0)
}

fn step_calls(calls: &Arc<Mutex<Vec<Call>>>) -> Vec<(f32, Vec<ImpostorId>)> {
    calls
        .lock()
        .iter()
        .filter_map(|c| match c {
            Call::ExecuteStep { delta, impostors } => Some((*delta, impostors.clone())),
            _ => None,
        })
        .collect()
}

// ==================== Construction ====================

#[test]
fn test_construction_applies_defaults() {
    let plugin = MockPlugin::new();
    let calls = plugin.calls.clone();
    let engine = PhysicsEngine::new(None, plugin).unwrap();

    assert_eq!(
        *calls.lock(),
        vec![Call::SetGravity([0.0, -9.807, 0.0]), Call::SetTimeStep(1.0 / 60.0)]
    );
    assert_eq!(engine.gravity(), [0.0, -9.807, 0.0]);
    assert_relative_eq!(engine.time_step(), 1.0 / 60.0);
    assert_eq!(engine.plugin_name(), "mock");
}

#[test]
fn test_construction_with_gravity() {
    let engine = PhysicsEngine::new(Some([0.0, 0.0, -3.0]), MockPlugin::new()).unwrap();
    assert_eq!(engine.gravity(), [0.0, 0.0, -3.0]);
}

#[test]
fn test_unsupported_plugin_fails() {
    let result = PhysicsEngine::new(None, MockPlugin::unsupported());
    match result {
        Err(PhysicsError::UnsupportedPlugin { name }) => assert_eq!(name, "mock"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("unsupported plugin was accepted"),
    }
}

#[test]
fn test_set_gravity_forwards_anything() {
    let (mut engine, calls) = mock_engine();
    engine.set_gravity([1.0e9, -1.0e9, f32::MAX]);
    assert_eq!(*calls.lock(), vec![Call::SetGravity([1.0e9, -1.0e9, f32::MAX])]);
}

// ==================== Impostors ====================

#[test]
fn test_impostor_ids_follow_insertion() {
    let (mut engine, calls) = mock_engine();

    let ids: Vec<_> = (0..5).map(|_| engine.add_impostor(sphere()).unwrap()).collect();

    let raw: Vec<_> = ids.iter().map(|id| id.raw()).collect();
    assert_eq!(raw, vec![1, 2, 3, 4, 5]);
    for (id, impostor) in ids.iter().zip(engine.impostors()) {
        assert_eq!(impostor.id(), *id);
        assert!(impostor.body().is_some());
    }
    assert_eq!(calls.lock().iter().filter(|c| matches!(c, Call::GenerateBody(_))).count(), 5);
}

#[test]
fn test_impostor_ids_never_reused() {
    let (mut engine, _calls) = mock_engine();
    engine.add_impostor(sphere()).unwrap();
    let second = engine.add_impostor(sphere()).unwrap();
    engine.add_impostor(sphere()).unwrap();

    engine.remove_impostor(second).unwrap();
    let fourth = engine.add_impostor(sphere()).unwrap();
    assert_eq!(fourth.raw(), 4);
}

#[test]
fn test_remove_impostor() {
    let (mut engine, calls) = mock_engine();
    let object = PhysicsObject::default();
    let id = engine
        .add_impostor(Impostor::fixed(object.clone()))
        .unwrap();
    let body = engine.impostor(id).unwrap().body().unwrap();

    let removed = engine.remove_impostor(id).unwrap();
    assert_eq!(removed.body(), None);
    assert!(calls.lock().contains(&Call::RemoveBody(id)));

    assert!(engine.impostor(id).is_none());
    assert!(engine.impostor_for_object(&object).is_none());
    assert!(engine.impostor_for_body(body).is_none());
}

#[test]
fn test_remove_unknown_impostor_is_noop() {
    let (mut engine, calls) = mock_engine();
    let id = engine.add_impostor(sphere()).unwrap();
    engine.remove_impostor(id).unwrap();
    calls.lock().clear();

    assert!(engine.remove_impostor(id).is_none());
    assert!(engine.impostors().is_empty());
    assert!(calls.lock().is_empty());
}

#[test]
fn test_lookups_return_first_match() {
    let (mut engine, _calls) = mock_engine();
    let shared = PhysicsObject::default();
    let first = engine.add_impostor(Impostor::fixed(shared.clone())).unwrap();
    let _second = engine.add_impostor(Impostor::fixed(shared.clone())).unwrap();
    let other = engine.add_impostor(sphere()).unwrap();

    assert_eq!(engine.impostor_for_object(&shared).unwrap().id(), first);
    assert!(engine.impostor_for_object(&PhysicsObject::default()).is_none());

    let body = engine.impostor(other).unwrap().body().unwrap();
    assert_eq!(engine.impostor_for_body(body).unwrap().id(), other);
    assert!(engine.impostor_for_body(BodyHandle::from_raw_parts(999, 0)).is_none());
}

#[test]
fn test_body_generation_failure_propagates() {
    let plugin = MockPlugin::new();
    let fail = plugin.fail_bodies.clone();
    let calls = plugin.calls.clone();
    let mut engine = PhysicsEngine::new(None, plugin).unwrap();

    fail.store(true, Ordering::SeqCst);
    let err = engine.add_impostor(sphere()).unwrap_err();
    assert!(matches!(err, PhysicsError::NoBody(_)));
    assert_eq!(engine.impostors().len(), 1);
    assert!(engine.step(0.016).is_err());

    fail.store(false, Ordering::SeqCst);
    calls.lock().clear();
    engine.step(0.016).unwrap();
    assert!(engine.impostors()[0].body().is_some());
    assert!(matches!(calls.lock()[0], Call::GenerateBody(_)));
}

#[test]
fn test_set_mass_updates_params() {
    let (mut engine, calls) = mock_engine();
    let id = engine.add_impostor(sphere()).unwrap();

    engine.set_mass(id, 4.0).unwrap();
    assert!(calls.lock().contains(&Call::SetMass(id, 4.0)));
    assert_eq!(engine.mass(id).unwrap(), 4.0);
    assert!(!engine.impostor(id).unwrap().is_body_init_required());
}

#[test]
fn test_forwarding_needs_registered_impostor() {
    let (mut engine, _calls) = mock_engine();
    let id = engine.add_impostor(sphere()).unwrap();
    engine.remove_impostor(id);

    assert!(matches!(
        engine.apply_impulse(id, [0.0, 1.0, 0.0], [0.0; 3]),
        Err(PhysicsError::ImpostorNotFound(_))
    ));
    assert!(matches!(engine.is_sleeping(id), Err(PhysicsError::ImpostorNotFound(_))));
}

// ==================== Stepping ====================

#[test]
fn test_step_clamps_delta() {
    let (mut engine, calls) = mock_engine();

    for delta in [0.25, -1.0, 0.0, 0.016, f32::NAN] {
        engine.step(delta).unwrap();
    }

    let deltas: Vec<_> = step_calls(&calls).into_iter().map(|(d, _)| d).collect();
    assert_eq!(deltas, vec![0.1, 1.0 / 60.0, 1.0 / 60.0, 0.016, 1.0 / 60.0]);
}

#[test]
fn test_step_scenario_with_default_gravity() {
    let (mut engine, calls) = mock_engine();
    let id = engine.add_impostor(sphere()).unwrap();

    engine.step(0.2).unwrap();

    assert_eq!(step_calls(&calls), vec![(0.1, vec![id])]);
}

#[test]
fn test_step_regenerates_pending_bodies_first() {
    let (mut engine, calls) = mock_engine();
    let a = engine.add_impostor(sphere()).unwrap();
    let b = engine.add_impostor(sphere()).unwrap();
    engine.force_update(b).unwrap();
    calls.lock().clear();

    engine.step(0.016).unwrap();

    assert_eq!(
        *calls.lock(),
        vec![
            Call::GenerateBody(b),
            Call::ExecuteStep {
                delta: 0.016,
                impostors: vec![a, b]
            },
        ]
    );
}

// ==================== Joints ====================

#[test]
fn test_add_and_remove_joint() {
    let (mut engine, calls) = mock_engine();
    let a = engine.add_impostor(sphere()).unwrap();
    let b = engine.add_impostor(sphere()).unwrap();
    let mut joint = PhysicsJoint::hinge(JointData::default());

    engine.add_joint(a, b, &mut joint).unwrap();
    assert!(joint.is_bound());
    assert_eq!(engine.joints().len(), 1);
    let key = engine.joints()[0].key();
    assert!(calls.lock().contains(&Call::GenerateJoint(key)));

    let removed = engine.remove_joint(a, b, &joint).unwrap();
    assert_eq!(removed.key(), key);

    let removals = |calls: &Arc<Mutex<Vec<Call>>>| {
        calls
            .lock()
            .iter()
            .filter(|c| matches!(c, Call::RemoveJoint(_)))
            .count()
    };
    assert_eq!(removals(&calls), 1);

    // Second removal finds nothing and must not reach the plugin
    assert!(engine.remove_joint(a, b, &joint).is_none());
    assert_eq!(removals(&calls), 1);
    assert!(engine.joints().is_empty());
}

#[test]
fn test_remove_joint_requires_exact_triple() {
    let (mut engine, calls) = mock_engine();
    let a = engine.add_impostor(sphere()).unwrap();
    let b = engine.add_impostor(sphere()).unwrap();
    let mut joint = PhysicsJoint::distance(2.0);
    let other = PhysicsJoint::distance(2.0);
    engine.add_joint(a, b, &mut joint).unwrap();

    assert!(engine.remove_joint(b, a, &joint).is_none());
    assert!(engine.remove_joint(a, b, &other).is_none());
    assert!(!calls.lock().iter().any(|c| matches!(c, Call::RemoveJoint(_))));
    assert_eq!(engine.joints().len(), 1);
}

#[test]
fn test_add_joint_keeps_single_record_per_triple() {
    let (mut engine, calls) = mock_engine();
    let a = engine.add_impostor(sphere()).unwrap();
    let b = engine.add_impostor(sphere()).unwrap();
    let mut joint = PhysicsJoint::lock(JointData::default());
    engine.add_joint(a, b, &mut joint).unwrap();
    engine.add_joint(a, b, &mut joint).unwrap();

    assert_eq!(engine.joints().len(), 1);

    engine.remove_joint(a, b, &joint).unwrap();
    assert!(engine.joints().is_empty());
    assert!(engine.remove_joint(a, b, &joint).is_none());
    let removals = calls
        .lock()
        .iter()
        .filter(|c| matches!(c, Call::RemoveJoint(_)))
        .count();
    assert_eq!(removals, 1);
}

#[test]
fn test_step_regenerates_joints_of_rebuilt_bodies() {
    let (mut engine, calls) = mock_engine();
    let a = engine.add_impostor(sphere()).unwrap();
    let b = engine.add_impostor(sphere()).unwrap();
    let c = engine.add_impostor(sphere()).unwrap();
    let mut hinge = PhysicsJoint::hinge(JointData::default());
    let mut rope = PhysicsJoint::distance(2.0);
    engine.add_joint(a, b, &mut hinge).unwrap();
    engine.add_joint(b, c, &mut rope).unwrap();
    let hinge_key = engine.joints()[0].key();
    engine.force_update(a).unwrap();
    calls.lock().clear();

    engine.step(0.016).unwrap();

    assert_eq!(
        *calls.lock(),
        vec![
            Call::GenerateBody(a),
            Call::GenerateJoint(hinge_key),
            Call::ExecuteStep {
                delta: 0.016,
                impostors: vec![a, b, c]
            },
        ]
    );
}

#[test]
fn test_add_joint_with_missing_impostor() {
    let (mut engine, calls) = mock_engine();
    let a = engine.add_impostor(sphere()).unwrap();
    let b = engine.add_impostor(sphere()).unwrap();
    engine.remove_impostor(b);
    let mut joint = PhysicsJoint::ball_and_socket(JointData::default());

    let err = engine.add_joint(a, b, &mut joint).unwrap_err();
    assert!(matches!(err, PhysicsError::ImpostorNotFound(id) if id == b));
    assert_eq!(engine.joints().len(), 1);
    assert!(!calls.lock().iter().any(|c| matches!(c, Call::GenerateJoint(_))));
}

#[test]
fn test_bound_joint_live_updates() {
    let (mut engine, calls) = mock_engine();
    let a = engine.add_impostor(sphere()).unwrap();
    let b = engine.add_impostor(sphere()).unwrap();
    let mut hinge = PhysicsJoint::hinge(JointData::default());
    let mut rope = PhysicsJoint::distance(3.0);
    engine.add_joint(a, b, &mut hinge).unwrap();
    engine.add_joint(a, b, &mut rope).unwrap();
    calls.lock().clear();

    hinge.set_motor(2.0, Some(10.0), 0).unwrap();
    hinge.set_limit(1.5, None, 0).unwrap();
    rope.update_distance(5.0, Some(1.0)).unwrap();

    assert_eq!(
        *calls.lock(),
        vec![
            Call::SetMotor {
                joint: hinge.id(),
                speed: 2.0,
                max_force: Some(10.0),
                index: 0
            },
            Call::SetLimit {
                joint: hinge.id(),
                upper: 1.5,
                lower: None,
                index: 0
            },
            Call::UpdateDistance {
                joint: rope.id(),
                max: 5.0,
                min: Some(1.0)
            },
        ]
    );

    assert!(matches!(
        hinge.set_motor(1.0, None, 2),
        Err(PhysicsError::InvalidMotorIndex { .. })
    ));
}

// ==================== Disposal ====================

#[test]
fn test_dispose_order() {
    let (mut engine, calls) = mock_engine();
    let a = engine.add_impostor(sphere()).unwrap();
    let b = engine.add_impostor(sphere()).unwrap();
    let mut joint = PhysicsJoint::hinge(JointData::default());
    engine.add_joint(a, b, &mut joint).unwrap();
    calls.lock().clear();

    let disposed = engine.dispose();

    assert_eq!(
        *calls.lock(),
        vec![Call::RemoveBody(a), Call::RemoveBody(b), Call::Dispose]
    );
    assert_eq!(disposed.len(), 2);
    assert!(disposed.iter().all(|i| i.is_disposed() && i.body().is_none()));

    assert!(!joint.is_bound());
    assert!(matches!(joint.set_motor(1.0, None, 0), Err(PhysicsError::JointNotBound)));
}

// ==================== Rapier backend ====================

#[test]
fn test_rapier_hinge_motor() {
    let mut engine = PhysicsEngine::with_default_plugin(None).unwrap();
    let base = engine
        .add_impostor(Impostor::fixed(PhysicsObject::default()))
        .unwrap();
    let door = engine
        .add_impostor(Impostor::dynamic(
            PhysicsObject::new(Transform::from_position(1.0, 0.0, 0.0)),
            ImpostorKind::Box,
            1.0,
        ))
        .unwrap();

    let mut hinge = PhysicsJoint::hinge(
        JointData::default()
            .with_pivots([0.5, 0.0, 0.0], [-0.5, 0.0, 0.0])
            .with_collision(false),
    );
    engine.add_joint(base, door, &mut hinge).unwrap();

    hinge.set_motor(1.0, Some(100.0), 0).unwrap();
    hinge.set_limit(0.5, None, 0).unwrap();
    assert!(matches!(
        hinge.update_distance(1.0, None),
        Err(PhysicsError::UnsupportedJointOperation { .. })
    ));

    for _ in 0..10 {
        engine.step(1.0 / 60.0).unwrap();
    }

    engine.remove_joint(base, door, &hinge).unwrap();
    assert!(matches!(
        hinge.set_motor(1.0, None, 0),
        Err(PhysicsError::JointNotFound(_))
    ));
}

#[test]
fn test_rapier_joint_survives_body_rebuild() {
    let mut engine = PhysicsEngine::with_default_plugin(None).unwrap();
    let a = engine
        .add_impostor(Impostor::fixed(PhysicsObject::default()))
        .unwrap();
    let b = engine
        .add_impostor(Impostor::dynamic(
            PhysicsObject::new(Transform::from_position(1.0, 0.0, 0.0)),
            ImpostorKind::Box,
            1.0,
        ))
        .unwrap();
    let mut hinge = PhysicsJoint::hinge(JointData::default().with_pivots([0.5, 0.0, 0.0], [-0.5, 0.0, 0.0]));
    engine.add_joint(a, b, &mut hinge).unwrap();
    hinge.set_motor(1.0, None, 0).unwrap();

    engine.force_update(a).unwrap();
    engine.step(1.0 / 60.0).unwrap();

    assert_eq!(engine.joints().len(), 1);
    hinge.set_motor(2.0, Some(10.0), 0).unwrap();
    hinge.set_limit(0.5, None, 0).unwrap();
}

#[test]
fn test_rapier_remove_impostor_releases_body() {
    let mut engine = PhysicsEngine::with_default_plugin(None).unwrap();
    let id = engine.add_impostor(sphere()).unwrap();
    let body = engine.impostor(id).unwrap().body().unwrap();
    assert_eq!(engine.impostor_for_body(body).unwrap().id(), id);

    engine.remove_impostor(id).unwrap();
    assert!(engine.impostor_for_body(body).is_none());
    engine.step(1.0 / 60.0).unwrap();
}

#[test]
fn test_rapier_impulse_moves_body() {
    let mut engine = PhysicsEngine::with_default_plugin(Some([0.0, 0.0, 0.0])).unwrap();
    let object = PhysicsObject::default();
    let id = engine
        .add_impostor(Impostor::dynamic(object.clone(), ImpostorKind::Sphere, 1.0))
        .unwrap();

    engine.apply_impulse(id, [5.0, 0.0, 0.0], [0.0, 0.0, 0.0]).unwrap();
    engine.step(1.0 / 60.0).unwrap();

    assert!(engine.linear_velocity(id).unwrap()[0] > 0.0);
    assert!(object.transform().position[0] > 0.0);
}

#[test]
fn test_rapier_teleport_and_sync() {
    let mut engine = PhysicsEngine::with_default_plugin(None).unwrap();
    let object = PhysicsObject::default();
    let id = engine
        .add_impostor(Impostor::fixed(object.clone()))
        .unwrap();

    engine
        .set_body_transform(id, [3.0, 4.0, 5.0], [0.0, 0.0, 0.0, 1.0])
        .unwrap();
    engine.sync_object_from_body(id).unwrap();

    let position = object.transform().position;
    assert_relative_eq!(position[0], 3.0);
    assert_relative_eq!(position[1], 4.0);
    assert_relative_eq!(position[2], 5.0);
}

#[test]
fn test_rapier_sleep_and_wake() {
    let mut engine = PhysicsEngine::with_default_plugin(None).unwrap();
    let id = engine.add_impostor(sphere()).unwrap();

    engine.sleep(id).unwrap();
    assert!(engine.is_sleeping(id).unwrap());
    engine.wake_up(id).unwrap();
    assert!(!engine.is_sleeping(id).unwrap());
}
