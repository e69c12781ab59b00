//! Implicit sub-iteration loop against a scripted structural peer.

use fsibridge_coupling::{InterfaceMap, SessionController};
use fsibridge_parallel::SerialCommunicator;
use fsibridge_transport::StaticRegistry;
use fsibridge_transport_memory::{memory_pair, ScriptedPeer};
use fsibridge_types::{CouplingConfig, PeerApplication};

fn structure_registry() -> StaticRegistry {
    let mut registry = StaticRegistry::new();
    registry.register(PeerApplication {
        root_rank: 1,
        app_type: "code_aster".into(),
        app_name: "struct_0".into(),
    });
    registry
}

// The peer holds the interface at rest with a constant velocity, so the
// prediction sequence at a single vertex is
//   p0 = 0 + 0.5 * 0.1 * 2.0 = 0.1
//   p1 = 0.5 * 0 + 0.5 * p0  = 0.05
//   p2 = 0.5 * 0 + 0.5 * p1  = 0.025
// and the residual |0 - p| crosses a 0.03 tolerance on the third pass.
#[test]
fn test_implicit_step_converges_in_three_sub_iterations() {
    let config = CouplingConfig {
        max_time_steps: 1,
        max_sub_iterations: 5,
        tolerance: 0.03,
        initial_time: 0.0,
        dt_reference: 0.1,
    };

    let (coordinator_end, peer_end) = memory_pair();
    let peer = ScriptedPeer::spawn(peer_end, 1, 1, 0.1, |_, _, _| {
        (vec![[0.0; 3]], vec![[2.0, 0.0, 0.0]])
    });

    let registry = structure_registry();
    let mut controller =
        SessionController::initialize(config, SerialCommunicator, &registry, |_| coordinator_end)
            .unwrap();
    controller
        .register_geometry(Box::new(InterfaceMap::new(vec![0], vec![0])), 1.0)
        .unwrap();

    let outcome = controller.advance_time_step(0.1, |_| {}, |_| {});
    assert_eq!(outcome.dt, 0.1);
    assert_eq!(outcome.sub_iterations, 3);
    assert!(outcome.converged);
    assert!(controller.session().global_convergence());
    assert!((controller.session().predicted_displacement()[0][0] - 0.025).abs() < 1e-14);

    assert!(controller.finished());
    controller.finalize();
    peer.join().unwrap().unwrap();
}

#[test]
fn test_implicit_step_stops_at_sub_iteration_cap() {
    let config = CouplingConfig {
        max_time_steps: 1,
        max_sub_iterations: 4,
        tolerance: 1e-9,
        initial_time: 0.0,
        dt_reference: 0.1,
    };

    let (coordinator_end, peer_end) = memory_pair();
    let peer = ScriptedPeer::spawn(peer_end, 1, 1, 0.1, |_, _, _| {
        (vec![[0.0; 3]], vec![[2.0, 0.0, 0.0]])
    });

    let registry = structure_registry();
    let mut controller =
        SessionController::initialize(config, SerialCommunicator, &registry, |_| coordinator_end)
            .unwrap();
    controller
        .register_geometry(Box::new(InterfaceMap::new(vec![0], vec![0])), 1.0)
        .unwrap();

    // The residual halves each pass but never reaches 1e-9; the loop must
    // give up after exactly max_sub_iterations passes.
    let outcome = controller.advance_time_step(0.1, |_| {}, |_| {});
    assert_eq!(outcome.sub_iterations, 4);
    assert!(!outcome.converged);
    assert!(!controller.session().global_convergence());

    // Forces and velocity history are only saved by the explicit scheme,
    // so the implicit step leaves the previous-velocity buffer untouched.
    assert_eq!(controller.session().velocity()[0], [2.0, 0.0, 0.0]);

    controller.finalize();
    peer.join().unwrap().unwrap();
}
