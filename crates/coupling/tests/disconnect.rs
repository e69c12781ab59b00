//! Peer disconnect handling: the run winds down instead of failing.

use fsibridge_coupling::{InterfaceMap, SessionController, SessionPhase};
use fsibridge_parallel::SerialCommunicator;
use fsibridge_transport::StaticRegistry;
use fsibridge_transport_memory::{memory_pair, ScriptedPeer};
use fsibridge_types::{CouplingConfig, PeerApplication};
use tracing_test::traced_test;

fn structure_registry() -> StaticRegistry {
    let mut registry = StaticRegistry::new();
    registry.register(PeerApplication {
        root_rank: 1,
        app_type: "code_aster".into(),
        app_name: "struct_0".into(),
    });
    registry
}

#[test]
#[traced_test]
fn test_peer_disconnect_schedules_early_stop() {
    let config = CouplingConfig {
        max_time_steps: 10,
        max_sub_iterations: 1,
        dt_reference: 0.1,
        ..Default::default()
    };

    let (coordinator_end, peer_end) = memory_pair();
    let stats = coordinator_end.stats();

    // The peer only serves two of the ten configured steps, then exits.
    let peer = ScriptedPeer::spawn(peer_end, 1, 2, 0.1, |_, _, _| {
        (vec![[0.0; 3]], vec![[0.0; 3]])
    });

    let registry = structure_registry();
    let mut controller =
        SessionController::initialize(config, SerialCommunicator, &registry, |_| coordinator_end)
            .unwrap();
    controller
        .register_geometry(Box::new(InterfaceMap::new(vec![0], vec![0])), 1.0)
        .unwrap();

    for _ in 0..2 {
        let outcome = controller.advance_time_step(0.1, |_| {}, |_| {});
        assert!(!outcome.terminal);
    }
    peer.join().unwrap().unwrap();

    // Step 3 hits the dropped endpoint during negotiation. The step
    // completes locally and one more grace step is allowed so the fluid
    // side can write its final state.
    let outcome = controller.advance_time_step(0.1, |_| {}, |_| {});
    assert!(outcome.terminal);
    assert_eq!(outcome.sub_iterations, 0);
    assert!(logs_contain(
        "structural solver disconnected (finished) or error"
    ));

    let status = controller.status();
    assert_eq!(status.phase, SessionPhase::Terminating);
    assert!(status.iteration < 0);
    assert_eq!(status.stop_after, Some(4));
    assert!(!controller.finished());

    // The grace step keeps the last negotiated dt and exchanges nothing.
    let before = stats.snapshot();
    let outcome = controller.advance_time_step(0.1, |_| {}, |_| {});
    assert!(outcome.terminal);
    assert_eq!(outcome.dt, 0.1);
    assert!(controller.finished());
    assert_eq!(stats.snapshot(), before);

    controller.finalize();
    assert_eq!(controller.phase(), SessionPhase::Closed);
}

#[test]
#[traced_test]
fn test_disconnect_during_field_exchange() {
    let config = CouplingConfig {
        max_time_steps: 5,
        max_sub_iterations: 1,
        dt_reference: 0.1,
        ..Default::default()
    };

    let (coordinator_end, peer_end) = memory_pair();

    // Negotiate step 1 and swallow the force field, then drop the link
    // without answering. The disconnect is then always observed on the
    // displacement receive.
    let peer = std::thread::spawn(move || {
        use fsibridge_transport::Transport;
        use fsibridge_types::protocol::{
            FIELD_FLUID_FORCES, VAR_NEGOTIATED_DT, VAR_PEER_DT,
        };
        for _ in 0..5 {
            let _ = peer_end.recv_i32(0, "ignored");
        }
        peer_end.send_f64(1, VAR_PEER_DT, 0.1).unwrap();
        peer_end.recv_f64(1, VAR_NEGOTIATED_DT).unwrap();
        let mut forces = vec![[0.0; 3]];
        peer_end.recv_field(FIELD_FLUID_FORCES, &mut forces).unwrap();
    });

    let registry = structure_registry();
    let mut controller =
        SessionController::initialize(config, SerialCommunicator, &registry, |_| coordinator_end)
            .unwrap();
    controller
        .register_geometry(Box::new(InterfaceMap::new(vec![0], vec![0])), 1.0)
        .unwrap();

    // The force send may still land in the channel buffer; the receive
    // then observes the disconnect mid-step. The step must complete
    // without touching the displacement buffers.
    let outcome = controller.advance_time_step(0.1, |_| {}, |_| {});
    assert!(outcome.terminal);
    assert!(logs_contain("displacement receive"));
    assert_eq!(controller.session().displacement()[0], [0.0; 3]);
    assert_eq!(controller.status().stop_after, Some(2));
    peer.join().unwrap();
}
