//! Scripted structural peer.
//!
//! Plays the structural-solver side of the coupling protocol on its own
//! thread so integration tests can drive a real coordinator end to end:
//! handshake, per-step time-step negotiation, and the sub-iteration
//! exchange loop. When the script runs out of steps the endpoint is
//! dropped, which the coordinator observes as a disconnect.

use crate::MemoryEndpoint;
use fsibridge_transport::{Transport, TransportError};
use fsibridge_types::protocol::{
    FIELD_FLUID_FORCES, FIELD_MESH_DISPLACEMENT, FIELD_MESH_VELOCITY, VAR_CONVERGENCE_FLAG,
    VAR_INITIAL_TIME, VAR_MAX_SUB_ITERATIONS, VAR_MAX_TIME_STEPS, VAR_NEGOTIATED_DT, VAR_PEER_DT,
    VAR_REFERENCE_DT, VAR_TOLERANCE,
};
use fsibridge_types::Vector3;
use std::thread::{self, JoinHandle};
use tracing::trace;

/// Handshake parameters as received from the coordinator.
#[derive(Debug, Clone, Copy)]
pub struct ReceivedHandshake {
    pub max_time_steps: i32,
    pub max_sub_iterations: i32,
    pub tolerance: f64,
    pub initial_time: f64,
    pub dt_reference: f64,
}

/// Scripted structural-solver harness.
pub struct ScriptedPeer;

impl ScriptedPeer {
    /// Spawn a peer that serves `steps` time steps, proposing `dt_proposal`
    /// each step and answering every force exchange through `respond`.
    ///
    /// `respond(step, sub_iteration, forces)` returns the displacement and
    /// velocity buffers to send back; their length fixes the vertex count
    /// seen by the coordinator. The thread returns the handshake it
    /// received, or the transport error that ended the script early.
    pub fn spawn<F>(
        endpoint: MemoryEndpoint,
        n_faces: usize,
        steps: u32,
        dt_proposal: f64,
        mut respond: F,
    ) -> JoinHandle<Result<ReceivedHandshake, TransportError>>
    where
        F: FnMut(u32, u32, &[Vector3]) -> (Vec<Vector3>, Vec<Vector3>) + Send + 'static,
    {
        thread::spawn(move || {
            let handshake = ReceivedHandshake {
                max_time_steps: endpoint.recv_i32(0, VAR_MAX_TIME_STEPS)?,
                max_sub_iterations: endpoint.recv_i32(0, VAR_MAX_SUB_ITERATIONS)?,
                tolerance: endpoint.recv_f64(0, VAR_TOLERANCE)?,
                initial_time: endpoint.recv_f64(0, VAR_INITIAL_TIME)?,
                dt_reference: endpoint.recv_f64(0, VAR_REFERENCE_DT)?,
            };
            let sub_iteration_cap = handshake.max_sub_iterations.max(1) as u32;
            let mut forces = vec![[0.0; 3]; n_faces];

            for step in 1..=steps {
                let iteration = step as i32;
                endpoint.send_f64(iteration, VAR_PEER_DT, dt_proposal)?;
                let dt = endpoint.recv_f64(iteration, VAR_NEGOTIATED_DT)?;
                trace!(step, dt, "scripted peer: step negotiated");

                let mut sub_iteration = 0;
                loop {
                    endpoint.recv_field(FIELD_FLUID_FORCES, &mut forces)?;
                    let (displacement, velocity) = respond(step, sub_iteration, &forces);
                    endpoint.send_field(FIELD_MESH_DISPLACEMENT, &displacement)?;
                    endpoint.send_field(FIELD_MESH_VELOCITY, &velocity)?;

                    let converged = endpoint.recv_i32(iteration, VAR_CONVERGENCE_FLAG)?;
                    sub_iteration += 1;
                    if converged == 1 || sub_iteration >= sub_iteration_cap {
                        break;
                    }
                }
            }

            // Script exhausted: dropping the endpoint disconnects the link.
            Ok(handshake)
        })
    }
}
