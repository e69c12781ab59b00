//! Session controller state machine.
//!
//! Owns the [`CouplingSession`] and drives the per-time-step /
//! per-sub-iteration protocol against the structural solver:
//!
//! ```text
//! initialize ──► ACTIVE ──► negotiate dt ──► SUB_ITERATING ──► ACTIVE ──► ...
//!                  │                                              │
//!                  └── disconnect / max steps ──► TERMINATING ──► CLOSED
//! ```
//!
//! Control scalars travel only on the coordinating rank and are broadcast
//! to the local group afterwards; field exchanges are collective over the
//! group. Peer failures are recovered locally: the run is downgraded to
//! "finish the next step, then stop" and nothing propagates to the fluid
//! solver. Only invalid configuration is fatal.

use crate::convergence::displacement_residual;
use crate::error::CouplingError;
use crate::mapper::{scatter_tuples, FieldMapper};
use crate::prediction::{DISPLACEMENT_ALPHA, DISPLACEMENT_BETA, FORCE_ALPHA};
use crate::session::CouplingSession;
use fsibridge_parallel::Communicator;
use fsibridge_transport::{PeerDiscovery, Transport, TransportError};
use fsibridge_types::protocol::{
    FIELD_FLUID_FORCES, FIELD_MESH_DISPLACEMENT, FIELD_MESH_VELOCITY, STRUCTURE_APP_TYPE,
    VAR_CONVERGENCE_FLAG, VAR_INITIAL_TIME, VAR_MAX_SUB_ITERATIONS, VAR_MAX_TIME_STEPS,
    VAR_NEGOTIATED_DT, VAR_PEER_DT, VAR_REFERENCE_DT, VAR_TOLERANCE,
};
use fsibridge_types::{CouplingConfig, PeerApplication, PeerLink, Vector3};
use tracing::{debug, info, trace, warn};

/// Coarse lifecycle phase of the controller, for status queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Between time steps.
    Active,
    /// Inside a time step's exchange loop.
    SubIterating,
    /// A stop has been scheduled; remaining steps run without peer I/O
    /// once the iteration counter is terminal.
    Terminating,
    /// Finalized; buffers released.
    Closed,
}

/// Result of one driven time step.
#[derive(Debug, Clone, Copy)]
pub struct StepOutcome {
    /// Negotiated time step used for this step.
    pub dt: f64,
    /// Number of sub-iterations performed.
    pub sub_iterations: u32,
    /// Whether the step ended on an agreed convergence (always true in
    /// the explicit scheme).
    pub converged: bool,
    /// Whether the session is in the terminal (disconnected) state.
    pub terminal: bool,
}

/// Snapshot of the controller state for external APIs.
#[derive(Debug, Clone)]
pub struct SessionStatus {
    pub phase: SessionPhase,
    pub iteration: i32,
    /// Whether at least one time step has been negotiated.
    pub started: bool,
    pub current_step: u32,
    pub stop_after: Option<u32>,
    pub connected: bool,
    /// Root rank of the connected peer, `None` in dry-run mode.
    pub peer_root_rank: Option<u32>,
}

/// Orchestrates the coupling protocol over a transport and a local
/// parallel group.
///
/// Exactly one controller exists per run. All methods are driven from the
/// partition's single logical thread; collective methods
/// ([`negotiate_time_step`](Self::negotiate_time_step),
/// [`evaluate_convergence`](Self::evaluate_convergence),
/// [`sync_convergence`](Self::sync_convergence),
/// [`register_geometry`](Self::register_geometry)) must be called by every
/// rank of the group in the same order.
pub struct SessionController<T: Transport, C: Communicator> {
    session: CouplingSession,
    comm: C,
    transport: Option<T>,
    mapper: Option<Box<dyn FieldMapper>>,
    phase: SessionPhase,
    /// Index of the step currently or last negotiated (1-based).
    current_step: u32,
    /// Stop once this many steps have completed.
    stop_after: Option<u32>,
}

impl<T: Transport, C: Communicator> SessionController<T, C> {
    /// Discover the structural solver, connect a transport to it, and
    /// send the run parameters (`UNINITIALIZED → ACTIVE`).
    ///
    /// Finding no peer is not fatal: the session proceeds in dry-run mode
    /// where every peer exchange is a no-op and received fields are
    /// zeroed. Finding more than one peer is a fatal configuration error.
    pub fn initialize<D: PeerDiscovery>(
        config: CouplingConfig,
        comm: C,
        discovery: &D,
        connect: impl FnOnce(&PeerApplication) -> T,
    ) -> Result<Self, CouplingError> {
        let peer = match discovery.discover(STRUCTURE_APP_TYPE)? {
            Some(app) => {
                info!(
                    app_name = %app.app_name,
                    root_rank = app.root_rank,
                    "structural solver instance found"
                );
                PeerLink::Connected(app)
            }
            None => {
                warn!("no matching structural solver instance detected; dry run in coupling simulation mode");
                PeerLink::DryRun
            }
        };

        let transport = match &peer {
            PeerLink::Connected(app) => Some(connect(app)),
            PeerLink::DryRun => None,
        };

        let mut controller = Self {
            session: CouplingSession::new(config, peer),
            comm,
            transport,
            mapper: None,
            phase: SessionPhase::Active,
            current_step: 0,
            stop_after: None,
        };
        controller.send_run_parameters();
        Ok(controller)
    }

    /// Send global run parameters to the peer at iteration 0.
    fn send_run_parameters(&mut self) {
        if !self.comm.is_coordinator() {
            return;
        }
        let result = match &self.transport {
            Some(transport) => {
                debug!("sending calculation parameters to structural solver");
                let config = self.session.config();
                transport
                    .send_i32(0, VAR_MAX_TIME_STEPS, config.max_time_steps as i32)
                    .and_then(|_| {
                        transport.send_i32(
                            0,
                            VAR_MAX_SUB_ITERATIONS,
                            config.max_sub_iterations as i32,
                        )
                    })
                    .and_then(|_| transport.send_f64(0, VAR_TOLERANCE, config.tolerance))
                    .and_then(|_| transport.send_f64(0, VAR_INITIAL_TIME, config.initial_time))
                    .and_then(|_| transport.send_f64(0, VAR_REFERENCE_DT, config.dt_reference))
            }
            None => Ok(()),
        };
        if let Err(err) = result {
            self.peer_failure("handshake", &err);
        }
    }

    /// Register the coupled interface (`ACTIVE`, once per run).
    ///
    /// Allocates all history buffers, reduces global entity counts, and
    /// validates the reference length. Collective.
    pub fn register_geometry(
        &mut self,
        mapper: Box<dyn FieldMapper>,
        reference_length: f64,
    ) -> Result<(), CouplingError> {
        if self.session.is_registered() {
            return Err(CouplingError::GeometryAlreadyRegistered);
        }
        if !(reference_length > 0.0) {
            return Err(CouplingError::InvalidReferenceLength(reference_length));
        }

        let n_faces = mapper.n_faces();
        let n_vertices = mapper.n_vertices();
        let n_g_faces = self.comm.allreduce_sum_u64(n_faces as u64);
        let n_g_vertices = self.comm.allreduce_sum_u64(n_vertices as u64);

        self.session
            .allocate(n_faces, n_vertices, n_g_faces, n_g_vertices, reference_length);
        self.mapper = Some(mapper);

        if self.comm.is_coordinator() {
            info!(
                n_g_faces,
                n_g_vertices, reference_length, "coupling geometry registered"
            );
        }
        Ok(())
    }

    /// Negotiate the coupling time step (`ACTIVE → SUB_ITERATING`), once
    /// per time step. Collective.
    ///
    /// Selects the minimum of the reference step, the peer proposal, and
    /// the local candidate, sends the choice back to the peer, and
    /// broadcasts it to all ranks together with the connection outcome. A
    /// failed receive schedules termination one step ahead instead of
    /// aborting; the terminal transition is broadcast so every rank
    /// observes it. Resets the sub-iteration counter.
    pub fn negotiate_time_step(&mut self, local_dt: f64) -> f64 {
        self.current_step += 1;
        self.session.sub_iteration_id = 0;
        self.session.local_convergence = false;
        self.session.global_convergence = false;

        let dt_reference = self.session.config().dt_reference;
        let mut selected = dt_reference;
        let mut status: i32 = 0;
        let mut dt_peer = f64::NAN;

        if self.session.iteration.is_terminal() {
            // Grace step after disconnect: keep the last negotiated step.
            selected = self.session.dt_current;
            status = -1;
        } else {
            self.session.iteration.advance();

            if self.comm.is_coordinator() {
                match &self.transport {
                    Some(transport) => {
                        let iteration = self.session.iteration.index();
                        match transport.recv_f64(iteration, VAR_PEER_DT) {
                            Ok(proposal) => {
                                dt_peer = proposal;
                                if proposal < selected {
                                    selected = proposal;
                                }
                                if local_dt < selected {
                                    selected = local_dt;
                                }
                                if transport
                                    .send_f64(iteration, VAR_NEGOTIATED_DT, selected)
                                    .is_err()
                                {
                                    status = -1;
                                }
                            }
                            Err(_) => {
                                // Keep the last negotiated step on failure.
                                selected = self.session.dt_current;
                                status = -1;
                            }
                        }
                    }
                    None => {
                        // Dry run: no peer proposal to consider.
                        if local_dt < selected {
                            selected = local_dt;
                        }
                    }
                }
            }
        }

        self.comm.broadcast_f64(&mut selected);
        self.comm.broadcast_i32(&mut status);

        if status < 0 && !self.session.iteration.is_terminal() {
            self.peer_failure("time-step negotiation", &TransportError::Disconnected);
        }

        self.session.dt_previous = self.session.dt_current;
        self.session.dt_current = selected;
        self.phase = SessionPhase::SubIterating;

        if self.comm.is_coordinator() && status >= 0 {
            debug!(
                dt_reference,
                dt_local = local_dt,
                dt_peer,
                dt_selected = selected,
                "time step negotiated"
            );
        }
        selected
    }

    /// Predict and send the surface forces for this sub-iteration.
    ///
    /// The prediction (`α = 2` linear extrapolation) is identical in the
    /// explicit and implicit schemes. Skipped entirely once terminal; in
    /// dry-run mode the prediction still runs but nothing is sent.
    pub fn send_forces(&mut self) {
        if self.session.iteration.is_terminal() {
            return;
        }

        self.session.predict_forces();
        trace!(
            c1 = FORCE_ALPHA,
            c2 = 1.0 - FORCE_ALPHA,
            "force prediction coefficients"
        );

        let result = match &self.transport {
            Some(transport) => {
                trace!("sending force values at coupled faces");
                transport.send_field(FIELD_FLUID_FORCES, &self.session.force_predicted)
            }
            None => Ok(()),
        };
        if let Err(err) = result {
            self.peer_failure("force send", &err);
        }
    }

    /// Receive the interface displacement and velocity from the peer.
    ///
    /// Dry-run mode zero-fills both buffers without blocking. Once
    /// terminal, the buffers keep their last fully-written values.
    pub fn receive_displacement(&mut self) {
        if self.session.iteration.is_terminal() {
            return;
        }

        let result = match &self.transport {
            Some(transport) => {
                trace!("receiving displacement and velocity at coupled vertices");
                transport
                    .recv_field(FIELD_MESH_DISPLACEMENT, &mut self.session.displacement_current)
                    .and_then(|_| {
                        transport
                            .recv_field(FIELD_MESH_VELOCITY, &mut self.session.velocity_current)
                    })
            }
            None => {
                self.session.zero_received_fields();
                Ok(())
            }
        };
        if let Err(err) = result {
            self.peer_failure("displacement receive", &err);
        }
    }

    /// Predict the displacement prescribed to the fluid mesh.
    ///
    /// First sub-iteration of a step: Newmark-like 3-term rule. Later
    /// sub-iterations: ½/½ relaxation against the previous prediction.
    pub fn predict_displacement(&mut self) {
        if self.session.iteration.is_terminal() {
            return;
        }

        let sub_iteration = self.session.sub_iteration_id;
        trace!(sub_iteration, "displacement prediction");

        if sub_iteration == 0 {
            self.session.predict_displacement_first();
            debug!(
                c1 = 1.0,
                c2 = (DISPLACEMENT_ALPHA + DISPLACEMENT_BETA) * self.session.dt_current,
                c3 = -DISPLACEMENT_BETA * self.session.dt_previous,
                "displacement prediction coefficients"
            );
        } else {
            self.session.predict_displacement_relaxed();
            debug!(
                c1 = DISPLACEMENT_ALPHA,
                c2 = 1.0 - DISPLACEMENT_ALPHA,
                "displacement prediction coefficients"
            );
        }
    }

    /// Predict the interface displacement and scatter it into a
    /// parent-mesh-indexed array in one call.
    ///
    /// Convenience for drivers stepping the protocol manually; equivalent
    /// to [`predict_displacement`](Self::predict_displacement) followed by
    /// [`scatter_predicted_displacement`](Self::scatter_predicted_displacement).
    pub fn compute_displacement(&mut self, out: &mut [Vector3]) -> Result<(), CouplingError> {
        self.predict_displacement();
        self.scatter_predicted_displacement(out)
    }

    /// Scatter the predicted displacement into a parent-mesh-indexed
    /// array via the field mapper's vertex id list.
    pub fn scatter_predicted_displacement(
        &self,
        out: &mut [Vector3],
    ) -> Result<(), CouplingError> {
        let mapper = self.mapper.as_ref().ok_or(CouplingError::GeometryNotRegistered)?;
        scatter_tuples(
            Some(mapper.vertex_ids()),
            &self.session.displacement_predicted,
            out,
        );
        Ok(())
    }

    /// Scatter the current fluid forces into a parent-face-indexed array
    /// via the field mapper's face id list, for post-processing writers.
    pub fn scatter_forces(&self, out: &mut [Vector3]) -> Result<(), CouplingError> {
        let mapper = self.mapper.as_ref().ok_or(CouplingError::GeometryNotRegistered)?;
        scatter_tuples(Some(mapper.face_ids()), &self.session.force_current, out);
        Ok(())
    }

    /// Evaluate this partition group's convergence decision. Collective
    /// in the implicit scheme.
    ///
    /// The explicit scheme declares convergence unconditionally without
    /// computing a residual. The implicit residual compares the received
    /// displacement against the prediction, reduced over all ranks and
    /// scaled by the reference length. A terminal session is treated as
    /// permanently converged, but still participates in the reduction so
    /// ranks stay in step.
    pub fn evaluate_convergence(&mut self) -> bool {
        if self.session.config().is_explicit() {
            self.session.local_convergence = true;
            return true;
        }

        let delta = displacement_residual(
            &self.session.displacement_current,
            &self.session.displacement_predicted,
            self.session.reference_length,
            &self.comm,
        );
        let tolerance = self.session.config().tolerance;
        let converged = delta <= tolerance;
        debug!(delta, tolerance, converged, "sub-iteration convergence test");

        self.session.local_convergence = converged || self.session.iteration.is_terminal();
        self.session.local_convergence
    }

    /// Agree on the convergence decision across ranks and with the peer.
    /// Collective.
    ///
    /// Broadcasts the coordinating rank's local flag to the group, stores
    /// it as the global decision, and sends it to the peer so both sides
    /// leave the sub-iteration loop together.
    pub fn sync_convergence(&mut self) -> bool {
        let mut flag: i32 = if self.session.local_convergence { 1 } else { 0 };
        self.comm.broadcast_i32(&mut flag);
        let agreed = flag == 1;
        self.session.global_convergence = agreed;

        if self.comm.is_coordinator() && !self.session.iteration.is_terminal() {
            let result = match &self.transport {
                Some(transport) => {
                    transport.send_i32(self.session.iteration.index(), VAR_CONVERGENCE_FLAG, flag)
                }
                None => Ok(()),
            };
            if let Err(err) = result {
                self.peer_failure("convergence exchange", &err);
            }
        }
        agreed
    }

    /// End-of-sub-iteration housekeeping; see
    /// [`CouplingSession::save_values`] for the explicit/implicit
    /// asymmetry.
    pub fn save_values(&mut self) {
        self.session.save_values();
    }

    /// Drive one complete time step (`ACTIVE → SUB_ITERATING → ACTIVE`).
    ///
    /// `compute_forces` fills the face force buffer from the fluid state
    /// before each exchange; `apply_motion` consumes the predicted
    /// interface displacement after each prediction. The loop exits on an
    /// agreed convergence or after `max_sub_iterations` passes; the
    /// explicit scheme performs exactly one pass. After a disconnect the
    /// step completes without any peer exchange.
    pub fn advance_time_step(
        &mut self,
        local_dt: f64,
        mut compute_forces: impl FnMut(&mut [Vector3]),
        mut apply_motion: impl FnMut(&[Vector3]),
    ) -> StepOutcome {
        let dt = self.negotiate_time_step(local_dt);

        if self.session.iteration.is_terminal() {
            self.complete_step();
            return StepOutcome {
                dt,
                sub_iterations: 0,
                converged: true,
                terminal: true,
            };
        }

        let explicit = self.session.config().is_explicit();
        let cap = self.session.config().max_sub_iterations.max(1);

        let converged = loop {
            trace!(
                sub_iteration = self.session.sub_iteration_id,
                "coupling sub-iteration"
            );
            compute_forces(self.session.forces_mut());
            self.send_forces();
            self.receive_displacement();
            self.predict_displacement();
            apply_motion(self.session.predicted_displacement());

            self.evaluate_convergence();
            let agreed = self.sync_convergence();
            self.save_values();

            if explicit || agreed || self.session.sub_iteration_id >= cap {
                break agreed;
            }
        };

        let sub_iterations = self.session.sub_iteration_id;
        self.complete_step();
        StepOutcome {
            dt,
            sub_iterations,
            converged,
            terminal: self.session.iteration.is_terminal(),
        }
    }

    /// Whether the run should stop before another time step: either the
    /// configured step count is exhausted or a disconnect scheduled an
    /// early stop.
    pub fn finished(&self) -> bool {
        let mut limit = self.session.config().max_time_steps;
        if let Some(stop) = self.stop_after {
            limit = limit.min(stop);
        }
        self.current_step >= limit
    }

    /// Release buffers and drop the transport (`→ CLOSED`). Idempotent.
    pub fn finalize(&mut self) {
        if self.phase == SessionPhase::Closed {
            return;
        }
        self.session.release();
        self.mapper = None;
        self.transport = None;
        self.phase = SessionPhase::Closed;
        debug!("coupling session closed");
    }

    // ── Queries ──

    /// The underlying session state.
    pub fn session(&self) -> &CouplingSession {
        &self.session
    }

    /// Mutable access to the fluid force buffer, for drivers stepping the
    /// protocol manually.
    pub fn forces_mut(&mut self) -> &mut [Vector3] {
        self.session.forces_mut()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Whether the session runs without a peer.
    pub fn is_dry_run(&self) -> bool {
        !self.session.peer().is_connected()
    }

    /// Status snapshot for external APIs.
    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            phase: self.phase,
            iteration: self.session.iteration.index(),
            started: self.session.iteration.is_started(),
            current_step: self.current_step,
            stop_after: self.stop_after,
            connected: self.session.peer().is_connected(),
            peer_root_rank: self.session.peer().root_rank(),
        }
    }

    // ── Internal transitions ──

    /// Recover locally from a failed peer exchange: log it, schedule the
    /// stop one step ahead, and mark the iteration counter terminal.
    fn peer_failure(&mut self, context: &str, err: &TransportError) {
        let stop = *self.stop_after.get_or_insert(self.current_step + 1);
        warn!(
            context,
            error = %err,
            stop_after_step = stop,
            "structural solver disconnected (finished) or error; stopping at end of next time step"
        );
        self.session.iteration.mark_terminal();
        self.phase = SessionPhase::Terminating;
    }

    fn complete_step(&mut self) {
        self.phase = if self.stop_after.is_some() || self.session.iteration.is_terminal() {
            SessionPhase::Terminating
        } else {
            SessionPhase::Active
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::InterfaceMap;
    use fsibridge_parallel::SerialCommunicator;
    use fsibridge_transport::StaticRegistry;
    use fsibridge_transport_memory::MemoryEndpoint;

    fn dry_run_controller(
        config: CouplingConfig,
    ) -> SessionController<MemoryEndpoint, SerialCommunicator> {
        SessionController::initialize(
            config,
            SerialCommunicator,
            &StaticRegistry::new(),
            |_| -> MemoryEndpoint { unreachable!("dry run never connects") },
        )
        .unwrap()
    }

    fn interface(n_faces: usize, n_vertices: usize) -> Box<InterfaceMap> {
        Box::new(InterfaceMap::new(
            (0..n_faces).collect(),
            (0..n_vertices).collect(),
        ))
    }

    #[test]
    fn test_invalid_reference_length_is_fatal() {
        let mut controller = dry_run_controller(CouplingConfig::default());
        let result = controller.register_geometry(interface(2, 2), 0.0);
        assert!(matches!(
            result,
            Err(CouplingError::InvalidReferenceLength(l)) if l == 0.0
        ));
        let result = controller.register_geometry(interface(2, 2), -3.0);
        assert!(matches!(
            result,
            Err(CouplingError::InvalidReferenceLength(_))
        ));
    }

    #[test]
    fn test_double_registration_is_fatal() {
        let mut controller = dry_run_controller(CouplingConfig::default());
        controller.register_geometry(interface(2, 2), 1.0).unwrap();
        assert!(matches!(
            controller.register_geometry(interface(2, 2), 1.0),
            Err(CouplingError::GeometryAlreadyRegistered)
        ));
    }

    #[test]
    fn test_ambiguous_peers_is_fatal() {
        let mut registry = StaticRegistry::new();
        for (i, name) in ["struct_0", "struct_1"].iter().enumerate() {
            registry.register(PeerApplication {
                root_rank: i as u32,
                app_type: STRUCTURE_APP_TYPE.into(),
                app_name: (*name).into(),
            });
        }
        let result = SessionController::<MemoryEndpoint, _>::initialize(
            CouplingConfig::default(),
            SerialCommunicator,
            &registry,
            |_| unreachable!(),
        );
        assert!(matches!(result, Err(CouplingError::Discovery(_))));
    }

    #[test]
    fn test_dry_run_negotiation_uses_local_minimum() {
        let config = CouplingConfig {
            dt_reference: 0.1,
            ..Default::default()
        };
        let mut controller = dry_run_controller(config);
        controller.register_geometry(interface(1, 1), 1.0).unwrap();

        assert_eq!(controller.negotiate_time_step(0.05), 0.05);
        assert_eq!(controller.negotiate_time_step(0.5), 0.1);
        assert_eq!(controller.session().iteration().index(), 2);
    }

    #[test]
    fn test_dry_run_receive_zeroes_buffers() {
        let mut controller = dry_run_controller(CouplingConfig::default());
        controller.register_geometry(interface(1, 2), 1.0).unwrap();
        controller.negotiate_time_step(0.01);

        // dirty the receive buffers, then check the dry-run exchange
        controller.session.displacement_current[0] = [9.0; 3];
        controller.session.velocity_current[1] = [9.0; 3];
        controller.receive_displacement();

        assert_eq!(controller.session().displacement(), &[[0.0; 3], [0.0; 3]]);
        assert_eq!(controller.session().velocity(), &[[0.0; 3], [0.0; 3]]);
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let mut controller = dry_run_controller(CouplingConfig::default());
        controller.register_geometry(interface(1, 1), 1.0).unwrap();
        controller.finalize();
        assert_eq!(controller.phase(), SessionPhase::Closed);
        controller.finalize();
        assert_eq!(controller.phase(), SessionPhase::Closed);
        assert!(controller.session().is_finalized());
    }

    #[test]
    fn test_scatter_requires_registration() {
        let controller = dry_run_controller(CouplingConfig::default());
        let mut out = vec![[0.0; 3]; 4];
        assert!(matches!(
            controller.scatter_predicted_displacement(&mut out),
            Err(CouplingError::GeometryNotRegistered)
        ));
        assert!(matches!(
            controller.scatter_forces(&mut out),
            Err(CouplingError::GeometryNotRegistered)
        ));
    }

    #[test]
    fn test_status_tracks_progress() {
        let mut controller = dry_run_controller(CouplingConfig::default());
        controller.register_geometry(interface(1, 1), 1.0).unwrap();

        let status = controller.status();
        assert!(!status.started);
        assert!(!status.connected);
        assert_eq!(status.peer_root_rank, None);

        controller.negotiate_time_step(0.01);
        let status = controller.status();
        assert!(status.started);
        assert_eq!(status.iteration, 1);
        assert_eq!(status.current_step, 1);
    }

    #[test]
    fn test_dry_run_explicit_step() {
        let config = CouplingConfig {
            max_time_steps: 3,
            dt_reference: 0.1,
            ..Default::default()
        };
        let mut controller = dry_run_controller(config);
        controller.register_geometry(interface(1, 1), 1.0).unwrap();

        let mut motions = 0;
        let outcome = controller.advance_time_step(
            0.1,
            |forces| forces[0] = [1.0, 0.0, 0.0],
            |_motion| motions += 1,
        );
        assert!(outcome.converged);
        assert!(!outcome.terminal);
        assert_eq!(outcome.sub_iterations, 1);
        assert_eq!(motions, 1);
        assert!(!controller.finished());

        controller.advance_time_step(0.1, |_| {}, |_| {});
        controller.advance_time_step(0.1, |_| {}, |_| {});
        assert!(controller.finished());
    }
}
