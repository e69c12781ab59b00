//! Coupling session state.
//!
//! One session exists per run, owned by the simulation driver and mutated
//! only through the [`SessionController`](crate::SessionController). It
//! holds the history buffers exchanged with the structural solver, the
//! iteration counters, and the negotiated time steps.

use crate::prediction;
use fsibridge_types::{copy_values, zero_values, CouplingConfig, Iteration, PeerLink, Vector3};

/// State of one fluid-structure coupling run.
///
/// History buffers are flat arrays of 3-vectors sized to the local face or
/// vertex count, allocated exactly once at geometry registration and never
/// resized. After finalization they are released; repeated finalization is
/// a no-op.
#[derive(Debug)]
pub struct CouplingSession {
    config: CouplingConfig,
    peer: PeerLink,

    /// Local counts of coupled boundary entities owned by this partition.
    pub(crate) n_faces: usize,
    pub(crate) n_vertices: usize,
    /// Globally-reduced counts, set once at geometry registration.
    pub(crate) n_g_faces: u64,
    pub(crate) n_g_vertices: u64,

    /// Characteristic macroscopic domain length; strictly positive once
    /// geometry is registered.
    pub(crate) reference_length: f64,

    pub(crate) iteration: Iteration,
    pub(crate) sub_iteration_id: u32,

    pub(crate) dt_current: f64,
    pub(crate) dt_previous: f64,

    pub(crate) local_convergence: bool,
    pub(crate) global_convergence: bool,

    // Vertex-sized buffers.
    pub(crate) displacement_current: Vec<Vector3>,
    pub(crate) displacement_predicted: Vec<Vector3>,
    pub(crate) velocity_current: Vec<Vector3>,
    pub(crate) velocity_previous: Vec<Vector3>,

    // Face-sized buffers.
    pub(crate) force_current: Vec<Vector3>,
    pub(crate) force_previous: Vec<Vector3>,
    pub(crate) force_predicted: Vec<Vector3>,

    registered: bool,
    finalized: bool,
}

impl CouplingSession {
    pub(crate) fn new(config: CouplingConfig, peer: PeerLink) -> Self {
        let dt_reference = config.dt_reference;
        Self {
            config,
            peer,
            n_faces: 0,
            n_vertices: 0,
            n_g_faces: 0,
            n_g_vertices: 0,
            reference_length: 0.0,
            iteration: Iteration::start(),
            sub_iteration_id: 0,
            dt_current: dt_reference,
            dt_previous: dt_reference,
            local_convergence: false,
            global_convergence: false,
            displacement_current: Vec::new(),
            displacement_predicted: Vec::new(),
            velocity_current: Vec::new(),
            velocity_previous: Vec::new(),
            force_current: Vec::new(),
            force_previous: Vec::new(),
            force_predicted: Vec::new(),
            registered: false,
            finalized: false,
        }
    }

    /// Allocate and zero all history buffers. Called once at registration.
    pub(crate) fn allocate(
        &mut self,
        n_faces: usize,
        n_vertices: usize,
        n_g_faces: u64,
        n_g_vertices: u64,
        reference_length: f64,
    ) {
        debug_assert!(!self.registered);
        self.n_faces = n_faces;
        self.n_vertices = n_vertices;
        self.n_g_faces = n_g_faces;
        self.n_g_vertices = n_g_vertices;
        self.reference_length = reference_length;

        self.displacement_current = vec![[0.0; 3]; n_vertices];
        self.displacement_predicted = vec![[0.0; 3]; n_vertices];
        self.velocity_current = vec![[0.0; 3]; n_vertices];
        self.velocity_previous = vec![[0.0; 3]; n_vertices];

        self.force_current = vec![[0.0; 3]; n_faces];
        self.force_previous = vec![[0.0; 3]; n_faces];
        self.force_predicted = vec![[0.0; 3]; n_faces];

        self.registered = true;
    }

    /// Release all history buffers. Idempotent.
    pub(crate) fn release(&mut self) {
        if self.finalized {
            return;
        }
        self.displacement_current = Vec::new();
        self.displacement_predicted = Vec::new();
        self.velocity_current = Vec::new();
        self.velocity_previous = Vec::new();
        self.force_current = Vec::new();
        self.force_previous = Vec::new();
        self.force_predicted = Vec::new();
        self.finalized = true;
    }

    // ── Buffer math (in place, no allocation) ──

    pub(crate) fn predict_forces(&mut self) {
        prediction::predict_forces(
            &mut self.force_predicted,
            &self.force_current,
            &self.force_previous,
        );
    }

    pub(crate) fn predict_displacement_first(&mut self) {
        prediction::predict_displacement_first(
            &mut self.displacement_predicted,
            &self.displacement_current,
            &self.velocity_current,
            &self.velocity_previous,
            self.dt_current,
            self.dt_previous,
        );
    }

    pub(crate) fn predict_displacement_relaxed(&mut self) {
        prediction::predict_displacement_relaxed(
            &mut self.displacement_predicted,
            &self.displacement_current,
        );
    }

    pub(crate) fn zero_received_fields(&mut self) {
        zero_values(&mut self.displacement_current);
        zero_values(&mut self.velocity_current);
    }

    /// End-of-sub-iteration housekeeping.
    ///
    /// The explicit scheme records previous forces and velocity every
    /// step; the implicit scheme leaves them untouched between steps.
    pub(crate) fn save_values(&mut self) {
        if self.config.is_explicit() {
            copy_values(&self.force_current, &mut self.force_previous);
            copy_values(&self.velocity_current, &mut self.velocity_previous);
        }
        self.sub_iteration_id += 1;
    }

    // ── Public queries ──

    /// Run-control parameters this session was created with.
    pub fn config(&self) -> &CouplingConfig {
        &self.config
    }

    /// Link to the structural solver (connected or dry-run).
    pub fn peer(&self) -> &PeerLink {
        &self.peer
    }

    /// Current coupling iteration.
    pub fn iteration(&self) -> Iteration {
        self.iteration
    }

    /// Sub-iteration index within the current time step.
    pub fn sub_iteration_id(&self) -> u32 {
        self.sub_iteration_id
    }

    /// Negotiated time step of the current step.
    pub fn dt(&self) -> f64 {
        self.dt_current
    }

    /// Characteristic domain length used to scale the residual.
    pub fn reference_length(&self) -> f64 {
        self.reference_length
    }

    /// Local coupled face count.
    pub fn n_faces(&self) -> usize {
        self.n_faces
    }

    /// Local coupled vertex count.
    pub fn n_vertices(&self) -> usize {
        self.n_vertices
    }

    /// Global coupled face count.
    pub fn n_g_faces(&self) -> u64 {
        self.n_g_faces
    }

    /// Global coupled vertex count.
    pub fn n_g_vertices(&self) -> u64 {
        self.n_g_vertices
    }

    /// This partition's convergence decision for the current sub-iteration.
    pub fn local_convergence(&self) -> bool {
        self.local_convergence
    }

    /// The convergence decision agreed across ranks and with the peer.
    pub fn global_convergence(&self) -> bool {
        self.global_convergence
    }

    /// Whether geometry has been registered and buffers are live.
    pub fn is_registered(&self) -> bool {
        self.registered && !self.finalized
    }

    /// Whether the session has been finalized.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    // ── Buffer access ──

    /// Fluid forces at coupled faces, written by the fluid solver before
    /// each exchange.
    pub fn forces_mut(&mut self) -> &mut [Vector3] {
        &mut self.force_current
    }

    /// Last displacement received from the peer.
    pub fn displacement(&self) -> &[Vector3] {
        &self.displacement_current
    }

    /// Last velocity received from the peer.
    pub fn velocity(&self) -> &[Vector3] {
        &self.velocity_current
    }

    /// Predicted displacement, the motion prescribed to the fluid mesh.
    pub fn predicted_displacement(&self) -> &[Vector3] {
        &self.displacement_predicted
    }

    /// Extrapolated forces as last sent to the peer.
    pub fn predicted_forces(&self) -> &[Vector3] {
        &self.force_predicted
    }
}
