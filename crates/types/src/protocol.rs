//! Wire-level variable and field names.
//!
//! The control channel exchanges named scalars keyed by iteration; field
//! channels exchange per-entity vector data keyed by a fixed field name.
//! Names are kept byte-identical to the historical protocol so the
//! coordinator interoperates with an unmodified structural peer.

/// Conventional application type name of the structural solver.
pub const STRUCTURE_APP_TYPE: &str = "code_aster";

// ── Handshake scalars (session → peer, iteration 0) ──

/// Total number of time steps planned (integer).
pub const VAR_MAX_TIME_STEPS: &str = "NBPDTM";
/// Maximum implicit sub-iterations per time step (integer).
pub const VAR_MAX_SUB_ITERATIONS: &str = "NBSSIT";
/// Convergence threshold on interface displacement (double).
pub const VAR_TOLERANCE: &str = "EPSILO";
/// Simulation time at the start of the run (double).
pub const VAR_INITIAL_TIME: &str = "TTINIT";
/// Reference time step (double).
pub const VAR_REFERENCE_DT: &str = "PDTREF";

// ── Per-step scalars ──

/// Time step proposed by the peer (peer → session, double).
pub const VAR_PEER_DT: &str = "DTAST";
/// Negotiated time step after min-selection (session → peer, double).
pub const VAR_NEGOTIATED_DT: &str = "DTCALC";
/// Agreed convergence flag, 0 or 1 (session → peer, integer).
pub const VAR_CONVERGENCE_FLAG: &str = "ICVAST";

// ── Field channels ──

/// Surface forces at coupled faces (session → peer).
pub const FIELD_FLUID_FORCES: &str = "fluid_forces";
/// Prescribed displacement at coupled vertices (peer → session).
pub const FIELD_MESH_DISPLACEMENT: &str = "mesh_displacement";
/// Prescribed velocity at coupled vertices (peer → session).
pub const FIELD_MESH_VELOCITY: &str = "mesh_velocity";
