//! Run-control configuration.

use serde::{Deserialize, Serialize};

/// Run-control parameters for a coupling session.
///
/// Supplied by the surrounding simulation driver; the coordinator does not
/// parse any input files itself. The scalar parameters are forwarded to the
/// structural solver during the initial handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouplingConfig {
    /// Total number of time steps planned for the run.
    pub max_time_steps: u32,

    /// Upper bound on implicit sub-iterations per time step.
    ///
    /// A value `<= 1` selects the explicit scheme: a single exchange per
    /// time step, with convergence declared unconditionally.
    pub max_sub_iterations: u32,

    /// Relative-residual threshold for interface displacement convergence.
    pub tolerance: f64,

    /// Simulation time at the start of the run.
    pub initial_time: f64,

    /// Reference (nominal) time step; the per-step negotiation never
    /// selects a larger value.
    pub dt_reference: f64,
}

impl CouplingConfig {
    /// Whether the explicit (single-pass) coupling scheme is selected.
    pub fn is_explicit(&self) -> bool {
        self.max_sub_iterations <= 1
    }
}

impl Default for CouplingConfig {
    fn default() -> Self {
        Self {
            max_time_steps: 100,
            max_sub_iterations: 1,
            tolerance: 1e-5,
            initial_time: 0.0,
            dt_reference: 0.01,
        }
    }
}
