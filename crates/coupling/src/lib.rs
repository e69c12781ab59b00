//! Partitioned fluid-structure coupling coordinator.
//!
//! Synchronizes a fluid solver with an independently-stepped structural
//! solver process across a time-stepping, possibly-parallel run:
//!
//! - [`CouplingSession`]: history buffers, counters, and configuration
//! - [`SessionController`]: the per-step / per-sub-iteration state machine
//! - [`prediction`]: force and displacement extrapolation kernels
//! - [`convergence`]: the parallel-reduced relative residual
//! - [`FieldMapper`]: the seam to the surface-mesh interface mapping
//!
//! # Driving the coordinator
//!
//! ```text
//! SessionController::initialize        (peer handshake, or dry run)
//!   └─ register_geometry               (allocate buffers, validate lref)
//!   └─ per time step: advance_time_step
//!        negotiate dt → [ send forces → receive displacement →
//!        predict → converge? ]* → save values
//!   └─ finalize                        (idempotent teardown)
//! ```
//!
//! Peer failures never propagate past the controller: a disconnect
//! downgrades the run to "finish the next step, then stop". Only invalid
//! configuration (non-positive reference length, double registration,
//! ambiguous peer topology) is fatal.

pub mod controller;
pub mod convergence;
mod error;
mod mapper;
pub mod prediction;
mod session;

pub use controller::{SessionController, SessionPhase, SessionStatus, StepOutcome};
pub use error::CouplingError;
pub use mapper::{scatter_tuples, FieldMapper, InterfaceMap};
pub use session::CouplingSession;
