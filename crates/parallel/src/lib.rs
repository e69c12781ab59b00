//! In-domain SPMD collectives.
//!
//! The coordinator runs one logical thread per mesh partition. Peer
//! communication happens only on the coordinating rank; every other rank
//! waits at the following broadcast, and distributed residuals are reduced
//! with a single sum all-reduce. This crate defines that seam:
//!
//! - [`Communicator`]: the collective operations the coordinator needs
//! - [`SerialCommunicator`]: single-rank identity implementation
//! - [`LocalGroup`]: thread-backed group used by tests to exercise real
//!   multi-rank reductions and broadcasts deterministically
//!
//! An MPI binding would implement [`Communicator`] over `MPI_Bcast` and
//! `MPI_Allreduce`; none is shipped here.

mod communicator;
mod local;

pub use communicator::{Communicator, SerialCommunicator};
pub use local::{LocalCommunicator, LocalGroup};
