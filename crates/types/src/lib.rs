//! Shared types for the partitioned fluid-structure coupling coordinator.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - [`Vector3`]: per-entity 3-vector stored in flat interface-ordered buffers
//! - [`Iteration`]: signed time-step counter with a disconnect sentinel
//! - [`PeerApplication`] / [`PeerLink`]: identity of the remote structural solver
//! - [`CouplingConfig`]: run-control parameters supplied by the driver
//! - [`protocol`]: control-channel variable and field names on the wire
//!
//! No I/O and no runtime dependency; every other crate builds on this one.

mod config;
mod identity;
pub mod protocol;
mod vector;

pub use config::CouplingConfig;
pub use identity::{Iteration, PeerApplication, PeerLink};
pub use vector::{copy_values, zero_values, Real, Vector3};
