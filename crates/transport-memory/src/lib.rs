//! In-memory transport backend.
//!
//! Channel-backed [`Transport`](fsibridge_transport::Transport)
//! implementation with paired endpoints, used by tests and simulations in
//! place of a launcher-backed production transport. Includes:
//!
//! - [`MemoryEndpoint`]: one side of a bidirectional in-process link
//! - [`TransportStats`]: per-endpoint operation counters for assertions
//! - [`ScriptedPeer`]: a thread that plays the structural-solver side of
//!   the coupling protocol against a coordinator under test
//!
//! Dropping an endpoint tears the link down; the other side observes
//! `TransportError::Disconnected` on its next exchange, which is exactly
//! how a finished or crashed peer process appears to the coordinator.

mod channel;
mod peer;

pub use channel::{memory_pair, MemoryEndpoint, StatsSnapshot, TransportStats};
pub use peer::{ReceivedHandshake, ScriptedPeer};
