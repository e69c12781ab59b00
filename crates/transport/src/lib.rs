//! Transport-independent peer exchange interfaces.
//!
//! This crate contains the seams between the coupling coordinator and the
//! process that runs the structural solver:
//!
//! - [`Transport`]: blocking named-value exchange with the peer (control
//!   scalars keyed by iteration, field buffers keyed by name)
//! - [`PeerDiscovery`]: locating the peer instance in a shared application
//!   registry, decoupled from any launch mechanism
//!
//! No backend lives here. The in-memory backend used by tests and
//! simulations is in `fsibridge-transport-memory`; an MPI/launcher-backed
//! production implementation would be a separate crate.

mod discovery;
mod traits;

pub use discovery::{DiscoveryError, PeerDiscovery, StaticRegistry};
pub use traits::{Transport, TransportError};
