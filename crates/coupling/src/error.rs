//! Fatal coupling errors.
//!
//! Only configuration problems surface here; peer-transport failures are
//! recovered inside the session controller and never reach the caller.

use fsibridge_transport::DiscoveryError;

/// Fatal error raised during session initialization or registration.
#[derive(Debug, thiserror::Error)]
pub enum CouplingError {
    /// The characteristic domain length must be strictly positive.
    #[error("reference length {0} given where a positive value is expected")]
    InvalidReferenceLength(f64),

    /// Geometry may only be registered once per session.
    #[error("coupling geometry is already registered")]
    GeometryAlreadyRegistered,

    /// An operation required the coupled interface before registration.
    #[error("coupling geometry has not been registered")]
    GeometryNotRegistered,

    /// Peer discovery found an ambiguous topology.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}
