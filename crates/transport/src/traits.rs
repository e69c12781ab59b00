//! Transport trait for peer data exchange.

use fsibridge_types::Vector3;

/// Error returned when a peer exchange fails.
///
/// Every variant is recoverable from the coordinator's point of view: the
/// session controller downgrades the run to "finish the next step, then
/// stop" and never propagates transport failures to the fluid solver.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The peer terminated or the channel was torn down.
    #[error("peer disconnected")]
    Disconnected,

    /// The peer sent data that does not match the expected key.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Blocking point-to-point exchange with the remote solver process.
///
/// Control scalars are keyed by `(iteration, name)` and exchanged only on
/// the coordinating rank; field buffers are keyed by name alone and carry
/// per-entity tuples in the interface's local id ordering. The remote
/// participant is fixed when the transport endpoint is created (from the
/// discovered peer identity), so it does not reappear in every call.
///
/// All calls block until the peer has produced or consumed the value; a
/// hung peer blocks the caller indefinitely. There is no mid-exchange
/// cancellation or timeout.
pub trait Transport: Send {
    /// Send an integer control value.
    fn send_i32(&self, iteration: i32, name: &str, value: i32) -> Result<(), TransportError>;

    /// Send a floating-point control value.
    fn send_f64(&self, iteration: i32, name: &str, value: f64) -> Result<(), TransportError>;

    /// Receive an integer control value keyed by `(iteration, name)`.
    fn recv_i32(&self, iteration: i32, name: &str) -> Result<i32, TransportError>;

    /// Receive a floating-point control value keyed by `(iteration, name)`.
    fn recv_f64(&self, iteration: i32, name: &str) -> Result<f64, TransportError>;

    /// Send a field buffer over the named field channel.
    fn send_field(&self, name: &str, values: &[Vector3]) -> Result<(), TransportError>;

    /// Receive a field buffer from the named field channel.
    ///
    /// The destination is sized by the caller; receiving a buffer of a
    /// different length is a protocol error.
    fn recv_field(&self, name: &str, values: &mut [Vector3]) -> Result<(), TransportError>;
}
