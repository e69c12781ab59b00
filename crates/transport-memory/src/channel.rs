//! Paired in-process transport endpoints.

use crossbeam_channel::{unbounded, Receiver, Sender};
use fsibridge_transport::{Transport, TransportError};
use fsibridge_types::Vector3;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A single message on the in-memory link.
#[derive(Debug)]
enum Frame {
    ScalarI32 {
        iteration: i32,
        name: String,
        value: i32,
    },
    ScalarF64 {
        iteration: i32,
        name: String,
        value: f64,
    },
    Field {
        name: String,
        values: Vec<Vector3>,
    },
}

impl Frame {
    fn describe(&self) -> String {
        match self {
            Frame::ScalarI32 { iteration, name, .. } => {
                format!("scalar i32 {name}@{iteration}")
            }
            Frame::ScalarF64 { iteration, name, .. } => {
                format!("scalar f64 {name}@{iteration}")
            }
            Frame::Field { name, values } => format!("field {name} ({} tuples)", values.len()),
        }
    }
}

/// Operation counters for one endpoint.
///
/// Counters only advance on successful exchanges, so a test can snapshot
/// them around a simulated disconnect and assert that no further peer
/// calls happened.
#[derive(Debug, Default)]
pub struct TransportStats {
    scalars_sent: AtomicU64,
    scalars_received: AtomicU64,
    fields_sent: AtomicU64,
    fields_received: AtomicU64,
}

impl TransportStats {
    /// Read all counters at once.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            scalars_sent: self.scalars_sent.load(Ordering::Relaxed),
            scalars_received: self.scalars_received.load(Ordering::Relaxed),
            fields_sent: self.fields_sent.load(Ordering::Relaxed),
            fields_received: self.fields_received.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`TransportStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub scalars_sent: u64,
    pub scalars_received: u64,
    pub fields_sent: u64,
    pub fields_received: u64,
}

impl StatsSnapshot {
    /// Total successful operations.
    pub fn total(&self) -> u64 {
        self.scalars_sent + self.scalars_received + self.fields_sent + self.fields_received
    }
}

/// One side of an in-memory transport link.
pub struct MemoryEndpoint {
    tx: Sender<Frame>,
    rx: Receiver<Frame>,
    stats: Arc<TransportStats>,
}

impl std::fmt::Debug for MemoryEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryEndpoint")
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}

/// Create a connected pair of endpoints.
///
/// By convention the first endpoint goes to the coordinator under test and
/// the second to the scripted peer.
pub fn memory_pair() -> (MemoryEndpoint, MemoryEndpoint) {
    let (a_tx, b_rx) = unbounded();
    let (b_tx, a_rx) = unbounded();
    let a = MemoryEndpoint {
        tx: a_tx,
        rx: a_rx,
        stats: Arc::new(TransportStats::default()),
    };
    let b = MemoryEndpoint {
        tx: b_tx,
        rx: b_rx,
        stats: Arc::new(TransportStats::default()),
    };
    (a, b)
}

impl MemoryEndpoint {
    /// Shared handle to this endpoint's counters.
    ///
    /// Keep a clone before handing the endpoint to a controller; the
    /// counters stay readable after the move.
    pub fn stats(&self) -> Arc<TransportStats> {
        Arc::clone(&self.stats)
    }

    fn push(&self, frame: Frame) -> Result<(), TransportError> {
        self.tx.send(frame).map_err(|_| TransportError::Disconnected)
    }

    fn pull(&self) -> Result<Frame, TransportError> {
        self.rx.recv().map_err(|_| TransportError::Disconnected)
    }
}

impl Transport for MemoryEndpoint {
    fn send_i32(&self, iteration: i32, name: &str, value: i32) -> Result<(), TransportError> {
        self.push(Frame::ScalarI32 {
            iteration,
            name: name.to_owned(),
            value,
        })?;
        self.stats.scalars_sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn send_f64(&self, iteration: i32, name: &str, value: f64) -> Result<(), TransportError> {
        self.push(Frame::ScalarF64 {
            iteration,
            name: name.to_owned(),
            value,
        })?;
        self.stats.scalars_sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn recv_i32(&self, iteration: i32, name: &str) -> Result<i32, TransportError> {
        match self.pull()? {
            Frame::ScalarI32 {
                iteration: it,
                name: n,
                value,
            } if it == iteration && n == name => {
                self.stats.scalars_received.fetch_add(1, Ordering::Relaxed);
                Ok(value)
            }
            other => Err(TransportError::Protocol(format!(
                "expected scalar i32 {name}@{iteration}, got {}",
                other.describe()
            ))),
        }
    }

    fn recv_f64(&self, iteration: i32, name: &str) -> Result<f64, TransportError> {
        match self.pull()? {
            Frame::ScalarF64 {
                iteration: it,
                name: n,
                value,
            } if it == iteration && n == name => {
                self.stats.scalars_received.fetch_add(1, Ordering::Relaxed);
                Ok(value)
            }
            other => Err(TransportError::Protocol(format!(
                "expected scalar f64 {name}@{iteration}, got {}",
                other.describe()
            ))),
        }
    }

    fn send_field(&self, name: &str, values: &[Vector3]) -> Result<(), TransportError> {
        self.push(Frame::Field {
            name: name.to_owned(),
            values: values.to_vec(),
        })?;
        self.stats.fields_sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn recv_field(&self, name: &str, values: &mut [Vector3]) -> Result<(), TransportError> {
        match self.pull()? {
            Frame::Field {
                name: n,
                values: received,
            } if n == name => {
                if received.len() != values.len() {
                    return Err(TransportError::Protocol(format!(
                        "field {name}: expected {} tuples, got {}",
                        values.len(),
                        received.len()
                    )));
                }
                values.copy_from_slice(&received);
                self.stats.fields_received.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            other => Err(TransportError::Protocol(format!(
                "expected field {name}, got {}",
                other.describe()
            ))),
        }
    }
}
