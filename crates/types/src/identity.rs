//! Peer identity and iteration counter types.

use serde::{Deserialize, Serialize};

/// Identity of a remote solver application discovered at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerApplication {
    /// Root rank of the application in the shared launch group.
    pub root_rank: u32,
    /// Application type name (e.g. `"code_aster"`).
    pub app_type: String,
    /// Application instance name (may be empty).
    pub app_name: String,
}

/// Link to the structural solver, established at session initialization.
///
/// A run without a matching peer is not an error: the session degrades to
/// dry-run mode, where every peer exchange is a no-op and receive buffers
/// are zero-filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerLink {
    /// Exactly one structural solver instance was found.
    Connected(PeerApplication),
    /// No peer found; peer I/O is skipped for the whole run.
    DryRun,
}

impl PeerLink {
    /// Whether a peer process is attached to this session.
    pub fn is_connected(&self) -> bool {
        matches!(self, PeerLink::Connected(_))
    }

    /// Root rank of the connected peer, if any.
    pub fn root_rank(&self) -> Option<u32> {
        match self {
            PeerLink::Connected(app) => Some(app.root_rank),
            PeerLink::DryRun => None,
        }
    }
}

/// Signed coupling iteration counter.
///
/// `0` before the first time step, `> 0` while stepping, `< 0` once the
/// peer has disconnected. The terminal state is sticky: no further peer
/// communication is attempted, but local queries and finalization remain
/// valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Iteration(i32);

impl Iteration {
    const TERMINAL: i32 = -1;

    /// Counter before the first negotiation.
    pub fn start() -> Self {
        Iteration(0)
    }

    /// Raw counter value, negative when terminal.
    pub fn index(&self) -> i32 {
        self.0
    }

    /// Whether at least one time step has been negotiated.
    pub fn is_started(&self) -> bool {
        self.0 != 0
    }

    /// Whether the disconnect sentinel has been set.
    pub fn is_terminal(&self) -> bool {
        self.0 < 0
    }

    /// Advance to the next time step. No-op once terminal.
    pub fn advance(&mut self) {
        if !self.is_terminal() {
            self.0 += 1;
        }
    }

    /// Enter the terminal state. Idempotent.
    pub fn mark_terminal(&mut self) {
        self.0 = Self::TERMINAL;
    }
}

impl std::fmt::Display for Iteration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_terminal() {
            write!(f, "terminal")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
