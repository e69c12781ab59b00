//! Collective operations over the local parallel group.

/// Collective operations over the ranks of one coupled solver.
///
/// All operations are blocking barriers across the local group: every rank
/// must call them in the same order with matching arguments. This is the
/// only consistency mechanism between ranks; there is no distributed lock.
pub trait Communicator: Send + Sync {
    /// This rank's index within the local group.
    fn rank(&self) -> u32;

    /// Number of ranks in the local group.
    fn n_ranks(&self) -> u32;

    /// Whether this rank talks to the peer solver (conventionally rank 0).
    fn is_coordinator(&self) -> bool {
        self.rank() == 0
    }

    /// Broadcast a double from the coordinating rank to all ranks.
    fn broadcast_f64(&self, value: &mut f64);

    /// Broadcast an integer from the coordinating rank to all ranks.
    fn broadcast_i32(&self, value: &mut i32);

    /// Element-wise sum of a 2-element vector over all ranks.
    ///
    /// Carries `(sum_of_squares, rescale)` pairs so a distributed norm is
    /// reduced and weighted by partition size in one collective.
    fn allreduce_sum_pair(&self, values: [f64; 2]) -> [f64; 2];

    /// Sum of a counter over all ranks (global entity counts).
    fn allreduce_sum_u64(&self, value: u64) -> u64;
}

/// Identity communicator for serial (single-partition) runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialCommunicator;

impl Communicator for SerialCommunicator {
    fn rank(&self) -> u32 {
        0
    }

    fn n_ranks(&self) -> u32 {
        1
    }

    fn broadcast_f64(&self, _value: &mut f64) {}

    fn broadcast_i32(&self, _value: &mut i32) {}

    fn allreduce_sum_pair(&self, values: [f64; 2]) -> [f64; 2] {
        values
    }

    fn allreduce_sum_u64(&self, value: u64) -> u64 {
        value
    }
}
