//! Distributed convergence residual.

use fsibridge_parallel::Communicator;
use fsibridge_types::Vector3;

/// Relative L2 residual between the received and predicted displacement.
///
/// `sqrt(Σ‖current − predicted‖² / Σ count) / reference_length`, where both
/// sums run over all partitions via a single 2-element sum all-reduce of
/// `(sum_of_squares, vertex_count)`. Weighting by local vertex count in the
/// same collective avoids a separate normalization pass.
///
/// This is a collective operation: every rank of the local group must call
/// it once per convergence test, in step.
pub fn displacement_residual(
    current: &[Vector3],
    predicted: &[Vector3],
    reference_length: f64,
    comm: &impl Communicator,
) -> f64 {
    debug_assert_eq!(current.len(), predicted.len());

    let mut sum_sq = 0.0;
    for (a, b) in current.iter().zip(predicted) {
        for j in 0..3 {
            let d = a[j] - b[j];
            sum_sq += d * d;
        }
    }

    // Vertices on shared partition boundaries are counted once per
    // partition and so carry extra weight; the effect on the global norm
    // is minor, so no interface-deduplication pass is done here.
    let local = [sum_sq, current.len() as f64];
    let reduced = comm.allreduce_sum_pair(local);

    if reduced[1] <= 0.0 {
        return 0.0;
    }
    (reduced[0] / reduced[1]).sqrt() / reference_length
}
