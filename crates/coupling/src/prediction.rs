//! Extrapolation kernels for the coupling exchange.
//!
//! Two independent rules, both writing their "predicted" buffer in place
//! with no per-call allocation:
//!
//! - **Forces**, every sub-iteration before sending to the peer: a linear
//!   extrapolation one half-step ahead, `2·current − previous`. The second
//!   weight is negative on purpose; this is not a convex blend.
//! - **Displacement**, after receiving peer data: a Newmark-like 3-term
//!   combination on the first sub-iteration of a step, degenerating to
//!   `current + ½·dt·velocity` since `β = 0`; a plain ½/½ relaxation with
//!   the previous predicted value on later sub-iterations.

use fsibridge_types::Vector3;

/// Force extrapolation weight.
pub const FORCE_ALPHA: f64 = 2.0;
/// Displacement scheme parameter.
pub const DISPLACEMENT_ALPHA: f64 = 0.5;
/// Displacement scheme parameter (zero: velocity history drops out).
pub const DISPLACEMENT_BETA: f64 = 0.0;

/// `predicted = c1·val1 + c2·val2 + c3·val3` over interleaved tuples.
fn combine3(
    predicted: &mut [Vector3],
    val1: &[Vector3],
    val2: &[Vector3],
    val3: &[Vector3],
    c1: f64,
    c2: f64,
    c3: f64,
) {
    debug_assert_eq!(predicted.len(), val1.len());
    debug_assert_eq!(predicted.len(), val2.len());
    debug_assert_eq!(predicted.len(), val3.len());
    for (i, p) in predicted.iter_mut().enumerate() {
        for j in 0..3 {
            p[j] = c1 * val1[i][j] + c2 * val2[i][j] + c3 * val3[i][j];
        }
    }
}

/// `predicted = c1·val1 + c2·val2` over interleaved tuples.
fn combine2(predicted: &mut [Vector3], val1: &[Vector3], val2: &[Vector3], c1: f64, c2: f64) {
    debug_assert_eq!(predicted.len(), val1.len());
    debug_assert_eq!(predicted.len(), val2.len());
    for (i, p) in predicted.iter_mut().enumerate() {
        for j in 0..3 {
            p[j] = c1 * val1[i][j] + c2 * val2[i][j];
        }
    }
}

/// Predict the forces sent to the structural solver.
///
/// `predicted = α·current + (1−α)·previous` with `α = 2`; identical in
/// explicit and implicit coupling.
pub fn predict_forces(predicted: &mut [Vector3], current: &[Vector3], previous: &[Vector3]) {
    combine2(predicted, current, previous, FORCE_ALPHA, 1.0 - FORCE_ALPHA);
}

/// First-sub-iteration displacement prediction.
///
/// `predicted = c1·displacement + c2·velocity + c3·velocity_previous` with
/// `c1 = 1`, `c2 = (α+β)·dt`, `c3 = −β·dt_previous`.
pub fn predict_displacement_first(
    predicted: &mut [Vector3],
    displacement: &[Vector3],
    velocity: &[Vector3],
    velocity_previous: &[Vector3],
    dt: f64,
    dt_previous: f64,
) {
    let c1 = 1.0;
    let c2 = (DISPLACEMENT_ALPHA + DISPLACEMENT_BETA) * dt;
    let c3 = -DISPLACEMENT_BETA * dt_previous;
    combine3(
        predicted,
        displacement,
        velocity,
        velocity_previous,
        c1,
        c2,
        c3,
    );
}

/// Later-sub-iteration displacement prediction.
///
/// Relaxes the freshly received displacement against the previous
/// prediction in place: `predicted = α·displacement + (1−α)·predicted`.
pub fn predict_displacement_relaxed(predicted: &mut [Vector3], displacement: &[Vector3]) {
    debug_assert_eq!(predicted.len(), displacement.len());
    let c1 = DISPLACEMENT_ALPHA;
    let c2 = 1.0 - DISPLACEMENT_ALPHA;
    for (i, p) in predicted.iter_mut().enumerate() {
        for j in 0..3 {
            p[j] = c1 * displacement[i][j] + c2 * p[j];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_prediction_is_linear_extrapolation() {
        let current = vec![[1.0, 2.0, 3.0]];
        let previous = vec![[0.0, 0.0, 0.0]];
        let mut predicted = vec![[0.0; 3]];
        predict_forces(&mut predicted, &current, &previous);
        assert_eq!(predicted, vec![[2.0, 4.0, 6.0]]);
    }

    #[test]
    fn test_force_prediction_negative_weight() {
        let current = vec![[1.0, 0.0, 0.0]];
        let previous = vec![[1.0, 0.0, 0.0]];
        let mut predicted = vec![[9.0; 3]];
        predict_forces(&mut predicted, &current, &previous);
        // steady history extrapolates to itself
        assert_eq!(predicted, vec![[1.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_first_sub_iteration_displacement() {
        let displacement = vec![[0.0; 3]];
        let velocity = vec![[2.0, 0.0, 0.0]];
        let velocity_previous = vec![[5.0, 5.0, 5.0]];
        let mut predicted = vec![[0.0; 3]];
        predict_displacement_first(
            &mut predicted,
            &displacement,
            &velocity,
            &velocity_previous,
            0.1,
            0.2,
        );
        // beta = 0: previous velocity drops out entirely
        assert_eq!(predicted, vec![[0.1, 0.0, 0.0]]);
    }

    #[test]
    fn test_later_sub_iteration_displacement() {
        let displacement = vec![[1.0, 1.0, 1.0]];
        let mut predicted = vec![[3.0, 3.0, 3.0]];
        predict_displacement_relaxed(&mut predicted, &displacement);
        assert_eq!(predicted, vec![[2.0, 2.0, 2.0]]);
    }

    #[test]
    fn test_empty_buffers_are_a_no_op() {
        let mut predicted: Vec<[f64; 3]> = Vec::new();
        predict_forces(&mut predicted, &[], &[]);
        predict_displacement_relaxed(&mut predicted, &[]);
        assert!(predicted.is_empty());
    }
}
