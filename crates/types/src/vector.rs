//! Interface field storage.
//!
//! Coupled fields (displacement, velocity, forces) are exchanged as flat
//! buffers of interleaved 3-vectors, one tuple per coupled face or vertex,
//! in the local id ordering established at geometry registration.

/// Floating-point scalar used throughout the coordinator.
pub type Real = f64;

/// A single interleaved 3-vector tuple.
pub type Vector3 = [Real; 3];

/// Zero-fill a field buffer.
pub fn zero_values(values: &mut [Vector3]) {
    for v in values.iter_mut() {
        *v = [0.0; 3];
    }
}

/// Copy one field buffer into another of the same length.
///
/// # Panics
///
/// Panics if the buffers differ in length; history buffers are sized once
/// at geometry registration and never resized, so a mismatch is a bug.
pub fn copy_values(src: &[Vector3], dst: &mut [Vector3]) {
    assert_eq!(src.len(), dst.len(), "field buffer length mismatch");
    dst.copy_from_slice(src);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values() {
        let mut values = vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        zero_values(&mut values);
        assert_eq!(values, vec![[0.0; 3], [0.0; 3]]);
    }

    #[test]
    fn test_copy_values() {
        let src = vec![[1.0, 2.0, 3.0]];
        let mut dst = vec![[0.0; 3]];
        copy_values(&src, &mut dst);
        assert_eq!(dst, src);
    }

    #[test]
    #[should_panic(expected = "length mismatch")]
    fn test_copy_values_length_mismatch() {
        let src = vec![[1.0, 2.0, 3.0]];
        let mut dst = vec![[0.0; 3], [0.0; 3]];
        copy_values(&src, &mut dst);
    }
}
