//! Surface-interface mapping seam.
//!
//! The field mapper is an external collaborator: it knows which parent-mesh
//! faces and vertices make up the coupled interface and supplies their id
//! lists once at geometry registration. The session only ever hands it
//! borrowed, read-only views of its buffers.

use fsibridge_types::Vector3;

/// Mapping between the coupled interface and the parent surface mesh.
pub trait FieldMapper: Send {
    /// Number of coupled boundary faces owned by this partition.
    fn n_faces(&self) -> usize;

    /// Number of coupled vertices owned by this partition.
    fn n_vertices(&self) -> usize;

    /// Parent-mesh ids of the coupled faces, in interface order.
    fn face_ids(&self) -> &[usize];

    /// Parent-mesh ids of the coupled vertices, in interface order.
    fn vertex_ids(&self) -> &[usize];
}

/// Scatter compact interface tuples into a parent-indexed array.
///
/// With `ids`, `out[ids[i]] = values[i]`; without, a direct copy of the
/// leading entries.
pub fn scatter_tuples(ids: Option<&[usize]>, values: &[Vector3], out: &mut [Vector3]) {
    match ids {
        Some(ids) => {
            for (i, v) in values.iter().enumerate() {
                out[ids[i]] = *v;
            }
        }
        None => {
            out[..values.len()].copy_from_slice(values);
        }
    }
}

/// Field mapper backed by explicit id lists.
#[derive(Debug, Clone)]
pub struct InterfaceMap {
    face_ids: Vec<usize>,
    vertex_ids: Vec<usize>,
}

impl InterfaceMap {
    /// Build a mapping from parent-mesh face and vertex id lists
    /// (ordered by increasing id).
    pub fn new(face_ids: Vec<usize>, vertex_ids: Vec<usize>) -> Self {
        Self {
            face_ids,
            vertex_ids,
        }
    }
}

impl FieldMapper for InterfaceMap {
    fn n_faces(&self) -> usize {
        self.face_ids.len()
    }

    fn n_vertices(&self) -> usize {
        self.vertex_ids.len()
    }

    fn face_ids(&self) -> &[usize] {
        &self.face_ids
    }

    fn vertex_ids(&self) -> &[usize] {
        &self.vertex_ids
    }
}
