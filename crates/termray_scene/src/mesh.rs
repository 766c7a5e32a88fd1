//! Polygon mesh geometry.
//!
//! A mesh is supplied already parsed (vertex positions plus face index
//! lists) by an external loader. Vertices here are the immutable base
//! coordinates; actors derive their world-space vertices from these each
//! frame through their motion transform, so repeated animation never
//! accumulates rounding drift.

use std::collections::HashSet;

use termray_math::DVec3;
use thiserror::Error;

/// Errors detected when constructing a mesh.
#[derive(Error, Debug, PartialEq)]
pub enum GeometryError {
    #[error("face {face} has {count} vertices, need at least 3")]
    FaceTooSmall { face: usize, count: usize },

    #[error("face {face} references vertex {index}, mesh has {vertex_count}")]
    IndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },
}

/// A polygon mesh: base vertex positions and face index lists.
///
/// Faces are assumed planar and simple (non-self-intersecting); that is the
/// loader's responsibility and is not verified here.
#[derive(Debug, Clone)]
pub struct Mesh {
    base_vertices: Vec<DVec3>,
    faces: Vec<Vec<usize>>,
}

impl Mesh {
    /// Create a mesh, validating face arity and index ranges.
    pub fn new(base_vertices: Vec<DVec3>, faces: Vec<Vec<usize>>) -> Result<Self, GeometryError> {
        for (face_index, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(GeometryError::FaceTooSmall {
                    face: face_index,
                    count: face.len(),
                });
            }
            for &index in face {
                if index >= base_vertices.len() {
                    return Err(GeometryError::IndexOutOfRange {
                        face: face_index,
                        index,
                        vertex_count: base_vertices.len(),
                    });
                }
            }
        }

        log::debug!(
            "mesh created: {} vertices, {} faces",
            base_vertices.len(),
            faces.len()
        );

        Ok(Self {
            base_vertices,
            faces,
        })
    }

    /// The immutable base vertex positions.
    pub fn base_vertices(&self) -> &[DVec3] {
        &self.base_vertices
    }

    /// The face index lists.
    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    /// Number of faces.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.base_vertices.len()
    }

    /// Unique undirected edges as vertex index pairs, for wireframe drawing.
    ///
    /// Edges shared between adjacent faces are reported once.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();

        for face in &self.faces {
            for i in 0..face.len() {
                let a = face[i];
                let b = face[(i + 1) % face.len()];
                let key = (a.min(b), a.max(b));
                if seen.insert(key) {
                    edges.push(key);
                }
            }
        }

        edges
    }

    /// An axis-aligned unit quad in the XY plane, centered at the origin.
    pub fn quad() -> Self {
        Self::new(
            vec![
                DVec3::new(-1.0, -1.0, 0.0),
                DVec3::new(1.0, -1.0, 0.0),
                DVec3::new(1.0, 1.0, 0.0),
                DVec3::new(-1.0, 1.0, 0.0),
            ],
            vec![vec![0, 1, 2, 3]],
        )
        .expect("quad is valid")
    }

    /// An axis-aligned cube with the given half-extent, centered at the
    /// origin, faces wound counter-clockwise seen from outside.
    pub fn cube(half_extent: f64) -> Self {
        let h = half_extent;
        Self::new(
            vec![
                DVec3::new(-h, -h, -h),
                DVec3::new(h, -h, -h),
                DVec3::new(h, h, -h),
                DVec3::new(-h, h, -h),
                DVec3::new(-h, -h, h),
                DVec3::new(h, -h, h),
                DVec3::new(h, h, h),
                DVec3::new(-h, h, h),
            ],
            vec![
                vec![3, 2, 1, 0], // -Z
                vec![4, 5, 6, 7], // +Z
                vec![0, 1, 5, 4], // -Y
                vec![7, 6, 2, 3], // +Y
                vec![0, 4, 7, 3], // -X
                vec![1, 2, 6, 5], // +X
            ],
        )
        .expect("cube is valid")
    }
}
