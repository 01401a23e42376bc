// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partforge Inc.

//! Mesh representation and utilities

use super::BoundingBox;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Planar polygonal face defined by vertex indices, counter-clockwise when
/// viewed from outside the solid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
    pub indices: Vec<usize>,
}

impl Face {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    pub fn triangle(a: usize, b: usize, c: usize) -> Self {
        Self::new(vec![a, b, c])
    }

    pub fn quad(a: usize, b: usize, c: usize, d: usize) -> Self {
        Self::new(vec![a, b, c, d])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn is_triangle(&self) -> bool {
        self.indices.len() == 3
    }

    pub fn is_quad(&self) -> bool {
        self.indices.len() == 4
    }

    /// Iterate over the directed edges of the face boundary
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.indices.len();
        (0..n).map(move |i| (self.indices[i], self.indices[(i + 1) % n]))
    }

    /// Fan triangulation anchored at the first vertex
    pub fn fan(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        let first = self.indices.first().copied().unwrap_or(0);
        self.indices
            .windows(2)
            .skip(1)
            .map(move |pair| [first, pair[0], pair[1]])
    }
}

/// Boundary-representation mesh: vertex positions plus polygonal faces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Point3<f64>>,
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn empty() -> Self {
        Self::new()
    }

    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, position: Point3<f64>) -> usize {
        let index = self.vertices.len();
        self.vertices.push(position);
        index
    }

    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.iter().filter(|f| f.is_triangle()).count()
    }

    pub fn quad_count(&self) -> usize {
        self.faces.iter().filter(|f| f.is_quad()).count()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.vertices)
    }

    /// Return a copy with `offset` added to every vertex
    pub fn translated(&self, offset: &Vector3<f64>) -> Mesh {
        Mesh {
            vertices: self.vertices.iter().map(|p| p + offset).collect(),
            faces: self.faces.clone(),
        }
    }

    /// Append another mesh, re-basing its face indices
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len();
        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(other.faces.iter().map(|face| {
            Face::new(face.indices.iter().map(|i| i + offset).collect())
        }));
    }

    /// Concatenate two meshes into a new one
    pub fn concatenated(&self, other: &Mesh) -> Mesh {
        let mut result = Mesh::with_capacity(
            self.vertex_count() + other.vertex_count(),
            self.face_count() + other.face_count(),
        );
        result.merge(self);
        result.merge(other);
        result
    }

    /// Triangle soup view of the faces, fan-triangulated
    pub fn triangulate(&self) -> Vec<[usize; 3]> {
        self.faces.iter().flat_map(|f| f.fan()).collect()
    }

    /// Check that every face has at least three in-range, distinct indices
    pub fn is_well_formed(&self) -> bool {
        let n = self.vertices.len();
        self.faces.iter().all(|face| {
            face.len() >= 3
                && face.indices.iter().all(|&i| i < n)
                && face.edges().all(|(a, b)| a != b)
        })
    }

    /// Newell normal of a face, not normalized; its length is twice the area
    pub fn face_normal(&self, face: &Face) -> Vector3<f64> {
        let mut normal = Vector3::zeros();
        for (a, b) in face.edges() {
            let p = &self.vertices[a];
            let q = &self.vertices[b];
            normal.x += (p.y - q.y) * (p.z + q.z);
            normal.y += (p.z - q.z) * (p.x + q.x);
            normal.z += (p.x - q.x) * (p.y + q.y);
        }
        normal
    }
}
