// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partforge Inc.

//! Geometry analytics and statistics

use super::{BoundingBox, Mesh};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Geometry statistics and analytics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryStats {
    /// Enclosed volume in cubic units
    pub volume: f64,
    /// Total surface area in square units
    pub surface_area: f64,
    pub bbox: BoundingBox,
    /// Average of the vertex positions
    pub centroid: [f64; 3],
    pub vertex_count: usize,
    pub face_count: usize,
    pub triangle_count: usize,
    pub quad_count: usize,
    /// Every edge is shared by exactly two faces
    pub is_closed: bool,
}

impl GeometryStats {
    /// Create empty stats
    pub fn empty() -> Self {
        Self {
            volume: 0.0,
            surface_area: 0.0,
            bbox: BoundingBox::empty(),
            centroid: [0.0; 3],
            vertex_count: 0,
            face_count: 0,
            triangle_count: 0,
            quad_count: 0,
            is_closed: false,
        }
    }
}

impl fmt::Display for GeometryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.bbox.size();
        writeln!(f, "Volume:       {:.4}", self.volume)?;
        writeln!(f, "Surface area: {:.4}", self.surface_area)?;
        writeln!(
            f,
            "Centroid:     ({:.2}, {:.2}, {:.2})",
            self.centroid[0], self.centroid[1], self.centroid[2]
        )?;
        writeln!(f, "Size:         {:.2} x {:.2} x {:.2}", size.x, size.y, size.z)?;
        writeln!(
            f,
            "Vertices:     {} / faces {} ({} quads, {} triangles)",
            self.vertex_count, self.face_count, self.quad_count, self.triangle_count
        )?;
        write!(f, "Closed:       {}", if self.is_closed { "yes" } else { "no" })
    }
}

/// Analyze mesh geometry and compute statistics
pub fn analyze(mesh: &Mesh) -> GeometryStats {
    if mesh.vertices.is_empty() || mesh.faces.is_empty() {
        return GeometryStats::empty();
    }

    GeometryStats {
        volume: signed_volume(mesh).abs(),
        surface_area: surface_area(mesh),
        bbox: mesh.bounding_box(),
        centroid: centroid(mesh),
        vertex_count: mesh.vertex_count(),
        face_count: mesh.face_count(),
        triangle_count: mesh.triangle_count(),
        quad_count: mesh.quad_count(),
        is_closed: is_closed(mesh),
    }
}

/// Signed enclosed volume; positive when faces wind counter-clockwise seen
/// from outside. Coincident faces of opposite orientation cancel.
pub fn signed_volume(mesh: &Mesh) -> f64 {
    mesh.faces
        .iter()
        .flat_map(|face| face.fan())
        .map(|[a, b, c]| {
            let v0 = &mesh.vertices[a].coords;
            let v1 = &mesh.vertices[b].coords;
            let v2 = &mesh.vertices[c].coords;
            // tetrahedron spanned with the origin
            v0.dot(&v1.cross(v2)) / 6.0
        })
        .sum()
}

pub fn surface_area(mesh: &Mesh) -> f64 {
    mesh.faces
        .iter()
        .map(|face| mesh.face_normal(face).norm() / 2.0)
        .sum()
}

fn centroid(mesh: &Mesh) -> [f64; 3] {
    let sum = mesh
        .vertices
        .iter()
        .fold(nalgebra::Vector3::zeros(), |acc, p| acc + p.coords);
    let mean = sum / mesh.vertices.len() as f64;
    [mean.x, mean.y, mean.z]
}

fn edge_counts(mesh: &Mesh) -> AHashMap<(usize, usize), u32> {
    let mut counts = AHashMap::new();
    for face in &mesh.faces {
        for (a, b) in face.edges() {
            // store edges with smaller index first
            let edge = if a < b { (a, b) } else { (b, a) };
            *counts.entry(edge).or_insert(0) += 1;
        }
    }
    counts
}

/// Check if mesh is manifold (each edge shared by at most 2 faces)
pub fn is_manifold(mesh: &Mesh) -> bool {
    edge_counts(mesh).values().all(|&count| count <= 2)
}

/// Check if mesh is closed (each edge shared by exactly 2 faces)
pub fn is_closed(mesh: &Mesh) -> bool {
    !mesh.faces.is_empty() && edge_counts(mesh).values().all(|&count| count == 2)
}
