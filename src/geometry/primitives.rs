// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partforge Inc.

//! Geometric primitives generator

use super::{Face, Mesh};
use crate::error::{CsgError, Result};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Upper bound on `radial_segments`, keeping tessellation memory bounded
pub const MAX_RADIAL_SEGMENTS: u32 = 1 << 16;

/// Geometric primitives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    Cylinder(Cylinder),
}

impl Primitive {
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Cylinder(cylinder) => cylinder.validate(),
        }
    }

    pub fn to_mesh(&self) -> Mesh {
        match self {
            Self::Cylinder(cylinder) => cylinder.to_mesh(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Cylinder(_) => "cylinder",
        }
    }
}

/// Circular cylinder or frustum standing on the z = 0 plane, approximated by
/// a regular prism with `radial_segments` sides. A zero radius on one end
/// makes a cone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CylinderRepr")]
pub struct Cylinder {
    pub radius_bottom: f64,
    pub radius_top: f64,
    pub height: f64,
    pub radial_segments: u32,
}

impl Cylinder {
    /// Straight cylinder; both ends share `radius`
    pub fn new(radius: f64, height: f64, radial_segments: u32) -> Self {
        Self::frustum(radius, radius, height, radial_segments)
    }

    pub fn frustum(radius_bottom: f64, radius_top: f64, height: f64, radial_segments: u32) -> Self {
        Self {
            radius_bottom,
            radius_top,
            height,
            radial_segments,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let params = [self.radius_bottom, self.radius_top, self.height];
        if params.iter().any(|v| !v.is_finite()) {
            return Err(CsgError::invalid_geometry(format!(
                "cylinder parameters must be finite (r1={}, r2={}, h={})",
                self.radius_bottom, self.radius_top, self.height
            )));
        }
        if self.height <= 0.0 {
            return Err(CsgError::invalid_geometry(format!(
                "cylinder height must be positive, got {}",
                self.height
            )));
        }
        if self.radius_bottom < 0.0 || self.radius_top < 0.0 {
            return Err(CsgError::invalid_geometry(format!(
                "cylinder radii must not be negative (r1={}, r2={})",
                self.radius_bottom, self.radius_top
            )));
        }
        if self.radius_bottom == 0.0 && self.radius_top == 0.0 {
            return Err(CsgError::invalid_geometry(
                "cylinder needs at least one positive radius",
            ));
        }
        if self.radial_segments < 3 {
            return Err(CsgError::invalid_geometry(format!(
                "cylinder needs at least 3 radial segments, got {}",
                self.radial_segments
            )));
        }
        if self.radial_segments > MAX_RADIAL_SEGMENTS {
            return Err(CsgError::invalid_geometry(format!(
                "cylinder has {} radial segments, the limit is {}",
                self.radial_segments, MAX_RADIAL_SEGMENTS
            )));
        }
        Ok(())
    }

    /// Area of the regular polygon inscribed in a circle of `radius`
    pub fn ring_area(&self, radius: f64) -> f64 {
        let n = self.radial_segments as f64;
        0.5 * n * radius * radius * (2.0 * PI / n).sin()
    }

    /// Exact volume of the tessellated solid (frustum of a regular polygon)
    pub fn tessellated_volume(&self) -> f64 {
        let a1 = self.ring_area(self.radius_bottom);
        let a2 = self.ring_area(self.radius_top);
        self.height / 3.0 * (a1 + a2 + (a1 * a2).sqrt())
    }

    /// Volume of the smooth solid the tessellation approximates
    pub fn nominal_volume(&self) -> f64 {
        let (r1, r2) = (self.radius_bottom, self.radius_top);
        PI * self.height / 3.0 * (r1 * r1 + r1 * r2 + r2 * r2)
    }

    /// Tessellate into a closed mesh.
    ///
    /// Vertex layout: bottom center, top center, then one (bottom, top) pair
    /// per segment. An end with zero radius collapses onto its center, which
    /// becomes the apex; that end gets no ring and no cap.
    pub fn to_mesh(&self) -> Mesh {
        let n = self.radial_segments as usize;
        let has_bottom = self.radius_bottom > 0.0;
        let has_top = self.radius_top > 0.0;
        if n < 3 || !(has_bottom || has_top) {
            return Mesh::empty();
        }

        let ring_count = usize::from(has_bottom) + usize::from(has_top);
        let cap_count = ring_count;
        let mut mesh = Mesh::with_capacity(2 + ring_count * n, n * (1 + cap_count));

        let bottom_center = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let top_center = mesh.add_vertex(Point3::new(0.0, 0.0, self.height));

        let mut bottom_ring = Vec::with_capacity(n);
        let mut top_ring = Vec::with_capacity(n);

        for k in 0..n {
            let angle = 2.0 * PI * k as f64 / n as f64;
            let (sin, cos) = angle.sin_cos();

            if has_bottom {
                let r = self.radius_bottom;
                bottom_ring.push(mesh.add_vertex(Point3::new(r * cos, r * sin, 0.0)));
            }
            if has_top {
                let r = self.radius_top;
                top_ring.push(mesh.add_vertex(Point3::new(r * cos, r * sin, self.height)));
            }
        }

        // Bottom cap faces -z
        if has_bottom {
            for k in 0..n {
                let next = (k + 1) % n;
                mesh.add_face(Face::triangle(bottom_center, bottom_ring[next], bottom_ring[k]));
            }
        }

        // Top cap faces +z
        if has_top {
            for k in 0..n {
                let next = (k + 1) % n;
                mesh.add_face(Face::triangle(top_center, top_ring[k], top_ring[next]));
            }
        }

        for k in 0..n {
            let next = (k + 1) % n;
            let face = match (has_bottom, has_top) {
                (true, true) => Face::quad(
                    bottom_ring[k],
                    bottom_ring[next],
                    top_ring[next],
                    top_ring[k],
                ),
                (true, false) => Face::triangle(bottom_ring[k], bottom_ring[next], top_center),
                // the early return guarantees a top ring here
                (false, _) => Face::triangle(bottom_center, top_ring[next], top_ring[k]),
            };
            mesh.add_face(face);
        }

        mesh
    }
}

/// Wire form of [`Cylinder`]; accepts a single `radius` for both ends
#[derive(Deserialize)]
struct CylinderRepr {
    radius: Option<f64>,
    radius_bottom: Option<f64>,
    radius_top: Option<f64>,
    height: f64,
    radial_segments: u32,
}

impl TryFrom<CylinderRepr> for Cylinder {
    type Error = String;

    fn try_from(repr: CylinderRepr) -> std::result::Result<Self, Self::Error> {
        let bottom = repr.radius_bottom.or(repr.radius).or(repr.radius_top);
        let top = repr.radius_top.or(repr.radius).or(repr.radius_bottom);

        match (bottom, top) {
            (Some(radius_bottom), Some(radius_top)) => Ok(Cylinder::frustum(
                radius_bottom,
                radius_top,
                repr.height,
                repr.radial_segments,
            )),
            _ => Err("cylinder needs `radius` or `radius_bottom`/`radius_top`".to_string()),
        }
    }
}
