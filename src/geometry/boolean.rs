// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partforge Inc.

//! Boolean union dispatch

use super::{csg, Mesh};
use crate::config::EvalConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which algorithm produced a union
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnionPath {
    /// Operand interiors cannot overlap; the meshes were concatenated
    Disjoint,
    /// Full BSP clipping
    Bsp,
}

/// Union of two closed meshes
pub fn union(a: &Mesh, b: &Mesh, config: &EvalConfig) -> Mesh {
    union_with_path(a, b, config).0
}

/// Union of two closed meshes, also reporting which path was taken.
///
/// When the bounding boxes share no region of positive volume the solids'
/// interiors are disjoint and concatenation already bounds their union.
/// Touching operands (a shared face plane, as in a head and shaft stacked
/// along z) take this path too and keep both coincident faces.
///
/// Both paths bound the same solid and agree on volume and bounding box, but
/// not face for face: BSP clipping splits faces along the other operand's
/// planes even when nothing is removed.
pub fn union_with_path(a: &Mesh, b: &Mesh, config: &EvalConfig) -> (Mesh, UnionPath) {
    if a.is_empty() {
        return (b.clone(), UnionPath::Disjoint);
    }
    if b.is_empty() {
        return (a.clone(), UnionPath::Disjoint);
    }

    let overlapping = a
        .bounding_box()
        .overlaps_interior(&b.bounding_box(), config.epsilon);

    if config.disjoint_shortcut && !overlapping {
        let result = a.concatenated(b);
        debug!(
            vertices = result.vertex_count(),
            faces = result.face_count(),
            "union: disjoint operands, concatenated"
        );
        return (result, UnionPath::Disjoint);
    }

    let result = csg::csg_union(a, b, config.epsilon, config.weld_tolerance);
    debug!(
        overlapping,
        input_faces = a.face_count() + b.face_count(),
        faces = result.face_count(),
        vertices = result.vertex_count(),
        "union: BSP clip"
    );
    (result, UnionPath::Bsp)
}
