// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partforge Inc.

//! Partforge CSG Evaluator
//!
//! Evaluates a declarative tree of primitive solids and boolean/affine
//! operators into a boundary-representation mesh.

pub mod ast;
pub mod config;
pub mod error;
pub mod geometry;
pub mod parts;

pub use ast::{Evaluator, Operator, SceneNode, Vec3};
pub use config::EvalConfig;
pub use error::{CsgError, Result};
pub use geometry::{Cylinder, Face, Mesh, Primitive};

/// Evaluate a scene tree with the default configuration
pub fn evaluate(root: &SceneNode) -> Result<Mesh> {
    Evaluator::new().evaluate(root)
}

/// Decode a JSON scene description and evaluate it
pub fn evaluate_json(source: &str) -> Result<Mesh> {
    let root = SceneNode::from_json(source)?;
    evaluate(&root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_cylinder() {
        let result = evaluate(&SceneNode::cylinder(10.0, 5.0, 6));
        assert!(result.is_ok());
    }

    #[test]
    fn test_evaluate_json() {
        let mesh = evaluate_json(r#"{"cylinder": {"radius": 1, "height": 2, "radial_segments": 3}}"#)
            .unwrap();
        assert_eq!(mesh.vertex_count(), 8);

        let err = evaluate_json(r#"{"cylinder": {"radius": 1, "height": 2, "radial_segments": 0}}"#)
            .unwrap_err();
        assert!(err.is_invalid_geometry());
    }
}
