// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partforge Inc.

//! Scene evaluator - converts a scene tree to a mesh

use super::{validate, Operator, SceneNode};
use crate::config::EvalConfig;
use crate::error::Result;
use crate::geometry::{self, Mesh};
use rayon::prelude::*;
use tracing::trace;

/// Evaluates scene trees into boundary meshes
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: EvalConfig,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Check the configuration and the whole tree, then evaluate it to a mesh
    pub fn evaluate(&self, root: &SceneNode) -> Result<Mesh> {
        self.config.validate()?;
        validate(root)?;
        Ok(self.evaluate_node(root))
    }

    /// Evaluate independent scenes in parallel
    pub fn evaluate_many(&self, scenes: &[SceneNode]) -> Vec<Result<Mesh>> {
        scenes.par_iter().map(|scene| self.evaluate(scene)).collect()
    }

    fn evaluate_node(&self, node: &SceneNode) -> Mesh {
        let mesh = match node {
            SceneNode::Primitive(primitive) => primitive.to_mesh(),

            SceneNode::Operator(Operator::Translate { offset, child }) => {
                self.evaluate_node(child).translated(offset)
            }

            SceneNode::Operator(Operator::Union(children)) => {
                let meshes: Vec<Mesh> = children.iter().map(|c| self.evaluate_node(c)).collect();
                meshes
                    .into_iter()
                    .reduce(|acc, mesh| geometry::union(&acc, &mesh, &self.config))
                    .unwrap_or_default()
            }
        };

        trace!(
            node = node.name(),
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "evaluated"
        );
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Vec3;
    use crate::error::CsgError;
    use crate::geometry::analytics::signed_volume;
    use approx::assert_relative_eq;

    #[test]
    fn test_translate_shifts_z() {
        let evaluator = Evaluator::new();
        let base = evaluator.evaluate(&SceneNode::cylinder(5.0, 30.0, 64)).unwrap();
        let moved = evaluator
            .evaluate(&SceneNode::cylinder(5.0, 30.0, 64).up(5.0))
            .unwrap();

        assert_eq!(base.vertex_count(), moved.vertex_count());
        for (a, b) in base.vertices.iter().zip(&moved.vertices) {
            assert_eq!(b.x, a.x);
            assert_eq!(b.y, a.y);
            assert_eq!(b.z, a.z + 5.0);
        }
        assert_eq!(base.faces, moved.faces);
    }

    #[test]
    fn test_single_child_union_is_passthrough() {
        let evaluator = Evaluator::new();
        let cylinder = SceneNode::cylinder(2.0, 3.0, 12);
        let alone = evaluator.evaluate(&cylinder).unwrap();
        let wrapped = evaluator.evaluate(&SceneNode::union(vec![cylinder])).unwrap();
        assert_eq!(alone, wrapped);
    }

    #[test]
    fn test_invalid_tree_fails_before_tessellation() {
        let evaluator = Evaluator::new();
        let scene = SceneNode::union(vec![
            SceneNode::cylinder(10.0, 5.0, 6),
            SceneNode::union(vec![]),
        ]);
        let err = evaluator.evaluate(&scene).unwrap_err();
        assert!(err.is_invalid_geometry());
    }

    #[test]
    fn test_three_way_union_folds_left() {
        let evaluator = Evaluator::new();
        let scene = SceneNode::union(vec![
            SceneNode::cylinder(1.0, 1.0, 8),
            SceneNode::cylinder(1.0, 1.0, 8).translated(Vec3::new(5.0, 0.0, 0.0)),
            SceneNode::cylinder(1.0, 1.0, 8).translated(Vec3::new(10.0, 0.0, 0.0)),
        ]);
        let mesh = evaluator.evaluate(&scene).unwrap();
        assert_eq!(mesh.vertex_count(), 3 * 18);
        let single = signed_volume(&evaluator.evaluate(&SceneNode::cylinder(1.0, 1.0, 8)).unwrap());
        assert_relative_eq!(signed_volume(&mesh), 3.0 * single, max_relative = 1e-12);
    }

    #[test]
    fn test_unusable_config_is_rejected() {
        let scene = SceneNode::union(vec![
            SceneNode::cylinder(2.0, 3.0, 8),
            SceneNode::cylinder(2.0, 3.0, 8).translated(Vec3::new(1.0, 0.0, 0.0)),
        ]);
        let configs = [
            EvalConfig {
                weld_tolerance: 0.0,
                disjoint_shortcut: false,
                ..EvalConfig::default()
            },
            EvalConfig {
                epsilon: f64::NAN,
                ..EvalConfig::default()
            },
        ];

        for config in configs {
            let evaluator = Evaluator::with_config(config);
            let err = evaluator.evaluate(&scene).unwrap_err();
            assert!(matches!(err, CsgError::Config(_)), "{}", err);
            assert!(evaluator.evaluate_many(&[scene.clone()])[0].is_err());
        }
    }

    #[test]
    fn test_evaluate_many_keeps_order() {
        let evaluator = Evaluator::new();
        let scenes = vec![
            SceneNode::cylinder(1.0, 1.0, 3),
            SceneNode::cylinder(1.0, 1.0, 0),
            SceneNode::cylinder(1.0, 1.0, 5),
        ];
        let results = evaluator.evaluate_many(&scenes);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().vertex_count(), 8);
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().vertex_count(), 12);
    }
}
