// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partforge Inc.

//! Validation pass run over a whole scene tree before any tessellation

use super::{Operator, SceneNode};
use crate::error::{CsgError, Result};
use tracing::debug;

/// Check every node of the tree, reporting the first problem with its path
/// (for example `union[1].translate.cylinder`)
pub fn validate(root: &SceneNode) -> Result<()> {
    let result = validate_node(root, &mut Vec::new());
    if let Err(ref err) = result {
        debug!(%err, "scene rejected");
    }
    result
}

fn validate_node(node: &SceneNode, path: &mut Vec<String>) -> Result<()> {
    match node {
        SceneNode::Primitive(primitive) => {
            path.push(primitive.name().to_string());
            primitive
                .validate()
                .map_err(|err| with_path(err, path))?;
            path.pop();
        }

        SceneNode::Operator(Operator::Union(children)) => {
            if children.is_empty() {
                path.push("union".to_string());
                return Err(with_path(
                    CsgError::invalid_geometry("union needs at least one child"),
                    path,
                ));
            }
            for (i, child) in children.iter().enumerate() {
                path.push(format!("union[{}]", i));
                validate_node(child, path)?;
                path.pop();
            }
        }

        SceneNode::Operator(Operator::Translate { offset, child }) => {
            path.push("translate".to_string());
            if offset.iter().any(|v| !v.is_finite()) {
                return Err(with_path(
                    CsgError::invalid_geometry(format!(
                        "translate offset must be finite, got [{}, {}, {}]",
                        offset.x, offset.y, offset.z
                    )),
                    path,
                ));
            }
            validate_node(child, path)?;
            path.pop();
        }
    }
    Ok(())
}

fn with_path(err: CsgError, path: &[String]) -> CsgError {
    match err {
        CsgError::InvalidGeometry(message) => {
            CsgError::InvalidGeometry(format!("{}: {}", path.join("."), message))
        }
        other => other,
    }
}
