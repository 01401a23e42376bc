// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partforge Inc.

//! Scene tree definitions

use crate::error::Result;
use crate::geometry::{Cylinder, Primitive};
use serde::{Deserialize, Serialize};

/// 3D Vector type alias
pub type Vec3 = nalgebra::Vector3<f64>;

/// A node of the scene tree: either a primitive solid or an operator that
/// owns its children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "NodeRepr", into = "NodeRepr")]
pub enum SceneNode {
    Primitive(Primitive),
    Operator(Operator),
}

/// Operators combining or transforming child nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    Union(Vec<SceneNode>),
    Translate { offset: Vec3, child: Box<SceneNode> },
}

impl Operator {
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Union(_) => "union",
            Operator::Translate { .. } => "translate",
        }
    }
}

impl SceneNode {
    /// Straight cylinder; top and bottom share `radius`
    pub fn cylinder(radius: f64, height: f64, radial_segments: u32) -> Self {
        Self::Primitive(Primitive::Cylinder(Cylinder::new(radius, height, radial_segments)))
    }

    pub fn frustum(radius_bottom: f64, radius_top: f64, height: f64, radial_segments: u32) -> Self {
        Self::Primitive(Primitive::Cylinder(Cylinder::frustum(
            radius_bottom,
            radius_top,
            height,
            radial_segments,
        )))
    }

    pub fn union(children: Vec<SceneNode>) -> Self {
        Self::Operator(Operator::Union(children))
    }

    pub fn translate(offset: Vec3, child: SceneNode) -> Self {
        Self::Operator(Operator::Translate {
            offset,
            child: Box::new(child),
        })
    }

    /// Wrap this node in a translation
    pub fn translated(self, offset: Vec3) -> Self {
        Self::translate(offset, self)
    }

    /// Move this node up along z
    pub fn up(self, dz: f64) -> Self {
        self.translated(Vec3::new(0.0, 0.0, dz))
    }

    /// Union this node with another, flattening into an existing union
    pub fn add(self, other: SceneNode) -> Self {
        match self {
            Self::Operator(Operator::Union(mut children)) => {
                children.push(other);
                Self::union(children)
            }
            node => Self::union(vec![node, other]),
        }
    }

    /// Get child nodes
    pub fn children(&self) -> Vec<&SceneNode> {
        match self {
            Self::Primitive(_) => Vec::new(),
            Self::Operator(Operator::Union(children)) => children.iter().collect(),
            Self::Operator(Operator::Translate { child, .. }) => vec![child.as_ref()],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Primitive(primitive) => primitive.name(),
            Self::Operator(operator) => operator.name(),
        }
    }

    /// Total number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(|c| c.node_count()).sum::<usize>()
    }

    /// Decode a scene tree from JSON
    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Flat wire form: `{"cylinder": {...}}`, `{"union": [...]}`,
/// `{"translate": {"offset": [x, y, z], "child": {...}}}`
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum NodeRepr {
    Cylinder(Cylinder),
    Union(Vec<SceneNode>),
    Translate { offset: Vec3, child: Box<SceneNode> },
}

impl From<NodeRepr> for SceneNode {
    fn from(repr: NodeRepr) -> Self {
        match repr {
            NodeRepr::Cylinder(cylinder) => SceneNode::Primitive(Primitive::Cylinder(cylinder)),
            NodeRepr::Union(children) => SceneNode::Operator(Operator::Union(children)),
            NodeRepr::Translate { offset, child } => {
                SceneNode::Operator(Operator::Translate { offset, child })
            }
        }
    }
}

impl From<SceneNode> for NodeRepr {
    fn from(node: SceneNode) -> Self {
        match node {
            SceneNode::Primitive(Primitive::Cylinder(cylinder)) => NodeRepr::Cylinder(cylinder),
            SceneNode::Operator(Operator::Union(children)) => NodeRepr::Union(children),
            SceneNode::Operator(Operator::Translate { offset, child }) => {
                NodeRepr::Translate { offset, child }
            }
        }
    }
}
