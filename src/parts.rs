// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partforge Inc.

//! Parametric part builders producing scene trees

use crate::ast::SceneNode;
use crate::config::EvalConfig;
use crate::error::{CsgError, Result};
use serde::{Deserialize, Serialize};

/// Bolt with a hexagonal head and a cylindrical shaft.
///
/// The head sits on z = 0 and the shaft starts on top of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoltParams {
    pub head_radius: f64,
    pub head_height: f64,
    pub bolt_radius: f64,
    pub bolt_length: f64,
    /// 0 selects the configured default
    pub shaft_segments: u32,
}

impl Default for BoltParams {
    fn default() -> Self {
        Self {
            head_radius: 10.0,
            head_height: 5.0,
            bolt_radius: 5.0,
            bolt_length: 30.0,
            shaft_segments: 100,
        }
    }
}

const HEX_SEGMENTS: u32 = 6;

impl BoltParams {
    fn check(&self) -> Result<()> {
        let dims = [
            ("head_radius", self.head_radius),
            ("head_height", self.head_height),
            ("bolt_radius", self.bolt_radius),
            ("bolt_length", self.bolt_length),
        ];
        for (name, value) in dims {
            if !(value.is_finite() && value > 0.0) {
                return Err(CsgError::invalid_geometry(format!(
                    "bolt {} must be positive, got {}",
                    name, value
                )));
            }
        }
        if self.bolt_radius >= self.head_radius {
            return Err(CsgError::invalid_geometry(format!(
                "bolt radius {} must be smaller than head radius {}",
                self.bolt_radius, self.head_radius
            )));
        }
        Ok(())
    }
}

/// Build the bolt scene: `union(hex head, shaft translated up by head height)`
pub fn bolt(params: &BoltParams, config: &EvalConfig) -> Result<SceneNode> {
    params.check()?;

    let head = SceneNode::cylinder(params.head_radius, params.head_height, HEX_SEGMENTS);
    let shaft = SceneNode::cylinder(
        params.bolt_radius,
        params.bolt_length,
        config.segments_or_default(params.shaft_segments),
    );

    Ok(head.add(shaft.up(params.head_height)))
}
