// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partforge Inc.

//! Error types for scene evaluation

use thiserror::Error;

/// Errors raised while validating or evaluating a scene tree
#[derive(Error, Debug)]
pub enum CsgError {
    /// A primitive has malformed parameters, or an operator is structurally
    /// invalid (for example a union with no children).
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A JSON scene description could not be decoded
    #[error("Failed to decode scene: {0}")]
    Scene(#[from] serde_json::Error),

    /// An evaluator setting is out of range
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl CsgError {
    pub fn invalid_geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry(message.into())
    }

    /// True for errors raised by the scene itself rather than the configuration
    pub fn is_invalid_geometry(&self) -> bool {
        matches!(self, Self::InvalidGeometry(_))
    }
}

pub type Result<T> = std::result::Result<T, CsgError>;
