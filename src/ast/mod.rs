// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partforge Inc.

//! Scene tree module
//!
//! Defines the declarative tree of primitives and operators and the
//! evaluator that turns it into a mesh

mod node;
mod evaluator;
mod validate;

pub use node::{Operator, SceneNode, Vec3};
pub use evaluator::Evaluator;
pub use validate::validate;
