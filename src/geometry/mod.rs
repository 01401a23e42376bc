// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partforge Inc.

//! Geometry module - mesh representation and operations

mod primitives;
mod mesh;
mod boolean;
mod bbox;
mod csg;
pub mod analytics;

pub use primitives::{Cylinder, Primitive, MAX_RADIAL_SEGMENTS};
pub use mesh::{Face, Mesh};
pub use boolean::{union, union_with_path, UnionPath};
pub use bbox::BoundingBox;
pub use csg::csg_union;
pub use analytics::{analyze, GeometryStats};
