// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partforge Inc.

//! End-to-end scene evaluation: hex head, translated shaft, and the bolt union

use anyhow::Result;
use approx::assert_relative_eq;
use partforge::geometry::analytics::{analyze, is_closed};
use partforge::{evaluate, Cylinder, EvalConfig, Evaluator, SceneNode, Vec3};
use std::f64::consts::PI;

fn bolt_scene() -> SceneNode {
    SceneNode::union(vec![
        SceneNode::cylinder(10.0, 5.0, 6),
        SceneNode::translate(Vec3::new(0.0, 0.0, 5.0), SceneNode::cylinder(5.0, 30.0, 64)),
    ])
}

#[test]
fn test_hex_head_alone() -> Result<()> {
    let mesh = evaluate(&SceneNode::cylinder(10.0, 5.0, 6))?;

    assert_eq!(mesh.vertex_count(), 14);
    assert_eq!(mesh.face_count(), 18);
    assert_eq!(mesh.quad_count(), 6);
    assert_eq!(mesh.triangle_count(), 12);
    assert!(mesh.is_well_formed());
    assert!(is_closed(&mesh));
    Ok(())
}

#[test]
fn test_cylinder_counts_hold_for_any_segment_count() -> Result<()> {
    for n in 3..=40u32 {
        let mesh = evaluate(&SceneNode::frustum(3.0, 2.0, 1.5, n))?;
        let n = n as usize;
        assert_eq!(mesh.vertex_count(), 2 * n + 2);
        assert_eq!(mesh.quad_count(), n);
        assert_eq!(mesh.triangle_count(), 2 * n);
    }
    Ok(())
}

#[test]
fn test_translated_shaft_is_shifted() -> Result<()> {
    let shaft = evaluate(&SceneNode::cylinder(5.0, 30.0, 64))?;
    let moved = evaluate(&SceneNode::translate(
        Vec3::new(0.0, 0.0, 5.0),
        SceneNode::cylinder(5.0, 30.0, 64),
    ))?;

    assert_eq!(moved.vertex_count(), shaft.vertex_count());
    for (before, after) in shaft.vertices.iter().zip(&moved.vertices) {
        assert_eq!(after.z, before.z + 5.0);
        assert_eq!((after.x, after.y), (before.x, before.y));
    }

    let bbox = moved.bounding_box();
    assert_relative_eq!(bbox.min.z, 5.0);
    assert_relative_eq!(bbox.max.z, 35.0);
    Ok(())
}

#[test]
fn test_translation_is_invertible() -> Result<()> {
    let offset = Vec3::new(3.25, -7.5, 12.0);
    let original = evaluate(&SceneNode::frustum(4.0, 1.5, 2.0, 9))?;
    let roundtrip = evaluate(
        &SceneNode::frustum(4.0, 1.5, 2.0, 9)
            .translated(offset)
            .translated(-offset),
    )?;

    assert_eq!(original.vertex_count(), roundtrip.vertex_count());
    for (a, b) in original.vertices.iter().zip(&roundtrip.vertices) {
        assert!((a - b).norm() < 1e-12, "{} vs {}", a, b);
    }
    assert_eq!(original.faces, roundtrip.faces);
    Ok(())
}

#[test]
fn test_bolt_union_of_touching_solids() -> Result<()> {
    let mesh = evaluate(&bolt_scene())?;

    // head and shaft only share the z = 5 plane, so the union keeps both meshes
    assert_eq!(mesh.vertex_count(), 14 + 130);
    assert_eq!(mesh.face_count(), 18 + 192);
    assert!(mesh.is_well_formed());

    let head = Cylinder::new(10.0, 5.0, 6);
    let shaft = Cylinder::new(5.0, 30.0, 64);
    let stats = analyze(&mesh);
    assert_relative_eq!(
        stats.volume,
        head.tessellated_volume() + shaft.tessellated_volume(),
        max_relative = 1e-10
    );

    // against the smooth solids the hexagonal head dominates the error
    let smooth = PI * 100.0 * 5.0 + PI * 25.0 * 30.0;
    assert!((stats.volume - smooth).abs() / smooth < 0.1);

    assert_relative_eq!(stats.bbox.min.z, 0.0);
    assert_relative_eq!(stats.bbox.max.z, 35.0);
    Ok(())
}

#[test]
fn test_bolt_union_general_path_matches_shortcut() -> Result<()> {
    let fast = evaluate(&bolt_scene())?;
    let general = Evaluator::with_config(EvalConfig {
        disjoint_shortcut: false,
        ..EvalConfig::default()
    })
    .evaluate(&bolt_scene())?;

    let (fast, general) = (analyze(&fast), analyze(&general));
    assert_relative_eq!(fast.volume, general.volume, max_relative = 1e-6);
    assert!(fast.bbox.approx_eq(&general.bbox, 1e-9));
    Ok(())
}

#[test]
fn test_invalid_scenes_fail() {
    let cases = vec![
        SceneNode::cylinder(10.0, 0.0, 6),
        SceneNode::cylinder(-1.0, 5.0, 6),
        SceneNode::cylinder(10.0, 5.0, 2),
        SceneNode::cylinder(10.0, 5.0, u32::MAX),
        SceneNode::union(vec![]),
        SceneNode::union(vec![
            SceneNode::cylinder(10.0, 5.0, 6),
            SceneNode::cylinder(5.0, 30.0, 64).up(f64::INFINITY),
        ]),
    ];

    for scene in cases {
        let err = evaluate(&scene).unwrap_err();
        assert!(err.is_invalid_geometry(), "{:?} -> {}", scene, err);
    }
}
