// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partforge Inc.

//! CSG (Constructive Solid Geometry) union using BSP trees
//!
//! Both operands are turned into convex planar polygons, partitioned into
//! BSP trees, and clipped against each other so that only the boundary of
//! the combined solid survives. The polygons are then welded back into an
//! indexed [`Mesh`].

use super::{Face, Mesh};
use ahash::AHashMap;
use nalgebra::{Point3, Vector3};

const COPLANAR: u8 = 0;
const FRONT: u8 = 1;
const BACK: u8 = 2;
const SPANNING: u8 = 3;

#[derive(Debug, Clone)]
struct Plane {
    normal: Vector3<f64>,
    w: f64,
}

impl Plane {
    /// Plane through a polygon, using Newell's method so any convex polygon works
    fn from_polygon(points: &[Point3<f64>]) -> Option<Self> {
        let mut normal = Vector3::zeros();
        for (i, p) in points.iter().enumerate() {
            let q = &points[(i + 1) % points.len()];
            normal.x += (p.y - q.y) * (p.z + q.z);
            normal.y += (p.z - q.z) * (p.x + q.x);
            normal.z += (p.x - q.x) * (p.y + q.y);
        }
        let normal = normal.try_normalize(f64::EPSILON)?;
        let centroid = points.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords)
            / points.len() as f64;
        Some(Self {
            w: normal.dot(&centroid),
            normal,
        })
    }

    fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    fn orient(&self, point: &Point3<f64>, epsilon: f64) -> u8 {
        let distance = self.normal.dot(&point.coords) - self.w;
        if distance < -epsilon {
            BACK
        } else if distance > epsilon {
            FRONT
        } else {
            COPLANAR
        }
    }

    /// Split `polygon` by this plane. Coplanar polygons go to the front or
    /// back list depending on whether they face the same way as the plane.
    fn split_polygon(
        &self,
        polygon: &Polygon,
        epsilon: f64,
        coplanar_front: &mut Vec<Polygon>,
        coplanar_back: &mut Vec<Polygon>,
        front: &mut Vec<Polygon>,
        back: &mut Vec<Polygon>,
    ) {
        let types: Vec<u8> = polygon
            .vertices
            .iter()
            .map(|v| self.orient(v, epsilon))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            }
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let count = polygon.vertices.len();
                let mut f = Vec::with_capacity(count + 1);
                let mut b = Vec::with_capacity(count + 1);

                for i in 0..count {
                    let j = (i + 1) % count;
                    let (ti, tj) = (types[i], types[j]);
                    let vi = polygon.vertices[i];
                    let vj = polygon.vertices[j];

                    if ti != BACK {
                        f.push(vi);
                    }
                    if ti != FRONT {
                        b.push(vi);
                    }
                    if ti | tj == SPANNING {
                        let denom = self.normal.dot(&(vj - vi));
                        if denom.abs() > f64::EPSILON {
                            let t = (self.w - self.normal.dot(&vi.coords)) / denom;
                            let v = vi + (vj - vi) * t;
                            f.push(v);
                            b.push(v);
                        }
                    }
                }

                if f.len() >= 3 {
                    front.push(Polygon::with_plane(f, polygon.plane.clone()));
                }
                if b.len() >= 3 {
                    back.push(Polygon::with_plane(b, polygon.plane.clone()));
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Polygon {
    vertices: Vec<Point3<f64>>,
    plane: Plane,
}

impl Polygon {
    fn new(vertices: Vec<Point3<f64>>) -> Option<Self> {
        let plane = Plane::from_polygon(&vertices)?;
        Some(Self { vertices, plane })
    }

    fn with_plane(vertices: Vec<Point3<f64>>, plane: Plane) -> Self {
        Self { vertices, plane }
    }

    fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }
}

/// BSP tree node for CSG operations
#[derive(Debug, Default)]
struct BspNode {
    plane: Option<Plane>,
    front: Option<Box<BspNode>>,
    back: Option<Box<BspNode>>,
    polygons: Vec<Polygon>,
}

impl BspNode {
    fn new(polygons: Vec<Polygon>, epsilon: f64) -> Self {
        let mut node = Self::default();
        node.build(polygons, epsilon);
        node
    }

    fn build(&mut self, polygons: Vec<Polygon>, epsilon: f64) {
        let Some(first) = polygons.first() else {
            return;
        };
        let plane = self.plane.get_or_insert_with(|| first.plane.clone()).clone();

        let mut front = Vec::new();
        let mut back = Vec::new();
        let mut coplanar = Vec::new();
        for polygon in &polygons {
            // both coplanar lists stay at this node
            let mut coplanar_back = Vec::new();
            plane.split_polygon(polygon, epsilon, &mut coplanar, &mut coplanar_back, &mut front, &mut back);
            coplanar.append(&mut coplanar_back);
        }
        self.polygons.append(&mut coplanar);

        if !front.is_empty() {
            self.front
                .get_or_insert_with(Box::default)
                .build(front, epsilon);
        }
        if !back.is_empty() {
            self.back
                .get_or_insert_with(Box::default)
                .build(back, epsilon);
        }
    }

    /// Convert solid space to empty space and vice versa
    fn invert(&mut self) {
        for polygon in &mut self.polygons {
            polygon.flip();
        }
        if let Some(ref mut plane) = self.plane {
            plane.flip();
        }
        if let Some(ref mut front) = self.front {
            front.invert();
        }
        if let Some(ref mut back) = self.back {
            back.invert();
        }
        std::mem::swap(&mut self.front, &mut self.back);
    }

    /// Remove the parts of `polygons` that lie inside the solid this tree bounds
    fn clip_polygons(&self, polygons: Vec<Polygon>, epsilon: f64) -> Vec<Polygon> {
        let Some(ref plane) = self.plane else {
            return polygons;
        };

        let mut front = Vec::new();
        let mut back = Vec::new();
        for polygon in &polygons {
            let (mut coplanar_front, mut coplanar_back) = (Vec::new(), Vec::new());
            plane.split_polygon(
                polygon,
                epsilon,
                &mut coplanar_front,
                &mut coplanar_back,
                &mut front,
                &mut back,
            );
            front.append(&mut coplanar_front);
            back.append(&mut coplanar_back);
        }

        let mut result = match self.front {
            Some(ref node) => node.clip_polygons(front, epsilon),
            None => front,
        };
        if let Some(ref node) = self.back {
            result.extend(node.clip_polygons(back, epsilon));
        }
        result
    }

    /// Remove all polygons in this tree that are inside the other tree
    fn clip_to(&mut self, other: &BspNode, epsilon: f64) {
        let polygons = std::mem::take(&mut self.polygons);
        self.polygons = other.clip_polygons(polygons, epsilon);
        if let Some(ref mut front) = self.front {
            front.clip_to(other, epsilon);
        }
        if let Some(ref mut back) = self.back {
            back.clip_to(other, epsilon);
        }
    }

    fn all_polygons(&self) -> Vec<Polygon> {
        let mut result = self.polygons.clone();
        if let Some(ref front) = self.front {
            result.extend(front.all_polygons());
        }
        if let Some(ref back) = self.back {
            result.extend(back.all_polygons());
        }
        result
    }
}

fn mesh_to_polygons(mesh: &Mesh) -> Vec<Polygon> {
    mesh.faces
        .iter()
        .filter_map(|face| Polygon::new(face.indices.iter().map(|&i| mesh.vertices[i]).collect()))
        .collect()
}

/// Weld polygon corners that fall into the same `tolerance` grid cell and
/// rebuild an indexed mesh. Corners that collapse onto their neighbour are
/// dropped; faces left with fewer than three corners are discarded.
fn polygons_to_mesh(polygons: &[Polygon], tolerance: f64) -> Mesh {
    let mut mesh = Mesh::with_capacity(polygons.len() * 2, polygons.len());
    let mut lookup: AHashMap<[i64; 3], usize> = AHashMap::new();

    for polygon in polygons {
        let mut indices: Vec<usize> = Vec::with_capacity(polygon.vertices.len());
        for vertex in &polygon.vertices {
            let key = [
                (vertex.x / tolerance).round() as i64,
                (vertex.y / tolerance).round() as i64,
                (vertex.z / tolerance).round() as i64,
            ];
            let index = *lookup
                .entry(key)
                .or_insert_with(|| mesh.add_vertex(*vertex));
            if indices.last() != Some(&index) {
                indices.push(index);
            }
        }
        while indices.len() > 1 && indices.first() == indices.last() {
            indices.pop();
        }
        if indices.len() < 3 {
            continue;
        }

        let face = Face::new(indices);
        if mesh.face_normal(&face).norm() > tolerance * tolerance {
            mesh.add_face(face);
        }
    }

    mesh
}

/// Boolean union of two closed meshes.
///
/// `epsilon` is the plane classification tolerance; `weld_tolerance` the grid
/// used to merge coincident output vertices.
pub fn csg_union(a: &Mesh, b: &Mesh, epsilon: f64, weld_tolerance: f64) -> Mesh {
    let mut tree_a = BspNode::new(mesh_to_polygons(a), epsilon);
    let mut tree_b = BspNode::new(mesh_to_polygons(b), epsilon);

    tree_a.clip_to(&tree_b, epsilon);
    tree_b.clip_to(&tree_a, epsilon);
    // drop the parts of B that are coplanar with A's surface and face the same way
    tree_b.invert();
    tree_b.clip_to(&tree_a, epsilon);
    tree_b.invert();
    tree_a.build(tree_b.all_polygons(), epsilon);

    polygons_to_mesh(&tree_a.all_polygons(), weld_tolerance)
}
