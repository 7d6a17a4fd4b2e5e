//! Geometry primitives: vertices, triangles, meshes and their bounding boxes
use std::collections::HashMap;

use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

use crate::error::MeshError;

/// Extents below this are treated as zero when fitting a mesh.
const EXTENT_EPSILON: f32 = 1e-9;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Build a flat-shaded triangle; every vertex gets the face normal.
    pub fn from_points(p0: Point3<f32>, p1: Point3<f32>, p2: Point3<f32>) -> Self {
        let mut triangle = Self::new(
            Vertex::new(p0, Vector3::zeros()),
            Vertex::new(p1, Vector3::zeros()),
            Vertex::new(p2, Vector3::zeros()),
        );
        triangle.fix_normals();
        triangle
    }

    /// Calculate the face normal from the triangle's vertices.
    ///
    /// Counter-clockwise winding faces the viewer. Degenerate triangles
    /// yield a zero vector.
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1
            .cross(&edge2)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Replace the vertex normals with the face normal
    pub fn fix_normals(&mut self) {
        let normal = self.calculate_normal();
        for vertex in &mut self.vertices {
            vertex.normal = normal;
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl BoundingBox {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// The [-1, 1] cube on every axis
    pub fn bi_unit() -> Self {
        Self::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn is_finite(&self) -> bool {
        self.min.iter().chain(self.max.iter()).all(|c| c.is_finite())
    }

    pub fn contains(&self, point: &Point3<f32>, tolerance: f32) -> bool {
        (0..3).all(|i| {
            point[i] >= self.min[i] - tolerance && point[i] <= self.max[i] + tolerance
        })
    }

    fn extend(&mut self, point: &Point3<f32>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.triangles.iter().flat_map(|t| t.vertices.iter())
    }

    /// Bounding box of every vertex, `None` for an empty mesh
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut vertices = self.vertices();
        let first = vertices.next()?.position;
        let mut bbox = BoundingBox::new(first, first);
        for vertex in vertices {
            bbox.extend(&vertex.position);
        }
        Some(bbox)
    }

    /// Apply `matrix` to every position.
    ///
    /// Normals go through the inverse transpose of the linear part, so they
    /// stay perpendicular to the surface under non-uniform scales. A singular
    /// linear part falls back to transforming normals directly.
    pub fn transform(&mut self, matrix: &Matrix4<f32>) {
        let linear: Matrix3<f32> = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let normal_matrix = linear
            .try_inverse()
            .map(|inverse| inverse.transpose())
            .unwrap_or(linear);
        for triangle in &mut self.triangles {
            for vertex in &mut triangle.vertices {
                vertex.position = matrix.transform_point(&vertex.position);
                vertex.normal = (normal_matrix * vertex.normal)
                    .try_normalize(f32::EPSILON)
                    .unwrap_or_else(Vector3::zeros);
            }
        }
    }

    /// Average the face normals of all triangles sharing a vertex position.
    pub fn smooth_normals(&mut self) {
        let mut lookup: HashMap<[u32; 3], Vector3<f32>> = HashMap::new();
        for triangle in &self.triangles {
            let normal = triangle.calculate_normal();
            for vertex in &triangle.vertices {
                *lookup
                    .entry(position_key(&vertex.position))
                    .or_insert_with(Vector3::zeros) += normal;
            }
        }

        for triangle in &mut self.triangles {
            for vertex in &mut triangle.vertices {
                if let Some(sum) = lookup.get(&position_key(&vertex.position)) {
                    vertex.normal = sum.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros);
                }
            }
        }
    }

    /// Uniformly scale and translate the mesh so it fits inside `target`.
    ///
    /// `anchor` places the leftover space per axis: 0 aligns with
    /// `target.min`, 0.5 centers, 1 aligns with `target.max`. Axes with no
    /// extent do not constrain the scale. Returns the applied matrix.
    pub fn fit_inside(
        &mut self,
        target: &BoundingBox,
        anchor: &Vector3<f32>,
    ) -> Result<Matrix4<f32>, MeshError> {
        let bbox = self.checked_bounding_box()?;
        let size = bbox.size();
        let target_size = target.size();

        let scale = (0..3)
            .filter(|&i| size[i] > EXTENT_EPSILON)
            .map(|i| target_size[i] / size[i])
            .fold(None, |acc: Option<f32>, s| Some(acc.map_or(s, |a| a.min(s))))
            .ok_or(MeshError::Degenerate)?;

        let extra = target_size - size * scale;
        let offset = target.min.coords + extra.component_mul(anchor);

        let matrix = Matrix4::new_translation(&offset)
            * Matrix4::new_scaling(scale)
            * Matrix4::new_translation(&-bbox.min.coords);
        self.transform(&matrix);
        Ok(matrix)
    }

    /// Fit the mesh in a bi-unit cube centered at the origin
    pub fn bi_unit_cube(&mut self) -> Result<Matrix4<f32>, MeshError> {
        self.fit_inside(&BoundingBox::bi_unit(), &Vector3::repeat(0.5))
    }

    /// Scale about the origin until the farthest coordinate reaches ±1.
    ///
    /// No translation is applied, so the mesh keeps its placement relative
    /// to the origin.
    pub fn unit_scale(&mut self) -> Result<Matrix4<f32>, MeshError> {
        let bbox = self.checked_bounding_box()?;

        let scale = (0..3)
            .map(|i| bbox.min[i].abs().max(bbox.max[i].abs()))
            .filter(|&reach| reach > EXTENT_EPSILON)
            .map(|reach| 1.0 / reach)
            .fold(None, |acc: Option<f32>, s| Some(acc.map_or(s, |a| a.min(s))))
            .ok_or(MeshError::Degenerate)?;

        let matrix = Matrix4::new_scaling(scale);
        self.transform(&matrix);
        Ok(matrix)
    }

    fn checked_bounding_box(&self) -> Result<BoundingBox, MeshError> {
        match self.bounding_box() {
            Some(bbox) if bbox.is_finite() => Ok(bbox),
            _ => Err(MeshError::Degenerate),
        }
    }

    /// Axis-aligned cube of edge `size` centered at the origin
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let corners = [
            Point3::new(-h, -h, -h),
            Point3::new(h, -h, -h),
            Point3::new(h, h, -h),
            Point3::new(-h, h, -h),
            Point3::new(-h, -h, h),
            Point3::new(h, -h, h),
            Point3::new(h, h, h),
            Point3::new(-h, h, h),
        ];
        // Counter-clockwise when seen from outside
        const FACES: [[usize; 4]; 6] = [
            [4, 5, 6, 7], // +z
            [0, 3, 2, 1], // -z
            [3, 7, 6, 2], // +y
            [0, 1, 5, 4], // -y
            [1, 2, 6, 5], // +x
            [0, 4, 7, 3], // -x
        ];

        let mut mesh = Self::with_capacity(12);
        for [a, b, c, d] in FACES {
            mesh.add_triangle(Triangle::from_points(corners[a], corners[b], corners[c]));
            mesh.add_triangle(Triangle::from_points(corners[a], corners[c], corners[d]));
        }
        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash key for a position; `-0.0` and `0.0` map to the same key.
fn position_key(p: &Point3<f32>) -> [u32; 3] {
    [
        (p.x + 0.0).to_bits(),
        (p.y + 0.0).to_bits(),
        (p.z + 0.0).to_bits(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_inside_bi_unit(mesh: &Mesh) {
        let cube = BoundingBox::bi_unit();
        for vertex in mesh.vertices() {
            assert!(cube.contains(&vertex.position, 1e-5), "{:?}", vertex.position);
        }
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let mesh = Mesh::cube(2.0);
        assert_eq!(mesh.len(), 12);
        for triangle in &mesh.triangles {
            let centroid = triangle
                .vertices
                .iter()
                .fold(Vector3::zeros(), |acc, v| acc + v.position.coords)
                / 3.0;
            assert!(triangle.calculate_normal().dot(&centroid) > 0.0);
        }
    }

    #[test]
    fn test_bounding_box() {
        let mesh = Mesh::cube(2.0);
        let bbox = mesh.bounding_box().unwrap();
        assert_eq!(bbox.min, Point3::new(-1.0, -1.0, -1.0));
        assert_eq!(bbox.max, Point3::new(1.0, 1.0, 1.0));
        assert!(Mesh::new().bounding_box().is_none());
    }

    #[test]
    fn test_bi_unit_cube_centers_and_fits() {
        let mut mesh = Mesh::cube(1.0);
        mesh.transform(&Matrix4::new_nonuniform_scaling(&Vector3::new(4.0, 1.0, 2.0)));
        mesh.transform(&Matrix4::new_translation(&Vector3::new(10.0, -3.0, 7.0)));

        mesh.bi_unit_cube().unwrap();

        assert_inside_bi_unit(&mesh);
        let bbox = mesh.bounding_box().unwrap();
        assert_relative_eq!(bbox.center(), Point3::origin(), epsilon = 1e-5);
        // the longest axis is the binding one
        assert_relative_eq!(bbox.size(), Vector3::new(2.0, 0.5, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_bi_unit_cube_flat_mesh() {
        let mut mesh = Mesh::new();
        mesh.add_triangle(Triangle::from_points(
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(4.0, 0.0, 5.0),
            Point3::new(0.0, 2.0, 5.0),
        ));

        mesh.bi_unit_cube().unwrap();

        let bbox = mesh.bounding_box().unwrap();
        assert_relative_eq!(bbox.min, Point3::new(-1.0, -0.5, 0.0), epsilon = 1e-5);
        assert_relative_eq!(bbox.max, Point3::new(1.0, 0.5, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_unit_scale_keeps_position() {
        let mut mesh = Mesh::new();
        mesh.add_triangle(Triangle::from_points(
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(4.0, 1.0, 0.0),
            Point3::new(1.0, -2.0, 1.0),
        ));
        let before: Vec<_> = mesh.vertices().map(|v| v.position).collect();

        let matrix = mesh.unit_scale().unwrap();

        assert_relative_eq!(matrix[(0, 0)], 0.25);
        let translation = Vector3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)]);
        assert_eq!(translation.norm(), 0.0);
        assert_inside_bi_unit(&mesh);
        for (old, new) in before.iter().zip(mesh.vertices()) {
            assert_relative_eq!(new.position.coords, old.coords * 0.25, epsilon = 1e-6);
        }
        let bbox = mesh.bounding_box().unwrap();
        assert_relative_eq!(bbox.max.x, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_unit_scale_uses_negative_extent() {
        let mut mesh = Mesh::new();
        mesh.add_triangle(Triangle::from_points(
            Point3::new(-8.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ));

        mesh.unit_scale().unwrap();

        let bbox = mesh.bounding_box().unwrap();
        assert_relative_eq!(bbox.min.x, -1.0, epsilon = 1e-6);
        assert_relative_eq!(bbox.max.y, 0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_meshes_are_rejected() {
        assert!(matches!(Mesh::new().bi_unit_cube(), Err(MeshError::Degenerate)));

        let point = Point3::new(3.0, 3.0, 3.0);
        let mut mesh = Mesh::from_triangles(vec![Triangle::from_points(point, point, point)]);
        assert!(matches!(mesh.bi_unit_cube(), Err(MeshError::Degenerate)));

        let origin = Point3::origin();
        let mut mesh = Mesh::from_triangles(vec![Triangle::from_points(origin, origin, origin)]);
        assert!(matches!(mesh.unit_scale(), Err(MeshError::Degenerate)));
    }

    #[test]
    fn test_smooth_normals_average_shared_positions() {
        let mut mesh = Mesh::cube(2.0);
        mesh.smooth_normals();
        for vertex in mesh.vertices() {
            assert_relative_eq!(vertex.normal.norm(), 1.0, epsilon = 1e-5);
            // corners blend the three adjacent faces
            assert!(vertex.normal.dot(&vertex.position.coords) > 1.0);
            assert!(vertex.normal.iter().all(|c| c.abs() > 0.1));
        }

        // vertices at the same position end up with the same normal
        let corner = Point3::new(1.0, 1.0, 1.0);
        let normals: Vec<_> = mesh
            .vertices()
            .filter(|v| v.position == corner)
            .map(|v| v.normal)
            .collect();
        assert!(normals.len() > 1);
        assert!(normals.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_transform_keeps_normals_perpendicular_under_stretch() {
        // a slanted face: its flat normal must still match after stretching x
        let mut mesh = Mesh::from_triangles(vec![Triangle::from_points(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 1.0, 0.0),
        )]);
        mesh.transform(&Matrix4::new_nonuniform_scaling(&Vector3::new(4.0, 1.0, 1.0)));

        let triangle = &mesh.triangles[0];
        let expected = triangle.calculate_normal();
        for vertex in &triangle.vertices {
            assert_relative_eq!(vertex.normal, expected, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_transform_rotates_normals() {
        let mut mesh = Mesh::cube(2.0);
        let rotation = Matrix4::from_scaled_axis(Vector3::z() * std::f32::consts::FRAC_PI_2);
        mesh.transform(&rotation);
        for triangle in &mesh.triangles {
            assert_relative_eq!(
                triangle.vertices[0].normal,
                triangle.calculate_normal(),
                epsilon = 1e-5
            );
        }
    }
}
