//! Unit primitives used for decorations
//!
//! All shapes are flat shaded on construction; call
//! [`Mesh::smooth_normals`] after placing them for round shading.
use nalgebra::Point3;

use crate::geometry::{Mesh, Triangle};

/// Points around the unit circle every `step_degrees`, closed at 360.
fn ring(step_degrees: u32, z: f32) -> Vec<Point3<f32>> {
    let step = step_degrees.clamp(1, 360);
    (0..360)
        .step_by(step as usize)
        .chain(std::iter::once(0))
        .map(|degrees| {
            let angle = (degrees as f32).to_radians();
            Point3::new(angle.cos(), angle.sin(), z)
        })
        .collect()
}

/// Side wall of a radius 1 cylinder spanning z in [-0.5, 0.5]
pub fn cylinder(step_degrees: u32, capped: bool) -> Mesh {
    let bottom = ring(step_degrees, -0.5);
    let top = ring(step_degrees, 0.5);
    let mut mesh = Mesh::with_capacity(bottom.len() * 4);

    for i in 0..bottom.len() - 1 {
        let (p00, p10) = (bottom[i], bottom[i + 1]);
        let (p01, p11) = (top[i], top[i + 1]);
        mesh.add_triangle(Triangle::from_points(p00, p10, p11));
        mesh.add_triangle(Triangle::from_points(p00, p11, p01));
        if capped {
            mesh.add_triangle(Triangle::from_points(Point3::new(0.0, 0.0, -0.5), p10, p00));
            mesh.add_triangle(Triangle::from_points(Point3::new(0.0, 0.0, 0.5), p01, p11));
        }
    }
    mesh
}

/// Radius 1 cone with its base at z = -0.5 and apex at z = 0.5
pub fn cone(step_degrees: u32, capped: bool) -> Mesh {
    let base = ring(step_degrees, -0.5);
    let apex = Point3::new(0.0, 0.0, 0.5);
    let mut mesh = Mesh::with_capacity(base.len() * 2);

    for pair in base.windows(2) {
        mesh.add_triangle(Triangle::from_points(pair[0], pair[1], apex));
        if capped {
            mesh.add_triangle(Triangle::from_points(Point3::new(0.0, 0.0, -0.5), pair[1], pair[0]));
        }
    }
    mesh
}

/// Unit sphere from an icosahedron subdivided `detail` times
pub fn icosphere(detail: u32) -> Mesh {
    let t = (1.0 + 5f32.sqrt()) / 2.0;
    let corners = [
        Point3::new(-1.0, t, 0.0),
        Point3::new(1.0, t, 0.0),
        Point3::new(-1.0, -t, 0.0),
        Point3::new(1.0, -t, 0.0),
        Point3::new(0.0, -1.0, t),
        Point3::new(0.0, 1.0, t),
        Point3::new(0.0, -1.0, -t),
        Point3::new(0.0, 1.0, -t),
        Point3::new(t, 0.0, -1.0),
        Point3::new(t, 0.0, 1.0),
        Point3::new(-t, 0.0, -1.0),
        Point3::new(-t, 0.0, 1.0),
    ]
    .map(on_sphere);

    const FACES: [[usize; 3]; 20] = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    let mut faces: Vec<[Point3<f32>; 3]> = FACES
        .iter()
        .map(|&[a, b, c]| [corners[a], corners[b], corners[c]])
        .collect();

    for _ in 0..detail {
        faces = faces
            .into_iter()
            .flat_map(|[a, b, c]| {
                let ab = on_sphere(nalgebra::center(&a, &b));
                let bc = on_sphere(nalgebra::center(&b, &c));
                let ca = on_sphere(nalgebra::center(&c, &a));
                [[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]
            })
            .collect();
    }

    Mesh::from_triangles(
        faces
            .into_iter()
            .map(|[a, b, c]| Triangle::from_points(a, b, c))
            .collect(),
    )
}

fn on_sphere(p: Point3<f32>) -> Point3<f32> {
    Point3::from(p.coords.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn centroid(triangle: &Triangle) -> Vector3<f32> {
        triangle
            .vertices
            .iter()
            .fold(Vector3::zeros(), |acc, v| acc + v.position.coords)
            / 3.0
    }

    #[test]
    fn test_cylinder_walls_face_outward() {
        let mesh = cylinder(30, false);
        assert_eq!(mesh.len(), 24);
        for triangle in &mesh.triangles {
            let mut radial = centroid(triangle);
            radial.z = 0.0;
            assert!(triangle.calculate_normal().dot(&radial) > 0.0);
        }

        let bbox = mesh.bounding_box().unwrap();
        assert_relative_eq!(bbox.min.z, -0.5);
        assert_relative_eq!(bbox.max.z, 0.5);
    }

    #[test]
    fn test_capped_cylinder() {
        assert_eq!(cylinder(30, true).len(), 48);
    }

    #[test]
    fn test_cone_faces_outward() {
        let mesh = cone(30, false);
        assert_eq!(mesh.len(), 12);
        for triangle in &mesh.triangles {
            let normal = triangle.calculate_normal();
            assert!(normal.z > 0.0);
            assert!(normal.dot(&centroid(triangle)) > 0.0);
        }
    }

    #[test]
    fn test_icosphere() {
        let mesh = icosphere(2);
        assert_eq!(mesh.len(), 20 * 16);
        for vertex in mesh.vertices() {
            assert_relative_eq!(vertex.position.coords.norm(), 1.0, epsilon = 1e-5);
        }
        for triangle in &mesh.triangles {
            assert!(triangle.calculate_normal().dot(&centroid(triangle)) > 0.0);
        }
    }

    #[test]
    fn test_smoothed_sphere_normals_are_radial() {
        let mut mesh = icosphere(1);
        mesh.smooth_normals();
        for vertex in mesh.vertices() {
            assert!(vertex.normal.dot(&vertex.position.coords) > 0.95);
        }
    }
}
