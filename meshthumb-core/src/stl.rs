//! STL file parser for binary and ASCII formats
use std::fs;
use std::path::Path;

use nalgebra::Point3;
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::{count, many0},
    number::complete::{float, le_f32, le_u16, le_u32},
    sequence::preceded,
    IResult,
};

use crate::error::MeshError;
use crate::geometry::{Mesh, Triangle};

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// Read and parse an STL file from disk
pub fn load_stl<P: AsRef<Path>>(path: P) -> Result<Mesh, MeshError> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|source| MeshError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mesh = parse_stl(&data)?;
    log::debug!("parsed {} triangles from {}", mesh.len(), path.display());
    Ok(mesh)
}

/// Parse a binary STL file.
///
/// Facet normals stored in the file are ignored and recomputed from the
/// vertex winding.
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, MeshError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(MeshError::Parse("file too small to be a valid STL".to_string()));
    }

    let body = &data[HEADER_LEN..];
    let (body, triangle_count) = le_u32::<_, ()>(body)
        .map_err(|_| MeshError::Parse("missing triangle count".to_string()))?;
    let expected = triangle_count as usize;
    let found = body.len() / FACET_LEN;
    if found < expected {
        return Err(MeshError::Truncated { expected, found });
    }

    let (_, triangles) = count(parse_binary_facet, expected)(body)
        .map_err(|e| MeshError::Parse(format!("binary facet: {e:?}")))?;
    Ok(Mesh::from_triangles(triangles))
}

fn parse_binary_facet(input: &[u8]) -> IResult<&[u8], Triangle> {
    let (input, _normal) = take(12usize)(input)?;
    let (input, p0) = parse_binary_point(input)?;
    let (input, p1) = parse_binary_point(input)?;
    let (input, p2) = parse_binary_point(input)?;
    let (input, _attributes) = le_u16(input)?;
    Ok((input, Triangle::from_points(p0, p1, p2)))
}

fn parse_binary_point(input: &[u8]) -> IResult<&[u8], Point3<f32>> {
    let (input, x) = le_f32(input)?;
    let (input, y) = le_f32(input)?;
    let (input, z) = le_f32(input)?;
    Ok((input, Point3::new(x, y, z)))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, MeshError> {
    match parse_ascii_stl_impl(input) {
        Ok((_, mesh)) => Ok(mesh),
        Err(e) => Err(MeshError::Parse(format!("ASCII STL: {e:?}"))),
    }
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, Mesh> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _name) = not_line_ending(input)?;
    let (input, triangles) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;

    Ok((input, Mesh::from_triangles(triangles)))
}

fn parse_facet(input: &str) -> IResult<&str, Triangle> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, p0) = parse_vertex(input)?;
    let (input, p1) = parse_vertex(input)?;
    let (input, p2) = parse_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, Triangle::from_points(p0, p1, p2)))
}

fn parse_vertex(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    parse_vector3(input)
}

fn parse_vector3(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, Point3::new(x, y, z)))
}

/// Detect and parse STL file (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Mesh, MeshError> {
    // Binary headers may also start with "solid"
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }

    parse_binary_stl(data)
}

/// Encode a mesh as binary STL
pub fn to_binary_stl(mesh: &Mesh) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + 4 + mesh.len() * FACET_LEN);
    out.extend_from_slice(&[0u8; HEADER_LEN]);
    out.extend_from_slice(&(mesh.len() as u32).to_le_bytes());
    for triangle in &mesh.triangles {
        let normal = triangle.calculate_normal();
        let points = triangle.vertices.iter().flat_map(|v| {
            let p = v.position;
            [p.x, p.y, p.z]
        });
        for component in normal.iter().copied().chain(points) {
            out.extend_from_slice(&component.to_le_bytes());
        }
        out.extend_from_slice(&0u16.to_le_bytes());
    }
    out
}
