/// Primitive shapes and their tessellation into vertex batches
use nalgebra::{Point3, Vector3};

use crate::error::GeometryError;

/// Rim radius of the cone fan, in model units
pub const CONE_RADIUS: f32 = 10.0 / 100.0;

/// Default segment count for swept shapes
pub const DEFAULT_SEGMENTS: u32 = 20;

/// Largest segment count a fan may be tessellated with
pub const MAX_SEGMENTS: u32 = 4096;

/// How a vertex batch is assembled by the pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// One GPU point per vertex, `size` pixels wide
    Points { size: f32 },
    /// Every three vertices form a triangle
    Triangles,
}

/// A triangle face defined by three positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Point3<f32>; 3],
}

impl Triangle {
    pub fn new(v0: Point3<f32>, v1: Point3<f32>, v2: Point3<f32>) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let [v0, v1, v2] = self.vertices;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }
}

/// A shape descriptor, in the shape's own model space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Point { position: Point3<f32>, size: f32 },
    Triangle { vertices: [Point3<f32>; 3] },
    /// A fan of `segments` triangles with radius `size / 100`, in the XY plane.
    /// Fractional segment counts are truncated.
    Circle {
        center: Point3<f32>,
        size: f32,
        segments: f32,
    },
    /// The unit cube centered on the origin
    Box,
    /// A flat fan around the Y axis with rim radius [`CONE_RADIUS`].
    ///
    /// This is a disk in the XZ plane, not a capped cylinder.
    Cone { segments: f32 },
}

/// Vertices ready for a single pipeline submission
#[derive(Debug, Clone, PartialEq)]
pub struct VertexBatch {
    pub primitive: Primitive,
    pub vertices: Vec<Point3<f32>>,
}

impl VertexBatch {
    fn triangles(capacity: usize) -> Self {
        Self {
            primitive: Primitive::Triangles,
            vertices: Vec::with_capacity(capacity * 3),
        }
    }

    fn push_triangle(&mut self, v0: Point3<f32>, v1: Point3<f32>, v2: Point3<f32>) {
        self.vertices.extend_from_slice(&[v0, v1, v2]);
    }

    /// Iterate the batch as triangles. Empty for point batches.
    pub fn iter_triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        let chunks = match self.primitive {
            Primitive::Triangles => self.vertices.chunks_exact(3),
            Primitive::Points { .. } => self.vertices[..0].chunks_exact(3),
        };
        chunks.map(|c| Triangle::new(c[0], c[1], c[2]))
    }

    pub fn triangle_count(&self) -> usize {
        match self.primitive {
            Primitive::Triangles => self.vertices.len() / 3,
            Primitive::Points { .. } => 0,
        }
    }
}

/// Tessellate a shape into a batch of model-space vertices
pub fn tessellate(shape: &Shape) -> Result<VertexBatch, GeometryError> {
    match *shape {
        Shape::Point { position, size } => {
            check_size(size)?;
            Ok(VertexBatch {
                primitive: Primitive::Points { size },
                vertices: vec![position],
            })
        }
        Shape::Triangle { vertices } => Ok(VertexBatch {
            primitive: Primitive::Triangles,
            vertices: vertices.to_vec(),
        }),
        Shape::Circle {
            center,
            size,
            segments,
        } => {
            check_size(size)?;
            let n = segment_count(segments)?;
            Ok(circle(center, size / 100.0, n))
        }
        Shape::Box => Ok(unit_box()),
        Shape::Cone { segments } => Ok(cone(segment_count(segments)?)),
    }
}

fn check_size(size: f32) -> Result<(), GeometryError> {
    if size.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::NonFiniteSize(size))
    }
}

/// Truncate a segment count, rejecting anything that cannot close a fan
fn segment_count(segments: f32) -> Result<usize, GeometryError> {
    if !segments.is_finite() || segments.trunc() < 3.0 {
        return Err(GeometryError::TooFewSegments { segments });
    }
    if segments.trunc() > MAX_SEGMENTS as f32 {
        return Err(GeometryError::TooManySegments { segments });
    }
    Ok(segments.trunc() as usize)
}

/// Unit-circle direction for fan step `i` out of `n`
fn fan_direction(i: usize, n: usize) -> (f32, f32) {
    let step = 360.0 / n as f32;
    let radians = (i as f32 * step).to_radians();
    (radians.cos(), radians.sin())
}

fn circle(center: Point3<f32>, radius: f32, n: usize) -> VertexBatch {
    let mut batch = VertexBatch::triangles(n);
    let rim = |i| {
        let (c, s) = fan_direction(i, n);
        Point3::new(center.x + c * radius, center.y + s * radius, center.z)
    };
    for i in 0..n {
        batch.push_triangle(center, rim(i), rim(i + 1));
    }
    batch
}

fn cone(n: usize) -> VertexBatch {
    let mut batch = VertexBatch::triangles(n);
    let origin = Point3::origin();
    let rim = |i| {
        let (c, s) = fan_direction(i, n);
        Point3::new(c * CONE_RADIUS, 0.0, s * CONE_RADIUS)
    };
    for i in 0..n {
        batch.push_triangle(origin, rim(i), rim(i + 1));
    }
    batch
}

/// Two outward-wound triangles per face of the centered unit cube
fn unit_box() -> VertexBatch {
    let mut batch = VertexBatch::triangles(12);
    for axis in 0..3 {
        for outward in [1.0f32, -1.0] {
            let normal = Vector3::ith(axis, outward);
            let mut u = Vector3::ith((axis + 1) % 3, 0.5);
            let mut v = Vector3::ith((axis + 2) % 3, 0.5);
            if outward < 0.0 {
                std::mem::swap(&mut u, &mut v);
            }
            // u × v points along the face normal
            let center = Point3::from(normal * 0.5);
            let corners = [center - u - v, center + u - v, center + u + v, center - u + v];
            batch.push_triangle(corners[0], corners[1], corners[2]);
            batch.push_triangle(corners[0], corners[2], corners[3]);
        }
    }
    batch
}
