/// The rendering-pipeline seam and a recording implementation
use nalgebra::Point3;

use crate::geometry::Primitive;
use crate::pose::Rgba;

/// A sink for immediate-mode draws.
///
/// Uniforms are set before each submission and stay bound until changed.
/// Submission is infallible at this layer.
pub trait Pipeline {
    /// World rotation shared by every draw in the frame
    fn set_global_transform(&mut self, cells: &[f32; 16]);

    fn set_uniform_color(&mut self, r: f32, g: f32, b: f32, a: f32);

    /// Model transform for the next submissions
    fn set_uniform_transform(&mut self, cells: &[f32; 16]);

    fn submit_vertices(&mut self, primitive: Primitive, vertices: &[Point3<f32>]);
}

/// One recorded submission with the uniforms bound at the time
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub primitive: Primitive,
    pub color: Rgba,
    pub global: [f32; 16],
    pub transform: [f32; 16],
    pub vertices: Vec<Point3<f32>>,
}

/// A pipeline that records draws instead of rasterizing them
#[derive(Debug, Clone)]
pub struct DrawList {
    global: [f32; 16],
    color: Rgba,
    transform: [f32; 16],
    calls: Vec<DrawCall>,
}

const IDENTITY: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

impl DrawList {
    pub fn new() -> Self {
        Self {
            global: IDENTITY,
            color: [1.0; 4],
            transform: IDENTITY,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Drop recorded calls, keeping the bound uniforms
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline for DrawList {
    fn set_global_transform(&mut self, cells: &[f32; 16]) {
        self.global = *cells;
    }

    fn set_uniform_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.color = [r, g, b, a];
    }

    fn set_uniform_transform(&mut self, cells: &[f32; 16]) {
        self.transform = *cells;
    }

    fn submit_vertices(&mut self, primitive: Primitive, vertices: &[Point3<f32>]) {
        self.calls.push(DrawCall {
            primitive,
            color: self.color,
            global: self.global,
            transform: self.transform,
            vertices: vertices.to_vec(),
        });
    }
}
