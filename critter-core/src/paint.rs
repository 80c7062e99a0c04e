/// A 2D paint canvas in clip coordinates, drawn through the same pipeline
use log::debug;
use nalgebra::Point3;

use crate::error::GeometryError;
use crate::geometry::{tessellate, Shape};
use crate::pipeline::Pipeline;
use crate::pose::Rgba;
use crate::transform::Transform;

const PURPLE: Rgba = [0.5, 0.0, 0.5, 1.0];
const GREEN: Rgba = [0.0, 0.5, 0.0, 1.0];
const BLACK: Rgba = [0.0, 0.0, 0.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushKind {
    Point,
    Triangle,
    Circle,
}

/// What the next click paints
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub kind: BrushKind,
    pub color: Rgba,
    /// Point size in pixels; triangles and circles scale from it
    pub size: f32,
    /// Circle segment count
    pub segments: f32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            kind: BrushKind::Point,
            color: [1.0; 4],
            size: 10.0,
            segments: 10.0,
        }
    }
}

impl Brush {
    /// The shape this brush leaves at `(x, y)`
    pub fn shape_at(&self, x: f32, y: f32) -> Shape {
        let position = Point3::new(x, y, 0.0);
        match self.kind {
            BrushKind::Point => Shape::Point {
                position,
                size: self.size,
            },
            BrushKind::Triangle => {
                let d = self.size / 200.0;
                Shape::Triangle {
                    vertices: [
                        position,
                        Point3::new(x + d, y, 0.0),
                        Point3::new(x, y + d, 0.0),
                    ],
                }
            }
            BrushKind::Circle => Shape::Circle {
                center: position,
                size: self.size,
                segments: self.segments,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub shape: Shape,
    pub color: Rgba,
}

#[derive(Debug, Clone, Default)]
pub struct Canvas {
    strokes: Vec<Stroke>,
    pub brush: Brush,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Paint with the current brush at a clip-space position.
    ///
    /// A brush that cannot be tessellated leaves the canvas unchanged.
    pub fn click(&mut self, x: f32, y: f32) -> Result<(), GeometryError> {
        let shape = self.brush.shape_at(x, y);
        tessellate(&shape)?;
        self.strokes.push(Stroke {
            shape,
            color: self.brush.color,
        });
        Ok(())
    }

    pub fn clear(&mut self) {
        debug!("clearing {} strokes", self.strokes.len());
        self.strokes.clear();
    }

    /// Append the fish picture on top of whatever is already painted
    pub fn paint_picture(&mut self) {
        for (color, triangles) in fish() {
            for t in triangles {
                let p = |i: usize| Point3::new(t[i * 2], t[i * 2 + 1], 0.0);
                self.strokes.push(Stroke {
                    shape: Shape::Triangle {
                        vertices: [p(0), p(1), p(2)],
                    },
                    color,
                });
            }
        }
    }

    /// Draw every stroke in order, with identity global and model transforms
    pub fn render<P: Pipeline>(&self, pipeline: &mut P) -> Result<(), GeometryError> {
        let identity = Transform::identity().cells();
        pipeline.set_global_transform(&identity);
        pipeline.set_uniform_transform(&identity);
        for stroke in &self.strokes {
            let batch = tessellate(&stroke.shape)?;
            let [r, g, b, a] = stroke.color;
            pipeline.set_uniform_color(r, g, b, a);
            pipeline.submit_vertices(batch.primitive, &batch.vertices);
        }
        Ok(())
    }
}

type Flat = [f32; 6];

fn fish() -> [(Rgba, &'static [Flat]); 3] {
    const BODY: &[Flat] = &[
        // tail root
        [-0.8, 0.0, -0.8, 0.2, -0.9, 0.1],
        [-0.8, 0.0, -0.8, -0.2, -0.9, -0.1],
        [-0.8, 0.2, -0.8, -0.2, -0.6, -0.2],
        [-0.8, 0.2, -0.6, 0.2, -0.6, -0.2],
        [-0.8, 0.2, -0.6, 0.2, -0.6, 0.4],
        [-0.8, -0.2, -0.6, -0.2, -0.6, -0.4],
        // body
        [-0.6, 0.4, -0.6, -0.4, 0.2, -0.4],
        [-0.6, 0.4, 0.2, 0.4, 0.2, -0.4],
        // head
        [0.2, 0.4, 0.2, 0.2, 0.6, 0.2],
        [0.2, 0.2, 0.6, 0.2, 0.6, -0.2],
        [0.6, -0.2, 0.2, -0.2, 0.2, 0.2],
        // mouth
        [0.2, -0.2, 0.2, -0.4, 0.55, -0.3],
        [0.2, -0.2, 0.6, -0.2, 0.55, -0.25],
    ];
    const FINS: &[Flat] = &[
        [-0.6, 0.4, -0.2, 0.4, -0.4, 0.5],
        [-0.4, 0.5, -0.2, 0.4, 0.0, 0.5],
        [-0.2, 0.4, 0.0, 0.5, 0.2, 0.4],
        [-1.0, 0.0, -0.8, 0.0, -1.0, 0.2],
        [-1.0, 0.0, -0.8, 0.0, -1.0, -0.2],
        [-0.2, -0.1, -0.2, -0.2, -0.38, -0.15],
    ];
    const EYE: &[Flat] = &[[0.4, 0.04, 0.4, 0.08, 0.45, 0.06]];

    [(PURPLE, BODY), (GREEN, FINS), (BLACK, EYE)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use crate::pipeline::DrawList;

    #[test]
    fn test_brush_triangle_spans_size() {
        let brush = Brush {
            kind: BrushKind::Triangle,
            size: 100.0,
            ..Brush::default()
        };
        let Shape::Triangle { vertices } = brush.shape_at(0.25, -0.5) else {
            panic!("expected a triangle");
        };
        assert_eq!(vertices[0], Point3::new(0.25, -0.5, 0.0));
        assert_eq!(vertices[1], Point3::new(0.75, -0.5, 0.0));
        assert_eq!(vertices[2], Point3::new(0.25, 0.0, 0.0));
    }

    #[test]
    fn test_clicks_accumulate_and_clear() {
        let mut canvas = Canvas::new();
        canvas.click(0.0, 0.0).unwrap();
        canvas.brush.kind = BrushKind::Circle;
        canvas.brush.color = [1.0, 0.0, 0.0, 1.0];
        canvas.click(0.25, 0.25).unwrap();

        assert_eq!(canvas.strokes().len(), 2);
        assert_eq!(canvas.strokes()[0].color, [1.0; 4]);
        assert_eq!(canvas.strokes()[1].color, [1.0, 0.0, 0.0, 1.0]);

        canvas.clear();
        assert!(canvas.strokes().is_empty());
    }

    #[test]
    fn test_bad_brush_leaves_canvas_unchanged() {
        let mut canvas = Canvas::new();
        canvas.brush.kind = BrushKind::Circle;
        canvas.brush.segments = 2.0;
        assert_eq!(
            canvas.click(0.0, 0.0),
            Err(GeometryError::TooFewSegments { segments: 2.0 })
        );
        assert!(canvas.strokes().is_empty());

        canvas.brush.segments = 1.0e20;
        assert_eq!(
            canvas.click(0.0, 0.0),
            Err(GeometryError::TooManySegments { segments: 1.0e20 })
        );
        assert!(canvas.strokes().is_empty());
    }

    #[test]
    fn test_render_submits_each_stroke_flat() {
        let mut canvas = Canvas::new();
        canvas.click(0.1, 0.2).unwrap();
        canvas.paint_picture();

        let mut list = DrawList::new();
        canvas.render(&mut list).unwrap();

        let calls = list.calls();
        assert_eq!(calls.len(), 1 + 20);
        assert_eq!(calls[0].primitive, Primitive::Points { size: 10.0 });
        assert_eq!(calls[0].vertices, vec![Point3::new(0.1, 0.2, 0.0)]);
        assert_eq!(calls[1].color, PURPLE);
        assert_eq!(calls.last().unwrap().color, BLACK);
        let identity = Transform::identity().cells();
        assert!(calls.iter().all(|c| c.global == identity && c.transform == identity));
    }
}
