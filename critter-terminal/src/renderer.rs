/// ASCII rasterizer for terminal rendering
use critter_core::{Camera, Pipeline, Primitive, Triangle};
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

const POINT_CHAR: char = 'o';

/// Terminal cells per pixel of point size
const CELLS_PER_PIXEL: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    character: char,
    color: Color,
}

const BLANK: Cell = Cell {
    character: ' ',
    color: Color::Reset,
};

/// ASCII renderer that rasterizes pipeline submissions into terminal cells
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    camera: Camera,
    global: Matrix4<f32>,
    model: Matrix4<f32>,
    color: [f32; 4],
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize, camera: Camera) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            camera,
            global: Matrix4::identity(),
            model: Matrix4::identity(),
            color: [1.0; 4],
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![BLANK; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.camera.resize(width as u32, height as u32);
        self.depth_buffer = vec![f32::INFINITY; width * height];
        self.cells = vec![BLANK; width * height];
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(BLANK);
    }

    /// The character at a cell, for inspection
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x].character)
    }

    fn world(&self) -> Matrix4<f32> {
        self.global * self.model
    }

    fn project(&self, point: &Point3<f32>) -> Option<(f32, f32, f32)> {
        self.camera
            .project_to_screen(point, self.width as u32, self.height as u32)
    }

    fn render_triangle(&mut self, triangle: &Triangle) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (coord, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match self.project(vertex) {
                Some(projected) => *coord = projected,
                None => return, // Triangle is clipped
            }
        }

        // Two-sided shading against a light behind the viewer
        let normal = triangle.calculate_normal();
        if !normal.iter().all(|c| c.is_finite()) {
            return;
        }
        let light_dir = Vector3::new(0.0, 0.0, 1.0);
        let brightness = normal.dot(&light_dir).abs();

        // Map brightness to character, never blank for a lit face
        let last = LUMINOSITY_RAMP.len() - 1;
        let char_index = ((brightness * last as f32) as usize).clamp(1, last);
        let cell = Cell {
            character: LUMINOSITY_RAMP[char_index],
            color: shade(self.color, 0.35 + 0.65 * brightness),
        };

        self.rasterize_triangle(&screen_coords, cell);
    }

    /// Fill every cell whose center lies inside the projected triangle.
    /// Either winding is accepted; slivers thinner than a cell are dropped.
    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], cell: Cell) {
        let [a, b, c] = coords.map(|(x, y, _)| (x, y));
        let area = edge(a, b, c);
        if area.abs() < 1e-6 {
            return;
        }

        let xs = coords.map(|v| v.0);
        let ys = coords.map(|v| v.1);
        let span = |values: [f32; 3], limit: usize| {
            let lo = values.iter().copied().fold(f32::INFINITY, f32::min).floor().max(0.0) as usize;
            let hi = values.iter().copied().fold(f32::NEG_INFINITY, f32::max).ceil();
            (lo, (hi.max(0.0) as usize).min(limit))
        };
        let (x0, x1) = span(xs, self.width);
        let (y0, y1) = span(ys, self.height);

        for y in y0..y1 {
            for x in x0..x1 {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                // Normalized edge weights; all non-negative inside
                let weights = [edge(b, c, p) / area, edge(c, a, p) / area, edge(a, b, p) / area];
                if weights.iter().all(|&w| w >= 0.0) {
                    let depth: f32 = weights
                        .iter()
                        .zip(coords)
                        .map(|(w, v)| w * v.2)
                        .sum();
                    self.plot(x, y, depth, cell);
                }
            }
        }
    }

    fn render_point(&mut self, point: &Point3<f32>, size: f32) {
        let Some((sx, sy, depth)) = self.project(point) else {
            return;
        };
        let radius = (size * CELLS_PER_PIXEL / 2.0).floor() as i32;
        let cell = Cell {
            character: POINT_CHAR,
            color: shade(self.color, 1.0),
        };

        let (cx, cy) = (sx.floor() as i32, sy.floor() as i32);
        let min_x = (cx - radius).max(0);
        let max_x = (cx + radius).min(self.width as i32 - 1);
        let min_y = (cy - radius).max(0);
        let max_y = (cy + radius).min(self.height as i32 - 1);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                self.plot(x as usize, y as usize, depth, cell);
            }
        }
    }

    fn plot(&mut self, x: usize, y: usize, depth: f32, cell: Cell) {
        let idx = y * self.width + x;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.cells[idx] = cell;
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                if current != Some(cell.color) {
                    writer.queue(SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.character))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Pipeline for AsciiRenderer {
    fn set_global_transform(&mut self, cells: &[f32; 16]) {
        self.global = Matrix4::from_column_slice(cells);
    }

    fn set_uniform_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.color = [r, g, b, a];
    }

    fn set_uniform_transform(&mut self, cells: &[f32; 16]) {
        self.model = Matrix4::from_column_slice(cells);
    }

    fn submit_vertices(&mut self, primitive: Primitive, vertices: &[Point3<f32>]) {
        let world = self.world();
        match primitive {
            Primitive::Triangles => {
                for chunk in vertices.chunks_exact(3) {
                    let triangle = Triangle::new(
                        world.transform_point(&chunk[0]),
                        world.transform_point(&chunk[1]),
                        world.transform_point(&chunk[2]),
                    );
                    self.render_triangle(&triangle);
                }
            }
            Primitive::Points { size } => {
                for vertex in vertices {
                    self.render_point(&world.transform_point(vertex), size);
                }
            }
        }
    }
}

/// Scale an RGBA color by `intensity` into a terminal color
fn shade([r, g, b, _]: [f32; 4], intensity: f32) -> Color {
    let channel = |c: f32| ((c * intensity).clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(r),
        g: channel(g),
        b: channel(b),
    }
}

/// Twice the signed area of `(a, b, p)`; positive when `p` is left of `a -> b`
fn edge(a: (f32, f32), b: (f32, f32), p: (f32, f32)) -> f32 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}
