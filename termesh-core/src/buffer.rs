//! Screen-space triangles and the depth-composited character grid.
use nalgebra::{Point3, Vector3};

use crate::math::{lerp, safe_normalize};

/// Height:width ratio of a terminal character cell. Cells are roughly twice
/// as tall as they are wide in common terminal fonts.
pub const DEFAULT_CHAR_ASPECT: f32 = 2.0;

/// Logical height of the grid; the logical width follows from the grid shape
/// and the character aspect so logical units stay square on screen.
const LOGICAL_HEIGHT: f32 = 2.0;

/// One cell of the frame buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pixel {
    /// View depth of the nearest triangle drawn so far; smaller is nearer.
    pub depth: f32,
    pub glyph: char,
    /// Material index for color lookup by the output layer.
    pub material: Option<usize>,
}

impl Pixel {
    /// The empty sentinel: infinitely far, blank, uncolored.
    pub const EMPTY: Self = Self {
        depth: f32::INFINITY,
        glyph: ' ',
        material: None,
    };
}

/// One triangle in the buffer's logical coordinate space: x/y are logical
/// screen position, z is view depth. Built, rasterized, and discarded within
/// a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub p1: Point3<f32>,
    pub p2: Point3<f32>,
    pub p3: Point3<f32>,
}

impl Projection {
    pub fn new(p1: Point3<f32>, p2: Point3<f32>, p3: Point3<f32>) -> Self {
        Self { p1, p2, p3 }
    }

    /// The same triangle with vertices reordered by ascending screen x, the
    /// order the scan fill sweeps in.
    pub fn sort_x(&self) -> Self {
        let mut points = [self.p1, self.p2, self.p3];
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        Self::new(points[0], points[1], points[2])
    }

    /// For a vertex-sorted triangle, the y coordinate of the boundary running
    /// p1 → p2 → p3 at column x.
    pub fn limit_y1(&self, x: f32) -> f32 {
        if x <= self.p1.x {
            return self.p1.y;
        }
        if x >= self.p3.x {
            return self.p3.y;
        }

        if x <= self.p2.x {
            let denominator = self.p2.x - self.p1.x;
            if denominator.abs() < 1e-7 {
                return self.p1.y;
            }
            lerp(self.p1.y, self.p2.y, (x - self.p1.x) / denominator)
        } else {
            let denominator = self.p3.x - self.p2.x;
            if denominator.abs() < 1e-7 {
                return self.p2.y;
            }
            lerp(self.p2.y, self.p3.y, (x - self.p2.x) / denominator)
        }
    }

    /// For a vertex-sorted triangle, the y coordinate of the long edge
    /// p1 → p3 at column x.
    pub fn limit_y2(&self, x: f32) -> f32 {
        if x <= self.p1.x {
            return self.p1.y;
        }
        if x >= self.p3.x {
            return self.p3.y;
        }

        let denominator = self.p3.x - self.p1.x;
        if denominator.abs() < 1e-7 {
            return self.p1.y;
        }
        lerp(self.p1.y, self.p3.y, (x - self.p1.x) / denominator)
    }

    /// Screen-space normal: the plane-equation coefficients used for depth
    /// interpolation.
    pub fn normal(&self) -> Vector3<f32> {
        safe_normalize(&(self.p2 - self.p1).cross(&(self.p3 - self.p1)))
    }
}

/// A cols × rows grid of [`Pixel`] with a mapping from the logical coordinate
/// space onto cell indices. Reused across frames; rebuilt from scratch when
/// the terminal is resized.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer {
    cols: usize,
    rows: usize,
    logical_x: f32,
    logical_y: f32,
    dx: f32,
    dy: f32,
    pixels: Vec<Pixel>,
}

impl Buffer {
    /// A cleared buffer for a cols × rows character grid. `char_aspect` is
    /// the cell height:width ratio; see [`DEFAULT_CHAR_ASPECT`].
    pub fn new(cols: usize, rows: usize, char_aspect: f32) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);

        let logical_y = LOGICAL_HEIGHT;
        let logical_x = logical_y * cols as f32 / (rows as f32 * char_aspect);

        Self {
            cols,
            rows,
            logical_x,
            logical_y,
            dx: logical_x / cols as f32,
            dy: logical_y / rows as f32,
            pixels: vec![Pixel::EMPTY; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Extent of the logical coordinate space projections target.
    pub fn logical_size(&self) -> (f32, f32) {
        (self.logical_x, self.logical_y)
    }

    pub fn cell(&self, col: usize, row: usize) -> &Pixel {
        &self.pixels[row * self.cols + col]
    }

    /// One grid row, for the output layer to walk.
    pub fn row(&self, row: usize) -> &[Pixel] {
        &self.pixels[row * self.cols..(row + 1) * self.cols]
    }

    /// Reset every cell to the empty sentinel. Runs once at the start of
    /// every frame; no pixel state survives across frames.
    pub fn clear(&mut self) {
        self.pixels.fill(Pixel::EMPTY);
    }

    /// Scan-convert one triangle into the grid. Sweeps columns across the
    /// triangle's x-span, fills the y-span of each column, and composites
    /// per cell with a closest-wins depth test, so the result is independent
    /// of triangle submission order.
    pub fn draw_projection(&mut self, projection: &Projection, glyph: char, material: Option<usize>) {
        let triangle = projection.sort_x();

        let x_first = triangle.p1.x + self.dx * 0.5;
        let x_last = triangle.p3.x - self.dx * 0.5;
        if x_last < 0.0 || x_first > self.logical_x {
            return;
        }

        let col_start = self.index_x(x_first);
        let col_end = self.index_x(x_last);
        let normal = triangle.normal();

        for col in col_start..=col_end {
            let x = (col as f32 + 0.5) * self.dx;

            let y1 = triangle.limit_y1(x);
            let y2 = triangle.limit_y2(x);
            let y_min = y1.min(y2);
            let y_max = y1.max(y2);
            if y_max < 0.0 || y_min > self.logical_y {
                continue;
            }

            let row_start = self.index_y(y_min + self.dy * 0.5);
            let row_end = self.index_y(y_max - self.dy * 0.5);

            for row in row_start..=row_end {
                let depth = self.depth(&triangle, &normal, col, row);
                let pixel = &mut self.pixels[row * self.cols + col];
                if depth < pixel.depth {
                    *pixel = Pixel {
                        depth,
                        glyph,
                        material,
                    };
                }
            }
        }
    }

    /// Column index of a logical x coordinate, clamped into the grid.
    fn index_x(&self, x: f32) -> usize {
        ((x / self.dx) as isize).clamp(0, self.cols as isize - 1) as usize
    }

    /// Row index of a logical y coordinate, clamped into the grid.
    fn index_y(&self, y: f32) -> usize {
        ((y / self.dy) as isize).clamp(0, self.rows as isize - 1) as usize
    }

    /// The triangle's plane equation evaluated at a cell center: interpolated
    /// view depth without barycentric weighting.
    fn depth(&self, triangle: &Projection, normal: &Vector3<f32>, col: usize, row: usize) -> f32 {
        if normal.z.abs() < 1e-7 {
            // edge-on triangle, fall back to a known vertex
            return triangle.p1.z;
        }

        let center_x = (col as f32 + 0.5) * self.dx;
        let center_y = (row as f32 + 0.5) * self.dy;

        let d = normal.x * (center_x - triangle.p1.x) + normal.y * (center_y - triangle.p1.y);
        triangle.p1.z - d / normal.z
    }
}
