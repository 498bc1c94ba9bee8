//! Polygon rasterization onto a 3-channel mask buffer.
//!
//! Fill rule is even-odd: a pixel is inside when the scanline through its row
//! crosses the polygon an odd number of times to its left. Spans run from
//! `ceil(left)` to `floor(right)` inclusive and the outline is always drawn
//! on top, so vertices, horizontal edges and the bottom row are covered. A
//! square with corners (0, 0) and (3, 3) therefore fills 4x4 pixels.

use image::{Rgb, RgbImage};

use crate::types::{ChannelOrder, Color};

/// Integer pixel coordinate `(x, y)`.
pub type Point = (i32, i32);

/// A mask being filled, with pixels held in the processing channel order.
///
/// The canvas is consumed by [`MaskCanvas::into_rgb_image`], which is the only
/// place channels are reordered.
#[derive(Debug, Clone)]
pub struct MaskCanvas {
    buffer: RgbImage,
    order: ChannelOrder,
}

impl MaskCanvas {
    pub fn new(width: u32, height: u32, background: Color, order: ChannelOrder) -> Self {
        Self {
            buffer: RgbImage::from_pixel(width, height, Rgb(background.0)),
            order,
        }
    }

    /// Pixel value in processing order, `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.buffer.get_pixel_checked(x, y).map(|p| Color(p.0))
    }

    /// Fill a closed polygon with `color`, overwriting whatever is underneath.
    ///
    /// Polygons with fewer than 3 vertices are ignored. Vertices may lie
    /// outside the canvas; everything is clipped.
    pub fn fill_polygon(&mut self, polygon: &[Point], color: Color) {
        if polygon.len() < 3 {
            return;
        }
        let pixel = Rgb(color.0);
        let (width, height) = self.buffer.dimensions();
        if width == 0 || height == 0 {
            return;
        }

        let y_min = polygon.iter().map(|p| p.1 as i64).min().unwrap_or(0);
        let y_max = polygon.iter().map(|p| p.1 as i64).max().unwrap_or(-1);
        let first_row = y_min.max(0);
        let last_row = y_max.min(height as i64 - 1);
        let right_edge = width as f64 - 1.0;

        let mut crossings: Vec<f64> = Vec::with_capacity(polygon.len());
        for y in first_row..=last_row {
            crossings.clear();
            let yf = y as f64;
            for (p0, p1) in edges(polygon) {
                let (y0, y1) = (p0.1 as i64, p1.1 as i64);
                // half-open so a shared vertex is counted once
                if (y0 <= y && y < y1) || (y1 <= y && y < y0) {
                    let t = (yf - y0 as f64) / (y1 - y0) as f64;
                    crossings.push(p0.0 as f64 + t * (p1.0 as f64 - p0.0 as f64));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));

            for span in crossings.chunks_exact(2) {
                let from = span[0].ceil().max(0.0);
                let to = span[1].floor().min(right_edge);
                if from > to {
                    continue;
                }
                for x in from as u32..=to as u32 {
                    self.buffer.put_pixel(x, y as u32, pixel);
                }
            }
        }

        for (p0, p1) in edges(polygon) {
            self.draw_line(p0, p1, pixel);
        }
    }

    // Bresenham over the part of the segment that lies on the canvas
    fn draw_line(&mut self, from: Point, to: Point, pixel: Rgb<u8>) {
        let (width, height) = (self.buffer.width() as i64, self.buffer.height() as i64);
        let Some(((mut x0, mut y0), (x1, y1))) = clip_segment(from, to, width, height) else {
            return;
        };

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if (0..width).contains(&x0) && (0..height).contains(&y0) {
                self.buffer.put_pixel(x0 as u32, y0 as u32, pixel);
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Finish the mask as an RGB image, reordering channels if needed.
    pub fn into_rgb_image(self) -> RgbImage {
        let mut buffer = self.buffer;
        if self.order == ChannelOrder::Bgr {
            for pixel in buffer.pixels_mut() {
                pixel.0.swap(0, 2);
            }
        }
        buffer
    }
}

/// Liang-Barsky clip of a segment to `[0, width-1] x [0, height-1]`.
///
/// The clipped endpoints are rounded back to pixels. `None` when the segment
/// misses the canvas entirely.
fn clip_segment(from: Point, to: Point, width: i64, height: i64) -> Option<((i64, i64), (i64, i64))> {
    let (x0, y0) = (from.0 as f64, from.1 as f64);
    let (dx, dy) = (to.0 as f64 - x0, to.1 as f64 - y0);
    let (x_max, y_max) = ((width - 1) as f64, (height - 1) as f64);

    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    for (p, q) in [(-dx, x0), (dx, x_max - x0), (-dy, y0), (dy, y_max - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
    }

    let at = |t: f64| ((x0 + t * dx).round() as i64, (y0 + t * dy).round() as i64);
    Some((at(t0), at(t1)))
}

fn edges(polygon: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    polygon
        .iter()
        .copied()
        .zip(polygon.iter().copied().cycle().skip(1))
}
