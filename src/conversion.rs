use image::RgbImage;
use log::{debug, info, warn};
use std::path::Path;

use crate::config::MaskConfig;
use crate::error::{MaskError, Result};
use crate::raster::{MaskCanvas, Point};
use crate::types::{AnnotationDocument, MaskReport, Shape};
use crate::utils::read_annotation;

/// Number of vertices used to approximate a circle shape.
pub const CIRCLE_POINTS: usize = 12;

/// Largest mask buffer (in bytes, 3 per pixel) a document may ask for.
pub const MAX_MASK_BYTES: u64 = 1 << 32;

/// Rasterize the annotation document at `json_path` and write the mask to `output_path`.
///
/// The output format follows the extension of `output_path`. Unknown labels
/// and malformed shapes are logged and skipped; everything else that goes
/// wrong is returned and nothing is written.
pub fn rasterize(json_path: &Path, output_path: &Path, config: &MaskConfig) -> Result<MaskReport> {
    let document = read_annotation(json_path)?;
    let (mask, report) = render_mask(json_path, &document, config)?;
    write_mask(&mask, output_path)?;
    info!("Mask saved to {}", output_path.display());
    Ok(report)
}

/// Build the mask for an already parsed document.
///
/// `source` only names the document in diagnostics.
pub fn render_mask(
    source: &Path,
    document: &AnnotationDocument,
    config: &MaskConfig,
) -> Result<(RgbImage, MaskReport)> {
    let (width, height) = document
        .dimensions()
        .ok_or_else(|| MaskError::MissingDimensions {
            path: source.to_path_buf(),
        })?;

    let too_large = (width as u64)
        .checked_mul(height as u64)
        .and_then(|pixels| pixels.checked_mul(3))
        .map_or(true, |bytes| bytes > MAX_MASK_BYTES || usize::try_from(bytes).is_err());
    if too_large {
        return Err(MaskError::InvalidDimensions {
            path: source.to_path_buf(),
            width,
            height,
        });
    }

    let mut canvas = MaskCanvas::new(width, height, config.background, config.channel_order);
    let mut report = MaskReport {
        width,
        height,
        ..MaskReport::default()
    };

    for shape in &document.shapes {
        let color = shape
            .label
            .as_ref()
            .and_then(|label| config.labels.get(label))
            .copied();
        let Some(color) = color else {
            let issue = MaskError::UnknownLabel {
                label: shape.label_name().to_string(),
            };
            warn!("{} ({}), skipping shape", issue, source.display());
            report.unknown_labels += 1;
            continue;
        };

        let polygon = match shape_to_polygon(shape) {
            Ok(polygon) => polygon,
            Err(issue) => {
                warn!("{} ({}), skipping shape", issue, source.display());
                report.malformed_shapes += 1;
                continue;
            }
        };

        debug!(
            "Filling '{}' with {} vertices in color {}",
            shape.label_name(),
            polygon.len(),
            color
        );
        canvas.fill_polygon(&polygon, color);
        report.shapes_filled += 1;
    }

    Ok((canvas.into_rgb_image(), report))
}

/// Encode `mask` in the format implied by the extension of `path`.
pub fn write_mask(mask: &RgbImage, path: &Path) -> Result<()> {
    mask.save(path).map_err(|source| MaskError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Convert a shape's points to an integer polygon, expanding rectangles and circles.
///
/// Coordinates are truncated toward zero.
pub fn shape_to_polygon(shape: &Shape) -> Result<Vec<Point>> {
    let malformed = |reason: String| MaskError::MalformedShape {
        label: shape.label_name().to_string(),
        reason,
    };

    let raw = shape
        .points
        .as_array()
        .ok_or_else(|| malformed("points is not a list".to_string()))?;

    let mut points = Vec::with_capacity(raw.len());
    for (index, value) in raw.iter().enumerate() {
        let pair = match value.as_array() {
            Some(pair) if pair.len() == 2 => pair,
            _ => return Err(malformed(format!("point {} is not an [x, y] pair", index))),
        };
        match (pair[0].as_f64(), pair[1].as_f64()) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => points.push((x, y)),
            _ => return Err(malformed(format!("point {} has non-numeric coordinates", index))),
        }
    }

    let outline = match shape.shape_type.as_deref() {
        Some("rectangle") if points.len() >= 2 => {
            let ((x1, y1), (x2, y2)) = (points[0], points[1]);
            rectangle_to_polygon(x1, y1, x2, y2)
        }
        Some("circle") if points.len() >= 2 => {
            let ((cx, cy), (px, py)) = (points[0], points[1]);
            let radius = ((cx - px).powi(2) + (cy - py).powi(2)).sqrt();
            circle_to_polygon(cx, cy, radius, CIRCLE_POINTS)
        }
        _ => points,
    };

    if outline.len() < 3 {
        return Err(malformed(format!(
            "{} point(s) cannot form a polygon",
            outline.len()
        )));
    }

    Ok(outline
        .into_iter()
        .map(|(x, y)| (x.trunc() as i32, y.trunc() as i32))
        .collect())
}

/// Convert two opposite rectangle corners to polygon points
pub fn rectangle_to_polygon(x1: f64, y1: f64, x2: f64, y2: f64) -> Vec<(f64, f64)> {
    vec![(x1, y1), (x2, y1), (x2, y2), (x1, y2)]
}

/// Convert a circle to polygon points
pub fn circle_to_polygon(cx: f64, cy: f64, radius: f64, num_points: usize) -> Vec<(f64, f64)> {
    (0..num_points)
        .map(|i| {
            let angle = 2.0 * std::f64::consts::PI * i as f64 / num_points as f64;
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect()
}
