use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::MaskError;

/// A 3-channel color, stored in whatever channel order the mask is processed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);

    pub fn new(c0: u8, c1: u8, c2: u8) -> Self {
        Color([c0, c1, c2])
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.0[0], self.0[1], self.0[2])
    }
}

// Parses "R,G,B" (whitespace around components is allowed)
impl FromStr for Color {
    type Err = MaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(MaskError::InvalidConfig(format!(
                "color '{}' must have exactly 3 comma-separated components",
                s
            )));
        }
        let mut channels = [0u8; 3];
        for (channel, part) in channels.iter_mut().zip(&parts) {
            *channel = part.parse::<u8>().map_err(|_| {
                MaskError::InvalidConfig(format!(
                    "color component '{}' in '{}' is not an integer in 0..=255",
                    part, s
                ))
            })?;
        }
        Ok(Color(channels))
    }
}

/// Order in which configured colors are given and fills are performed.
///
/// Written mask files are always RGB; a `Bgr` mask is converted once when it
/// is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

/// Label name to fill color.
pub type LabelColorMap = HashMap<String, Color>;

// A labeled shape as written by LabelMe
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Shape {
    /// `None` when the label is missing, null or not a string.
    #[serde(default, deserialize_with = "lenient_string")]
    pub label: Option<String>,
    /// Kept untyped so a single bad shape does not fail the whole document.
    #[serde(default)]
    pub points: serde_json::Value,
    #[serde(default, deserialize_with = "lenient_string")]
    pub shape_type: Option<String>,
}

impl Shape {
    /// Label for diagnostics; empty when absent.
    pub fn label_name(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }
}

// Accept any JSON value, keeping it only if it is a string
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

// The annotation document for one image. Only the keys below are read;
// everything else (version, imagePath, imageData, flags, ...) is ignored.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationDocument {
    #[serde(default)]
    pub shapes: Vec<Shape>,
    #[serde(default)]
    pub image_height: Option<i64>,
    #[serde(default)]
    pub image_width: Option<i64>,
}

impl AnnotationDocument {
    /// `(width, height)` when both are present and positive.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        let positive = |v: Option<i64>| v.and_then(|v| u32::try_from(v).ok()).filter(|&v| v > 0);
        Some((positive(self.image_width)?, positive(self.image_height)?))
    }
}

/// Outcome of rasterizing one document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MaskReport {
    pub width: u32,
    pub height: u32,
    pub shapes_filled: usize,
    pub unknown_labels: usize,
    pub malformed_shapes: usize,
}

impl MaskReport {
    pub fn skipped_shapes(&self) -> usize {
        self.unknown_labels + self.malformed_shapes
    }
}

// Struct to hold batch statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub total_files_processed: usize,
    pub masks_written: usize,
    pub failed_documents: usize,
    pub skipped_shapes: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, report: &MaskReport) {
        self.total_files_processed += 1;
        self.masks_written += 1;
        self.skipped_shapes += report.skipped_shapes();
    }

    pub fn record_failure(&mut self) {
        self.total_files_processed += 1;
        self.failed_documents += 1;
    }

    pub fn print_summary(&self) {
        log::info!("=== Processing Summary ===");
        log::info!("Total files processed: {}", self.total_files_processed);
        log::info!("Masks written: {}", self.masks_written);
        log::info!("Failed documents: {}", self.failed_documents);

        if self.skipped_shapes > 0 {
            log::warn!(
                "Skipped shapes (unknown label or malformed points): {}",
                self.skipped_shapes
            );
        }
    }
}
