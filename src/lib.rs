//! LabelMe to segmentation mask converter
//!
//! This library rasterizes the labeled polygons of LabelMe JSON annotations into
//! color-coded mask images for training segmentation models.

pub mod config;
pub mod conversion;
pub mod error;
pub mod io;
pub mod raster;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use config::{Args, MaskConfig};
pub use conversion::{rasterize, render_mask, shape_to_polygon};
pub use error::MaskError;
pub use io::{find_annotation_files, run_batch};
pub use raster::MaskCanvas;
pub use types::{AnnotationDocument, ChannelOrder, Color, LabelColorMap, MaskReport, ProcessingStats, Shape};
