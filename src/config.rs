use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MaskError, Result};
use crate::types::{ChannelOrder, Color, LabelColorMap};

/// Command-line arguments for converting LabelMe JSON annotations to mask images.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory containing LabelMe JSON files
    #[arg(short = 'i', long = "input_dir")]
    pub input_dir: PathBuf,

    /// Directory to write masks into [default: <input_dir>/masks]
    #[arg(short = 'o', long = "output_dir")]
    pub output_dir: Option<PathBuf>,

    /// Extension (and therefore image format) of the written masks, e.g. ".png"
    #[arg(long = "mask_extension")]
    pub mask_extension: Option<String>,

    /// Background color as R,G,B
    #[arg(long = "background", value_parser = parse_color)]
    pub background: Option<Color>,

    /// Label fill color as NAME=R,G,B (repeatable)
    #[arg(long = "label", value_parser = parse_label_color)]
    pub labels: Vec<(String, Color)>,

    /// Channel order the configured colors are given in
    #[arg(long = "channel_order", value_enum)]
    pub channel_order: Option<ChannelOrder>,

    /// JSON file with background, labels, channel_order and mask_extension
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.input_dir.join("masks"))
    }

    /// Build the mask configuration: config file (if any), then command-line overrides.
    pub fn to_mask_config(&self) -> Result<MaskConfig> {
        let mut config = match &self.config {
            Some(path) => MaskConfig::from_file(path)?,
            None if !self.labels.is_empty() => MaskConfig {
                labels: LabelColorMap::new(),
                ..MaskConfig::default()
            },
            None => MaskConfig::default(),
        };

        if let Some(background) = self.background {
            config.background = background;
        }
        if let Some(order) = self.channel_order {
            config.channel_order = order;
        }
        if let Some(ext) = &self.mask_extension {
            config.mask_extension = ext.clone();
        }
        for (label, color) in &self.labels {
            config.labels.insert(label.clone(), *color);
        }

        Ok(config)
    }
}

/// Everything that stays fixed for the duration of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    pub background: Color,
    pub labels: LabelColorMap,
    pub channel_order: ChannelOrder,
    pub mask_extension: String,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            labels: default_label_colors(),
            channel_order: ChannelOrder::Rgb,
            mask_extension: ".png".to_string(),
        }
    }
}

impl MaskConfig {
    pub fn new(background: Color, labels: LabelColorMap) -> Self {
        Self {
            background,
            labels,
            ..Self::default()
        }
    }

    pub fn with_channel_order(mut self, order: ChannelOrder) -> Self {
        self.channel_order = order;
        self
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MaskError::InvalidConfig(format!("cannot read config {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            MaskError::InvalidConfig(format!("cannot parse config {}: {}", path.display(), e))
        })
    }
}

/// Color map used when nothing else is configured.
pub fn default_label_colors() -> LabelColorMap {
    LabelColorMap::from([("defect".to_string(), Color::new(255, 0, 0))])
}

fn parse_color(s: &str) -> std::result::Result<Color, String> {
    s.parse::<Color>().map_err(|e| e.to_string())
}

// Parse NAME=R,G,B; the label itself may not be empty
fn parse_label_color(s: &str) -> std::result::Result<(String, Color), String> {
    let (label, color) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=R,G,B, got '{}'", s))?;
    if label.is_empty() {
        return Err(format!("label name is empty in '{}'", s));
    }
    Ok((label.to_string(), parse_color(color)?))
}
