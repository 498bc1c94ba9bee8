use glob::{glob_with, MatchOptions, Pattern};
use indicatif::ProgressBar;
use log::{error, info, warn};
use std::path::{Path, PathBuf};

use crate::config::MaskConfig;
use crate::conversion::rasterize;
use crate::error::{MaskError, Result};
use crate::types::ProcessingStats;
use crate::utils::{ensure_output_directory, mask_path_for, normalize_extension};

/// Extension of annotation documents, matched case-insensitively.
pub const ANNOTATION_EXTENSION: &str = "json";

/// Rasterize every annotation document in `input_dir` into `output_dir`.
///
/// Documents are processed one at a time in file-name order. A document that
/// fails is logged and counted, and the batch moves on; only a missing input
/// directory or an output directory that cannot be created abort the run.
pub fn run_batch(
    input_dir: &Path,
    output_dir: &Path,
    config: &MaskConfig,
    pb: Option<&ProgressBar>,
) -> Result<ProcessingStats> {
    if !input_dir.is_dir() {
        return Err(MaskError::DirectoryNotFound {
            path: input_dir.to_path_buf(),
        });
    }

    if ensure_output_directory(output_dir)? {
        info!("Created output directory {}", output_dir.display());
    }

    let extension = normalize_extension(&config.mask_extension);
    let mut stats = ProcessingStats::new();

    let json_files = find_annotation_files(input_dir)?;
    if json_files.is_empty() {
        warn!("No JSON files found in {}", input_dir.display());
        return Ok(stats);
    }
    info!(
        "Found {} JSON files in {}",
        json_files.len(),
        input_dir.display()
    );

    if let Some(pb) = pb {
        pb.set_length(json_files.len() as u64);
    }

    for json_path in &json_files {
        let output_path = mask_path_for(json_path, output_dir, &extension);
        match rasterize(json_path, &output_path, config) {
            Ok(report) => stats.record_success(&report),
            Err(e) => {
                error!("{}", e);
                stats.record_failure();
            }
        }
        if let Some(pb) = pb {
            pb.inc(1);
        }
    }

    Ok(stats)
}

/// List regular files directly inside `dir` whose extension is `.json` in any case, sorted by name.
pub fn find_annotation_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*.{}",
        Pattern::escape(&dir.to_string_lossy()),
        ANNOTATION_EXTENSION
    );
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let mut json_files: Vec<PathBuf> = glob_with(&pattern, options)
        .map_err(|e| MaskError::InvalidConfig(format!("bad input pattern {}: {}", pattern, e)))?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    json_files.sort();
    Ok(json_files)
}
