use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::{MaskError, Result};
use crate::types::AnnotationDocument;

/// Read and parse a single annotation JSON file, streaming from disk.
pub fn read_annotation(path: &Path) -> Result<AnnotationDocument> {
    let file = fs::File::open(path).map_err(|source| MaskError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| MaskError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Make sure a mask extension starts with a dot: "png" -> ".png".
pub fn normalize_extension(extension: &str) -> String {
    if extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{}", extension)
    }
}

/// Output path for the mask of `json_path`: same base name, `extension` swapped in.
///
/// `extension` is expected to be normalized already.
pub fn mask_path_for(json_path: &Path, output_dir: &Path, extension: &str) -> PathBuf {
    let stem = json_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{}{}", stem, extension))
}

/// Create `path` and any missing parents unless it already exists.
///
/// Returns whether the directory had to be created. Existing contents are left alone.
pub fn ensure_output_directory(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path).map_err(|source| MaskError::DirectoryCreate {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
                label
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}
