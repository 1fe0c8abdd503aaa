use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Extensions picked up when walking an input directory, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "tif", "tiff", "webp", "bmp"];

/// Checks if a directory entry is hidden (starts with '.').
fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}

pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// Recursively lists image files under `dir`, sorted by path.
///
/// Traversal errors are propagated. The root itself is never treated as hidden.
pub fn list_images_walkdir(dir: &Path, include_hidden: bool) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut files = WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| include_hidden || e.depth() == 0 || !is_hidden(e))
        .filter_map(|entry_result| match entry_result {
            Ok(entry) if entry.file_type().is_file() && has_image_extension(entry.path()) => {
                Some(Ok(entry.into_path()))
            }
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        })
        .collect::<Result<Vec<_>, _>>()?;
    files.sort();
    Ok(files)
}

/// Expands the command line inputs: directories are walked, files are taken as given
/// so that a non-image passed explicitly still shows up (as skipped) in the report.
pub fn collect_inputs(paths: &[PathBuf], include_hidden: bool) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            inputs.extend(list_images_walkdir(path, include_hidden)?);
        } else {
            inputs.push(path.clone());
        }
    }
    Ok(inputs)
}

/// `<output_dir>/<stem>.jpg`, with `-2`, `-3`, ... appended when the name is taken
/// within this batch or already exists on disk.
pub fn unique_output_path(output_dir: &Path, source: &Path, taken: &mut HashSet<PathBuf>) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "image".to_string());

    let mut candidate = output_dir.join(format!("{stem}.jpg"));
    let mut counter = 2;
    while taken.contains(&candidate) || candidate.exists() {
        candidate = output_dir.join(format!("{stem}-{counter}.jpg"));
        counter += 1;
    }
    taken.insert(candidate.clone());
    candidate
}
