use log::{debug, warn};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{ItemError, SetupError};
use crate::split::Split;
use crate::types::{parse_destination_id, DatasetItem, IMAGES_DIR, LABELS_DIR};
use crate::utils::create_output_directory;

/// Create `<dest>/{train,test,valid}/{images,labels}`. Existing content is kept.
pub fn setup_output_directories(dest: &Path) -> Result<(), SetupError> {
    let mut dirs = vec![dest.to_path_buf()];
    for split in Split::ALL {
        dirs.push(dest.join(split.as_str()).join(IMAGES_DIR));
        dirs.push(dest.join(split.as_str()).join(LABELS_DIR));
    }

    for dir in dirs {
        create_output_directory(&dir)
            .map_err(|source| SetupError::CreateDir { path: dir, source })?;
    }
    Ok(())
}

/// Largest id already used for `split` under `dest`, 0 for an empty split.
pub fn last_used_id(dest: &Path, split: Split) -> usize {
    let split_dir = dest.join(split.as_str());
    [IMAGES_DIR, LABELS_DIR]
        .iter()
        .filter_map(|sub| fs::read_dir(split_dir.join(sub)).ok())
        .flat_map(|entries| entries.flatten())
        .filter_map(|entry| parse_destination_id(split, &entry.file_name().to_string_lossy()))
        .max()
        .unwrap_or(0)
}

/// Sorted names of the regular files directly under `dir`.
pub fn list_files(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Sorted `(name, path)` of the directories directly under `dir`.
pub fn list_dirs(dir: &Path) -> std::io::Result<Vec<(String, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
        }
    }
    dirs.sort();
    Ok(dirs)
}

// Parent directories must already exist
fn write_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.flush()
}

/// Write the image then the label of an item. If either write fails, files
/// already written for this item are removed before the error is returned.
pub fn write_item(item: &DatasetItem) -> Result<(), ItemError> {
    let image = item.image.dst_path.as_path();
    let label = item.label.dst_path.as_path();

    if let Err(source) = write_file(image, &item.image.data) {
        rollback(&[image]);
        return Err(ItemError::WriteImage {
            path: image.to_path_buf(),
            source,
        });
    }
    if let Err(source) = write_file(label, &item.label.data) {
        rollback(&[image, label]);
        return Err(ItemError::WriteLabel {
            path: label.to_path_buf(),
            source,
        });
    }
    Ok(())
}

// A failed create may still leave a file behind, so anything present is removed
fn rollback(paths: &[&Path]) {
    for path in paths.iter().filter(|path| path.is_file()) {
        match fs::remove_file(path) {
            Ok(()) => debug!("Removed partially written file {}", path.display()),
            Err(e) => warn!("Failed to remove {} after write error: {}", path.display(), e),
        }
    }
}
