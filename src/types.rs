use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::split::Split;

/// Extension of label files, source and destination alike.
pub const LABEL_EXT: &str = ".txt";

pub const IMAGES_DIR: &str = "images";
pub const LABELS_DIR: &str = "labels";

/// Canonical class name -> number of records.
pub type CollectClasses = BTreeMap<String, usize>;

// One side of a dataset item: where it comes from, where it goes, what it holds
#[derive(Debug, Clone, Default)]
pub struct ItemFile {
    pub src_filename: String,
    pub src_path: PathBuf,
    pub dst_filename: String,
    pub dst_path: PathBuf,
    pub data: Vec<u8>,
}

/// An image/label pair in flight. Owned by exactly one worker task.
#[derive(Debug, Clone)]
pub struct DatasetItem {
    pub id: Option<usize>,
    pub split: Split,
    pub src_dir: PathBuf,
    pub dst_dir: PathBuf,
    pub image: ItemFile,
    pub label: ItemFile,
}

/// Split a file name into stem and extension, the extension keeping its leading dot.
pub fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(pos) if pos > 0 => filename.split_at(pos),
        _ => (filename, ""),
    }
}

impl DatasetItem {
    /// Build a pending item for `image_filename` found in `<src_dir>/images`.
    pub fn new(src_dir: &Path, dst_root: &Path, image_filename: &str, split: Split) -> Self {
        let (stem, _) = split_extension(image_filename);
        let label_filename = format!("{}{}", stem, LABEL_EXT);

        Self {
            id: None,
            split,
            src_dir: src_dir.to_path_buf(),
            dst_dir: dst_root.join(split.as_str()),
            image: ItemFile {
                src_path: src_dir.join(IMAGES_DIR).join(image_filename),
                src_filename: image_filename.to_string(),
                ..Default::default()
            },
            label: ItemFile {
                src_path: src_dir.join(LABELS_DIR).join(&label_filename),
                src_filename: label_filename,
                ..Default::default()
            },
        }
    }

    /// Fix the destination names once an id has been allocated.
    pub fn assign_id(&mut self, id: usize) {
        let (_, ext) = split_extension(&self.image.src_filename);
        let new_name = format!("{}_{}", self.split, id);

        self.id = Some(id);
        self.image.dst_filename = format!("{}{}", new_name, ext);
        self.image.dst_path = self.dst_dir.join(IMAGES_DIR).join(&self.image.dst_filename);
        self.label.dst_filename = format!("{}{}", new_name, LABEL_EXT);
        self.label.dst_path = self.dst_dir.join(LABELS_DIR).join(&self.label.dst_filename);
    }
}

/// Parse the id out of a destination file name such as `train_42.jpg`.
pub fn parse_destination_id(split: Split, filename: &str) -> Option<usize> {
    let (stem, _) = split_extension(filename);
    stem.strip_prefix(split.as_str())?
        .strip_prefix('_')?
        .parse()
        .ok()
}
