use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use crate::error::TaxonomyError;

/// Taxonomy file name, relative to a dataset root.
pub const DATASET_YAML: &str = "data.yaml";

/// A dataset taxonomy as stored in `data.yaml`: split image paths plus the ordered class names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub train: String,
    #[serde(default)]
    pub valid: String,
    #[serde(default)]
    pub test: String,
    #[serde(rename = "nc", default)]
    pub names_count: usize,
    #[serde(deserialize_with = "deserialize_names")]
    pub names: Vec<String>,
    #[serde(skip)]
    names_index: HashMap<String, usize>,
}

// YOLO tooling writes `names` either as a list or as an index mapping
#[derive(Deserialize)]
#[serde(untagged)]
enum DataYamlNames {
    Sequence(Vec<String>),
    Mapping(BTreeMap<usize, String>),
}

fn deserialize_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let names = match DataYamlNames::deserialize(deserializer)? {
        DataYamlNames::Sequence(names) => names,
        DataYamlNames::Mapping(mapping) => {
            // Keys must be exactly 0..len, so the mapping is dense and bounded by its size
            let len = mapping.len();
            if let Some(index) = mapping.keys().find(|&&index| index >= len) {
                return Err(serde::de::Error::custom(format!(
                    "class index {} out of range for {} names",
                    index, len
                )));
            }
            mapping.into_values().collect()
        }
    };
    Ok(names)
}

impl Dataset {
    /// Destination taxonomy with the conventional `../<split>/images` paths.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut dataset = Self {
            train: "../train/images".to_string(),
            valid: "../valid/images".to_string(),
            test: "../test/images".to_string(),
            names_count: names.len(),
            names,
            names_index: HashMap::new(),
        };
        dataset.build_index();
        dataset
    }

    fn build_index(&mut self) {
        self.names_index = self
            .names
            .iter()
            .enumerate()
            .map(|(id, name)| (name.clone(), id))
            .collect();
    }

    /// Class name at a given index.
    pub fn class_name(&self, id: usize) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Index of a class name.
    pub fn class_id(&self, name: &str) -> Option<usize> {
        self.names_index.get(name).copied()
    }

    pub fn to_yaml(&self) -> Result<String, TaxonomyError> {
        serde_yaml::to_string(self).map_err(TaxonomyError::Serialize)
    }

    /// Load the `data.yaml` found under `root`.
    pub fn load(root: &Path) -> Result<Self, TaxonomyError> {
        let path = root.join(DATASET_YAML);
        let content = fs::read_to_string(&path).map_err(|source| TaxonomyError::Read {
            path: path.clone(),
            source,
        })?;
        let mut dataset: Dataset =
            serde_yaml::from_str(&content).map_err(|source| TaxonomyError::Parse {
                path: path.clone(),
                source,
            })?;
        dataset.build_index();
        Ok(dataset)
    }

    /// Write this taxonomy as `data.yaml` under `root`.
    pub fn save(&self, root: &Path) -> Result<(), TaxonomyError> {
        let path = root.join(DATASET_YAML);
        let yaml = self.to_yaml()?;
        fs::write(&path, yaml).map_err(|source| TaxonomyError::Write { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_builds_index() {
        let dataset = Dataset::new(["car", "person"]);
        assert_eq!(dataset.names_count, 2);
        assert_eq!(dataset.class_id("person"), Some(1));
        assert_eq!(dataset.class_id("truck"), None);
        assert_eq!(dataset.class_name(0), Some("car"));
        assert_eq!(dataset.class_name(2), None);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        Dataset::new(["car", "person"]).save(temp_dir.path()).unwrap();

        let content = fs::read_to_string(temp_dir.path().join(DATASET_YAML)).unwrap();
        assert!(content.contains("train: ../train/images"));
        assert!(content.contains("valid: ../valid/images"));
        assert!(content.contains("nc: 2"));

        let loaded = Dataset::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.names, vec!["car", "person"]);
        assert_eq!(loaded.class_id("car"), Some(0));
    }

    #[test]
    fn test_load_mapping_names() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(
            temp_dir.path().join(DATASET_YAML),
            "train: ../train/images\nnames:\n  0: vehicle\n  1: pedestrian\n",
        )
        .unwrap();

        let loaded = Dataset::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.class_name(1), Some("pedestrian"));
        assert_eq!(loaded.class_id("vehicle"), Some(0));
    }

    #[test]
    fn test_load_rejects_sparse_mapping() {
        let temp_dir = tempfile::tempdir().unwrap();
        for names in [
            "names:\n  18446744073709551615: vehicle\n",
            "names:\n  4000000000000: vehicle\n",
            "names:\n  0: vehicle\n  2: pedestrian\n",
        ] {
            fs::write(temp_dir.path().join(DATASET_YAML), names).unwrap();
            let err = Dataset::load(temp_dir.path()).unwrap_err();
            assert!(matches!(err, TaxonomyError::Parse { .. }), "{}", names);
        }
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = Dataset::load(temp_dir.path()).unwrap_err();
        assert!(matches!(err, TaxonomyError::Read { .. }));
    }
}
