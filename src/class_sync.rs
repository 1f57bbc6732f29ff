use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Per-source table mapping source class names onto canonical destination names.
///
/// Deserialized from `canonical: [alias, ...]`. The inverse alias index is
/// built once; an alias listed under two different canonical names is rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Vec<String>>",
    into = "BTreeMap<String, Vec<String>>"
)]
pub struct ClassSync {
    raw: BTreeMap<String, Vec<String>>,
    index: HashMap<String, String>,
}

impl ClassSync {
    pub fn new(raw: BTreeMap<String, Vec<String>>) -> Result<Self, String> {
        let mut index = HashMap::new();
        for (canonical, aliases) in &raw {
            for alias in aliases {
                if let Some(previous) = index.insert(alias.clone(), canonical.clone()) {
                    if previous != *canonical {
                        return Err(format!(
                            "alias '{}' maps to both '{}' and '{}'",
                            alias, previous, canonical
                        ));
                    }
                }
            }
        }
        Ok(Self { raw, index })
    }

    /// Build from `(canonical, aliases)` pairs.
    pub fn from_pairs<I, A>(pairs: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (&'static str, A)>,
        A: IntoIterator<Item = &'static str>,
    {
        let raw = pairs
            .into_iter()
            .map(|(canonical, aliases)| {
                (
                    canonical.to_string(),
                    aliases.into_iter().map(str::to_string).collect(),
                )
            })
            .collect();
        Self::new(raw)
    }

    /// Canonical name for a source-side alias.
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.index.get(alias).map(String::as_str)
    }

    pub fn canonical_names(&self) -> impl Iterator<Item = &str> {
        self.raw.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl TryFrom<BTreeMap<String, Vec<String>>> for ClassSync {
    type Error = String;

    fn try_from(raw: BTreeMap<String, Vec<String>>) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<ClassSync> for BTreeMap<String, Vec<String>> {
    fn from(sync: ClassSync) -> Self {
        sync.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_aliases() {
        let sync =
            ClassSync::from_pairs([("car", vec!["car", "van"]), ("person", vec!["pedestrian"])])
                .unwrap();

        assert_eq!(sync.resolve("van"), Some("car"));
        assert_eq!(sync.resolve("car"), Some("car"));
        assert_eq!(sync.resolve("pedestrian"), Some("person"));
        assert_eq!(sync.resolve("person"), None);
        assert_eq!(sync.resolve("truck"), None);
    }

    #[test]
    fn test_conflicting_alias_is_rejected() {
        let err = ClassSync::from_pairs([("car", vec!["vehicle"]), ("truck", vec!["vehicle"])])
            .unwrap_err();
        assert!(err.contains("vehicle"));
    }

    #[test]
    fn test_repeated_alias_under_same_name_is_allowed() {
        let sync = ClassSync::from_pairs([("car", vec!["van", "van"])]).unwrap();
        assert_eq!(sync.resolve("van"), Some("car"));
    }

    #[test]
    fn test_deserialize_from_yaml() {
        let sync: ClassSync =
            serde_yaml::from_str("car: [car, vehicle]\nperson: [pedestrian, human]\n").unwrap();
        assert_eq!(sync.resolve("human"), Some("person"));
        assert_eq!(sync.resolve("vehicle"), Some("car"));
        assert_eq!(sync.canonical_names().collect::<Vec<_>>(), vec!["car", "person"]);

        let conflict: Result<ClassSync, _> = serde_yaml::from_str("a: [x]\nb: [x]\n");
        assert!(conflict.is_err());
    }
}
