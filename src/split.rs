use serde::{Deserialize, Serialize};
use std::fmt;

/// A dataset partition in the destination tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Test,
    Valid,
}

// Directory names accepted for each split, case-sensitive
const SPLIT_ALIASES: &[(&str, Split)] = &[
    ("train", Split::Train),
    ("training", Split::Train),
    ("test", Split::Test),
    ("tests", Split::Test),
    ("testing", Split::Test),
    ("testings", Split::Test),
    ("valid", Split::Valid),
    ("validation", Split::Valid),
];

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Test, Split::Valid];

    /// Resolve a source directory name to a split, `None` when the name is not a known alias.
    pub fn resolve(dir_name: &str) -> Option<Split> {
        SPLIT_ALIASES
            .iter()
            .find(|(alias, _)| *alias == dir_name)
            .map(|&(_, split)| split)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
            Split::Valid => "valid",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
