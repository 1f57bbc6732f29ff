//! Dataset collector
//!
//! Merges several YOLO-style datasets (an `images/` and `labels/` folder per
//! split plus a `data.yaml` taxonomy) into one destination tree, rewriting every
//! label's class indices to a shared destination taxonomy.

pub mod class_sync;
pub mod collector;
pub mod config;
pub mod conversion;
pub mod dataset;
pub mod error;
pub mod io;
pub mod logging;
pub mod pool;
pub mod sequence;
pub mod split;
pub mod summary;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use class_sync::ClassSync;
pub use collector::{Collector, Phase};
pub use config::{Args, Config, Source};
pub use conversion::{LabelRemapper, RemappedLabel};
pub use dataset::Dataset;
pub use error::{ConfigError, ItemError, LoggingError, SetupError, SourceError, TaxonomyError};
pub use logging::init_logging;
pub use sequence::SequenceAllocator;
pub use split::Split;
pub use summary::{CollectReport, SplitReport, Summary};
pub use types::DatasetItem;
