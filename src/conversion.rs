use log::debug;

use crate::class_sync::ClassSync;
use crate::dataset::Dataset;
use crate::types::CollectClasses;

/// Rewrites YOLO label records from a source taxonomy to the destination taxonomy.
pub struct LabelRemapper<'a> {
    pub source: &'a Dataset,
    pub sync: &'a ClassSync,
    pub destination: &'a Dataset,
}

/// A label whose class indices now refer to the destination taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemappedLabel {
    pub data: Vec<u8>,
    pub classes: CollectClasses,
}

impl<'a> LabelRemapper<'a> {
    pub fn new(source: &'a Dataset, sync: &'a ClassSync, destination: &'a Dataset) -> Self {
        Self {
            source,
            sync,
            destination,
        }
    }

    /// Remap one record. Returns the rewritten record and its canonical class,
    /// or `None` when the record has to be dropped.
    pub fn remap_record(&self, record: &str) -> Option<(String, &'a str)> {
        let record = record.trim_start();
        let split_at = record.find(char::is_whitespace).unwrap_or(record.len());
        let (head, geometry) = record.split_at(split_at);

        let source_id: usize = head.parse().ok()?;
        let source_name = self.source.class_name(source_id)?;
        let canonical = self.sync.resolve(source_name)?;
        let Some(destination_id) = self.destination.class_id(canonical) else {
            debug!(
                "Class '{}' is not part of the destination taxonomy, record dropped",
                canonical
            );
            return None;
        };

        Some((format!("{}{}", destination_id, geometry), canonical))
    }

    /// Remap every record of a label file. `None` when no record survives.
    pub fn remap(&self, body: &[u8]) -> Option<RemappedLabel> {
        let body = String::from_utf8_lossy(body);
        let mut records = Vec::new();
        let mut classes = CollectClasses::new();

        for line in body.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if let Some((record, canonical)) = self.remap_record(line) {
                records.push(record);
                *classes.entry(canonical.to_string()).or_insert(0) += 1;
            }
        }

        if records.is_empty() {
            return None;
        }

        Some(RemappedLabel {
            data: records.join("\n").into_bytes(),
            classes,
        })
    }
}
