//! Collection pipeline: prepares the destination, walks every source, fans
//! items out to the worker pool and reports once all of them have finished.

use indicatif::ProgressBar;
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::class_sync::ClassSync;
use crate::config::{Config, Source};
use crate::conversion::LabelRemapper;
use crate::dataset::Dataset;
use crate::error::{ItemError, SetupError, SourceError};
use crate::io::{last_used_id, list_dirs, list_files, setup_output_directories, write_item};
use crate::pool::WorkerPool;
use crate::sequence::SequenceAllocator;
use crate::split::Split;
use crate::summary::{CollectReport, Summary};
use crate::types::{CollectClasses, DatasetItem, IMAGES_DIR};
use crate::utils::{create_progress_bar, right_wrap};

/// Where a collection run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    DirectoryPreparing,
    TaxonomyWriting,
    SourceProcessing,
    Draining,
    Reporting,
    Done,
}

// State shared by every task of one run
struct RunContext {
    dest: PathBuf,
    destination: Dataset,
    sequences: Arc<HashMap<Split, SequenceAllocator>>,
    summary: Summary,
    progress: ProgressBar,
}

// A source whose taxonomy has been loaded
struct ActiveSource {
    root: PathBuf,
    taxonomy: Dataset,
    sync: ClassSync,
}

pub struct Collector {
    config: Config,
    pool: WorkerPool,
    sequences: Arc<HashMap<Split, SequenceAllocator>>,
    show_progress: bool,
    phase: Phase,
}

impl Collector {
    pub fn new(config: Config) -> Result<Self, SetupError> {
        let pool = WorkerPool::new(config.workers)?;
        let sequences = Split::ALL
            .into_iter()
            .map(|split| (split, SequenceAllocator::new()))
            .collect();

        Ok(Self {
            config,
            pool,
            sequences: Arc::new(sequences),
            show_progress: false,
            phase: Phase::Initializing,
        })
    }

    /// Draw a progress bar while collecting.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn enter(&mut self, phase: Phase) {
        debug!("Collector phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// Run a full collection. Only destination setup failures are returned;
    /// failing sources are skipped and failing items are counted.
    pub fn collect_all(&mut self) -> Result<CollectReport, SetupError> {
        self.enter(Phase::Initializing);
        let dest = self.config.dest.clone();

        self.enter(Phase::DirectoryPreparing);
        setup_output_directories(&dest)?;
        for split in Split::ALL {
            let last = last_used_id(&dest, split);
            if last > 0 {
                info!("Destination {} already holds ids up to {}", split, last);
            }
            self.sequences[&split].advance_past(last);
        }

        self.enter(Phase::TaxonomyWriting);
        let destination = Dataset::new(self.config.classes.iter().cloned());
        destination.save(&dest)?;
        info!("Created destination data.yaml in {}", dest.display());

        let progress = if self.show_progress {
            create_progress_bar(0, "Collect")
        } else {
            ProgressBar::hidden()
        };
        let ctx = Arc::new(RunContext {
            dest,
            destination,
            sequences: Arc::clone(&self.sequences),
            summary: Summary::new(),
            progress,
        });

        self.enter(Phase::SourceProcessing);
        let mut skipped_sources = 0;
        for source in &self.config.sources {
            info!("Start collecting dataset from {}", source.src.display());
            match self.collect_source(&ctx, source) {
                Ok(submitted) => info!(
                    "Queued {} items from {}",
                    submitted,
                    source.src.display()
                ),
                Err(e) => {
                    error!("Skipping source {}: {}", source.src.display(), e);
                    skipped_sources += 1;
                }
            }
        }

        self.enter(Phase::Draining);
        self.pool.wait();
        ctx.progress.finish_and_clear();

        self.enter(Phase::Reporting);
        let splits = ctx.summary.report();
        for (split, report) in &splits {
            report.log(*split);
        }

        self.enter(Phase::Done);
        Ok(CollectReport {
            splits,
            skipped_sources,
        })
    }

    /// Queue every item of one source. Returns the number of items queued.
    fn collect_source(&self, ctx: &Arc<RunContext>, source: &Source) -> Result<usize, SourceError> {
        let taxonomy = Dataset::load(&source.src)?;
        info!(
            "Loaded dataset config of {} ({} classes)",
            source.src.display(),
            taxonomy.names.len()
        );
        let active = Arc::new(ActiveSource {
            root: source.src.clone(),
            taxonomy,
            sync: source.class_sync.clone(),
        });

        let dirs = list_dirs(&active.root).map_err(|source| SourceError::ListDir {
            path: active.root.clone(),
            source,
        })?;

        let mut submitted = 0;
        for (name, dir) in dirs {
            let Some(split) = Split::resolve(&name) else {
                continue;
            };
            info!("Collecting dataset on folder {} as {} ({})", name, split, dir.display());

            let images = match list_files(&dir.join(IMAGES_DIR)) {
                Ok(images) => images,
                Err(e) => {
                    warn!("Failed to list images in {}: {}", dir.display(), e);
                    continue;
                }
            };
            ctx.progress.inc_length(images.len() as u64);

            let dir = Arc::new(dir);
            for image in images {
                let ctx = Arc::clone(ctx);
                let active = Arc::clone(&active);
                let dir = Arc::clone(&dir);
                self.pool.submit(split, move || {
                    process_item(&ctx, &active, &dir, &image, split)
                });
                submitted += 1;
            }
        }
        Ok(submitted)
    }
}

// Task body: never panics on bad input, records the outcome in the summary
fn process_item(ctx: &RunContext, source: &ActiveSource, dir: &Path, image: &str, split: Split) {
    let mut item = DatasetItem::new(dir, &ctx.dest, image, split);

    match collect_item(ctx, source, &mut item) {
        Ok(classes) => {
            ctx.summary.split(split).record_success(&classes);
            info!(
                "Dataset collected. id={} src={} dir={} classes={:?}",
                item.id.unwrap_or_default(),
                right_wrap(&item.image.src_filename, 25),
                right_wrap(&item.src_dir.to_string_lossy(), 25),
                classes
            );
        }
        Err(e) => {
            ctx.summary.split(split).record_failure();
            warn!(
                "Failed collecting item. src={} error={}",
                right_wrap(&item.image.src_path.to_string_lossy(), 75),
                e
            );
        }
    }
    ctx.progress.inc(1);
}

fn collect_item(
    ctx: &RunContext,
    source: &ActiveSource,
    item: &mut DatasetItem,
) -> Result<CollectClasses, ItemError> {
    let label = fs::read(&item.label.src_path).map_err(|e| ItemError::ReadLabel {
        path: item.label.src_path.clone(),
        source: e,
    })?;

    let remapper = LabelRemapper::new(&source.taxonomy, &source.sync, &ctx.destination);
    let remapped = remapper
        .remap(&label)
        .ok_or_else(|| ItemError::NoMappableClasses {
            path: item.label.src_path.clone(),
        })?;
    item.label.data = remapped.data;

    item.image.data = fs::read(&item.image.src_path).map_err(|e| ItemError::ReadImage {
        path: item.image.src_path.clone(),
        source: e,
    })?;

    if item.label.data.is_empty() || item.image.data.is_empty() {
        return Err(ItemError::EmptyPayload {
            path: item.image.src_path.clone(),
        });
    }

    let id = ctx.sequences[&item.split]
        .next_id()
        .ok_or(ItemError::IdsExhausted { split: item.split })?;
    item.assign_id(id);
    write_item(item)?;

    Ok(remapped.classes)
}
