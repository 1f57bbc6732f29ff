use indicatif::{ProgressBar, ProgressStyle};
use log::error;
use std::fs;
use std::path::Path;

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template(&format!(
        "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
        label
    ))
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("#>-");
    pb.set_style(style);
    pb
}

/// Build a thread pool of `threads` workers named `<name>-<index>`
pub fn create_io_thread_pool(
    threads: usize,
    name: &str,
) -> Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
    let prefix = name.to_string();
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .thread_name(move |index| format!("{}-{}", prefix, index))
        .panic_handler(|_| error!("A collector task panicked"))
        .build()
}

/// Create a directory and its parents, keeping anything already there
pub fn create_output_directory(path: &Path) -> std::io::Result<std::path::PathBuf> {
    fs::create_dir_all(path)?;
    Ok(path.to_path_buf())
}

/// Keep the rightmost `limit` bytes of `s`, prefixed with `...` when shortened.
pub fn right_wrap(s: &str, limit: usize) -> String {
    if s.len() <= limit {
        return s.to_string();
    }
    let mut start = s.len() - limit;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    format!("...{}", &s[start..])
}
