//! Watch mode
//!
//! Re-runs a full analysis whenever files under the root change. Every run
//! starts from scratch; nothing is carried over between runs.

use crate::config::Config;
use colored::Colorize;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;
use thiserror::Error;

/// Watch mode errors
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Failed to create file watcher: {0}")]
    WatcherError(#[from] notify::Error),
    #[error("Failed to receive events: {0}")]
    RecvError(#[from] std::sync::mpsc::RecvError),
}

/// File watcher for continuous analysis
pub struct FileWatcher {
    debounce_ms: u64,
    /// Watched root; exclude patterns are matched against paths relative to it
    root: PathBuf,
    config: Config,
    /// Files whose changes never trigger a run (the report being written)
    ignored: Vec<PathBuf>,
}

impl FileWatcher {
    pub fn new(root: impl Into<PathBuf>, config: &Config) -> Self {
        Self {
            debounce_ms: 500,
            root: root.into(),
            config: config.clone(),
            ignored: Vec::new(),
        }
    }

    /// Ignore changes to `path`, typically the report destination.
    ///
    /// The path must be resolved the same way as the root (see
    /// `util::fs::resolve_report_path`) or event paths will not match it.
    pub fn ignoring(mut self, path: PathBuf) -> Self {
        self.ignored.push(path);
        self
    }

    /// Check if a changed path should trigger a new run
    pub fn should_trigger(&self, path: &Path) -> bool {
        if self.ignored.iter().any(|ignored| ignored == path) {
            return false;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        if name.ends_with(".partial") {
            return false;
        }

        match path.strip_prefix(&self.root) {
            Ok(relative) => !self.config.should_exclude(relative),
            Err(_) => true,
        }
    }

    /// Run `on_change` once, then again after every relevant change.
    /// The callback returns false to stop watching.
    pub fn watch<F>(&self, path: &Path, mut on_change: F) -> Result<(), WatchError>
    where
        F: FnMut() -> bool,
    {
        let (tx, rx) = channel();

        let mut debouncer = new_debouncer(Duration::from_millis(self.debounce_ms), tx)?;
        debouncer.watcher().watch(path, RecursiveMode::Recursive)?;

        println!();
        println!("{}", "👁  Watch mode active. Press Ctrl+C to stop.".cyan().bold());
        println!("{}", format!("   Watching: {}", path.display()).dimmed());
        println!();

        if !on_change() {
            return Ok(());
        }

        loop {
            match rx.recv()? {
                Ok(events) => {
                    let relevant: Vec<_> = events
                        .iter()
                        .filter(|e| {
                            matches!(
                                e.kind,
                                DebouncedEventKind::Any | DebouncedEventKind::AnyContinuous
                            ) && self.should_trigger(&e.path)
                        })
                        .collect();

                    if relevant.is_empty() {
                        continue;
                    }

                    println!();
                    println!(
                        "{}",
                        format!(
                            "🔄 Changes detected in {} file(s), re-analyzing...",
                            relevant.len()
                        )
                        .yellow()
                    );
                    for event in relevant.iter().take(5) {
                        if let Some(name) = event.path.file_name() {
                            println!("   • {}", name.to_string_lossy().dimmed());
                        }
                    }
                    if relevant.len() > 5 {
                        println!("   • ... and {} more", relevant.len() - 5);
                    }
                    println!();

                    if !on_change() {
                        break;
                    }
                }
                Err(e) => {
                    eprintln!("{}: {:?}", "Watch error".red(), e);
                }
            }
        }

        Ok(())
    }
}
