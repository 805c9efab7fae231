//! File watcher: annotates on startup, then re-annotates when the document
//! or the settings file changes.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};

use crate::commands;
use crate::config::{self, CONFIG_FILE};
use crate::error;
use crate::pipeline;

/// Debounce delay between filesystem events and re-annotation.
const DEBOUNCE_MS: u64 = 100;

/// Directories holding the document and the settings file.
fn collect_watch_dirs(document: &Path, root: &Path) -> HashSet<PathBuf> {
    let mut dirs = HashSet::new();
    match document.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            dirs.insert(parent.to_path_buf());
        },
        _ => {
            dirs.insert(root.to_path_buf());
        },
    }
    if let Some(parent) = root.join(CONFIG_FILE).parent() {
        dirs.insert(parent.to_path_buf());
    }
    return dirs;
}

/// Create a filesystem watcher that sends events on the given channel.
///
/// # Errors
///
/// Returns `Error::WatchFailed` if the watcher cannot be created.
fn create_watcher(
    tx: crossbeam_channel::Sender<()>,
) -> Result<notify::RecommendedWatcher, error::Error> {
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && matches!(
                event.kind,
                notify::EventKind::Create(_)
                    | notify::EventKind::Modify(_)
                    | notify::EventKind::Remove(_)
            )
        {
            let _ = tx.send(());
        }
    })
    .map_err(|e| {
        return error::Error::WatchFailed {
            reason: format!("watcher setup failed: {e}"),
        };
    });
}

/// Entry point for the watch command.
///
/// Annotates once, then watches the document and settings and annotates
/// again after each burst of changes. Runs until interrupted.
///
/// # Errors
///
/// Returns errors from the initial document read or watcher setup.
pub fn run(uri: &str, document: &Path, json: bool) -> Result<(), error::Error> {
    let root = PathBuf::from(".");

    // Fail fast on a missing document; later reads only log.
    commands::read_document(Some(document))?;

    eprintln!("watch: initial annotation");
    run_annotate(uri, document, &root, json);

    let watch_dirs = collect_watch_dirs(document, &root);
    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(tx)?;

    for dir in &watch_dirs {
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|e| {
                return error::Error::WatchFailed {
                    reason: format!("cannot watch {}: {e}", dir.display()),
                };
            })?;
        log::debug!("watching {}", dir.display());
    }

    let dir_count = watch_dirs.len();
    eprintln!("watch: monitoring {dir_count} directories, press Ctrl+C to stop");

    while rx.recv().is_ok() {
        let debounce = Duration::from_millis(DEBOUNCE_MS);
        while rx.recv_timeout(debounce).is_ok() {}
        log::info!("change detected, re-annotating {}", document.display());
        eprintln!("watch: change detected, re-annotating...");
        run_annotate(uri, document, &root, json);
    }

    return Ok(());
}

/// Load settings, read the document, and print annotations once.
/// Failures are reported and the watcher keeps running.
fn run_annotate(uri: &str, document: &Path, root: &Path, json: bool) {
    let result = config::Config::load(root).and_then(|config| {
        let text = commands::read_document(Some(document))?;
        let report = pipeline::annotate_document(&config, uri, &text, None);
        return commands::print_annotations(&report.annotations, json);
    });
    if let Err(e) = result {
        log::warn!("annotation failed: {e}");
        eprintln!("error: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watches_document_and_settings_dirs() {
        let dirs = collect_watch_dirs(Path::new("web/app.tsx"), Path::new("."));
        assert!(dirs.contains(Path::new("web")));
        assert!(dirs.contains(Path::new(".")));
        assert_eq!(dirs.len(), 2);
    }

    #[test]
    fn bare_file_name_watches_root_once() {
        let dirs = collect_watch_dirs(Path::new("app.tsx"), Path::new("."));
        assert_eq!(dirs.len(), 1);
        assert!(dirs.contains(Path::new(".")));
    }
}
