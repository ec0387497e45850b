//! `watch` command - re-report on file changes.
//!
//! Watches the project root and re-runs the batch after a quiet debounce
//! window. Events under the scratch directory are filtered out so the
//! pipeline's own output does not re-trigger it. History is carried across
//! runs, so deltas track edits made during the session.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{RecursiveMode, Watcher};
use tokio::runtime::Runtime;

use crate::cli::report;
use crate::config::BudgetConfig;
use crate::history::HistoryStore;
use crate::pipeline::Pipeline;
use crate::{debug, log, logger};

/// Quiet window between the last change and the re-run.
const DEBOUNCE: Duration = Duration::from_millis(250);

/// How often the loop wakes up to check for Ctrl+C.
const POLL: Duration = Duration::from_millis(200);

/// Set by the Ctrl+C handler.
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Run the initial report, then re-report on qualifying file changes.
pub fn run(config: BudgetConfig) -> Result<()> {
    ctrlc::set_handler(|| SHUTDOWN.store(true, Ordering::SeqCst))
        .context("failed to install Ctrl+C handler")?;

    let config = Arc::new(config);
    let runtime = Runtime::new().context("failed to start async runtime")?;
    let pipeline = Arc::new(Pipeline::new(Arc::clone(&config))?);
    let mut history = HistoryStore::new();

    // Initial report; a fatal error here (unreadable pages root) aborts.
    report::run_once(&runtime, &pipeline, &config, &mut history)?;

    let (tx, rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = tx.send(res);
    })
    .context("failed to create file watcher")?;
    watcher
        .watch(&config.root, RecursiveMode::Recursive)
        .with_context(|| format!("failed to watch {}", config.root.display()))?;

    log!("watch"; "watching {} (Ctrl+C to stop)", config.root.display());

    let scratch = config.scratch_dir();
    loop {
        if SHUTDOWN.load(Ordering::SeqCst) {
            log!("watch"; "stopped");
            return Ok(());
        }

        match rx.recv_timeout(POLL) {
            Ok(Ok(event)) if is_relevant(&event, &scratch) => {
                debug!("watch"; "change: {:?}", event.paths);
                drain_until_quiet(&rx);
                if SHUTDOWN.load(Ordering::SeqCst) {
                    continue;
                }
                // The table prints through plain stdout; stop overwriting it.
                logger::status_detach();
                match report::run_once(&runtime, &pipeline, &config, &mut history) {
                    Ok(()) => logger::status_success("report updated"),
                    Err(e) => logger::status_error("report failed", &e.to_string()),
                }
            }
            Ok(Ok(_)) => {} // scratch-only event
            Ok(Err(e)) => log!("watch"; "notify error: {e}"),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Ok(()),
        }
    }
}

/// Whether an event touches anything outside the scratch directory.
fn is_relevant(event: &notify::Event, scratch: &Path) -> bool {
    event.paths.iter().any(|p| !p.starts_with(scratch))
}

/// Swallow further events until the debounce window passes quietly.
fn drain_until_quiet(rx: &Receiver<notify::Result<notify::Event>>) {
    while rx.recv_timeout(DEBOUNCE).is_ok() {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn event(paths: Vec<&str>) -> notify::Event {
        notify::Event {
            kind: notify::EventKind::Modify(notify::event::ModifyKind::Data(
                notify::event::DataChange::Any,
            )),
            paths: paths.into_iter().map(PathBuf::from).collect(),
            attrs: Default::default(),
        }
    }

    #[test]
    fn test_scratch_events_are_filtered() {
        let scratch = Path::new("/project/.budgie");
        assert!(!is_relevant(&event(vec!["/project/.budgie/index.mjs"]), scratch));
        assert!(!is_relevant(
            &event(vec!["/project/.budgie/docs/intro-out.js"]),
            scratch
        ));
    }

    #[test]
    fn test_page_events_trigger() {
        let scratch = Path::new("/project/.budgie");
        assert!(is_relevant(
            &event(vec!["/project/app/pages/about.mjs"]),
            scratch
        ));
        // Mixed batches count as relevant
        assert!(is_relevant(
            &event(vec!["/project/.budgie/index.mjs", "/project/public/app.js"]),
            scratch
        ));
    }

    #[test]
    fn test_empty_event_is_irrelevant() {
        let scratch = Path::new("/project/.budgie");
        assert!(!is_relevant(&event(vec![]), scratch));
    }
}
