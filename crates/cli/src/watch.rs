use crate::{print_json, WatchArgs};
use anyhow::{Context as AnyhowContext, Result};
use log::{debug, info, warn};
use notify::{Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use prose_coordinator::{DocumentAnalyzer, DocumentSession, EngineConfig, SessionConfig};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

/// Feeds every saved version of a file through one coordinator session and prints each
/// delivered report as a JSON line. Runs until Ctrl-C.
pub(crate) async fn run_watch(args: WatchArgs, config: EngineConfig) -> Result<()> {
    let path = args
        .path
        .canonicalize()
        .with_context(|| format!("Invalid file path {}", args.path.display()))?;

    let mut session_config = SessionConfig::from(&config);
    if let Some(ms) = args.debounce_ms {
        session_config.debounce = Duration::from_millis(ms);
    }
    let analyzer = Arc::new(DocumentAnalyzer::from_config(&config));
    let session = DocumentSession::open(path.display().to_string(), analyzer, session_config);
    let mut updates = session.subscribe();

    let (event_tx, mut event_rx) = mpsc::channel::<notify::Result<Event>>(64);
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = event_tx.blocking_send(res);
        },
        NotifyConfig::default(),
    )
    .context("Failed to start file watcher")?;
    watcher
        .watch(&path, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch {}", path.display()))?;
    info!("Watching {}", path.display());

    submit(&session, &path).await;

    loop {
        tokio::select! {
            event = event_rx.recv() => {
                match event {
                    Some(Ok(event)) if is_content_change(&event.kind) => {
                        debug!("Change detected in {}", path.display());
                        submit(&session, &path).await;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => warn!("Watch error: {err}"),
                    None => break,
                }
            }
            report = updates.recv() => {
                match report {
                    Ok(report) => print_json(&report, args.pretty)?,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Output fell behind; skipped {skipped} reports");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping watch");
                break;
            }
        }
    }

    session.close().await;
    Ok(())
}

fn is_content_change(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

async fn submit(session: &DocumentSession, path: &Path) {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!("Failed to read {}: {err}", path.display());
            return;
        }
    };
    match session.edit(text).await {
        Ok(generation) => debug!("Queued generation {generation}"),
        Err(err) => warn!("Skipping this version of {}: {err}", path.display()),
    }
}
