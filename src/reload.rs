//! Config watcher for serve mode.
//!
//! The watcher owns configuration reloading entirely: it re-reads the
//! config file when it changes and atomically swaps in a rebuilt context
//! snapshot. The render pipeline only ever reads the immutable snapshot
//! it was handed at the start of a request.

use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use arc_swap::ArcSwap;
use crossbeam::channel::Receiver;
use notify::{RecursiveMode, Watcher};

use crate::config;
use crate::log;
use crate::render::RenderContext;

/// Spawn a thread watching the config file for content changes.
pub fn spawn_config_watcher(
    context: Arc<ArcSwap<RenderContext>>,
    shutdown_rx: Receiver<()>,
) -> JoinHandle<()> {
    thread::spawn(move || watch_config(&context, &shutdown_rx))
}

fn watch_config(context: &ArcSwap<RenderContext>, shutdown_rx: &Receiver<()>) {
    let config_path = context.load().config.config_path.clone();
    let (tx, rx) = crossbeam::channel::unbounded();

    let mut watcher = match notify::recommended_watcher(move |res| {
        let _ = tx.send(res);
    }) {
        Ok(watcher) => watcher,
        Err(e) => {
            log!("watch"; "failed to start config watcher: {}", e);
            return;
        }
    };

    // Watch the parent directory: editors often replace the file wholesale
    let target = config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    if let Err(e) = watcher.watch(&target, RecursiveMode::NonRecursive) {
        log!("watch"; "failed to watch {}: {}", target.display(), e);
        return;
    }

    loop {
        crossbeam::select! {
            recv(shutdown_rx) -> _ => break,
            recv(rx) -> event => {
                let Ok(event) = event else { break };
                let Ok(event) = event else { continue };
                if !event.paths.iter().any(|p| p == &config_path) {
                    continue;
                }
                match config::reload_config() {
                    Ok(true) => {
                        // Rebuild the whole snapshot: locales and string
                        // tables may have moved with the config
                        context.store(Arc::new(RenderContext::live(config::cfg())));
                        log!("watch"; "configuration reloaded");
                    }
                    Ok(false) => {}
                    Err(e) => log!("watch"; "config reload failed: {}", e),
                }
            }
        }
    }
}
