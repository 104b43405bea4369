//! Live server: requests flow through the shared resolve/render pipeline.

mod lifecycle;
pub mod response;

pub use response::Sink;

use crate::config::SiteConfig;
use crate::render::RenderContext;
use crate::{debug, log, render};
use anyhow::Result;
use arc_swap::ArcSwap;
use crossbeam::channel;
use std::sync::Arc;
use tiny_http::Server;

/// Bind the server and run the request loop until shutdown.
pub fn run(config: Arc<SiteConfig>) -> Result<()> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    crate::core::register_server(Arc::clone(&server), shutdown_tx);

    // One immutable context snapshot per request; the watcher swaps it
    // atomically when the config file changes.
    let context = Arc::new(ArcSwap::from_pointee(RenderContext::live(Arc::clone(
        &config,
    ))));
    let _watcher = config
        .serve
        .watch
        .then(|| crate::reload::spawn_config_watcher(Arc::clone(&context), shutdown_rx));

    log!("serve"; "http://{}", addr);
    if config.build.cache {
        debug!("serve"; "render cache enabled at {}", config.build.content.display());
    }

    run_request_loop(&server, &context);
    Ok(())
}

fn run_request_loop(server: &Server, context: &Arc<ArcSwap<RenderContext>>) {
    // Use thread pool to handle requests concurrently
    // This prevents slow renders from blocking other requests
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .expect("failed to create thread pool");

    for request in server.incoming_requests() {
        if crate::core::is_shutdown() {
            break;
        }
        let context = Arc::clone(context);
        pool.spawn(move || {
            let snapshot = context.load_full();
            let outcome = render::run(request.url(), &snapshot);
            if let Err(e) = Sink::Http(request).deliver(outcome) {
                log!("serve"; "request error: {e}");
            }
        });
    }
}
