//! # Hot Reload Module
//!
//! Watches a controller manifest and rebuilds the route table whenever the
//! file changes, so a long-running process picks up new routes without a
//! restart.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use arc_swap::ArcSwap;
//! use ctlroute::hot_reload::watch_manifest;
//! use std::sync::Arc;
//!
//! let table = Arc::new(ArcSwap::from_pointee(initial.table));
//! let watcher = watch_manifest("routes.yaml", table.clone(), config, |reloaded, _| {
//!     println!("Reloaded {} routes", reloaded.entry_count());
//! })?;
//! // Keep `watcher` alive for as long as reloads should happen.
//! ```
//!
//! ## Error Handling
//!
//! If the new manifest fails to parse or a controller fails to build, the
//! error is logged and the previous table stays active. Readers holding a
//! loaded table keep it until they load again.

use crate::config::BuildConfig;
use crate::controller::load_manifest;
use crate::route::{Overwrite, RouteBuild, RouteBuilder, RouteTable};
use anyhow::Context;
use arc_swap::ArcSwap;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Load `path` and build its whole route table.
///
/// # Errors
///
/// Manifest I/O or parse errors, and the first controller build error.
pub fn rebuild_from_manifest(path: &Path, config: &BuildConfig) -> anyhow::Result<RouteBuild> {
    let registry = load_manifest(path, config)?;
    RouteBuilder::new(config.clone())
        .build_all(&registry)
        .with_context(|| format!("failed to build routes from {}", path.display()))
}

/// Watch a manifest file and swap a rebuilt [`RouteTable`] into `table` when
/// it changes.
///
/// `on_reload` runs after each successful swap with the table now stored in
/// `table` and the overwrites recorded while building it.
pub fn watch_manifest<P, F>(
    manifest_path: P,
    table: Arc<ArcSwap<RouteTable>>,
    config: BuildConfig,
    mut on_reload: F,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
    F: FnMut(&Arc<RouteTable>, &[Overwrite]) + Send + 'static,
{
    let path: PathBuf = manifest_path.as_ref().to_path_buf();
    let watch_path = path.clone();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    match rebuild_from_manifest(&watch_path, &config) {
                        Ok(RouteBuild {
                            table: rebuilt,
                            overwrites,
                            ..
                        }) => {
                            info!(
                                manifest = %watch_path.display(),
                                routes_count = rebuilt.entry_count(),
                                "hot-reload: route table replaced"
                            );
                            let rebuilt = Arc::new(rebuilt);
                            table.store(Arc::clone(&rebuilt));
                            on_reload(&rebuilt, &overwrites);
                        }
                        Err(e) => error!(
                            manifest = %watch_path.display(),
                            error = %format!("{e:#}"),
                            "hot-reload: keeping previous route table"
                        ),
                    }
                }
            }
            Err(e) => error!(error = %e, "watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}
