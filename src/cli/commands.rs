use crate::config::BuildConfig;
use crate::controller::load_manifest;
use crate::hot_reload::{rebuild_from_manifest, watch_manifest};
use crate::linter::{lint_source, print_lint_issues, LintSeverity};
use crate::route::{RouteBuilder, RouteTable};
use crate::router::Router;
use anyhow::{bail, Context};
use arc_swap::ArcSwap;
use clap::{Parser, Subcommand};
use http::Method;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Command-line interface for ctlroute
///
/// Builds, lints and queries route tables described by a controller manifest.
#[derive(Parser)]
#[command(name = "ctlroute")]
#[command(about = "Controller route table builder", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Build the route table and print it as JSON
    Build {
        /// Path to the controller manifest (YAML or JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Write the table here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Build controllers on a thread pool (CTLROUTE_BUILD_WORKERS threads)
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
    /// Check controller metadata for route configuration mistakes
    Lint {
        /// Path to the controller manifest (YAML or JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Exit with an error if any lint errors are found
        #[arg(long, default_value_t = false)]
        fail_on_error: bool,

        /// Only show errors (hide warnings and info)
        #[arg(long, default_value_t = false)]
        errors_only: bool,
    },
    /// Resolve a request against the built table
    Match {
        /// Path to the controller manifest (YAML or JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// HTTP verb of the request
        #[arg(long, default_value = "GET")]
        method: String,

        /// Request path, e.g. /users/show/42
        #[arg(short, long)]
        path: String,
    },
    /// Rewrite the JSON table every time the manifest changes
    Watch {
        /// Path to the controller manifest (YAML or JSON)
        #[arg(short, long)]
        manifest: PathBuf,

        /// File the table is written to
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn write_table(table: &RouteTable, output: Option<&Path>) -> anyhow::Result<()> {
    let json = table.to_json_pretty()?;
    match output {
        Some(path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

fn build_command(manifest: &Path, output: Option<&Path>, parallel: bool, config: &BuildConfig) -> anyhow::Result<()> {
    let registry = load_manifest(manifest, config)?;
    let builder = RouteBuilder::new(config.clone());
    let build = if parallel {
        builder.build_all_parallel(&registry)?
    } else {
        builder.build_all(&registry)?
    };
    for o in &build.overwrites {
        warn!(path = %o.path, verb = ?o.verb, previous = %o.previous, replacement = %o.replacement, "Route overwritten");
    }
    write_table(&build.table, output)
}

fn lint_command(manifest: &Path, fail_on_error: bool, errors_only: bool, config: &BuildConfig) -> anyhow::Result<()> {
    let registry = load_manifest(manifest, config)?;
    let mut issues = lint_source(&registry, config);
    if errors_only {
        issues.retain(|i| i.severity == LintSeverity::Error);
    }
    print_lint_issues(&issues);

    let errors = issues
        .iter()
        .filter(|i| i.severity == LintSeverity::Error)
        .count();
    if fail_on_error && errors > 0 {
        bail!("{errors} lint error(s) found");
    }
    Ok(())
}

fn match_command(manifest: &Path, method: &str, path: &str, config: &BuildConfig) -> anyhow::Result<()> {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("invalid HTTP method '{method}'"))?;
    let build = rebuild_from_manifest(manifest, config)?;
    let router = Router::new(&build.table)?;

    let Some(m) = router.route(&method, path) else {
        bail!("no route matches {method} {path}");
    };
    println!("{}::{}  ({})", m.controller(), m.action(), m.path);
    for (index, value) in &m.args {
        println!("   [{index}] = {value}");
    }
    if let Some(rest) = &m.rest {
        println!("   [...] = {:?}", m.rest_segments());
        info!(rest = %rest, "variadic capture");
    }
    Ok(())
}

fn watch_command(manifest: &Path, output: &Path, config: &BuildConfig) -> anyhow::Result<()> {
    let build = rebuild_from_manifest(manifest, config)?;
    write_table(&build.table, Some(output))?;

    let table = Arc::new(ArcSwap::from_pointee(build.table));
    let out = output.to_path_buf();
    let _watcher = watch_manifest(manifest, table, config.clone(), move |table, _| {
        if let Err(e) = write_table(table, Some(&out)) {
            error!(error = %format!("{e:#}"), "failed to write reloaded table");
        }
    })
    .context("failed to watch manifest")?;

    info!(manifest = %manifest.display(), output = %output.display(), "Watching manifest");
    loop {
        std::thread::park();
    }
}

/// Execute a parsed command with the environment's [`BuildConfig`].
///
/// # Errors
///
/// Manifest load failures, build errors, lint errors with `--fail-on-error`,
/// and unmatched requests for `match`.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = BuildConfig::from_env();
    match &cli.command {
        Commands::Build {
            manifest,
            output,
            parallel,
        } => build_command(manifest, output.as_deref(), *parallel, &config),
        Commands::Lint {
            manifest,
            fail_on_error,
            errors_only,
        } => lint_command(manifest, *fail_on_error, *errors_only, &config),
        Commands::Match {
            manifest,
            method,
            path,
        } => match_command(manifest, method, path, &config),
        Commands::Watch { manifest, output } => watch_command(manifest, output, &config),
    }
}

/// Parse the process arguments and run the selected command.
///
/// # Errors
///
/// See [`run`].
pub fn run_cli() -> anyhow::Result<()> {
    run(Cli::parse())
}
