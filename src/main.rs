//! feature-kit-mcp: MCP server for the Feature Kit component catalog
//!
//! Serves catalog content (component code, documentation, integration
//! prompts, types, hooks and adapters) to AI coding assistants over stdio.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

use feature_kit_mcp::catalog::resolver::{install_dir_from_exe, FEATURE_KIT_PATH_ENV};
use feature_kit_mcp::catalog::{resolve_root, ContentLayout, FsProbe, ResolveInputs};
use feature_kit_mcp::config::{self, Config};
use feature_kit_mcp::handlers::FeatureKit;
use feature_kit_mcp::mcp::server::McpServer;

/// MCP server for the Feature Kit component catalog.
///
/// Indexes the catalog's feature directories and serves their code, docs and
/// integration prompts as MCP tools and resources. The content root can be
/// set with the `FEATURE_KIT_PATH` environment variable.
#[derive(Parser, Debug)]
#[command(name = "feature-kit-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber. stdout carries the protocol, so logs go to stderr.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Content root override: a non-empty `env` value wins over the config file.
fn content_override(env: Option<OsString>, cfg: &Config) -> Option<PathBuf> {
    env.filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| cfg.feature_kit_path.clone())
}

/// Entry point for the feature-kit-mcp server.
fn main() -> ExitCode {
    let args = Args::parse();

    let cfg = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(get_log_level(args.verbose, args.quiet, &cfg.logging.level));

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting feature-kit-mcp server"
    );

    let inputs = ResolveInputs {
        install_dir: install_dir_from_exe(),
        env_override: content_override(std::env::var_os(FEATURE_KIT_PATH_ENV), &cfg),
    };
    let resolution = resolve_root(&inputs, &FsProbe);
    if resolution.is_verified() {
        info!(root = %resolution.root.display(), source = ?resolution.source, "Content root resolved");
    } else {
        warn!(
            root = %resolution.root.display(),
            "No content root found; set {FEATURE_KIT_PATH_ENV} to the Feature Kit checkout"
        );
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to create Tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    let mut server = McpServer::new(FeatureKit::new(ContentLayout::new(resolution.root)));

    let result = runtime.block_on(async {
        let features = server.kit().store().ensure_loaded().await.len();
        info!(features, "MCP server ready, waiting for client connection...");
        server.run().await
    });

    match result {
        Ok(()) => {
            info!("Server shut down gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(get_log_level(3, true, "trace"), Level::ERROR);
    }

    fn config_with_root(path: &str) -> Config {
        serde_json::from_value(serde_json::json!({ "feature_kit_path": path })).unwrap()
    }

    #[test]
    fn environment_outranks_config_root() {
        let cfg = config_with_root("/srv/from-config");
        assert_eq!(
            content_override(Some(OsString::from("/srv/from-env")), &cfg),
            Some(PathBuf::from("/srv/from-env"))
        );
    }

    #[test]
    fn config_root_used_without_environment() {
        let cfg = config_with_root("/srv/from-config");
        assert_eq!(
            content_override(None, &cfg),
            Some(PathBuf::from("/srv/from-config"))
        );
        assert_eq!(
            content_override(Some(OsString::new()), &cfg),
            Some(PathBuf::from("/srv/from-config"))
        );
    }

    #[test]
    fn no_override_anywhere() {
        assert_eq!(content_override(None, &Config::default()), None);
        assert_eq!(content_override(Some(OsString::new()), &Config::default()), None);
    }

    #[test]
    fn verbosity_overrides_config() {
        assert_eq!(get_log_level(0, false, "debug"), Level::DEBUG);
        assert_eq!(get_log_level(0, false, "nonsense"), Level::WARN);
        assert_eq!(get_log_level(1, false, "error"), Level::INFO);
        assert_eq!(get_log_level(2, false, "error"), Level::DEBUG);
        assert_eq!(get_log_level(5, false, "error"), Level::TRACE);
    }
}
