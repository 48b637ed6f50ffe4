mod app_state;
mod cli;

use tabshell_common::ConfigError;
use tabshell_config::ShellConfig;
use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

fn load_config(args: &cli::Args) -> Result<ShellConfig, ConfigError> {
    match &args.config {
        Some(path) => tabshell_config::load_config_from(path),
        None => tabshell_config::load_config(),
    }
}

/// `--log-level` wins over `[logging] level`; `RUST_LOG` adds to either.
fn log_filter(args: &cli::Args, config: &ShellConfig) -> EnvFilter {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(config.logging.level.as_directive());
    let filter = EnvFilter::from_default_env();
    match format!("tabshell={level}").parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(e) => {
            eprintln!("invalid log level {level:?}: {e}");
            filter
        }
    }
}

fn main() {
    let args = cli::parse();

    // Config is read before logging is up so `[logging]` can set the level.
    let (config, load_error) = match load_config(&args) {
        Ok(config) => (config, None),
        Err(e) => (ShellConfig::default(), Some(e)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&args, &config))
        .init();

    tracing::info!("Tabshell v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &args.config {
        tracing::info!(path = %path.display(), "Using config override");
    }
    if let Some(e) = load_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    if args.print_config {
        println!("{}", tabshell_config::config_to_json(&config));
        return;
    }

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            tracing::error!("Failed to create event loop: {e}");
            return;
        }
    };
    let mut app = match app_state::ShellApp::new(config) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("Failed to start: {e}");
            return;
        }
    };

    tracing::info!("Entering event loop");
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("Event loop error: {e}");
    }
    tracing::info!("Shutdown complete");
}
