//! Dotstep CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use dotstep::cli::{AppContext, Cli, CommandDispatcher};
use dotstep::config::{load_config, LogLevel, Settings};
use dotstep::runner::install_handler;
use dotstep::shell::is_ci;
use dotstep::ui::{create_ui, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. The configured `settings.log_level`
fn init_tracing(debug: bool, level: LogLevel) {
    let filter = if debug {
        EnvFilter::new("dotstep=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("dotstep={}", level.as_str())))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().unwrap_or_default();

    // Settings only tune logging and color here; commands report config errors.
    let settings = load_config(cli.config.as_deref(), &cwd)
        .map(|(_, config)| config.settings)
        .unwrap_or_else(|_| Settings::default());

    init_tracing(cli.debug, settings.log_level);
    tracing::debug!("dotstep starting with args: {:?}", cli);

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    install_handler();

    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let is_interactive = !cli.non_interactive && !is_ci();
    let use_color = settings.use_color && !cli.no_color;
    let mut ui = create_ui(is_interactive, output_mode, use_color);

    let dispatcher = CommandDispatcher::new(AppContext::from_cli(&cli, cwd));

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
