// src/main.rs

mod app_logic;
mod core;
mod platform_layer;

use crate::app_logic::LauncherLogic;
use crate::app_logic::handler::APP_NAME;
use crate::core::{ConfigManagerOperations, CoreConfigManager, CoreImporter, path_utils};
use crate::platform_layer::{
    ConsoleFolderPicker, ConsoleSurface, ExitDisposition, PlatformInterface, ProcessEngine,
};

use clap::{ArgAction, Parser};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

const LOG_FILENAME: &str = "launcher.log";

/// Imports the Fallout game files on first run, then starts the engine.
#[derive(Debug, Parser)]
#[command(name = "fallout-ce-launcher", version, about)]
struct Cli {
    /// Folder holding the original game files; skips the first folder prompt.
    #[arg(long, value_name = "DIR")]
    source: Option<PathBuf>,

    /// Private data directory to import into and run the engine from.
    #[arg(long, value_name = "DIR")]
    destination: Option<PathBuf>,

    /// Engine executable. Remembered for later runs.
    #[arg(long, value_name = "PATH")]
    engine: Option<PathBuf>,

    /// Argument passed to the engine (repeatable). Remembered for later runs.
    #[arg(long = "engine-arg", value_name = "ARG", allow_hyphen_values = true)]
    engine_args: Vec<String>,

    /// Increase terminal log verbosity (-v, -vv).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/*
 * Installs the terminal logger and, when the configuration directory is
 * available, a debug-level file logger next to the configuration.
 */
fn initialize_logging(verbosity: u8, config_dir: Option<&Path>) {
    let term_level = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Debug)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        term_level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    let mut file_error = None;
    if let Some(dir) = config_dir {
        match File::create(dir.join(LOG_FILENAME)) {
            Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, config, file)),
            Err(e) => file_error = Some(e),
        }
    }
    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("Failed to initialize logging: {e}");
    }
    if let Some(e) = file_error {
        log::warn!("Main: Could not open log file, logging to terminal only: {e}");
    }
}

fn exit_code_for(disposition: ExitDisposition, engine_exit_code: Option<i32>) -> ExitCode {
    match (disposition, engine_exit_code) {
        (ExitDisposition::SkipExit, _) => ExitCode::SUCCESS,
        (ExitDisposition::RunExitHandlers, Some(code)) => {
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
        (ExitDisposition::RunExitHandlers, None) => ExitCode::FAILURE,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_manager = CoreConfigManager::for_app(APP_NAME);
    let config_dir = config_manager.config_dir();
    initialize_logging(cli.verbose, config_dir.as_deref());
    log::debug!("Main: {cli:?}");

    let mut config = match config_manager.load_config() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Main: Could not load configuration, using defaults: {e}");
            Default::default()
        }
    };
    if config.merge_overrides(cli.engine, cli.engine_args, cli.destination) {
        if let Err(e) = config_manager.save_config(&config) {
            log::warn!("Main: Could not save configuration: {e}");
        }
    }

    let data_root = match config
        .destination_root
        .clone()
        .or_else(|| path_utils::get_private_data_dir(APP_NAME))
    {
        Some(root) => root,
        None => {
            log::error!("Main: Could not determine a private data directory; use --destination.");
            return ExitCode::FAILURE;
        }
    };
    log::info!("Main: Private data root is {data_root:?}.");

    let mut platform = PlatformInterface::new(
        Arc::new(ConsoleFolderPicker::new(cli.source)),
        Arc::new(ProcessEngine::new(
            config.engine_path.clone(),
            config.engine_args.clone(),
        )),
        Arc::new(CoreImporter::new()),
        Box::new(ConsoleSurface::new()),
    );
    let logic = LauncherLogic::new(data_root, config_dir);

    let exit_code = match platform.run(&logic) {
        Ok(outcome) => exit_code_for(outcome.exit_disposition, outcome.engine_exit_code),
        Err(e) => {
            log::error!("Main: Launcher stopped: {e}");
            ExitCode::FAILURE
        }
    };
    // Returning (rather than std::process::exit) lets destructors run.
    log::logger().flush();
    exit_code
}
