use crate::config::Debugging;
use cb_util::log::{self, LevelFilter, SetLoggerError};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::runtime::ConfigErrors;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Handle;
use std::path::PathBuf;

const CONSOLE_PATTERN: &str = "{d(%H:%M:%S)} [{T}/{h({l})}] {t}: {m}{n}";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("couldn't install the logger: {0}")]
    Install(#[from] SetLoggerError),
    #[error("invalid logging configuration: {0}")]
    Build(#[from] ConfigErrors),
    #[error("couldn't load logging configuration {}: {message}", .path.display())]
    File { path: PathBuf, message: String },
}

fn console_config(level: LevelFilter) -> Result<Config, ConfigErrors> {
    let console = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
        .build();
    Config::builder()
        .appender(Appender::builder().build("console", Box::new(console)))
        .build(Root::builder().appender("console").build(level))
}

/// Installs an info-level console logger so that config loading can already log
pub fn init() -> Result<Handle, LoggingError> {
    Ok(log4rs::init_config(console_config(LevelFilter::Info)?)?)
}

/// Switches to the configured logging setup: `log_config` when that file
/// exists, a console logger at `log_level` otherwise.
pub fn apply_config(handle: &Handle, debugging: &Debugging) -> Result<(), LoggingError> {
    if debugging.log_config.is_file() {
        let config = log4rs::config::load_config_file(&debugging.log_config, Default::default())
            .map_err(|e| LoggingError::File {
                path: debugging.log_config.clone(),
                message: format!("{:#}", e),
            })?;
        handle.set_config(config);
        log::info!(
            "Using logging configuration from {}",
            debugging.log_config.display()
        );
        return Ok(());
    }
    let level = debugging.log_level.parse::<LevelFilter>().unwrap_or_else(|_| {
        log::warn!(
            "Unknown log level `{}`, falling back to info",
            debugging.log_level
        );
        LevelFilter::Info
    });
    handle.set_config(console_config(level)?);
    Ok(())
}
