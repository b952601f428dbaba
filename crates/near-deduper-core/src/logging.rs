use log::{error, info, warn, LevelFilter};
use std::path::{Path, PathBuf};

// For file-based logging with rotation
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

/// Environment variable that overrides the file logger's level
pub const LOG_ENV_VAR: &str = "NEAR_DEDUP_LOG";

/// Initialize a rotating file logger under `log_dir`.
///
/// Logs go to file only so they do not tear the progress bar. Returns the active log
/// file path.
pub fn init_logger(log_dir: &Path, level: LevelFilter) -> Result<PathBuf, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(log_dir)?;

    let log_file_path = log_dir.join("near-dedup.log");
    let archived_logs_pattern = log_dir.join("near-dedup.{}.log");

    // Rotate at 10MB, keep 5 archives
    let file_trigger = SizeTrigger::new(10 * 1024 * 1024);
    let file_roller = FixedWindowRoller::builder()
        .build(&archived_logs_pattern.to_string_lossy(), 5)
        .map_err(|e| format!("Failed to create log roller: {}", e))?;

    let compound_policy = CompoundPolicy::new(Box::new(file_trigger), Box::new(file_roller));

    let rolling_file = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] [{M}:{L}] - {m}{n}",
        )))
        .build(&log_file_path, Box::new(compound_policy))
        .map_err(|e| format!("Failed to create log appender: {}", e))?;

    let level = std::env::var(LOG_ENV_VAR)
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(level);

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(rolling_file)))
        .build(Root::builder().appender("file").build(level))
        .map_err(|e| format!("Failed to build log config: {}", e))?;

    log4rs::init_config(config).map_err(|e| format!("Failed to initialize log4rs: {}", e))?;

    info!("near-deduper started");
    info!("Logging to file: {}", log_file_path.display());
    Ok(log_file_path)
}

/// Log file operation that failed
pub fn log_file_error(path: &Path, operation: &str, error: &dyn std::error::Error) {
    error!(
        "File operation failed - Operation: {}, Path: {}, Error: {}",
        operation,
        path.display(),
        error
    );
}

/// Log hash computation error. Not fatal: the file is reported and skipped.
pub fn log_hash_error(path: &Path, error: &dyn std::error::Error) {
    warn!(
        "Hash computation failed - Path: {}, Error: {}",
        path.display(),
        error
    );
}

/// Log file system modification
pub fn log_fs_modification(operation: &str, path: &Path, details: Option<&str>) {
    match details {
        Some(details) if !details.is_empty() => info!(
            "FS CHANGE - Operation: {}, Path: {}, Details: {}",
            operation,
            path.display(),
            details
        ),
        _ => info!("FS CHANGE - Operation: {}, Path: {}", operation, path.display()),
    }
}
