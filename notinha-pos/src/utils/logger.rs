//! Logging Infrastructure
//!
//! Console logging by default, daily rolling files when a log directory is set.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with optional file output
///
/// `log_level` accepts any `EnvFilter` directive (`debug`,
/// `notinha_pos=debug,info`, ...). Calling this more than once is harmless;
/// only the first call installs a subscriber.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&Path>) {
    let filter = EnvFilter::try_new(log_level.unwrap_or("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    // Add file output if log_dir is provided
    if let Some(dir) = log_dir
        && std::fs::create_dir_all(dir).is_ok()
    {
        let file_appender = tracing_appender::rolling::daily(dir, "notinha");
        let _ = subscriber.with_ansi(false).with_writer(file_appender).try_init();
        return;
    }

    let _ = subscriber.try_init();
}
