use crate::domains::logger::DomainLogger;
use chrono::Utc;
use log::Log;
use std::sync::Arc;

/// File sink built on `fast_log`, reached through the `log` facade.
struct FastLogBridge;

impl DomainLogger for FastLogBridge {
    fn info(&self, msg: &str) {
        log::info!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn warn(&self, msg: &str) {
        log::warn!("{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn error(&self, msg: &str) {
        log::error!("{} - {}", Utc::now().to_rfc3339(), msg);
    }
}

/// Installs `fast_log` as the global `log` backend writing to `path` and
/// returns a domain logger that writes through it. Fails if another `log`
/// backend is already installed.
pub fn init_file_logger(path: &str) -> Result<Arc<dyn DomainLogger>, String> {
    fast_log::init(
        fast_log::config::Config::new()
            .file(path)
            .level(log::LevelFilter::Info),
    )
    .map_err(|e| format!("Failed to initialize fast_log: {}", e))?;
    Ok(Arc::new(FastLogBridge))
}

/// Flushes buffered records; call before the process exits.
pub fn flush_file_logger() {
    log::logger().flush();
}
