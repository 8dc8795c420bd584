use crate::domains::logger::{DomainLogger, DynLogger};
use std::sync::Arc;

/// Fans every message out to a list of sinks, in order.
pub struct MultiLogger {
    sinks: Vec<DynLogger>,
}

impl MultiLogger {
    pub fn new(sinks: Vec<DynLogger>) -> Self {
        Self { sinks }
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.sinks.iter().for_each(|sink| sink.info(msg));
    }

    fn warn(&self, msg: &str) {
        self.sinks.iter().for_each(|sink| sink.warn(msg));
    }

    fn error(&self, msg: &str) {
        self.sinks.iter().for_each(|sink| sink.error(msg));
    }
}

/// Console logger, plus a file sink when `file` is set and `fast_log` can be
/// initialized. Falls back to console only otherwise.
pub fn init_combined_logger(component: &'static str, file: Option<&str>) -> DynLogger {
    let console = crate::adapters::outbound::init_tracing_logger(component);
    let Some(path) = file else {
        return console;
    };
    match crate::adapters::outbound::init_file_logger(path) {
        Ok(file_logger) => Arc::new(MultiLogger::new(vec![console, file_logger])),
        Err(e) => {
            console.warn(&format!("File logging disabled: {}", e));
            console
        }
    }
}
