use crate::domains::logger::DomainLogger;
use std::sync::Arc;

/// Forwards domain log lines to the process-wide `tracing` subscriber.
struct TracingBridge {
    component: &'static str,
}

impl DomainLogger for TracingBridge {
    fn info(&self, msg: &str) { tracing::info!(component = self.component, "{}", msg); }
    fn warn(&self, msg: &str) { tracing::warn!(component = self.component, "{}", msg); }
    fn error(&self, msg: &str) { tracing::error!(component = self.component, "{}", msg); }
}

/// Console logger backed by whatever `tracing` subscriber the binary installed.
pub fn init_tracing_logger(component: &'static str) -> Arc<dyn DomainLogger> {
    Arc::new(TracingBridge { component })
}
