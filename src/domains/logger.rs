use std::sync::Arc;

/// Logging port used by the planning and scheduling domains.
/// Adapters live in `adapters::outbound`; calls never fail from the caller's side.
pub trait DomainLogger: Send + Sync + 'static {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

pub type DynLogger = Arc<dyn DomainLogger>;
