pub mod dispatcher;
pub mod event_apply;

pub use dispatcher::*;
