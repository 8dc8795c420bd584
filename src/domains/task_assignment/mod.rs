pub mod aggregate;
pub mod events;
pub mod generator;
pub mod scheduler;
pub mod types;

pub use aggregate::*;
pub use events::*;
pub use generator::*;
pub use scheduler::*;
pub use types::*;
