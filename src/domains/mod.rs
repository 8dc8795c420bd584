pub mod logger;
pub mod path_planning;
pub mod task_assignment;

pub use logger::*;
pub use path_planning::*;
pub use task_assignment::*;
