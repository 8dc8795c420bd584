pub mod environment;
pub mod node;
pub mod planner;
pub mod ports;
pub mod types;

pub use environment::*;
pub use node::{Frontier, NodeArena, SearchNode};
pub use planner::*;
pub use ports::*;
pub use types::*;
