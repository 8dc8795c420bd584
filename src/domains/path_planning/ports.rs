use super::environment::Environment;
use super::types::{Cell, GoalSequence, Path};

/// Port the task assignment domain uses as its feasibility oracle.
/// `None` means the agent cannot currently serve the goal sequence.
pub trait RoutePlanner {
    fn plan(&self, start: Cell, goals: &GoalSequence, environment: &Environment) -> Option<Path>;
}
