use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::types::{Agent, Task, TaskId};
use crate::domains::path_planning::{Cell, Environment};

/// Random task source. Pickups and deliveries land on free cells, i.e.
/// valid cells that no agent currently occupies.
pub struct TaskGenerator {
    rng: StdRng,
    /// `None` once the id space is used up.
    next_id: Option<TaskId>,
}

impl TaskGenerator {
    pub fn seeded(seed: u64, first_id: TaskId) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            next_id: Some(first_id),
        }
    }

    pub fn from_entropy(first_id: TaskId) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            next_id: Some(first_id),
        }
    }

    pub fn free_cells(environment: &Environment, agents: &[Agent]) -> Vec<Cell> {
        environment
            .free_cells()
            .into_iter()
            .filter(|cell| agents.iter().all(|agent| agent.location() != *cell))
            .collect()
    }

    pub fn random_free_cell(&mut self, environment: &Environment, agents: &[Agent]) -> Option<Cell> {
        Self::free_cells(environment, agents).choose(&mut self.rng).copied()
    }

    /// Draws a task with distinct pickup and delivery cells. `None` when
    /// fewer than two free cells exist or task ids have run out.
    pub fn next_task(&mut self, environment: &Environment, agents: &[Agent]) -> Option<Task> {
        let id = self.next_id?;
        let free = Self::free_cells(environment, agents);
        let mut picks = free.choose_multiple(&mut self.rng, 2);
        let pickup = *picks.next()?;
        let delivery = *picks.next()?;
        let task = Task::new(id, pickup, delivery);
        self.next_id = id.checked_add(1);
        Some(task)
    }

    pub fn generate(&mut self, count: usize, environment: &Environment, agents: &[Agent]) -> Vec<Task> {
        (0..count)
            .map_while(|_| self.next_task(environment, agents))
            .collect()
    }
}
