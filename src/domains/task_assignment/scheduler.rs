use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::types::{Agent, Assignment, Task, TaskId, TaskStatus};
use crate::domains::logger::DynLogger;
use crate::domains::path_planning::{Environment, GoalSequence, MlaStarPlanner, RoutePlanner};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    /// Upper bound on greedy rounds per `assign` call. Unbounded when unset.
    pub max_rounds: Option<usize>,
}

/// What one `assign` call committed, plus the tasks nobody could serve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentOutcome {
    pub assignments: BTreeMap<TaskId, Assignment>,
    /// Task ids in the order they were committed.
    pub commit_order: Vec<TaskId>,
    pub unassigned: Vec<Task>,
    pub rounds: usize,
}

impl AssignmentOutcome {
    pub fn get(&self, task_id: TaskId) -> Option<&Assignment> {
        self.assignments.get(&task_id)
    }

    /// Committed assignments in commit order.
    pub fn committed(&self) -> impl Iterator<Item = &Assignment> {
        self.commit_order
            .iter()
            .filter_map(|task_id| self.assignments.get(task_id))
    }

    pub fn is_fully_assigned(&self) -> bool {
        self.unassigned.is_empty()
    }
}

/// Greedy nearest-pickup matcher that uses a route planner to check that an
/// agent can actually serve a task before committing it.
pub struct TaskScheduler<P: RoutePlanner = MlaStarPlanner> {
    planner: P,
    settings: SchedulerSettings,
    logger: DynLogger,
}

impl<P: RoutePlanner> TaskScheduler<P> {
    pub fn new(planner: P, settings: SchedulerSettings, logger: DynLogger) -> Self {
        Self {
            planner,
            settings,
            logger,
        }
    }

    pub fn planner(&self) -> &P {
        &self.planner
    }

    /// Matches available agents to pending tasks round by round until a
    /// round commits nothing. Committed agents get their path and move to
    /// its end. Every task is committed at most once.
    pub fn assign(&self, agents: &mut [Agent], tasks: Vec<Task>, environment: &Environment) -> AssignmentOutcome {
        let mut outcome = AssignmentOutcome::default();
        let mut pool = self.dedup(tasks);

        loop {
            if pool.iter().all(|(_, status)| *status != TaskStatus::Pending) {
                break;
            }
            if let Some(max) = self.settings.max_rounds {
                if outcome.rounds >= max {
                    self.logger.warn(&format!("Stopping after the round limit of {}", max));
                    break;
                }
            }
            let available: Vec<usize> = (0..agents.len()).filter(|&i| agents[i].is_available()).collect();
            if available.is_empty() {
                break;
            }

            outcome.rounds += 1;
            let round = outcome.rounds;

            let mut candidates: Vec<(u32, usize, usize)> = Vec::new();
            for &a in &available {
                for (t, (task, status)) in pool.iter().enumerate() {
                    if *status == TaskStatus::Pending {
                        candidates.push((agents[a].location().manhattan(&task.pickup()), a, t));
                    }
                }
            }
            candidates.sort_by_key(|&(distance, a, t)| (distance, agents[a].id(), pool[t].0.id()));

            let mut committed = 0;
            for (distance, a, t) in candidates {
                // Earlier commits in this round may have consumed either side.
                if !agents[a].is_available() || pool[t].1 != TaskStatus::Pending {
                    continue;
                }
                let task = pool[t].0;
                let goals = GoalSequence::for_task(&task);
                let Some(path) = self.planner.plan(agents[a].location(), &goals, environment) else {
                    self.logger.info(&format!(
                        "Agent {} cannot serve task {} from {}",
                        agents[a].id(),
                        task.id(),
                        agents[a].location()
                    ));
                    continue;
                };

                let agent_id = agents[a].id();
                if let Err(e) = agents[a].assign(task.id(), path.clone()) {
                    self.logger.error(&format!("Commit of task {} failed: {}", task.id(), e));
                    continue;
                }
                pool[t].1 = TaskStatus::Committed { agent_id };
                self.logger.info(&format!(
                    "Round {}: task {} -> agent {} (pickup distance {}, {} steps)",
                    round,
                    task.id(),
                    agent_id,
                    distance,
                    path.steps()
                ));
                outcome.assignments.insert(
                    task.id(),
                    Assignment {
                        task_id: task.id(),
                        agent_id,
                        path,
                        round,
                    },
                );
                outcome.commit_order.push(task.id());
                committed += 1;
            }

            if committed == 0 {
                break;
            }
        }

        outcome.unassigned = pool
            .into_iter()
            .filter(|(_, status)| *status == TaskStatus::Pending)
            .map(|(task, _)| task)
            .collect();
        if !outcome.unassigned.is_empty() {
            self.logger.warn(&format!(
                "{} task(s) left pending after {} round(s)",
                outcome.unassigned.len(),
                outcome.rounds
            ));
        }
        outcome
    }

    fn dedup(&self, tasks: Vec<Task>) -> Vec<(Task, TaskStatus)> {
        let mut seen = HashSet::new();
        tasks
            .into_iter()
            .filter(|task| {
                let fresh = seen.insert(task.id());
                if !fresh {
                    self.logger.warn(&format!("Ignoring duplicate task id {}", task.id()));
                }
                fresh
            })
            .map(|task| (task, TaskStatus::Pending))
            .collect()
    }
}
