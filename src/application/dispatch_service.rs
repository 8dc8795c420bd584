// Dispatch Service - wires configuration into the planning and assignment domains
use uuid::Uuid;

use crate::common::{AggregateRoot, ApplicationResult, DomainError, EventEnvelope, EventMetadata};
use crate::config::{Config, GridConfig};
use crate::domains::logger::DynLogger;
use crate::domains::path_planning::{Environment, MlaStarPlanner};
use crate::domains::task_assignment::{
    Agent, AssignmentOutcome, Dispatcher, Task, TaskGenerator, TaskScheduler,
};

pub const AGGREGATE_TYPE: &str = "Dispatcher";

pub struct DispatchService {
    scheduler: TaskScheduler<MlaStarPlanner>,
    logger: DynLogger,
}

impl DispatchService {
    pub fn new(config: &Config, logger: DynLogger) -> Self {
        let planner = MlaStarPlanner::new(config.planner.clone());
        let scheduler = TaskScheduler::new(planner, config.scheduler.clone(), logger.clone());
        Self { scheduler, logger }
    }

    pub fn scheduler(&self) -> &TaskScheduler<MlaStarPlanner> {
        &self.scheduler
    }

    pub fn build_environment(grid: &GridConfig) -> ApplicationResult<Environment> {
        let environment = Environment::new(
            grid.width,
            grid.height,
            grid.obstacles.iter().copied(),
            grid.endpoints.iter().copied(),
        )?;
        Ok(environment)
    }

    /// Builds the grid and a dispatcher holding the configured agents, the
    /// configured tasks and any generated tasks.
    pub fn bootstrap(&self, config: &Config) -> ApplicationResult<(Dispatcher, Environment)> {
        let environment = Self::build_environment(&config.grid)?;
        let mut dispatcher = Dispatcher::new(Uuid::new_v4().to_string());

        for agent in &config.agents {
            if !environment.is_valid(&agent.start) {
                self.logger.warn(&format!(
                    "Agent {} starts on blocked or out-of-bounds cell {}",
                    agent.id, agent.start
                ));
            }
            dispatcher.register_agent(agent.id, agent.start)?;
        }
        for task in &config.tasks {
            dispatcher.submit_task(Task::new(task.id, task.pickup, task.delivery))?;
        }

        if let Some(generator) = &config.generator {
            let first_id = match (generator.first_id, config.tasks.iter().map(|t| t.id).max()) {
                (Some(id), _) => id,
                (None, Some(highest)) => highest.checked_add(1).ok_or_else(|| DomainError::InvalidCommand {
                    reason: format!("Task id {} leaves no room for generated task ids", highest),
                })?,
                (None, None) => 1,
            };
            let mut source = match generator.seed {
                Some(seed) => TaskGenerator::seeded(seed, first_id),
                None => TaskGenerator::from_entropy(first_id),
            };
            let fleet: Vec<Agent> = dispatcher.agents.clone();
            let generated = source.generate(generator.count, &environment, &fleet);
            if generated.len() < generator.count {
                self.logger.warn(&format!(
                    "Generated {} of {} requested tasks; free cells or task ids ran out",
                    generated.len(),
                    generator.count
                ));
            }
            for task in generated {
                dispatcher.submit_task(task)?;
            }
        }

        self.logger.info(&format!(
            "Dispatcher {} ready: {}x{} grid, {} agent(s), {} task(s)",
            dispatcher.id,
            environment.width(),
            environment.height(),
            dispatcher.agents.len(),
            dispatcher.pending_tasks.len()
        ));
        Ok((dispatcher, environment))
    }

    pub fn run_once(&self, dispatcher: &mut Dispatcher, environment: &Environment) -> ApplicationResult<AssignmentOutcome> {
        let outcome = dispatcher.dispatch(environment, &self.scheduler)?;
        self.logger.info(&format!(
            "Dispatch finished after {} round(s): {} assigned, {} pending",
            outcome.rounds,
            outcome.assignments.len(),
            outcome.unassigned.len()
        ));
        Ok(outcome)
    }

    /// Wraps every uncommitted dispatcher event in an envelope (sharing one
    /// correlation id) and marks them committed.
    pub fn drain_envelopes(&self, dispatcher: &mut Dispatcher) -> ApplicationResult<Vec<EventEnvelope>> {
        let metadata = EventMetadata::from_source("mapd-app").with_correlation(Uuid::new_v4());
        let envelopes = dispatcher
            .uncommitted_events()
            .iter()
            .map(|event| EventEnvelope::new(event, AGGREGATE_TYPE, metadata.clone()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(DomainError::from)?;
        AggregateRoot::mark_events_as_committed(dispatcher);
        Ok(envelopes)
    }
}
