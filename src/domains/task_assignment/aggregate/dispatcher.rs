use crate::common::{AggregateRoot, DomainError, DomainResult};
use crate::domains::path_planning::{Cell, Environment, Path, RoutePlanner};
use crate::domains::task_assignment::events::SchedulingEvent;
use crate::domains::task_assignment::scheduler::{AssignmentOutcome, TaskScheduler};
use crate::domains::task_assignment::types::{Agent, AgentId, Assignment, Task, TaskId};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Event-sourced fleet state: registered agents, pending tasks and every
/// assignment ever committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dispatcher {
    pub id: String,
    pub agents: Vec<Agent>,
    pub pending_tasks: Vec<Task>,
    pub assignments: BTreeMap<TaskId, Assignment>,
    pub version: u64,
    #[serde(skip)]
    uncommitted_events: Vec<SchedulingEvent>,
}

impl Dispatcher {
    pub fn uncommitted_events(&self) -> &[SchedulingEvent] {
        &self.uncommitted_events
    }
    pub fn mark_events_as_committed(&mut self) {
        self.uncommitted_events.clear();
    }
    pub fn add_event(&mut self, event: SchedulingEvent) {
        self.uncommitted_events.push(event);
    }
    /// Hands out the uncommitted events and clears the buffer.
    pub fn take_uncommitted_events(&mut self) -> Vec<SchedulingEvent> {
        std::mem::take(&mut self.uncommitted_events)
    }
}

impl Dispatcher {
    pub fn new(id: String) -> Self {
        let mut dispatcher = Self::empty(id.clone());
        dispatcher.add_event(SchedulingEvent::DispatcherCreated {
            dispatcher_id: id,
            timestamp: Utc::now(),
        });
        dispatcher
    }

    /// Blank state used as the starting point for replays.
    pub fn empty(id: String) -> Self {
        Self {
            id,
            agents: Vec::new(),
            pending_tasks: Vec::new(),
            assignments: BTreeMap::new(),
            version: 0,
            uncommitted_events: Vec::new(),
        }
    }

    pub fn agent(&self, agent_id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id() == agent_id)
    }

    pub fn register_agent(&mut self, agent_id: AgentId, location: Cell) -> DomainResult<()> {
        if self.agent(agent_id).is_some() {
            return Err(DomainError::InvalidCommand {
                reason: format!("Agent {} is already registered", agent_id),
            });
        }
        self.record(SchedulingEvent::AgentRegistered {
            dispatcher_id: self.id.clone(),
            agent_id,
            location,
            timestamp: Utc::now(),
        })
    }

    pub fn submit_task(&mut self, task: Task) -> DomainResult<()> {
        let known = self.pending_tasks.iter().any(|t| t.id() == task.id())
            || self.assignments.contains_key(&task.id());
        if known {
            return Err(DomainError::InvalidCommand {
                reason: format!("Task {} was already submitted", task.id()),
            });
        }
        self.record(SchedulingEvent::TaskSubmitted {
            dispatcher_id: self.id.clone(),
            task,
            timestamp: Utc::now(),
        })
    }

    /// Runs the scheduler over the current fleet and records its commits.
    pub fn dispatch<P: RoutePlanner>(
        &mut self,
        environment: &Environment,
        scheduler: &TaskScheduler<P>,
    ) -> DomainResult<AssignmentOutcome> {
        let mut fleet = self.agents.clone();
        let outcome = scheduler.assign(&mut fleet, self.pending_tasks.clone(), environment);

        for assignment in outcome.committed() {
            self.record(SchedulingEvent::TaskAssigned {
                dispatcher_id: self.id.clone(),
                task_id: assignment.task_id,
                agent_id: assignment.agent_id,
                path: assignment.path.clone(),
                round: assignment.round,
                timestamp: Utc::now(),
            })?;
        }
        for task in &outcome.unassigned {
            self.record(SchedulingEvent::TaskDeferred {
                dispatcher_id: self.id.clone(),
                task_id: task.id(),
                timestamp: Utc::now(),
            })?;
        }
        self.record(SchedulingEvent::DispatchCompleted {
            dispatcher_id: self.id.clone(),
            rounds: outcome.rounds,
            assigned: outcome.assignments.len(),
            deferred: outcome.unassigned.len(),
            timestamp: Utc::now(),
        })?;
        Ok(outcome)
    }

    /// Called by the execution loop once an agent has driven its path.
    pub fn release_path(&mut self, agent_id: AgentId) -> DomainResult<Path> {
        let agent = self
            .agent(agent_id)
            .ok_or(DomainError::AgentNotFound { id: agent_id })?;
        let path = agent.path().cloned().ok_or_else(|| DomainError::InvalidCommand {
            reason: format!("Agent {} has no active path", agent_id),
        })?;
        self.record(SchedulingEvent::PathReleased {
            dispatcher_id: self.id.clone(),
            agent_id,
            timestamp: Utc::now(),
        })?;
        Ok(path)
    }
}
