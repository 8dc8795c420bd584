use super::Dispatcher;
use crate::common::{AggregateRoot, DomainError, DomainResult};
use crate::domains::task_assignment::events::SchedulingEvent;
use crate::domains::task_assignment::types::{Agent, Assignment};

impl AggregateRoot for Dispatcher {
	type Event = SchedulingEvent;

	fn aggregate_id(&self) -> &str { &self.id }
	fn version(&self) -> u64 { self.version }
	fn apply(&mut self, event: &Self::Event) -> DomainResult<()> {
		match event {
			SchedulingEvent::DispatcherCreated { .. } => {}
			SchedulingEvent::AgentRegistered { agent_id, location, .. } => {
				self.agents.push(Agent::new(*agent_id, *location));
			}
			SchedulingEvent::TaskSubmitted { task, .. } => {
				self.pending_tasks.push(*task);
			}
			SchedulingEvent::TaskAssigned { task_id, agent_id, path, round, .. } => {
				if self.assignments.contains_key(task_id) {
					return Err(DomainError::InvalidCommand {
						reason: format!("Task {} is already assigned", task_id),
					});
				}
				let agent = self
					.agents
					.iter_mut()
					.find(|a| a.id() == *agent_id)
					.ok_or(DomainError::AgentNotFound { id: *agent_id })?;
				agent.assign(*task_id, path.clone())?;
				self.pending_tasks.retain(|t| t.id() != *task_id);
				self.assignments.insert(*task_id, Assignment {
					task_id: *task_id,
					agent_id: *agent_id,
					path: path.clone(),
					round: *round,
				});
			}
			SchedulingEvent::TaskDeferred { .. } => {}
			SchedulingEvent::PathReleased { agent_id, .. } => {
				if let Some(agent) = self.agents.iter_mut().find(|a| a.id() == *agent_id) {
					agent.release_path();
				}
			}
			SchedulingEvent::DispatchCompleted { .. } => {}
		}
		self.version += 1;
		Ok(())
	}
	fn uncommitted_events(&self) -> &[Self::Event] {
		Dispatcher::uncommitted_events(self)
	}
	fn mark_events_as_committed(&mut self) {
		Dispatcher::mark_events_as_committed(self)
	}
	fn add_event(&mut self, event: Self::Event) {
		Dispatcher::add_event(self, event)
	}
}
