use crate::common::DomainEvent;
use crate::domains::path_planning::{Cell, Path};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{AgentId, Task, TaskId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SchedulingEvent {
    DispatcherCreated {
        dispatcher_id: String,
        timestamp: DateTime<Utc>,
    },
    AgentRegistered {
        dispatcher_id: String,
        agent_id: AgentId,
        location: Cell,
        timestamp: DateTime<Utc>,
    },
    TaskSubmitted {
        dispatcher_id: String,
        task: Task,
        timestamp: DateTime<Utc>,
    },
    TaskAssigned {
        dispatcher_id: String,
        task_id: TaskId,
        agent_id: AgentId,
        path: Path,
        round: usize,
        timestamp: DateTime<Utc>,
    },
    /// No agent could serve the task in this dispatch; it stays pending.
    TaskDeferred {
        dispatcher_id: String,
        task_id: TaskId,
        timestamp: DateTime<Utc>,
    },
    PathReleased {
        dispatcher_id: String,
        agent_id: AgentId,
        timestamp: DateTime<Utc>,
    },
    DispatchCompleted {
        dispatcher_id: String,
        rounds: usize,
        assigned: usize,
        deferred: usize,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent for SchedulingEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SchedulingEvent::DispatcherCreated { .. } => "DispatcherCreated",
            SchedulingEvent::AgentRegistered { .. } => "AgentRegistered",
            SchedulingEvent::TaskSubmitted { .. } => "TaskSubmitted",
            SchedulingEvent::TaskAssigned { .. } => "TaskAssigned",
            SchedulingEvent::TaskDeferred { .. } => "TaskDeferred",
            SchedulingEvent::PathReleased { .. } => "PathReleased",
            SchedulingEvent::DispatchCompleted { .. } => "DispatchCompleted",
        }
    }

    fn aggregate_id(&self) -> &str {
        match self {
            SchedulingEvent::DispatcherCreated { dispatcher_id, .. }
            | SchedulingEvent::AgentRegistered { dispatcher_id, .. }
            | SchedulingEvent::TaskSubmitted { dispatcher_id, .. }
            | SchedulingEvent::TaskAssigned { dispatcher_id, .. }
            | SchedulingEvent::TaskDeferred { dispatcher_id, .. }
            | SchedulingEvent::PathReleased { dispatcher_id, .. }
            | SchedulingEvent::DispatchCompleted { dispatcher_id, .. } => dispatcher_id,
        }
    }

    fn event_version(&self) -> u64 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SchedulingEvent::DispatcherCreated { timestamp, .. }
            | SchedulingEvent::AgentRegistered { timestamp, .. }
            | SchedulingEvent::TaskSubmitted { timestamp, .. }
            | SchedulingEvent::TaskAssigned { timestamp, .. }
            | SchedulingEvent::TaskDeferred { timestamp, .. }
            | SchedulingEvent::PathReleased { timestamp, .. }
            | SchedulingEvent::DispatchCompleted { timestamp, .. } => *timestamp,
        }
    }
}
