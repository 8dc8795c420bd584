use serde::{Deserialize, Serialize};

use crate::common::{DomainError, DomainResult};
use crate::domains::path_planning::{Cell, Path};

pub type AgentId = u32;
pub type TaskId = u32;

/// A pickup-and-delivery job. Fixed once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    pickup: Cell,
    delivery: Cell,
}

impl Task {
    pub fn new(id: TaskId, pickup: Cell, delivery: Cell) -> Self {
        Self { id, pickup, delivery }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn pickup(&self) -> Cell {
        self.pickup
    }

    pub fn delivery(&self) -> Cell {
        self.delivery
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    Committed { agent_id: AgentId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentStatus {
    Available,
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    location: Cell,
    path: Option<Path>,
    active_task: Option<TaskId>,
}

impl Agent {
    pub fn new(id: AgentId, location: Cell) -> Self {
        Self {
            id,
            location,
            path: None,
            active_task: None,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Where the agent will be once its active path, if any, is driven.
    pub fn location(&self) -> Cell {
        self.location
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    pub fn active_task(&self) -> Option<TaskId> {
        self.active_task
    }

    pub fn status(&self) -> AgentStatus {
        if self.path.is_some() {
            AgentStatus::Busy
        } else {
            AgentStatus::Available
        }
    }

    pub fn is_available(&self) -> bool {
        self.status() == AgentStatus::Available
    }

    /// Hands the agent a path for `task_id` and moves its location to the
    /// path's end. Fails if a path is already active.
    pub fn assign(&mut self, task_id: TaskId, path: Path) -> DomainResult<()> {
        if !self.is_available() {
            return Err(DomainError::InvalidCommand {
                reason: format!("Agent {} already holds an active path", self.id),
            });
        }
        if let Some(end) = path.end() {
            self.location = end;
        }
        self.path = Some(path);
        self.active_task = Some(task_id);
        Ok(())
    }

    /// Gives the active path back to the execution loop and frees the agent.
    pub fn release_path(&mut self) -> Option<Path> {
        self.active_task = None;
        self.path.take()
    }
}

/// A committed match of one task to one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub task_id: TaskId,
    pub agent_id: AgentId,
    pub path: Path,
    pub round: usize,
}
