use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, trace};

use super::environment::Environment;
use super::node::{advance_label, Frontier, NodeArena};
use super::ports::RoutePlanner;
use super::types::{Cell, GoalSequence, Path};

/// How expanded states are remembered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosedSetPolicy {
    /// A cell is closed per goal label, so later legs may cross it again.
    #[default]
    PositionAndLabel,
    /// Positional simplification: a cell is closed for the rest of the search
    /// once expanded under any label, and later pops of that cell are dropped
    /// even with an advanced label. Multi-leg requests that must backtrack
    /// become infeasible.
    PositionOnly,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    /// Expansion ceiling per search. Hitting it is reported as infeasible.
    pub max_expansions: Option<usize>,
    pub closed_set: ClosedSetPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found { path: Path, expansions: usize },
    /// Frontier ran dry before every goal was reached.
    Exhausted { expansions: usize },
    /// Start or a goal is out of bounds or blocked.
    InvalidRequest,
    ExpansionLimit { expansions: usize },
}

impl SearchOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            SearchOutcome::Found { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn into_path(self) -> Option<Path> {
        match self {
            SearchOutcome::Found { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn expansions(&self) -> usize {
        match self {
            SearchOutcome::Found { expansions, .. }
            | SearchOutcome::Exhausted { expansions }
            | SearchOutcome::ExpansionLimit { expansions } => *expansions,
            SearchOutcome::InvalidRequest => 0,
        }
    }
}

/// Multi-label A*: one search threads the whole goal sequence, carrying the
/// index of the next pending goal on every node.
#[derive(Debug, Clone, Default)]
pub struct MlaStarPlanner {
    settings: PlannerSettings,
}

impl MlaStarPlanner {
    pub fn new(settings: PlannerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    fn closed_key(&self, position: Cell, label: usize) -> (Cell, usize) {
        match self.settings.closed_set {
            ClosedSetPolicy::PositionAndLabel => (position, label),
            ClosedSetPolicy::PositionOnly => (position, 0),
        }
    }

    pub fn search(&self, start: Cell, goals: &GoalSequence, environment: &Environment) -> SearchOutcome {
        debug!(%start, goals = goals.len(), "starting MLA* search");

        if !environment.is_valid(&start) || goals.goals().iter().any(|g| !environment.is_valid(g)) {
            debug!(%start, "rejecting request with blocked or out-of-bounds cells");
            return SearchOutcome::InvalidRequest;
        }

        // Tie-break values restart at zero for every search.
        let mut arena = NodeArena::new();
        let mut frontier = Frontier::new();
        let mut closed: HashSet<(Cell, usize)> = HashSet::new();
        let mut expansions = 0usize;

        let root = arena.alloc(start, 0, 1, None, goals);
        frontier.push(root, arena.get(root));

        while let Some(index) = frontier.pop() {
            let node = arena.get(index).clone();

            if node.is_terminal(goals) {
                let path = Path::new(arena.trace(index));
                debug!(expansions, steps = path.steps(), "MLA* search found a path");
                return SearchOutcome::Found { path, expansions };
            }

            if !closed.insert(self.closed_key(node.position, node.label)) {
                continue;
            }

            if let Some(limit) = self.settings.max_expansions {
                if expansions >= limit {
                    debug!(expansions, limit, "MLA* search hit the expansion ceiling");
                    return SearchOutcome::ExpansionLimit { expansions };
                }
            }
            expansions += 1;
            trace!(position = %node.position, label = node.label, f = node.f, "expanding");

            for next in environment.neighbors(&node.position) {
                let label = advance_label(&next, node.label, goals);
                if closed.contains(&self.closed_key(next, label)) {
                    continue;
                }
                let child = arena.alloc(next, node.g + 1, node.label, Some(index), goals);
                frontier.push(child, arena.get(child));
            }
        }

        debug!(expansions, nodes = arena.len(), "MLA* frontier exhausted");
        SearchOutcome::Exhausted { expansions }
    }

    pub fn plan(&self, start: Cell, goals: &GoalSequence, environment: &Environment) -> Option<Path> {
        self.search(start, goals, environment).into_path()
    }
}

impl RoutePlanner for MlaStarPlanner {
    fn plan(&self, start: Cell, goals: &GoalSequence, environment: &Environment) -> Option<Path> {
        MlaStarPlanner::plan(self, start, goals, environment)
    }
}
