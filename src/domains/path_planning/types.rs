use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domains::task_assignment::Task;

/// A grid cell addressed by column `x` and row `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(&self, other: &Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Cell shifted by `(dx, dy)`, or `None` if the coordinate would overflow.
    pub fn offset(&self, dx: i32, dy: i32) -> Option<Cell> {
        Some(Cell {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }

    /// True when `other` is exactly one step away along one axis.
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        self.manhattan(other) == 1
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Cell { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Ordered list of cells from the start cell to the final goal, inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    cells: Vec<Cell>,
}

impl Path {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    /// Number of cells, start included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of moves along the path.
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    pub fn end(&self) -> Option<Cell> {
        self.cells.last().copied()
    }

    /// Checks that every waypoint is visited in the given order. Repeated
    /// consecutive waypoints may be satisfied by the same cell.
    pub fn visits_in_order(&self, waypoints: &[Cell]) -> bool {
        let mut from = 0;
        for waypoint in waypoints {
            match self.cells[from..].iter().position(|cell| cell == waypoint) {
                Some(offset) => from += offset,
                None => return false,
            }
        }
        true
    }

    /// Every consecutive pair of cells is one axis-aligned unit step apart.
    pub fn is_contiguous(&self) -> bool {
        self.cells.windows(2).all(|pair| pair[0].is_adjacent(&pair[1]))
    }
}

/// Waypoints a single planning call must thread through, in order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GoalSequence {
    goals: Vec<Cell>,
}

impl GoalSequence {
    pub fn new(goals: Vec<Cell>) -> Self {
        Self { goals }
    }

    /// `[pickup, delivery]` for a single task.
    pub fn for_task(task: &Task) -> Self {
        Self {
            goals: vec![task.pickup(), task.delivery()],
        }
    }

    /// Each task's pickup followed by its delivery, tasks in the given order.
    pub fn chain(tasks: &[Task]) -> Self {
        Self {
            goals: tasks
                .iter()
                .flat_map(|task| [task.pickup(), task.delivery()])
                .collect(),
        }
    }

    pub fn goals(&self) -> &[Cell] {
        &self.goals
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// Goal still pending for a 1-based `label`, `None` once all are reached.
    pub fn pending(&self, label: usize) -> Option<Cell> {
        label.checked_sub(1).and_then(|i| self.goals.get(i).copied())
    }

    pub fn is_complete(&self, label: usize) -> bool {
        label > self.goals.len()
    }
}

impl From<Vec<Cell>> for GoalSequence {
    fn from(goals: Vec<Cell>) -> Self {
        Self::new(goals)
    }
}
