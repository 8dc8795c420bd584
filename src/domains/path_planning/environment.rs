use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::types::Cell;
use crate::common::{DomainError, DomainResult};

/// 4-connected moves, in the order neighbors are reported.
const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Static grid the agents move on. Read-only once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GridLayout")]
pub struct Environment {
    width: u32,
    height: u32,
    obstacles: HashSet<Cell>,
    endpoints: HashSet<Cell>,
}

/// Wire form of an environment, validated through `Environment::new`.
#[derive(Deserialize)]
struct GridLayout {
    width: u32,
    height: u32,
    #[serde(default)]
    obstacles: Vec<Cell>,
    #[serde(default)]
    endpoints: Vec<Cell>,
}

impl TryFrom<GridLayout> for Environment {
    type Error = DomainError;

    fn try_from(layout: GridLayout) -> DomainResult<Self> {
        Self::new(layout.width, layout.height, layout.obstacles, layout.endpoints)
    }
}

impl Environment {
    pub fn new(
        width: u32,
        height: u32,
        obstacles: impl IntoIterator<Item = Cell>,
        endpoints: impl IntoIterator<Item = Cell>,
    ) -> DomainResult<Self> {
        if width == 0 || height == 0 {
            return Err(DomainError::InvalidEnvironment {
                reason: format!("grid dimensions must be positive, got {}x{}", width, height),
            });
        }
        Ok(Self {
            width,
            height,
            obstacles: obstacles.into_iter().collect(),
            endpoints: endpoints.into_iter().collect(),
        })
    }

    /// Obstacle-free grid without endpoints.
    pub fn open(width: u32, height: u32) -> DomainResult<Self> {
        Self::new(width, height, Vec::new(), Vec::new())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn obstacles(&self) -> &HashSet<Cell> {
        &self.obstacles
    }

    pub fn endpoints(&self) -> &HashSet<Cell> {
        &self.endpoints
    }

    pub fn is_endpoint(&self, cell: &Cell) -> bool {
        self.endpoints.contains(cell)
    }

    pub fn in_bounds(&self, cell: &Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.width && (cell.y as u32) < self.height
    }

    pub fn is_valid(&self, cell: &Cell) -> bool {
        self.in_bounds(cell) && !self.obstacles.contains(cell)
    }

    pub fn neighbors(&self, cell: &Cell) -> Vec<Cell> {
        DIRECTIONS
            .iter()
            .filter_map(|&(dx, dy)| cell.offset(dx, dy))
            .filter(|next| self.is_valid(next))
            .collect()
    }

    /// Every valid cell in row-major order.
    pub fn free_cells(&self) -> Vec<Cell> {
        (0..self.height as i32)
            .flat_map(|y| (0..self.width as i32).map(move |x| Cell::new(x, y)))
            .filter(|cell| !self.obstacles.contains(cell))
            .collect()
    }
}
