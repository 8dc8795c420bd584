use serde::{Deserialize, Serialize};
use std::path::Path;
use anyhow::Result;

use crate::domains::path_planning::{Cell, PlannerSettings};
use crate::domains::task_assignment::SchedulerSettings;

/// Prefix for environment overrides, e.g. `MAPD__SCHEDULER__MAX_ROUNDS=3`.
pub const ENV_PREFIX: &str = "MAPD";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub planner: PlannerSettings,
    #[serde(default)]
    pub scheduler: SchedulerSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub agents: Vec<AgentConfig>,
    #[serde(default)]
    pub tasks: Vec<TaskConfig>,
    #[serde(default)]
    pub generator: Option<GeneratorConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub obstacles: Vec<Cell>,
    #[serde(default)]
    pub endpoints: Vec<Cell>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log file for the `fast_log` sink. Console only when unset.
    pub file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub id: u32,
    pub start: Cell,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    pub id: u32,
    pub pickup: Cell,
    pub delivery: Cell,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub count: usize,
    /// Fixed seed for reproducible task sets; random when unset.
    pub seed: Option<u64>,
    /// Id of the first generated task. Defaults to one past the highest
    /// configured task id.
    pub first_id: Option<u32>,
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Layers `MAPD__*` environment variables over an optional TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            obstacles: vec![Cell::new(1, 2), Cell::new(2, 2), Cell::new(3, 2)],
            endpoints: vec![Cell::new(0, 9), Cell::new(9, 0)],
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            planner: PlannerSettings::default(),
            scheduler: SchedulerSettings::default(),
            logging: LoggingConfig::default(),
            agents: vec![
                AgentConfig { id: 1, start: Cell::new(0, 0) },
                AgentConfig { id: 2, start: Cell::new(9, 9) },
            ],
            tasks: vec![
                TaskConfig { id: 1, pickup: Cell::new(2, 3), delivery: Cell::new(5, 5) },
                TaskConfig { id: 2, pickup: Cell::new(7, 8), delivery: Cell::new(1, 3) },
            ],
            generator: None,
        }
    }
}
