use mapd_app::Config;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use std::error::Error;
use std::path::Path;

use mapd_app::adapters::outbound::{flush_file_logger, init_combined_logger};
use mapd_app::application::DispatchService;

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Install tracing directly so the `log` facade stays free for fast_log.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting MAPD dispatcher");

    let config = if Path::new(CONFIG_PATH).exists() {
        Config::load(CONFIG_PATH)?
    } else {
        warn!("{} not found, using the built-in demo scenario", CONFIG_PATH);
        Config::default()
    };
    info!(
        width = config.grid.width,
        height = config.grid.height,
        agents = config.agents.len(),
        tasks = config.tasks.len(),
        "Configuration loaded"
    );

    let logger = init_combined_logger("dispatch", config.logging.file.as_deref());
    let service = DispatchService::new(&config, logger);

    let (mut dispatcher, environment) = service.bootstrap(&config)?;
    let outcome = service.run_once(&mut dispatcher, &environment)?;

    for envelope in service.drain_envelopes(&mut dispatcher)? {
        println!("{}", serde_json::to_string(&envelope)?);
    }

    for agent in &dispatcher.agents {
        match agent.path() {
            Some(path) => {
                let cells: Vec<String> = path.cells().iter().map(|c| c.to_string()).collect();
                println!("Agent {} path ({} steps): {}", agent.id(), path.steps(), cells.join(" -> "));
            }
            None => println!("Agent {} has no path", agent.id()),
        }
    }
    for task in &outcome.unassigned {
        warn!(task = task.id(), "Task could not be assigned");
    }

    flush_file_logger();
    info!("MAPD dispatcher finished");
    Ok(())
}
