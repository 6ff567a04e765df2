use std::env;

use dotenv::dotenv;
use quarrybot::config::{self, AgentConfig};
use quarrybot::game::Game;
use quarrybot::infra::{DefaultObserver, LocalWorld};
use quarrybot::planners::DecisionEngine;
use quarrybot::state::Company;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn get_env_var<T: std::str::FromStr>(key: &str) -> Result<Option<T>, quarrybot::ConfigError> {
    env::var(key)
        .ok()
        .map(|value| config::parse_value(key, &value))
        .transpose()
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quarrybot=debug,info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    let agent_config = AgentConfig::from_env()?;
    let turns = get_env_var::<u32>("QUARRY_TURNS")?.unwrap_or(500);
    let map_seed = get_env_var::<u64>("QUARRY_MAP_SEED")?.unwrap_or(1);
    let map_size = get_env_var::<i32>("QUARRY_MAP_SIZE")?.unwrap_or(14);
    let map_every = get_env_var::<u32>("QUARRY_DRAW_MAP_EVERY")?;
    let company = get_env_var::<Company>("QUARRY_COMPANY")?.unwrap_or(Company::Church);

    tracing::info!("Agent config: {:?}", agent_config);

    let world = LocalWorld::generate(map_size, map_size, company, map_seed)?;
    let engine = DecisionEngine::new(agent_config);
    let mut game = Game::new(world, engine, DefaultObserver::new(map_every));
    let summary = game.run(turns, map_seed);

    tracing::info!(
        "Score {} after {} turns ({} upgrade cycles, {} science points left)",
        summary.score,
        summary.turns,
        summary.upgrade_cycles,
        summary.science_points
    );

    Ok(())
}
