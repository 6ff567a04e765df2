use std::env;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::infra::{Bounds, Position};
use crate::state::{BlockingSet, TileKind};

/// How the planner treats the board while the agent is in a given state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePolicy {
    pub blocking: BlockingSet,
    /// Other agents are walkable when set, blocking otherwise.
    pub pass_through_agents: bool,
}

impl StatePolicy {
    pub fn new(blocking: BlockingSet, pass_through_agents: bool) -> Self {
        Self {
            blocking,
            pass_through_agents,
        }
    }

    pub fn blocking_set(&self) -> BlockingSet {
        if self.pass_through_agents {
            self.blocking.clone().without(TileKind::Avatar)
        } else {
            self.blocking.clone().with(TileKind::Avatar)
        }
    }
}

impl Default for StatePolicy {
    fn default() -> Self {
        Self::new(BlockingSet::hazards(), true)
    }
}

/// Tunables that used to differ between hand-edited copies of the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// Inventory sizes that trigger a sell trip, one per upgrade cycle.
    pub thresholds: Vec<usize>,
    /// Where to look for ore before the first upgrade. `None` is the whole grid.
    pub search_bounds: Option<Bounds>,
    /// Where to look for ore after an upgrade cycle. `None` keeps the current bounds.
    pub upgraded_bounds: Option<Bounds>,
    pub max_radius: i32,
    /// From this turn on the agent only heads home.
    pub late_game_turn: Option<u32>,
    pub rally_point: Option<Position>,
    pub mining: StatePolicy,
    pub selling: StatePolicy,
    /// Seed for the fallback move. `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            thresholds: vec![10, 14, 18],
            search_bounds: None,
            upgraded_bounds: None,
            max_radius: 16,
            late_game_turn: None,
            rally_point: None,
            mining: StatePolicy::default(),
            selling: StatePolicy::default(),
            seed: None,
        }
    }
}

impl AgentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `QUARRY_*` keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("QUARRY_THRESHOLDS") {
            config.thresholds = parse_list("QUARRY_THRESHOLDS", &value)?;
        }
        if let Some(value) = lookup("QUARRY_SEARCH_BOUNDS") {
            config.search_bounds = Some(parse_bounds("QUARRY_SEARCH_BOUNDS", &value)?);
        }
        if let Some(value) = lookup("QUARRY_UPGRADED_BOUNDS") {
            config.upgraded_bounds = Some(parse_bounds("QUARRY_UPGRADED_BOUNDS", &value)?);
        }
        if let Some(value) = lookup("QUARRY_MAX_RADIUS") {
            config.max_radius = parse_value("QUARRY_MAX_RADIUS", &value)?;
        }
        if let Some(value) = lookup("QUARRY_LATE_GAME_TURN") {
            config.late_game_turn = Some(parse_value("QUARRY_LATE_GAME_TURN", &value)?);
        }
        if let Some(value) = lookup("QUARRY_RALLY_POINT") {
            config.rally_point = Some(parse_position("QUARRY_RALLY_POINT", &value)?);
        }
        if let Some(value) = lookup("QUARRY_MINE_THROUGH_AGENTS") {
            config.mining.pass_through_agents = parse_value("QUARRY_MINE_THROUGH_AGENTS", &value)?;
        }
        if let Some(value) = lookup("QUARRY_SELL_THROUGH_AGENTS") {
            config.selling.pass_through_agents = parse_value("QUARRY_SELL_THROUGH_AGENTS", &value)?;
        }
        if let Some(value) = lookup("QUARRY_SEED") {
            config.seed = Some(parse_value("QUARRY_SEED", &value)?);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thresholds.is_empty() {
            return Err(ConfigError::EmptySchedule);
        }
        for bounds in [self.search_bounds, self.upgraded_bounds].into_iter().flatten() {
            if bounds.is_empty() {
                return Err(ConfigError::EmptyBounds(bounds));
            }
        }
        if self.max_radius < 1 {
            return Err(ConfigError::InvalidValue {
                key: "max_radius".to_string(),
                value: self.max_radius.to_string(),
            });
        }
        Ok(())
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

pub fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn parse_list<T: FromStr>(key: &str, value: &str) -> Result<Vec<T>, ConfigError> {
    value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| parse_value(key, part))
        .collect()
}

fn parse_position(key: &str, value: &str) -> Result<Position, ConfigError> {
    match parse_list::<i32>(key, value)?.as_slice() {
        [x, y] => Ok(Position::new(*x, *y)),
        _ => Err(invalid(key, value)),
    }
}

fn parse_bounds(key: &str, value: &str) -> Result<Bounds, ConfigError> {
    match parse_list::<i32>(key, value)?.as_slice() {
        [min_x, min_y, max_x, max_y] => Ok(Bounds::new(*min_x, *min_y, *max_x, *max_y)),
        _ => Err(invalid(key, value)),
    }
}
