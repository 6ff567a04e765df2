pub mod config;
pub mod error;
pub mod game;
pub mod infra;
pub mod planners;
pub mod state;

// Re-export commonly used types for convenience
pub use config::{AgentConfig, StatePolicy};
pub use error::{AgentError, ConfigError, GridError};
pub use infra::{AStar, Bounds, Position, Route};
pub use planners::{ActionList, DecisionEngine};
pub use state::{Action, AgentStatus, Grid, Tile, TileKind};
