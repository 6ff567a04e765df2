mod action;
mod agent_state;
mod map;
mod tech;

pub use action::Action;
pub use agent_state::{AgentState, AgentStateBuilder, AgentStatus, Company, FsmState};
pub use map::{BlockingSet, Grid, Tile, TileKind};
pub use tech::{Tech, TechCatalog, TechTree};
