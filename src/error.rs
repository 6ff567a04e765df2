use crate::infra::Position;

/// A coordinate fell outside the grid it was checked against.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        position: Position,
        width: i32,
        height: i32,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("threshold schedule must contain at least one value")]
    EmptySchedule,

    #[error("search bounds {0} contain no cells")]
    EmptyBounds(crate::infra::Bounds),

    #[error("no station owned by {0:?} on the map")]
    MissingStation(crate::state::Company),

    #[error("{field} is not set")]
    MissingField { field: &'static str },

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

/// Anything that can go wrong while deciding a single turn.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
