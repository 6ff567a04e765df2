use std::fmt;

use crate::infra::Direction;
use crate::state::Tech;

/// A single command sent to the game engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Mine,
    Defuse,
    PlaceDynamite,
    PlaceLandmine,
    PlaceEmp,
    Buy(Tech),
}

impl Action {
    pub const MOVES: [Action; 4] = [
        Action::MoveUp,
        Action::MoveRight,
        Action::MoveDown,
        Action::MoveLeft,
    ];

    pub fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::North => Action::MoveUp,
            Direction::East => Action::MoveRight,
            Direction::South => Action::MoveDown,
            Direction::West => Action::MoveLeft,
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            Action::MoveUp => Some(Direction::North),
            Action::MoveRight => Some(Direction::East),
            Action::MoveDown => Some(Direction::South),
            Action::MoveLeft => Some(Direction::West),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::MoveUp => f.write_str("MOVE_UP"),
            Action::MoveDown => f.write_str("MOVE_DOWN"),
            Action::MoveLeft => f.write_str("MOVE_LEFT"),
            Action::MoveRight => f.write_str("MOVE_RIGHT"),
            Action::Mine => f.write_str("MINE"),
            Action::Defuse => f.write_str("DEFUSE"),
            Action::PlaceDynamite => f.write_str("PLACE_DYNAMITE"),
            Action::PlaceLandmine => f.write_str("PLACE_LANDMINE"),
            Action::PlaceEmp => f.write_str("PLACE_EMP"),
            Action::Buy(tech) => write!(f, "BUY({})", tech),
        }
    }
}
