mod default_observer;
mod game_observer;
mod local_world;
mod pathfinding;
mod types;

pub use default_observer::DefaultObserver;
pub use game_observer::GameObserver;
pub use local_world::LocalWorld;
pub use pathfinding::{AStar, Route};
pub use types::{Bounds, Direction, Position};

use crate::state::Action;

// ============================================================================
// Helper functions
// ============================================================================

/// Convert consecutive path positions into move actions. The first position
/// is where the agent stands and produces no action.
pub fn path_to_actions(path: &[Position]) -> Vec<Action> {
    path.windows(2)
        .filter_map(|pair| Direction::between(pair[0], pair[1]))
        .map(Action::from_direction)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_to_actions() {
        let path = [
            Position::new(1, 1),
            Position::new(1, 0),
            Position::new(2, 0),
            Position::new(2, 1),
            Position::new(1, 1),
        ];
        assert_eq!(
            path_to_actions(&path),
            vec![
                Action::MoveUp,
                Action::MoveRight,
                Action::MoveDown,
                Action::MoveLeft
            ]
        );
        assert!(path_to_actions(&path[..1]).is_empty());
        assert!(path_to_actions(&[]).is_empty());
    }
}
