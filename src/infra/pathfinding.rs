use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::error::GridError;
use crate::infra::{Position, path_to_actions};
use crate::state::{Action, BlockingSet, Grid};

#[derive(Clone, Eq, PartialEq)]
struct Node {
    pos: Position,
    g_score: i32,
    f_score: i32,
    // Push order, breaks f_score ties first-in first-out
    seq: u64,
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Outcome of routing the agent to a goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Start and goal are the same tile.
    Arrived,
    Steps(Vec<Action>),
    Unreachable,
}

impl Route {
    pub fn into_actions(self) -> Option<Vec<Action>> {
        match self {
            Route::Arrived => Some(Vec::new()),
            Route::Steps(actions) => Some(actions),
            Route::Unreachable => None,
        }
    }
}

pub struct AStar;

impl AStar {
    /// Shortest 4-connected path from `start` to `goal` (both inclusive).
    ///
    /// Unit step cost, Manhattan heuristic. Equal f-scores are expanded in
    /// the order they were pushed and neighbours are generated north, east,
    /// south, west, so the result is fully deterministic. Returns `Ok(None)`
    /// when every route to `goal` crosses a tile in `blocking`.
    #[tracing::instrument(level = "trace", skip(grid, blocking), fields(start_x = start.x, start_y = start.y, goal_x = goal.x, goal_y = goal.y))]
    pub fn find_path(
        grid: &Grid,
        start: Position,
        goal: Position,
        blocking: &BlockingSet,
    ) -> Result<Option<Vec<Position>>, GridError> {
        grid.tile_at(&start)?;
        grid.tile_at(&goal)?;

        if start == goal {
            return Ok(Some(vec![goal]));
        }

        let mut open_set = BinaryHeap::new();
        let mut came_from: HashMap<Position, Position> = HashMap::new();
        let mut g_score: HashMap<Position, i32> = HashMap::new();
        let mut closed_set: HashSet<Position> = HashSet::new();
        let mut seq = 0u64;

        g_score.insert(start, 0);
        open_set.push(Node {
            pos: start,
            g_score: 0,
            f_score: heuristic(start, goal),
            seq,
        });

        let mut expansions = 0usize;

        while let Some(Node {
            pos: current,
            g_score: current_g,
            ..
        }) = open_set.pop()
        {
            if current == goal {
                tracing::trace!(expansions, "Path found");
                return Ok(Some(reconstruct_path(&came_from, current)));
            }

            if !closed_set.insert(current) {
                continue;
            }
            expansions += 1;

            for (_, neighbor) in current.neighbors() {
                if !grid.in_bounds(&neighbor) || closed_set.contains(&neighbor) {
                    continue;
                }
                if grid.blocked(&neighbor, blocking)? {
                    continue;
                }

                let tentative_g = current_g + 1;
                if tentative_g < *g_score.get(&neighbor).unwrap_or(&i32::MAX) {
                    came_from.insert(neighbor, current);
                    g_score.insert(neighbor, tentative_g);
                    seq += 1;
                    open_set.push(Node {
                        pos: neighbor,
                        g_score: tentative_g,
                        f_score: tentative_g + heuristic(neighbor, goal),
                        seq,
                    });
                }
            }
        }

        tracing::trace!(expansions, "No path");
        Ok(None)
    }

    /// Same search as [`AStar::find_path`], expressed as move actions.
    pub fn find_route(
        grid: &Grid,
        start: Position,
        goal: Position,
        blocking: &BlockingSet,
    ) -> Result<Route, GridError> {
        if start == goal {
            grid.tile_at(&start)?;
            return Ok(Route::Arrived);
        }
        let route = match Self::find_path(grid, start, goal, blocking)? {
            Some(path) => Route::Steps(path_to_actions(&path)),
            None => Route::Unreachable,
        };
        Ok(route)
    }
}

fn heuristic(a: Position, b: Position) -> i32 {
    a.distance(&b)
}

fn reconstruct_path(
    came_from: &HashMap<Position, Position>,
    mut current: Position,
) -> Vec<Position> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::infra::Bounds;
    use crate::state::{Tile, TileKind};

    fn replay(start: Position, actions: &[Action]) -> Vec<Position> {
        let mut visited = Vec::with_capacity(actions.len());
        let mut pos = start;
        for action in actions {
            pos = pos.step(action.direction().expect("planner only emits moves"));
            visited.push(pos);
        }
        visited
    }

    #[test]
    fn test_open_grid_path_has_manhattan_length() {
        let grid = Grid::new(8, 6);
        let blocking = BlockingSet::hazards();
        for (start, goal) in [
            (Position::new(0, 0), Position::new(7, 5)),
            (Position::new(6, 1), Position::new(2, 4)),
            (Position::new(3, 5), Position::new(3, 0)),
        ] {
            let Route::Steps(actions) = AStar::find_route(&grid, start, goal, &blocking).unwrap()
            else {
                panic!("expected a route from {} to {}", start, goal);
            };
            assert_eq!(actions.len() as i32, start.distance(&goal));
            assert_eq!(replay(start, &actions).last(), Some(&goal));
        }
    }

    #[test]
    fn test_same_start_and_goal_is_arrived() {
        let grid = Grid::new(3, 3);
        let here = Position::new(1, 1);
        let route = AStar::find_route(&grid, here, here, &BlockingSet::hazards()).unwrap();
        assert_eq!(route, Route::Arrived);
        assert_eq!(route.into_actions(), Some(Vec::new()));
    }

    #[test]
    fn test_five_by_five_scenario() {
        let grid = Grid::new(5, 5);
        let start = Position::new(0, 0);
        let goal = Position::new(2, 3);
        let actions = AStar::find_route(&grid, start, goal, &BlockingSet::hazards())
            .unwrap()
            .into_actions()
            .unwrap();

        assert_eq!(actions.len(), 5);
        let visited = replay(start, &actions);
        assert_eq!(visited.last(), Some(&goal));
        let bounds = Bounds::from_size(5, 5);
        assert!(visited.iter().all(|pos| bounds.contains(pos)));
    }

    #[test]
    fn test_routes_around_walls() {
        let grid = Grid::from_rows(&[
            ".....", //
            ".###.",
            ".#...",
            ".#.#.",
            "...#.",
        ])
        .unwrap();
        let start = Position::new(2, 2);
        let goal = Position::new(0, 0);
        let path = AStar::find_path(&grid, start, goal, &BlockingSet::hazards())
            .unwrap()
            .unwrap();

        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        // Both detours (east or south of the wall) take 8 steps
        assert_eq!(path.len() - 1, 8);
        for pair in path.windows(2) {
            assert!(pair[0].is_adjacent(&pair[1]));
        }
    }

    #[test]
    fn test_walled_off_goal_is_unreachable() {
        let grid = Grid::from_rows(&[
            ".....", //
            ".###.",
            ".#o#.",
            ".###.",
            ".....",
        ])
        .unwrap();
        let route = AStar::find_route(
            &grid,
            Position::new(0, 0),
            Position::new(2, 2),
            &BlockingSet::hazards(),
        )
        .unwrap();
        assert_eq!(route, Route::Unreachable);
    }

    #[test]
    fn test_blocked_goal_is_unreachable() {
        let grid = Grid::from_rows(&["..T"]).unwrap();
        let route = AStar::find_route(
            &grid,
            Position::new(0, 0),
            Position::new(2, 0),
            &BlockingSet::hazards(),
        )
        .unwrap();
        assert_eq!(route, Route::Unreachable);
    }

    #[test]
    fn test_out_of_bounds_endpoints_are_rejected() {
        let grid = Grid::new(4, 4);
        let blocking = BlockingSet::hazards();
        assert!(AStar::find_path(&grid, Position::new(0, 0), Position::new(4, 0), &blocking).is_err());
        assert!(AStar::find_route(&grid, Position::new(-1, 0), Position::new(-1, 0), &blocking).is_err());
    }

    #[test]
    fn test_ties_resolve_deterministically() {
        let grid = Grid::new(4, 4);
        let blocking = BlockingSet::hazards();
        let first = AStar::find_path(&grid, Position::new(0, 0), Position::new(3, 3), &blocking).unwrap();
        for _ in 0..10 {
            let again = AStar::find_path(&grid, Position::new(0, 0), Position::new(3, 3), &blocking)
                .unwrap();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_random_grids_never_step_on_blockers() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let kinds = [
            TileKind::Wall,
            TileKind::Trap,
            TileKind::Landmine,
            TileKind::Emp,
            TileKind::Avatar,
            TileKind::OreNode,
        ];

        for _ in 0..200 {
            let width = rng.random_range(2..12);
            let height = rng.random_range(2..12);
            let mut grid = Grid::new(width, height);
            for y in 0..height {
                for x in 0..width {
                    if rng.random_bool(0.3) {
                        let kind = kinds[rng.random_range(0..kinds.len())];
                        grid.set(Position::new(x, y), Tile::of(kind)).unwrap();
                    }
                }
            }

            let mut blocking = BlockingSet::hazards();
            if rng.random_bool(0.5) {
                blocking = blocking.with(TileKind::Avatar);
            }
            let start = Position::new(rng.random_range(0..width), rng.random_range(0..height));
            let goal = Position::new(rng.random_range(0..width), rng.random_range(0..height));

            match AStar::find_route(&grid, start, goal, &blocking).unwrap() {
                Route::Arrived => assert_eq!(start, goal),
                Route::Unreachable => assert_ne!(start, goal),
                Route::Steps(actions) => {
                    let visited = replay(start, &actions);
                    assert_eq!(visited.last(), Some(&goal));
                    for pos in visited {
                        assert!(!grid.blocked(&pos, &blocking).unwrap(), "stepped onto {}", pos);
                    }
                }
            }
        }
    }
}
