use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::infra::Position;
use crate::state::{
    Action, AgentStatus, BlockingSet, Company, Grid, Tech, TechCatalog, TechTree, Tile, TileKind,
};

const INVENTORY_CAPACITY: usize = 50;
const REGROW_CHANCE: f64 = 0.02;

/// Small in-process stand-in for the game server, good enough to drive the
/// agent end to end. One agent, no opponents acting.
pub struct LocalWorld {
    grid: Grid,
    company: Company,
    position: Position,
    home: Position,
    inventory: usize,
    science_points: u32,
    score: u32,
    techs: TechTree,
    rng: StdRng,
}

impl LocalWorld {
    /// The agent starts on its company's station.
    pub fn from_grid(grid: Grid, company: Company, seed: u64) -> Result<Self, ConfigError> {
        let home = grid
            .find_station(company)
            .ok_or(ConfigError::MissingStation(company))?;
        Ok(Self {
            grid,
            company,
            position: home,
            home,
            inventory: 0,
            science_points: 0,
            score: 0,
            techs: TechTree::default(),
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Random board with both stations on the middle row, opposite edges.
    pub fn generate(
        width: i32,
        height: i32,
        company: Company,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        if width < 3 || height < 3 {
            return Err(ConfigError::InvalidValue {
                key: "map size".to_string(),
                value: format!("{}x{}", width, height),
            });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut grid = Grid::new(width, height);
        let church = Position::new(0, height / 2);
        let turing = Position::new(width - 1, height / 2);

        for y in 0..height {
            for x in 0..width {
                let pos = Position::new(x, y);
                let roll: f64 = rng.random();
                let tile = if pos == church {
                    Tile::station(Company::Church)
                } else if pos == turing {
                    Tile::station(Company::Turing)
                } else if pos.distance(&church) <= 1 || pos.distance(&turing) <= 1 {
                    Tile::EMPTY
                } else if roll < 0.08 {
                    Tile::of(TileKind::Wall)
                } else if roll < 0.25 {
                    Tile::ore(true)
                } else {
                    Tile::EMPTY
                };
                grid.set(pos, tile).map_err(|err| ConfigError::InvalidValue {
                    key: "map".to_string(),
                    value: err.to_string(),
                })?;
            }
        }

        let mut world = Self::from_grid(grid, company, seed)?;
        world.rng = rng;
        Ok(world)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn inventory(&self) -> usize {
        self.inventory
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn science_points(&self) -> u32 {
        self.science_points
    }

    pub fn techs(&self) -> &TechTree {
        &self.techs
    }

    pub fn status(&self) -> AgentStatus<'_> {
        AgentStatus {
            position: self.position,
            company: self.company,
            inventory_size: self.inventory,
            science_points: self.science_points,
            techs: &self.techs,
        }
    }

    pub fn movement_speed(&self) -> usize {
        1 + self.researched_where(|tech| tech.is_drivetrain())
    }

    pub fn drop_rate(&self) -> usize {
        1 + self.researched_where(|tech| !tech.is_drivetrain())
    }

    fn researched_where(&self, filter: impl Fn(&Tech) -> bool) -> usize {
        self.techs.researched().filter(|tech| filter(tech)).count()
    }

    /// Execute as many of `actions` as this turn allows: up to
    /// `movement_speed` moves, and the first non-move action ends the turn.
    /// Returns how many actions were executed.
    pub fn apply(&mut self, actions: &[Action]) -> usize {
        let mut moves_left = self.movement_speed();
        let mut executed = 0;

        for action in actions {
            if let Some(direction) = action.direction() {
                if moves_left == 0 {
                    break;
                }
                moves_left -= 1;
                let next = self.position.step(direction);
                let walkable = self
                    .grid
                    .blocked(&next, &BlockingSet::hazards())
                    .is_ok_and(|blocked| !blocked);
                if !walkable {
                    debug!("Rejected {} into {}", action, next);
                    break;
                }
                self.position = next;
                executed += 1;
                self.sell_if_home();
                continue;
            }

            match action {
                Action::Mine => self.mine(),
                Action::Buy(tech) => self.buy(*tech),
                other => trace!("{} has no effect here", other),
            }
            executed += 1;
            break;
        }

        executed
    }

    /// Depleted ore nodes occasionally get a new item.
    pub fn end_turn(&mut self) {
        let depleted: Vec<Position> = self
            .grid
            .iter()
            .filter(|(_, tile)| tile.kind == TileKind::OreNode && !tile.has_item)
            .map(|(pos, _)| pos)
            .collect();
        for pos in depleted {
            if self.rng.random_bool(REGROW_CHANCE) {
                let _ = self.grid.set(pos, Tile::ore(true));
            }
        }
    }

    fn mine(&mut self) {
        let Ok(tile) = self.grid.tile_at(&self.position) else {
            return;
        };
        if !tile.is_harvestable() {
            trace!("Nothing to mine at {}", self.position);
            return;
        }
        self.inventory = (self.inventory + self.drop_rate()).min(INVENTORY_CAPACITY);
        let _ = self.grid.set(self.position, Tile::ore(false));
    }

    fn buy(&mut self, tech: Tech) {
        let Some(cost) = self.techs.cost(tech) else {
            return;
        };
        if self.techs.is_researched(tech) || cost > self.science_points {
            debug!("Cannot buy {}", tech);
            return;
        }
        self.science_points -= cost;
        self.techs.research(tech);
    }

    fn sell_if_home(&mut self) {
        if self.position != self.home || self.inventory == 0 {
            return;
        }
        let sold = self.inventory as u32;
        self.score += sold;
        self.science_points += sold;
        self.inventory = 0;
        debug!("Sold {} items, score {}", sold, self.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_places_both_stations() {
        let world = LocalWorld::generate(14, 14, Company::Turing, 3).unwrap();
        assert_eq!(world.grid().find_station(Company::Church), Some(Position::new(0, 7)));
        assert_eq!(world.position(), Position::new(13, 7));
        assert!(LocalWorld::generate(2, 9, Company::Church, 3).is_err());
    }

    #[test]
    fn test_moves_are_limited_by_speed_and_walls() {
        let grid = Grid::from_rows(&["C..#."]).unwrap();
        let mut world = LocalWorld::from_grid(grid, Company::Church, 1).unwrap();

        assert_eq!(world.apply(&[Action::MoveRight, Action::MoveRight]), 1);
        assert_eq!(world.position(), Position::new(1, 0));

        world.techs.research(Tech::ImprovedDrivetrain);
        assert_eq!(world.apply(&[Action::MoveRight, Action::MoveRight]), 1);
        assert_eq!(world.position(), Position::new(2, 0));
        assert_eq!(world.apply(&[Action::MoveUp]), 0);
    }

    #[test]
    fn test_mine_sell_and_buy() {
        let grid = Grid::from_rows(&["Co"]).unwrap();
        let mut world = LocalWorld::from_grid(grid, Company::Church, 1).unwrap();

        world.apply(&[Action::MoveRight]);
        assert_eq!(world.apply(&[Action::Mine, Action::MoveLeft]), 1);
        assert_eq!(world.inventory(), 1);
        assert!(!world.grid().tile_at(&Position::new(1, 0)).unwrap().has_item);

        world.apply(&[Action::MoveLeft]);
        assert_eq!(world.inventory(), 0);
        assert_eq!(world.score(), 1);
        assert_eq!(world.science_points(), 1);

        world.science_points = 10;
        world.apply(&[Action::Buy(Tech::ImprovedMining)]);
        assert!(world.techs().is_researched(Tech::ImprovedMining));
        assert_eq!(world.science_points(), 0);
        assert_eq!(world.drop_rate(), 2);
    }
}
