use std::collections::HashSet;

use crate::error::{ConfigError, GridError};
use crate::infra::Position;
use crate::state::Company;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Empty,
    Wall,
    Trap,
    Landmine,
    Emp,
    Station,
    OreNode,
    Avatar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub kind: TileKind,
    /// Only meaningful for ore nodes.
    pub has_item: bool,
    /// Only meaningful for stations.
    pub owner: Option<Company>,
}

impl Tile {
    pub const EMPTY: Tile = Tile::of(TileKind::Empty);

    pub const fn of(kind: TileKind) -> Self {
        Self {
            kind,
            has_item: false,
            owner: None,
        }
    }

    pub const fn ore(has_item: bool) -> Self {
        Self {
            kind: TileKind::OreNode,
            has_item,
            owner: None,
        }
    }

    pub const fn station(owner: Company) -> Self {
        Self {
            kind: TileKind::Station,
            has_item: false,
            owner: Some(owner),
        }
    }

    pub fn is_harvestable(&self) -> bool {
        self.kind == TileKind::OreNode && self.has_item
    }

    fn symbol(&self) -> char {
        match (self.kind, self.owner) {
            (TileKind::Empty, _) => '.',
            (TileKind::Wall, _) => '#',
            (TileKind::Trap, _) => 'T',
            (TileKind::Landmine, _) => 'L',
            (TileKind::Emp, _) => 'E',
            (TileKind::Station, Some(Company::Turing)) => 'U',
            (TileKind::Station, _) => 'C',
            (TileKind::OreNode, _) if self.has_item => 'o',
            (TileKind::OreNode, _) => 'x',
            (TileKind::Avatar, _) => 'A',
        }
    }

    fn from_symbol(symbol: char) -> Option<Self> {
        let tile = match symbol {
            '.' => Tile::EMPTY,
            '#' => Tile::of(TileKind::Wall),
            'T' => Tile::of(TileKind::Trap),
            'L' => Tile::of(TileKind::Landmine),
            'E' => Tile::of(TileKind::Emp),
            'C' => Tile::station(Company::Church),
            'U' => Tile::station(Company::Turing),
            'o' => Tile::ore(true),
            'x' => Tile::ore(false),
            'A' => Tile::of(TileKind::Avatar),
            _ => return None,
        };
        Some(tile)
    }
}

/// The tile kinds a single planner call must route around.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockingSet {
    kinds: HashSet<TileKind>,
}

impl BlockingSet {
    pub fn new(kinds: impl IntoIterator<Item = TileKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// Walls and every placed hazard.
    pub fn hazards() -> Self {
        Self::new([
            TileKind::Wall,
            TileKind::Trap,
            TileKind::Landmine,
            TileKind::Emp,
        ])
    }

    pub fn with(mut self, kind: TileKind) -> Self {
        self.kinds.insert(kind);
        self
    }

    pub fn without(mut self, kind: TileKind) -> Self {
        self.kinds.remove(&kind);
        self
    }

    pub fn contains(&self, kind: TileKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// Number of cells in a `width` x `height` board, negative sizes count as 0.
fn cell_count(width: i32, height: i32) -> usize {
    width.max(0) as usize * height.max(0) as usize
}

/// Read-only snapshot of the board for a single turn.
#[derive(Clone, Debug)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Tile>,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tiles: vec![Tile::EMPTY; cell_count(width, height)],
        }
    }

    /// Parse a board from one string per row (see `draw_ascii_map` for the legend).
    pub fn from_rows(rows: &[&str]) -> Result<Self, ConfigError> {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |row| row.chars().count()) as i32;
        let mut grid = Grid::new(width, height);

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() as i32 != width {
                return Err(ConfigError::InvalidValue {
                    key: format!("grid row {}", y),
                    value: row.to_string(),
                });
            }
            for (x, symbol) in row.chars().enumerate() {
                let tile = Tile::from_symbol(symbol).ok_or_else(|| ConfigError::InvalidValue {
                    key: format!("grid cell ({}, {})", x, y),
                    value: symbol.to_string(),
                })?;
                grid.tiles[y * width as usize + x] = tile;
            }
        }
        Ok(grid)
    }

    pub fn in_bounds(&self, pos: &Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    fn index(&self, pos: &Position) -> Result<usize, GridError> {
        if !self.in_bounds(pos) {
            return Err(GridError::OutOfBounds {
                position: *pos,
                width: self.width,
                height: self.height,
            });
        }
        Ok(pos.y as usize * self.width as usize + pos.x as usize)
    }

    pub fn tile_at(&self, pos: &Position) -> Result<&Tile, GridError> {
        let index = self.index(pos)?;
        Ok(&self.tiles[index])
    }

    pub fn blocked(&self, pos: &Position, blocking: &BlockingSet) -> Result<bool, GridError> {
        Ok(blocking.contains(self.tile_at(pos)?.kind))
    }

    pub fn set(&mut self, pos: Position, tile: Tile) -> Result<Tile, GridError> {
        let index = self.index(&pos)?;
        Ok(std::mem::replace(&mut self.tiles[index], tile))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, &Tile)> {
        let width = self.width;
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let index = index as i32;
            (Position::new(index % width, index / width), tile)
        })
    }

    /// First station owned by `company`, scanning row by row.
    pub fn find_station(&self, company: Company) -> Option<Position> {
        self.iter()
            .find(|(_, tile)| tile.kind == TileKind::Station && tile.owner == Some(company))
            .map(|(pos, _)| pos)
    }

    pub fn count_harvestable(&self) -> usize {
        self.iter().filter(|(_, tile)| tile.is_harvestable()).count()
    }

    pub fn draw_ascii_map(&self, agent: Option<Position>) -> String {
        let mut output = String::with_capacity(cell_count(self.width.saturating_add(1), self.height));
        for (pos, tile) in self.iter() {
            if Some(pos) == agent {
                output.push('@');
            } else {
                output.push(tile.symbol());
            }
            if pos.x == self.width - 1 {
                output.push('\n');
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_respects_blocking_set() {
        let grid = Grid::from_rows(&["#.", "TA"]).unwrap();
        let hazards = BlockingSet::hazards();

        assert!(grid.blocked(&Position::new(0, 0), &hazards).unwrap());
        assert!(!grid.blocked(&Position::new(1, 0), &hazards).unwrap());
        assert!(grid.blocked(&Position::new(0, 1), &hazards).unwrap());
        assert!(!grid.blocked(&Position::new(1, 1), &hazards).unwrap());
        assert!(
            grid.blocked(&Position::new(1, 1), &hazards.with(TileKind::Avatar))
                .unwrap()
        );
    }

    #[test]
    fn test_out_of_bounds_is_an_error() {
        let grid = Grid::new(3, 3);
        let err = grid.tile_at(&Position::new(3, 0)).unwrap_err();
        assert_eq!(
            err,
            GridError::OutOfBounds {
                position: Position::new(3, 0),
                width: 3,
                height: 3
            }
        );
        assert!(grid.blocked(&Position::new(-1, 1), &BlockingSet::hazards()).is_err());
    }

    #[test]
    fn test_find_station_by_owner() {
        let grid = Grid::from_rows(&["C...", "...U"]).unwrap();
        assert_eq!(grid.find_station(Company::Church), Some(Position::new(0, 0)));
        assert_eq!(grid.find_station(Company::Turing), Some(Position::new(3, 1)));
    }

    #[test]
    fn test_ascii_map_matches_parsed_rows() {
        let rows = ["C.o#", "x.TU"];
        let grid = Grid::from_rows(&rows).unwrap();
        assert_eq!(grid.draw_ascii_map(None), "C.o#\nx.TU\n");
        assert_eq!(grid.draw_ascii_map(Some(Position::new(1, 1))), "C.o#\nx@TU\n");
        assert_eq!(grid.count_harvestable(), 1);
    }

    #[test]
    fn test_cell_count_does_not_overflow() {
        assert_eq!(cell_count(i32::MAX, i32::MAX), (i32::MAX as usize).pow(2));
        assert_eq!(cell_count(-3, 4), 0);

        let grid = Grid::new(-3, 4);
        assert_eq!((grid.width, grid.height), (0, 4));
        assert_eq!(grid.iter().count(), 0);
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        assert!(Grid::from_rows(&["...", ".."]).is_err());
        assert!(Grid::from_rows(&["..?"]).is_err());
    }
}
