use std::fmt;

use crate::error::ConfigError;
use crate::infra::{Bounds, Position};
use crate::state::TechCatalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Company {
    Church,
    Turing,
}

impl std::str::FromStr for Company {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "church" => Ok(Company::Church),
            "turing" => Ok(Company::Turing),
            _ => Err(ConfigError::InvalidValue {
                key: "company".to_string(),
                value: value.to_string(),
            }),
        }
    }
}

/// What the engine tells the agent about itself at the start of a turn.
#[derive(Clone, Copy)]
pub struct AgentStatus<'a> {
    pub position: Position,
    pub company: Company,
    pub inventory_size: usize,
    pub science_points: u32,
    pub techs: &'a dyn TechCatalog,
}

impl fmt::Debug for AgentStatus<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentStatus")
            .field("position", &self.position)
            .field("company", &self.company)
            .field("inventory_size", &self.inventory_size)
            .field("science_points", &self.science_points)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsmState {
    /// Turn 1 only, before initialisation.
    Start,
    Mining,
    Selling,
    Upgrading,
}

/// Everything the decision engine remembers between turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentState {
    pub company: Company,
    pub home: Position,
    pub state: FsmState,
    pub search_bounds: Bounds,
    pub upgrade_cycles: u32,
    /// Walk to the rally point before mining again.
    pub heading_to_rally: bool,
    thresholds: Vec<usize>,
    cursor: usize,
}

impl AgentState {
    pub fn builder() -> AgentStateBuilder {
        AgentStateBuilder::default()
    }

    pub fn threshold(&self) -> usize {
        self.thresholds[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn thresholds(&self) -> &[usize] {
        &self.thresholds
    }

    /// Move to the next threshold, holding at the last one.
    pub fn advance_threshold(&mut self) {
        self.cursor = (self.cursor + 1).min(self.thresholds.len() - 1);
    }

    pub fn is_home(&self, position: Position) -> bool {
        self.home == position
    }
}

#[derive(Debug, Default)]
pub struct AgentStateBuilder {
    company: Option<Company>,
    home: Option<Position>,
    thresholds: Vec<usize>,
    search_bounds: Option<Bounds>,
    heading_to_rally: bool,
}

impl AgentStateBuilder {
    pub fn company(mut self, company: Company) -> Self {
        self.company = Some(company);
        self
    }

    pub fn home(mut self, home: Position) -> Self {
        self.home = Some(home);
        self
    }

    pub fn thresholds(mut self, thresholds: impl Into<Vec<usize>>) -> Self {
        self.thresholds = thresholds.into();
        self
    }

    pub fn search_bounds(mut self, bounds: Bounds) -> Self {
        self.search_bounds = Some(bounds);
        self
    }

    pub fn heading_to_rally(mut self, heading: bool) -> Self {
        self.heading_to_rally = heading;
        self
    }

    /// Validates once; the resulting state is always in `Mining`.
    pub fn build(self) -> Result<AgentState, ConfigError> {
        let company = self
            .company
            .ok_or(ConfigError::MissingField { field: "company" })?;
        let home = self.home.ok_or(ConfigError::MissingStation(company))?;
        if self.thresholds.is_empty() {
            return Err(ConfigError::EmptySchedule);
        }
        let search_bounds = self.search_bounds.ok_or(ConfigError::MissingField {
            field: "search_bounds",
        })?;
        if search_bounds.is_empty() {
            return Err(ConfigError::EmptyBounds(search_bounds));
        }

        Ok(AgentState {
            company,
            home,
            state: FsmState::Mining,
            search_bounds,
            upgrade_cycles: 0,
            heading_to_rally: self.heading_to_rally,
            thresholds: self.thresholds,
            cursor: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> AgentStateBuilder {
        AgentState::builder()
            .company(Company::Church)
            .home(Position::new(0, 0))
            .thresholds(vec![10, 14])
            .search_bounds(Bounds::from_size(5, 5))
    }

    #[test]
    fn test_build_starts_mining_at_first_threshold() {
        let state = builder().build().unwrap();
        assert_eq!(state.state, FsmState::Mining);
        assert_eq!(state.threshold(), 10);
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_cursor_clamps_at_last_threshold() {
        let mut state = builder().build().unwrap();
        state.advance_threshold();
        assert_eq!(state.threshold(), 14);
        state.advance_threshold();
        state.advance_threshold();
        assert_eq!(state.cursor(), 1);
        assert_eq!(state.threshold(), 14);
    }

    #[test]
    fn test_build_rejects_invalid_values() {
        assert_eq!(
            builder().thresholds(Vec::new()).build(),
            Err(ConfigError::EmptySchedule)
        );
        let empty = Bounds::new(4, 0, 2, 5);
        assert_eq!(
            builder().search_bounds(empty).build(),
            Err(ConfigError::EmptyBounds(empty))
        );
        assert_eq!(
            AgentState::builder()
                .company(Company::Turing)
                .thresholds(vec![1])
                .search_bounds(Bounds::from_size(1, 1))
                .build(),
            Err(ConfigError::MissingStation(Company::Turing))
        );
    }

    #[test]
    fn test_company_parsing() {
        assert_eq!("Turing".parse::<Company>().unwrap(), Company::Turing);
        assert!("acme".parse::<Company>().is_err());
    }
}
