use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::config::{AgentConfig, StatePolicy};
use crate::error::AgentError;
use crate::infra::{AStar, Bounds, Position, Route};
use crate::planners::emitter::{ActionEmitter, ActionList};
use crate::planners::fsm::{self, TransitionInput};
use crate::planners::locator;
use crate::state::{Action, AgentState, AgentStatus, FsmState, Grid, Tech};

/// Per-turn decision maker. Owns the only state that survives between turns.
pub struct DecisionEngine {
    config: AgentConfig,
    agent: Option<AgentState>,
    rng: StdRng,
}

impl DecisionEngine {
    pub fn new(config: AgentConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config,
            agent: None,
            rng,
        }
    }

    pub fn agent(&self) -> Option<&AgentState> {
        self.agent.as_ref()
    }

    pub fn state(&self) -> FsmState {
        self.agent.as_ref().map_or(FsmState::Start, |agent| agent.state)
    }

    /// Decide the actions for `turn`. Never fails: anything unexpected is
    /// logged and replaced by the default action.
    #[tracing::instrument(level = "debug", skip(self, grid, status), fields(x = status.position.x, y = status.position.y, inventory = status.inventory_size))]
    pub fn take_turn(&mut self, turn: u32, grid: &Grid, status: &AgentStatus) -> ActionList {
        match self.decide(turn, grid, status) {
            Ok(decision) => ActionEmitter::emit(decision),
            Err(err) => {
                warn!("Turn {} failed: {}", turn, err);
                ActionEmitter::fallback()
            }
        }
    }

    fn first_turn_init(&mut self, grid: &Grid, status: &AgentStatus) -> Result<(), AgentError> {
        let bounds = self
            .config
            .search_bounds
            .unwrap_or_else(|| Bounds::from_size(grid.width, grid.height));

        let mut builder = AgentState::builder()
            .company(status.company)
            .thresholds(self.config.thresholds.clone())
            .search_bounds(bounds)
            .heading_to_rally(self.config.rally_point.is_some());
        if let Some(home) = grid.find_station(status.company) {
            builder = builder.home(home);
        }

        let agent = builder.build()?;
        info!(
            "Initialised {:?}: home {}, thresholds {:?}, bounds {}",
            agent.company,
            agent.home,
            agent.thresholds(),
            agent.search_bounds
        );
        self.agent = Some(agent);
        Ok(())
    }

    fn decide(
        &mut self,
        turn: u32,
        grid: &Grid,
        status: &AgentStatus,
    ) -> Result<Option<Vec<Action>>, AgentError> {
        if turn == 1 || self.agent.is_none() {
            self.first_turn_init(grid, status)?;
        }
        grid.tile_at(&status.position)?;

        let Some(mut agent) = self.agent.take() else {
            return Ok(None);
        };
        let decision = self.step(&mut agent, turn, grid, status);
        self.agent = Some(agent);
        decision
    }

    fn step(
        &mut self,
        agent: &mut AgentState,
        turn: u32,
        grid: &Grid,
        status: &AgentStatus,
    ) -> Result<Option<Vec<Action>>, AgentError> {
        let previous = agent.state;
        let next = fsm::next_state(&TransitionInput {
            current: previous,
            threshold: agent.threshold(),
            inventory_size: status.inventory_size,
            at_home: agent.is_home(status.position),
            turn,
            late_game_turn: self.config.late_game_turn,
        });

        if next != previous {
            info!(
                "Turn {}: {:?} -> {:?} (inventory {}/{})",
                turn,
                previous,
                next,
                status.inventory_size,
                agent.threshold()
            );
        }
        if previous == FsmState::Selling && next == FsmState::Upgrading {
            self.finish_sell_trip(agent);
        }
        agent.state = next;

        match next {
            FsmState::Mining => self.mine(agent, grid, status),
            FsmState::Selling => {
                let policy = self.config.selling.clone();
                self.route_to(grid, status.position, agent.home, &policy)
            }
            FsmState::Upgrading => Ok(self.upgrade(agent, status)),
            FsmState::Start => Ok(None),
        }
    }

    fn finish_sell_trip(&self, agent: &mut AgentState) {
        agent.upgrade_cycles += 1;
        if let Some(bounds) = self.config.upgraded_bounds {
            debug!("Search bounds {} -> {}", agent.search_bounds, bounds);
            agent.search_bounds = bounds;
        }
        agent.heading_to_rally = self.config.rally_point.is_some();
    }

    fn mine(
        &mut self,
        agent: &mut AgentState,
        grid: &Grid,
        status: &AgentStatus,
    ) -> Result<Option<Vec<Action>>, AgentError> {
        let position = status.position;
        let policy = self.config.mining.clone();

        if let Some(actions) = self.head_to_rally(agent, grid, position, &policy)? {
            return Ok(Some(actions));
        }

        if grid.tile_at(&position)?.is_harvestable() {
            return Ok(Some(vec![Action::Mine]));
        }

        match locator::find_nearest_resource(
            grid,
            position,
            agent.search_bounds,
            self.config.max_radius,
        )? {
            Some(target) => self.route_to(grid, position, target, &policy),
            None => Ok(None),
        }
    }

    /// Route to the rally point while the flag is set. Clears the flag on
    /// arrival or when the point cannot be reached.
    fn head_to_rally(
        &mut self,
        agent: &mut AgentState,
        grid: &Grid,
        position: Position,
        policy: &StatePolicy,
    ) -> Result<Option<Vec<Action>>, AgentError> {
        if !agent.heading_to_rally {
            return Ok(None);
        }
        let Some(rally) = self.config.rally_point else {
            agent.heading_to_rally = false;
            return Ok(None);
        };
        if !grid.in_bounds(&rally) {
            warn!("Rally point {} is off the map, skipping it", rally);
            agent.heading_to_rally = false;
            return Ok(None);
        }

        match AStar::find_route(grid, position, rally, &policy.blocking_set())? {
            Route::Steps(actions) => Ok(Some(actions)),
            Route::Arrived => {
                debug!("Reached rally point {}", rally);
                agent.heading_to_rally = false;
                Ok(None)
            }
            Route::Unreachable => {
                warn!("Rally point {} is unreachable, mining instead", rally);
                agent.heading_to_rally = false;
                Ok(None)
            }
        }
    }

    fn route_to(
        &mut self,
        grid: &Grid,
        from: Position,
        goal: Position,
        policy: &StatePolicy,
    ) -> Result<Option<Vec<Action>>, AgentError> {
        let route = AStar::find_route(grid, from, goal, &policy.blocking_set())?;
        let actions = match route {
            Route::Unreachable => {
                let action = self.random_move();
                debug!("No path from {} to {}, moving {}", from, goal, action);
                vec![action]
            }
            route => route.into_actions().unwrap_or_default(),
        };
        Ok(Some(actions))
    }

    fn upgrade(&self, agent: &mut AgentState, status: &AgentStatus) -> Option<Vec<Action>> {
        agent.advance_threshold();

        let tech = Tech::PURCHASE_ORDER.into_iter().find(|tech| {
            !status.techs.is_researched(*tech)
                && status
                    .techs
                    .cost(*tech)
                    .is_some_and(|cost| cost <= status.science_points)
        });

        match tech {
            Some(tech) => {
                info!("Buying {} with {} science points", tech, status.science_points);
                Some(vec![Action::Buy(tech)])
            }
            None => {
                debug!("Nothing to buy with {} science points", status.science_points);
                None
            }
        }
    }

    fn random_move(&mut self) -> Action {
        Action::MOVES[self.rng.random_range(0..Action::MOVES.len())]
    }
}
