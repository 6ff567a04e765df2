use std::time::Instant;

use tracing::warn;

use crate::infra::{GameObserver, LocalWorld};
use crate::planners::DecisionEngine;

/// Final numbers of a local run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub turns: u32,
    pub score: u32,
    pub science_points: u32,
    pub upgrade_cycles: u32,
}

/// Drives one agent against a [`LocalWorld`], one decision per turn.
pub struct Game {
    world: LocalWorld,
    engine: DecisionEngine,
    observer: Box<dyn GameObserver>,
}

impl Game {
    pub fn new(
        world: LocalWorld,
        engine: DecisionEngine,
        observer: impl GameObserver + 'static,
    ) -> Self {
        Self {
            world,
            engine,
            observer: Box::new(observer),
        }
    }

    pub fn world(&self) -> &LocalWorld {
        &self.world
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    pub fn run(&mut self, turns: u32, seed: u64) -> GameSummary {
        self.observer.on_game_start(&self.world, seed);

        for turn in 1..=turns {
            let turn_start = Instant::now();
            self.observer.on_state_update(turn, &self.world);

            let actions = self
                .engine
                .take_turn(turn, self.world.grid(), &self.world.status());
            self.observer
                .on_actions_selected(turn, self.engine.state(), &actions);

            let executed = self.world.apply(&actions);
            self.observer
                .on_actions_applied(turn, executed, &self.world);
            self.world.end_turn();

            let turn_duration = turn_start.elapsed();
            if turn_duration.as_millis() > 100 {
                warn!(
                    "Turn {} took {:.2}ms",
                    turn,
                    turn_duration.as_secs_f64() * 1000.0
                );
            }
        }

        self.observer.on_game_finished(turns, &self.world);

        GameSummary {
            turns,
            score: self.world.score(),
            science_points: self.world.science_points(),
            upgrade_cycles: self
                .engine
                .agent()
                .map_or(0, |agent| agent.upgrade_cycles),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentConfig;
    use crate::infra::DefaultObserver;
    use crate::state::{Company, Grid};

    #[test]
    fn test_agent_mines_and_sells_end_to_end() {
        let grid = Grid::from_rows(&[
            "C...o", //
            ".....",
            "o...o",
        ])
        .unwrap();
        let world = LocalWorld::from_grid(grid, Company::Church, 11).unwrap();
        let engine = DecisionEngine::new(AgentConfig {
            thresholds: vec![2],
            seed: Some(11),
            ..AgentConfig::default()
        });

        let mut game = Game::new(world, engine, DefaultObserver::default());
        let summary = game.run(60, 11);

        assert!(summary.score >= 3, "score was {}", summary.score);
        assert!(summary.upgrade_cycles >= 1);
    }

    #[test]
    fn test_generated_world_never_stalls() {
        let world = LocalWorld::generate(14, 14, Company::Turing, 5).unwrap();
        let engine = DecisionEngine::new(AgentConfig {
            seed: Some(5),
            ..AgentConfig::default()
        });

        let mut game = Game::new(world, engine, DefaultObserver::default());
        let summary = game.run(100, 5);
        assert_eq!(summary.turns, 100);
        assert!(game.world().grid().in_bounds(&game.world().position()));
    }
}
