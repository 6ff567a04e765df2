use std::io::{self, Write};

use tracing::info;

use crate::infra::{GameObserver, LocalWorld};
use crate::state::{Action, FsmState, Tech, TechCatalog};

/// Logs every turn; optionally dumps the board every `map_every` turns.
pub struct DefaultObserver {
    map_every: Option<u32>,
}

impl DefaultObserver {
    pub fn new(map_every: Option<u32>) -> Self {
        Self { map_every }
    }
}

impl Default for DefaultObserver {
    fn default() -> Self {
        Self::new(None)
    }
}

impl GameObserver for DefaultObserver {
    fn on_game_start(&mut self, world: &LocalWorld, seed: u64) {
        let grid = world.grid();
        info!("Game started");
        info!("- seed: {}", seed);
        info!("- map size: {}x{}", grid.width, grid.height);
        info!("- ore nodes with items: {}", grid.count_harvestable());
    }

    fn on_state_update(&mut self, turn: u32, world: &LocalWorld) {
        info!(
            "turn: {}, pos: {}, inventory: {}, science: {}",
            turn,
            world.position(),
            world.inventory(),
            world.science_points()
        );

        if self.map_every.is_some_and(|every| every > 0 && turn % every == 0) {
            let map = world.grid().draw_ascii_map(Some(world.position()));
            let _ = writeln!(io::stdout(), "{}", map);
        }
    }

    fn on_actions_selected(&mut self, turn: u32, state: FsmState, actions: &[Action]) {
        let names: Vec<String> = actions.iter().map(|action| action.to_string()).collect();
        info!("turn {} [{:?}] actions: {}", turn, state, names.join(", "));
    }

    fn on_game_finished(&mut self, final_turn: u32, world: &LocalWorld) {
        info!("Game finished after {} turns", final_turn);
        info!("Final score: {}", world.score());
        let researched: Vec<String> = Tech::PURCHASE_ORDER
            .iter()
            .filter(|tech| world.techs().is_researched(**tech))
            .map(|tech| tech.to_string())
            .collect();
        info!("Researched: {}", researched.join(", "));
    }
}
