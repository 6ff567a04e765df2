use crate::infra::LocalWorld;
use crate::state::{Action, FsmState};

/// Trait for observing game events during execution
pub trait GameObserver {
    /// Called once before the first turn
    fn on_game_start(&mut self, world: &LocalWorld, seed: u64);

    /// Called at the start of every turn, before the agent decides
    fn on_state_update(&mut self, turn: u32, world: &LocalWorld);

    /// Called when the agent has chosen its actions for the turn
    fn on_actions_selected(&mut self, turn: u32, state: FsmState, actions: &[Action]);

    /// Called after the world executed the actions
    fn on_actions_applied(&mut self, _turn: u32, _executed: usize, _world: &LocalWorld) {
        // Default implementation does nothing
    }

    /// Called when the last turn has been played
    fn on_game_finished(&mut self, final_turn: u32, world: &LocalWorld);
}
