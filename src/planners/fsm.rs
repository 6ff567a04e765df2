use crate::state::FsmState;

/// Everything a state transition is allowed to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionInput {
    pub current: FsmState,
    pub threshold: usize,
    pub inventory_size: usize,
    pub at_home: bool,
    pub turn: u32,
    pub late_game_turn: Option<u32>,
}

/// State for this turn. Rules apply in order, first match wins:
///
/// 1. late game (turn at or past `late_game_turn`) forces `Selling`
/// 2. inventory above the current threshold forces `Selling`
/// 3. `Selling` at the home station becomes `Upgrading`
/// 4. `Upgrading` lasts one turn and becomes `Mining`
/// 5. `Start` becomes `Mining`, anything else is kept
pub fn next_state(input: &TransitionInput) -> FsmState {
    if input.late_game_turn.is_some_and(|turn| input.turn >= turn) {
        return FsmState::Selling;
    }
    if input.inventory_size > input.threshold {
        return FsmState::Selling;
    }
    match input.current {
        FsmState::Selling if input.at_home => FsmState::Upgrading,
        FsmState::Upgrading | FsmState::Start => FsmState::Mining,
        state => state,
    }
}
