mod engine;
pub mod emitter;
pub mod fsm;
pub mod locator;

pub use emitter::{ActionEmitter, ActionList};
pub use engine::DecisionEngine;
pub use fsm::{TransitionInput, next_state};
pub use locator::{find_nearest_resource, ring_offsets};
