//! List screen lifecycle.

mod state_machine;

pub use state_machine::{ListEvent, ListPhase, ListStateMachine};
