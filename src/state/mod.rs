//! State module for tracking collection progress
//!
//! `RunState` is the state machine a collection run walks through, from
//! composing the first URL to the terminal `Done` or `Aborted` state.

mod run_state;

pub use run_state::RunState;
