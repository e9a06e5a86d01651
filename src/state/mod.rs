//! State module for tracking search progress
//!
//! `RunState` is the lifecycle of one search run:
//! Idle → Running → {Completed, Failed, Cancelled}.

mod run_state;

pub use run_state::RunState;
