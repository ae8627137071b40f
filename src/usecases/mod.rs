//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the bot's workflow.
//!
//! Use cases:
//! - `Sequencer`: approve → swap → approve → deposit, each step
//!   confirmed on-chain before the next is submitted

pub mod sequencer;

pub use sequencer::Sequencer;
