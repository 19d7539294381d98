//! Directory watching: discovery of new files, size-settling detection, and
//! the thread/channel wiring that connects the two.

pub mod discover;
pub mod pipeline;
pub mod settle;

pub use discover::Tracker;
pub use pipeline::{Pipeline, SettleOutcome};
pub use settle::wait_for_settled;
