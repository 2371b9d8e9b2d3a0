//! Integration test common infrastructure.
//!
//! Provides a bot harness with a fixed clock, a recording handler, and the
//! sample command set used across the dispatch tests.

pub mod bot;

#[allow(unused_imports)]
pub use bot::{RecordingHandler, TestBot, at, sample_registry, sender_with};
