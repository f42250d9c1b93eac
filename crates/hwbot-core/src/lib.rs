// # hwbot-core
//
// Core library for the homework review status bot.
//
// ## Architecture Overview
//
// This library provides the core functionality for review status notifications:
// - **HomeworkSource**: Trait for fetching the raw homework status payload
// - **Notifier**: Trait for relaying a text message to the configured chat
// - **check_response**: Validates the payload shape and extracts the latest homework
// - **StatusTracker**: In-memory map of the last seen verdict per homework
// - **PollEngine**: Core engine that orchestrates the fetch → track → notify cycle
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from the HTTP adapters
// 2. **Tagged Outcomes**: "no change" and "empty list" are values, not errors
// 3. **Library-First**: All core functionality can be used as a library
// 4. **Owned State**: The tracker lives inside the engine, never in a global

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;
pub mod homework;
pub mod response;
pub mod tracker;

// Re-export core types for convenience
pub use traits::{HomeworkSource, Notifier};
pub use engine::{EngineEvent, PollEngine, PollOutcome};
pub use config::{BotConfig, Credentials, CursorPolicy};
pub use error::{Error, Result};
pub use homework::{HomeworkRecord, StatusChange, Verdict};
pub use response::{Homeworks, check_response};
pub use tracker::{StatusTracker, Tracked};
