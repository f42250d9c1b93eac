//! Core traits for the homework bot
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`HomeworkSource`]: Fetch the raw homework status payload
//! - [`Notifier`]: Deliver a text message to the configured chat

pub mod homework_source;
pub mod notifier;

pub use homework_source::HomeworkSource;
pub use notifier::Notifier;
