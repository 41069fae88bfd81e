#![forbid(unsafe_code)]
//! baton-core library.
//!
//! Derives the currently active assignee(s) for a task's present stage from
//! append-only signal history. Nothing here holds cross-call state: every
//! resolution replays the relevant history fresh and discards it.
//!
//! # Conventions
//!
//! - **Errors**: `anyhow::Result` at collaborator seams; typed errors for
//!   parsing (`UnknownActionType`).
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `error!`, `debug!`).

pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod resolve;
pub mod signal;
pub mod source;
