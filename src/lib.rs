//! hearth - Household Coordination Library
//!
//! This library provides the core functionality for the hearth CLI tool,
//! a coordination hub for the members of one household.
//!
//! # Core Concepts
//!
//! - **Task board**: per-viewer merge of owned tasks and shared tasks,
//!   with owner-only mutation and claim/unassign assignment rules
//! - **Clarity hub**: blame-free observation/question messages that resolve
//!   into immutable agreements
//! - **Profiles**: per-member profiles with a practical-skills list
//! - **Categories**: one shared, normalized label set for the household
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `hearth.toml`
//! - `error`: Error types and result aliases
//! - `hub`: Hub discovery and initialization
//! - `store`: Document-store abstraction and the JSON file store
//! - `identity`: Viewer identity, sessions, and change notifications
//! - `merge`: The owned/shared task board merge
//! - `task`, `clarity`, `profile`, `category`, `feedback`, `creative`:
//!   the feature repositories
//! - `state`: Client-local application state and action outcomes
//! - `events`: JSONL event output for integrations
//! - `lock`: File locking and atomic operations for concurrency safety

pub mod category;
pub mod clarity;
pub mod cli;
pub mod config;
pub mod creative;
pub mod error;
pub mod events;
pub mod feedback;
pub mod hub;
pub mod identity;
pub mod lock;
pub mod merge;
pub mod output;
pub mod profile;
pub mod state;
pub mod store;
pub mod task;

pub use error::{Error, Result};
