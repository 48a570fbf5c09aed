//! Core library components.
//!
//! Everything that does not touch the terminal: the domain model, the env
//! merge, local stores, the vault client, retrieval and reconciliation.

pub mod config;
pub mod constants;
pub mod domain;
pub mod env;
pub mod gpg;
pub mod reconcile;
pub mod retrieve;
pub mod store;
pub mod types;
pub mod vault;
