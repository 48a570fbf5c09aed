//! dotsync - keep local secrets in sync with a team vault.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── configure     # Save vault credentials
//! │   ├── init          # Write .dotsync.toml
//! │   ├── pull / push   # Sync secrets in either direction
//! │   ├── team          # Group membership
//! │   ├── migrate       # Share a folder with a team
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── config        # .dotsync.toml and credentials
//!     ├── domain/       # Secrets, env lines, vault objects, plans
//!     ├── env           # Line-preserving .env merge
//!     ├── store/        # Local stores (env file, dotnet user-secrets)
//!     ├── vault/        # Vault client and backends (http, local)
//!     ├── retrieve      # Concurrent resource fetch
//!     └── reconcile     # Push planning and execution
//! ```
//!
//! # Flow
//!
//! - pull: resolve folder, fetch every resource concurrently, merge locally
//! - push: read the local store, plan create/update per key, apply

pub mod cli;
pub mod core;
pub mod error;
