//! task_core - Core types shared by the task manager client crates
//!
//! This crate provides the foundational types used across both shells:
//! - `identity` - Identity and Session returned by the remote auth service
//! - `task` - the Task record mirrored from the remote `tasks` collection
//! - `config` - layered configuration (file with env overrides)
//! - `paths` - application data directory resolution

pub mod config;
pub mod identity;
pub mod paths;
pub mod task;

// Re-export commonly used types
pub use config::Config;
pub use identity::{Identity, Session};
pub use task::Task;
