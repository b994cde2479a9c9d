//! web_service - the web shell
//!
//! Thin JSON surface over the session manager and the task list
//! synchronizer. The browser frontend owns rendering; this crate owns the
//! mirrored state and the remote calls.

pub mod controllers;
pub mod dto;
pub mod error;
pub mod server;
