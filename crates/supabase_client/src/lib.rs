//! supabase_client - boundary adapter for the hosted backend
//!
//! Everything the shells know about the remote service goes through
//! [`SupabaseClientTrait`]; the raw wire shapes never leave this crate.

pub mod api;
pub mod client_trait;
pub mod error;
pub mod events;

pub use api::client::SupabaseClient;
pub use client_trait::SupabaseClientTrait;
pub use error::{AuthErrorKind, Result, SupabaseError};
pub use events::{AuthChangeEvent, AuthStateChange};
