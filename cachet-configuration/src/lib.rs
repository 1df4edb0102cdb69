//! Declarative configuration for the cachet response cache.
//!
//! A YAML document describes the engine settings and the storage backend:
//!
//! ```yaml
//! default_expiry: 1h
//! backend:
//!   type: Moka
//!   max_entries: 10000
//! ```
//!
//! [`CacheConfig::into_parts`] turns it into a backend and
//! [`cachet::Settings`] ready for `cachet_tower::Cache::builder()`.
//!
//! # Feature flags
//!
//! | Feature | Backend |
//! |---------|---------|
//! | `moka` | `type: Moka` |
//! | `redis` | `type: Redis` |
//!
//! Selecting a backend whose feature is disabled fails with
//! [`ConfigError::BackendNotAvailable`].

pub mod backend;
mod config;
pub mod error;

pub use backend::Backend;
pub use config::CacheConfig;
pub use error::ConfigError;
