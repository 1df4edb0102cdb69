//! In-memory backend for cachet powered by [Moka](https://docs.rs/moka).
//!
//! ```
//! use cachet_moka::MokaBackend;
//!
//! let backend = MokaBackend::builder().max_entries(10_000).build();
//! ```
//!
//! Entries honor the expiry passed with each write. Data is neither persisted
//! nor shared between processes; use `cachet-redis` for that.
#![warn(missing_docs)]

mod backend;
mod builder;

pub use backend::MokaBackend;
pub use builder::{EntryCapacity, MokaBackendBuilder, NoCapacity};
