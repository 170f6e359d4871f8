//! User directory backends.
//!
//! Concrete implementations of `launchkit_core::storage::UserRepository`,
//! selected at compile time via feature flags:
//!
//! - `inmemory` (default): HashMap, lost on restart
//! - `sqlite`: local SQLite file via `rusqlite` and `tokio-rusqlite`
//! - `hosted`: PostgREST-style REST database via `reqwest`
//!
//! Build with SQLite:
//! ```bash
//! cargo build -p launchkit --no-default-features --features sqlite
//! ```

#[cfg(any(feature = "inmemory", test))]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "hosted")]
pub mod hosted;

#[cfg(any(feature = "inmemory", test))]
pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;

#[cfg(feature = "hosted")]
pub use hosted::HostedRepository;
