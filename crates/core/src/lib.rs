//! Functional core for launchkit.
//!
//! Everything in this crate is pure: types, trait seams for the external
//! collaborators (identity provider, user directory) and decision functions.
//! The I/O lives in `launchkit_auth` and the `launchkit` binary.

pub mod auth;
pub mod guard;
pub mod storage;
pub mod users;
