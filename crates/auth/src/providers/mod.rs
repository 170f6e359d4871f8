//! Identity provider implementations.
//!
//! This module contains implementations of `IdentityProvider` for:
//! - The hosted auth service (GoTrue-style REST API)
//! - A stateless mock provider (with `mock` feature)

mod hosted;
#[cfg(feature = "mock")]
mod mock;

pub use hosted::HostedProvider;
#[cfg(feature = "mock")]
pub use mock::MockProvider;
