//! Mock identity provider for local development.
//!
//! Stands in for the hosted provider's social login page. Whatever the
//! developer types in becomes the identity behind the issued code.

mod server;
mod templates;

pub use server::MockIdpServer;
