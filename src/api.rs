//! Typed clients for the four console backends, each a thin layer over a
//! [`ResourceClient`](crate::dispatch::ResourceClient).

pub mod animal;
pub mod auth;
pub mod exemplar;
pub mod user;

pub use animal::*;
pub use auth::*;
pub use exemplar::*;
pub use user::*;

/// Numeric identifier used by every backend.
pub type Id = i64;
