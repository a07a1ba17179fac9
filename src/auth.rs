//! Credentials, decoded token claims, and the roles they carry.

pub mod claims;
pub mod credential;
pub mod role;

pub use claims::*;
pub use credential::*;
pub use role::*;
