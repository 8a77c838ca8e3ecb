//! Sentra Core — domain models, repository traits, and shared error
//! types for the account/authentication service.

pub mod error;
pub mod models;
pub mod repository;
pub mod ttl;

pub use error::{CoreError, CoreResult};
