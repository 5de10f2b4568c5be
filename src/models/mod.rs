//! Data models for the tanda backend.
//!
//! Field names follow the two original store tables (`participantes`,
//! `calendario`); the wire format is camelCase JSON.

mod datastore;
mod participant;
mod summary;
mod turn;

pub use datastore::*;
pub use participant::*;
pub use summary::*;
pub use turn::*;
