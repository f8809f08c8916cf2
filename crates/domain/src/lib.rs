//! Domain layer for WaBridge
//!
//! Contains the addressing rules, message envelopes and inbound-event
//! translation that the bridge is built around. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
