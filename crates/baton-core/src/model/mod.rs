//! Core entities: actor identity and the normalized assignment candidate.

pub mod actor;
pub mod candidate;
