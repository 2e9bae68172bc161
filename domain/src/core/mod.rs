//! Core domain concepts shared across all subdomains.
//!
//! - [`participant::ParticipantId`]: name of an agent in a group chat
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod participant;
pub mod string;
