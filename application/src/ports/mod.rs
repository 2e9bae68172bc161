//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation
//! adapters must implement.

pub mod conversation_logger;
pub mod llm_gateway;
pub mod participant;
pub mod progress;
pub mod stream;
