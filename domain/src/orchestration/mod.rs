//! Group chat orchestration domain
//!
//! Pure rules the conversation driver applies each turn.

pub mod turn_order;

pub use turn_order::TurnOrder;
