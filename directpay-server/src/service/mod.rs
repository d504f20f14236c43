//! Service Module
//!
//! Business logic layer for the direct payments server.
//! Services orchestrate between repositories and contain domain logic.

pub mod charge;
pub mod order;

// Re-export for convenience
pub use charge as charge_service;
pub use order as order_service;
