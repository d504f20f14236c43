//! Repository Module
//!
//! Data access layer for the direct payments server.
//! Each repository handles database operations for a specific domain entity.

pub mod balance;
pub mod charge;
pub mod comment;
pub mod order;
pub mod user;

// Re-export for convenience
pub use balance as balance_repository;
pub use charge as charge_repository;
pub use comment as comment_repository;
pub use order as order_repository;
pub use user as user_repository;
