//! Core domain types
//!
//! This module contains the core domain structures used across the direct
//! payments services. The server persists them, the client and CLI read them.

pub mod balance;
pub mod charge;
pub mod context;
pub mod order;
pub mod settlement;
