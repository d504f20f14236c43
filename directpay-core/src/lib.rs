//! Direct Payments Core
//!
//! Core types and abstractions for the direct payments service.
//!
//! This crate contains:
//! - Domain types: Charges, balances, orders and the request context
//! - Settlement planning: the balance-to-order allocation rules
//! - DTOs: Data transfer objects shared by the server and its clients

pub mod domain;
pub mod dto;
