//! Data Transfer Objects
//!
//! Request and response bodies exchanged between the server and its clients.

pub mod charge;
pub mod order;

use serde::{Deserialize, Serialize};

/// JSON body of every message and error response: `{"msg": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub msg: String,
}

impl Message {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}
