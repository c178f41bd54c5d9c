//! REST API handlers and shared response types

pub mod auth;
pub mod health;
pub mod member;
pub mod stats;

use serde::{Deserialize, Serialize};

/// Plain `{"message": ...}` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
