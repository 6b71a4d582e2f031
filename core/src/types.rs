//! Domain DTOs for the item API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently
//! so the FFI surface never couples to Axum internals. Integration tests
//! catch any schema drift between the two crates.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Server-assigned item identifier.
pub type ItemId = i64;

/// A single item returned by the API. Two items are the same entity iff
/// their ids match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request payload for creating a new item. The server assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
        }
    }

    /// Reject drafts the server would refuse. Only the name is checked.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::InvalidDraft("name must not be empty".to_string()));
        }
        Ok(())
    }
}
