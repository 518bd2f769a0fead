//! Owner domain model.
//!
//! # Responsibility
//! - Define the owner read model and owner-name validation.
//!
//! # Invariants
//! - Owner names are non-blank and unique among owners.
//! - `total_pets` is derived from pet rows at read time and never stored.
//! - `adopted_count` counts cumulative adoption events and is stored.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for an owner record.
pub type OwnerId = Uuid;

/// Field-level validation failure for owner write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerValidationError {
    /// Name is empty or whitespace-only.
    BlankName,
}

impl Display for OwnerValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "owner name cannot be blank"),
        }
    }
}

impl Error for OwnerValidationError {}

/// Read model for owner list/detail use-cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRecord {
    /// Stable owner id.
    pub uuid: OwnerId,
    pub name: String,
    /// Count of pet rows referencing this owner, computed per read.
    pub total_pets: i64,
    /// Cumulative adoption events credited to this owner.
    pub adopted_count: i64,
    /// Update timestamp in epoch milliseconds.
    pub updated_at: i64,
}

/// Validates the owner naming rule: non-blank.
pub fn validate_owner_name(name: &str) -> Result<(), OwnerValidationError> {
    if name.trim().is_empty() {
        return Err(OwnerValidationError::BlankName);
    }
    Ok(())
}
