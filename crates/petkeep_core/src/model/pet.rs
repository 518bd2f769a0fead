//! Pet domain model and write-path validation.
//!
//! # Responsibility
//! - Define the pet write shape (`NewPet`) and read model (`PetRecord`).
//! - Validate pet fields before any persistence runs.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another pet.
//! - A pet name is non-empty and contains no digits.
//! - `age` is at least 1.
//! - The owner link is a stable `OwnerId`; "unowned" is `None`, never a
//!   sentinel string.

use crate::model::owner::OwnerId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static NAME_DIGIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]").expect("valid digit regex"));

/// Stable identifier for a pet record.
pub type PetId = Uuid;

/// Field-level validation failure for pet write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PetValidationError {
    /// Name is empty or whitespace-only.
    BlankName,
    /// Name contains at least one digit.
    NameContainsDigits(String),
    /// Age is below 1.
    NonPositiveAge(i64),
    /// An owner link was requested with a blank owner name.
    BlankOwnerName,
}

impl Display for PetValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "pet name cannot be blank"),
            Self::NameContainsDigits(name) => {
                write!(f, "pet name `{name}` must not contain digits")
            }
            Self::NonPositiveAge(age) => write!(f, "pet age must be positive, got {age}"),
            Self::BlankOwnerName => write!(f, "owner name cannot be blank"),
        }
    }
}

impl Error for PetValidationError {}

/// Write shape for creating a pet.
///
/// `owner_name` is the add-flow contract inherited from the mobile UI: the
/// repository resolves it to an existing owner or creates one, inside the
/// same transaction as the pet insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPet {
    pub name: String,
    pub age: i64,
    pub species: String,
    pub owner_name: Option<String>,
}

impl NewPet {
    /// Builds an unowned pet draft.
    pub fn new(name: impl Into<String>, age: i64, species: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age,
            species: species.into(),
            owner_name: None,
        }
    }

    /// Builds a pet draft already linked to an owner name.
    pub fn with_owner(
        name: impl Into<String>,
        age: i64,
        species: impl Into<String>,
        owner_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            age,
            species: species.into(),
            owner_name: Some(owner_name.into()),
        }
    }

    /// Checks every field rule; must pass before any SQL runs.
    pub fn validate(&self) -> Result<(), PetValidationError> {
        validate_pet_name(&self.name)?;
        validate_pet_age(self.age)?;
        if let Some(owner_name) = &self.owner_name {
            if owner_name.trim().is_empty() {
                return Err(PetValidationError::BlankOwnerName);
            }
        }
        Ok(())
    }
}

/// Read model for pet list/detail use-cases.
///
/// `owner_name` is resolved from the owners table at read time; it is not
/// stored on the pet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetRecord {
    /// Stable pet id.
    pub uuid: PetId,
    pub name: String,
    pub age: i64,
    /// Free-form category label ("Aspin", "Persian cat", ...).
    pub species: String,
    /// Stable owner id, `None` when unowned.
    pub owner: Option<OwnerId>,
    /// Owner display name resolved at read time.
    pub owner_name: Option<String>,
    /// Update timestamp in epoch milliseconds.
    pub updated_at: i64,
}

impl PetRecord {
    /// Returns whether this pet currently references an owner.
    pub fn is_owned(&self) -> bool {
        self.owner.is_some()
    }
}

/// Validates the pet naming rule: non-blank, no digits.
pub fn validate_pet_name(name: &str) -> Result<(), PetValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(PetValidationError::BlankName);
    }
    if NAME_DIGIT_RE.is_match(trimmed) {
        return Err(PetValidationError::NameContainsDigits(trimmed.to_string()));
    }
    Ok(())
}

/// Validates the pet age rule: a positive integer.
pub fn validate_pet_age(age: i64) -> Result<(), PetValidationError> {
    if age < 1 {
        return Err(PetValidationError::NonPositiveAge(age));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_pet_age, validate_pet_name, NewPet, PetRecord, PetValidationError};
    use uuid::Uuid;

    #[test]
    fn blank_name_is_rejected() {
        assert_eq!(validate_pet_name("   "), Err(PetValidationError::BlankName));
    }

    #[test]
    fn digit_in_name_is_rejected() {
        let err = validate_pet_name("Rex2").unwrap_err();
        assert!(matches!(err, PetValidationError::NameContainsDigits(_)));
    }

    #[test]
    fn name_with_letters_only_passes() {
        assert!(validate_pet_name("Browny").is_ok());
        assert!(validate_pet_name("  Mr. Whiskers ").is_ok());
    }

    #[test]
    fn non_positive_age_is_rejected() {
        assert_eq!(validate_pet_age(0), Err(PetValidationError::NonPositiveAge(0)));
        assert_eq!(
            validate_pet_age(-3),
            Err(PetValidationError::NonPositiveAge(-3))
        );
        assert!(validate_pet_age(1).is_ok());
    }

    #[test]
    fn draft_with_blank_owner_name_is_rejected() {
        let draft = NewPet::with_owner("Browny", 5, "Aspin", "  ");
        assert_eq!(draft.validate(), Err(PetValidationError::BlankOwnerName));
    }

    #[test]
    fn unowned_draft_validates() {
        assert!(NewPet::new("Browny", 5, "Aspin").validate().is_ok());
    }

    #[test]
    fn record_serializes_with_snake_case_fields() {
        let record = PetRecord {
            uuid: Uuid::nil(),
            name: "Browny".to_string(),
            age: 5,
            species: "Aspin".to_string(),
            owner: None,
            owner_name: None,
            updated_at: 0,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "Browny");
        assert_eq!(json["owner_name"], serde_json::Value::Null);
        assert!(json.get("updated_at").is_some());
    }
}
