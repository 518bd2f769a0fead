//! Core domain logic for PetKeep.
//! This crate is the single source of truth for pet/owner business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::owner::{OwnerId, OwnerRecord, OwnerValidationError};
pub use model::pet::{NewPet, PetId, PetRecord, PetValidationError};
pub use repo::owner_repo::{OwnerRepository, SqliteOwnerRepository};
pub use repo::pet_repo::{
    PetListQuery, PetRepository, RepoError, RepoResult, SqlitePetRepository,
};
pub use service::owner_service::OwnerService;
pub use service::pet_service::PetService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
