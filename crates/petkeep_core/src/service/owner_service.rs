//! Owner use-case service.
//!
//! # Responsibility
//! - Provide owner list/rename/delete entry points for core callers.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.

use crate::model::owner::{OwnerId, OwnerRecord};
use crate::model::pet::PetRecord;
use crate::repo::owner_repo::OwnerRepository;
use crate::repo::pet_repo::RepoResult;

/// Use-case service wrapper for owner operations.
pub struct OwnerService<R: OwnerRepository> {
    repo: R,
}

impl<R: OwnerRepository> OwnerService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Gets one owner by stable ID.
    pub fn get_owner(&self, id: OwnerId) -> RepoResult<Option<OwnerRecord>> {
        self.repo.get_owner(id)
    }

    /// Finds one owner by exact name.
    pub fn find_owner_by_name(&self, name: &str) -> RepoResult<Option<OwnerRecord>> {
        self.repo.find_owner_by_name(name)
    }

    /// Lists all owners with derived pet totals.
    pub fn list_owners(&self) -> RepoResult<Vec<OwnerRecord>> {
        self.repo.list_owners()
    }

    /// Lists the pets currently referencing one owner.
    pub fn list_owner_pets(&self, id: OwnerId) -> RepoResult<Vec<PetRecord>> {
        self.repo.list_owner_pets(id)
    }

    /// Renames an owner; pets resolve the new name on their next read.
    pub fn rename_owner(&self, id: OwnerId, new_name: &str) -> RepoResult<OwnerRecord> {
        self.repo.rename_owner(id, new_name)
    }

    /// Deletes an owner with zero pets by ID.
    pub fn delete_owner(&self, id: OwnerId) -> RepoResult<()> {
        self.repo.delete_owner(id)
    }
}
