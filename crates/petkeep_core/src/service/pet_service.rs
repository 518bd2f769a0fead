//! Pet use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD + adoption entry points for core callers.
//! - Map the mobile add-flow field set onto the typed write shape.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::pet::{NewPet, PetId, PetRecord};
use crate::repo::pet_repo::{PetListQuery, PetRepository, RepoResult};

/// Use-case service wrapper for pet operations.
pub struct PetService<R: PetRepository> {
    repo: R,
}

impl<R: PetRepository> PetService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a pet from the mobile add-flow field set.
    ///
    /// # Contract
    /// - `owner_name` is only honored when `has_owner` is true; a blank
    ///   owner name with `has_owner` set is a validation failure.
    /// - Returns the created record with its resolved owner name.
    pub fn add_pet(
        &self,
        name: &str,
        age: i64,
        has_owner: bool,
        species: &str,
        owner_name: &str,
    ) -> RepoResult<PetRecord> {
        let new_pet = if has_owner {
            NewPet::with_owner(name, age, species, owner_name)
        } else {
            NewPet::new(name, age, species)
        };
        self.repo.create_pet(&new_pet)
    }

    /// Creates a pet through repository persistence.
    pub fn create_pet(&self, new_pet: &NewPet) -> RepoResult<PetRecord> {
        self.repo.create_pet(new_pet)
    }

    /// Gets one pet by stable ID.
    pub fn get_pet(&self, id: PetId) -> RepoResult<Option<PetRecord>> {
        self.repo.get_pet(id)
    }

    /// Finds one pet by exact name.
    pub fn find_pet_by_name(&self, name: &str) -> RepoResult<Option<PetRecord>> {
        self.repo.find_pet_by_name(name)
    }

    /// Lists pets using filter and pagination options.
    pub fn list_pets(&self, query: &PetListQuery) -> RepoResult<Vec<PetRecord>> {
        self.repo.list_pets(query)
    }

    /// Replaces a pet's name/age/species; the owner link is untouched.
    pub fn update_pet(
        &self,
        id: PetId,
        new_name: &str,
        new_age: i64,
        new_species: &str,
    ) -> RepoResult<PetRecord> {
        self.repo.update_pet_profile(id, new_name, new_age, new_species)
    }

    /// Deletes an unowned pet by ID.
    pub fn delete_pet(&self, id: PetId) -> RepoResult<()> {
        self.repo.delete_pet(id)
    }

    /// Reassigns a pet to the named owner, creating the owner when absent.
    pub fn adopt_pet(&self, id: PetId, new_owner_name: &str) -> RepoResult<PetRecord> {
        self.repo.adopt_pet(id, new_owner_name)
    }
}
