//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for pets and owners.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes validate domain fields before persistence.
//! - Repository APIs return semantic errors (`PetNotFound`,
//!   `DuplicatePetName`, ...) in addition to DB transport errors.

pub mod owner_repo;
pub mod pet_repo;
