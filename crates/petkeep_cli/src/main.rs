//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `petkeep_core` wiring without
//!   the Flutter/FFI runtime.
//! - Keep output deterministic for quick local sanity checks.

use petkeep_core::db::{open_db_in_memory, seed_demo_data};
use petkeep_core::{PetListQuery, PetService, SqlitePetRepository};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("petkeep_core ping={}", petkeep_core::ping());
    println!("petkeep_core version={}", petkeep_core::core_version());

    let conn = open_db_in_memory()?;
    seed_demo_data(&conn)?;

    let service = PetService::new(SqlitePetRepository::try_new(&conn)?);
    for pet in service.list_pets(&PetListQuery::default())? {
        println!(
            "pet name={} species={} age={} owner={}",
            pet.name,
            pet.species,
            pet.age,
            pet.owner_name.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
