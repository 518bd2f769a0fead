use petkeep_core::db::{open_db_in_memory, seed_demo_data};
use petkeep_core::{
    OwnerRepository, PetRepository, SqliteOwnerRepository, SqlitePetRepository,
};

#[test]
fn seed_creates_the_sample_records() {
    let conn = open_db_in_memory().unwrap();
    seed_demo_data(&conn).unwrap();

    let pets = SqlitePetRepository::try_new(&conn).unwrap();
    let owners = SqliteOwnerRepository::try_new(&conn).unwrap();

    let browny = pets.find_pet_by_name("Browny").unwrap().unwrap();
    assert_eq!(browny.age, 5);
    assert_eq!(browny.species, "Aspin");
    assert!(!browny.is_owned());

    let choco = pets.find_pet_by_name("Choco").unwrap().unwrap();
    assert_eq!(choco.owner_name.as_deref(), Some("Angelo"));

    let angelo = owners.find_owner_by_name("Angelo").unwrap().unwrap();
    assert_eq!(angelo.total_pets, 1);
    assert_eq!(angelo.adopted_count, 0);
}

#[test]
fn seed_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    seed_demo_data(&conn).unwrap();
    seed_demo_data(&conn).unwrap();

    let count_pets: i64 = conn
        .query_row("SELECT COUNT(*) FROM pets;", [], |row| row.get(0))
        .unwrap();
    let count_owners: i64 = conn
        .query_row("SELECT COUNT(*) FROM owners;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count_pets, 2);
    assert_eq!(count_owners, 1);
}

#[test]
fn seeded_store_supports_the_full_adoption_flow() {
    let conn = open_db_in_memory().unwrap();
    seed_demo_data(&conn).unwrap();

    let pets = SqlitePetRepository::try_new(&conn).unwrap();
    let browny = pets.find_pet_by_name("Browny").unwrap().unwrap();

    let adopted = pets.adopt_pet(browny.uuid, "Angelo").unwrap();
    assert_eq!(adopted.owner_name.as_deref(), Some("Angelo"));

    let owners = SqliteOwnerRepository::try_new(&conn).unwrap();
    let angelo = owners.find_owner_by_name("Angelo").unwrap().unwrap();
    assert_eq!(angelo.total_pets, 2);
    assert_eq!(angelo.adopted_count, 1);
}
