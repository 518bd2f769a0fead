use petkeep_core::db::open_db_in_memory;
use petkeep_core::{
    NewPet, OwnerRepository, OwnerService, OwnerValidationError, PetRepository, RepoError,
    SqliteOwnerRepository, SqlitePetRepository,
};
use uuid::Uuid;

#[test]
fn adding_pet_with_new_owner_creates_owner_with_total_one() {
    let conn = open_db_in_memory().unwrap();
    let pets = SqlitePetRepository::try_new(&conn).unwrap();
    let owners = SqliteOwnerRepository::try_new(&conn).unwrap();

    pets.create_pet(&NewPet::with_owner("Choco", 5, "Aspin", "Angelo"))
        .unwrap();

    let angelo = owners.find_owner_by_name("Angelo").unwrap().unwrap();
    assert_eq!(angelo.total_pets, 1);
    assert_eq!(angelo.adopted_count, 0);
}

#[test]
fn adding_second_pet_reuses_owner_and_derives_total() {
    let conn = open_db_in_memory().unwrap();
    let pets = SqlitePetRepository::try_new(&conn).unwrap();
    let owners = SqliteOwnerRepository::try_new(&conn).unwrap();

    pets.create_pet(&NewPet::with_owner("Choco", 5, "Aspin", "Angelo"))
        .unwrap();
    pets.create_pet(&NewPet::with_owner("Mocha", 3, "Corgi", "Angelo"))
        .unwrap();

    let listed = owners.list_owners().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Angelo");
    assert_eq!(listed[0].total_pets, 2);
}

#[test]
fn rename_owner_cascades_to_resolved_pet_owner_names() {
    let conn = open_db_in_memory().unwrap();
    let pets = SqlitePetRepository::try_new(&conn).unwrap();
    let owners = SqliteOwnerRepository::try_new(&conn).unwrap();

    let choco = pets
        .create_pet(&NewPet::with_owner("Choco", 5, "Aspin", "Angelo"))
        .unwrap();
    let mocha = pets
        .create_pet(&NewPet::with_owner("Mocha", 3, "Corgi", "Angelo"))
        .unwrap();
    let angelo = choco.owner.unwrap();

    let renamed = owners.rename_owner(angelo, "Angela").unwrap();
    assert_eq!(renamed.name, "Angela");

    for id in [choco.uuid, mocha.uuid] {
        let record = pets.get_pet(id).unwrap().unwrap();
        assert_eq!(record.owner_name.as_deref(), Some("Angela"));
    }
    assert!(owners.find_owner_by_name("Angelo").unwrap().is_none());
}

#[test]
fn rename_onto_existing_owner_name_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    let pets = SqlitePetRepository::try_new(&conn).unwrap();
    let owners = SqliteOwnerRepository::try_new(&conn).unwrap();

    let choco = pets
        .create_pet(&NewPet::with_owner("Choco", 5, "Aspin", "Angelo"))
        .unwrap();
    pets.create_pet(&NewPet::with_owner("Mocha", 3, "Corgi", "Bea"))
        .unwrap();

    let err = owners
        .rename_owner(choco.owner.unwrap(), "Bea")
        .unwrap_err();
    assert!(matches!(err, RepoError::DuplicateOwnerName(name) if name == "Bea"));

    // Renaming an owner onto their current name stays allowed.
    let kept = owners.rename_owner(choco.owner.unwrap(), "Angelo").unwrap();
    assert_eq!(kept.name, "Angelo");
}

#[test]
fn rename_rejects_blank_names_and_missing_ids() {
    let conn = open_db_in_memory().unwrap();
    let owners = SqliteOwnerRepository::try_new(&conn).unwrap();

    let missing = Uuid::new_v4();
    let blank = owners.rename_owner(missing, "  ").unwrap_err();
    assert!(matches!(
        blank,
        RepoError::OwnerValidation(OwnerValidationError::BlankName)
    ));

    let not_found = owners.rename_owner(missing, "Angelo").unwrap_err();
    assert!(matches!(not_found, RepoError::OwnerNotFound(id) if id == missing));
}

#[test]
fn delete_owner_with_pets_is_refused() {
    let conn = open_db_in_memory().unwrap();
    let pets = SqlitePetRepository::try_new(&conn).unwrap();
    let owners = SqliteOwnerRepository::try_new(&conn).unwrap();

    let choco = pets
        .create_pet(&NewPet::with_owner("Choco", 5, "Aspin", "Angelo"))
        .unwrap();
    let angelo = choco.owner.unwrap();

    let err = owners.delete_owner(angelo).unwrap_err();
    assert!(matches!(
        err,
        RepoError::OwnerHasPets { ref owner, pet_count: 1 } if owner == "Angelo"
    ));

    assert!(owners.get_owner(angelo).unwrap().is_some());
}

#[test]
fn delete_owner_with_zero_pets_removes_the_record() {
    let conn = open_db_in_memory().unwrap();
    let pets = SqlitePetRepository::try_new(&conn).unwrap();
    let owners = SqliteOwnerRepository::try_new(&conn).unwrap();

    let choco = pets
        .create_pet(&NewPet::with_owner("Choco", 5, "Aspin", "Angelo"))
        .unwrap();
    let angelo = choco.owner.unwrap();

    // Free the owner by moving their only pet elsewhere.
    pets.adopt_pet(choco.uuid, "Bea").unwrap();

    owners.delete_owner(angelo).unwrap();
    assert!(owners.get_owner(angelo).unwrap().is_none());

    let missing = Uuid::new_v4();
    let err = owners.delete_owner(missing).unwrap_err();
    assert!(matches!(err, RepoError::OwnerNotFound(id) if id == missing));
}

#[test]
fn list_owners_is_sorted_by_name() {
    let conn = open_db_in_memory().unwrap();
    let pets = SqlitePetRepository::try_new(&conn).unwrap();
    let owners = SqliteOwnerRepository::try_new(&conn).unwrap();

    pets.create_pet(&NewPet::with_owner("Mocha", 3, "Corgi", "Carla"))
        .unwrap();
    pets.create_pet(&NewPet::with_owner("Choco", 5, "Aspin", "Angelo"))
        .unwrap();
    pets.create_pet(&NewPet::with_owner("Luna", 2, "Persian", "Bea"))
        .unwrap();

    let names: Vec<String> = owners
        .list_owners()
        .unwrap()
        .into_iter()
        .map(|owner| owner.name)
        .collect();
    assert_eq!(names, vec!["Angelo", "Bea", "Carla"]);
}

#[test]
fn list_owner_pets_returns_only_their_pets() {
    let conn = open_db_in_memory().unwrap();
    let pets = SqlitePetRepository::try_new(&conn).unwrap();
    let owners = SqliteOwnerRepository::try_new(&conn).unwrap();

    let choco = pets
        .create_pet(&NewPet::with_owner("Choco", 5, "Aspin", "Angelo"))
        .unwrap();
    pets.create_pet(&NewPet::with_owner("Luna", 2, "Persian", "Bea"))
        .unwrap();
    pets.create_pet(&NewPet::new("Browny", 5, "Aspin")).unwrap();

    let angelo_pets = owners.list_owner_pets(choco.owner.unwrap()).unwrap();
    assert_eq!(angelo_pets.len(), 1);
    assert_eq!(angelo_pets[0].uuid, choco.uuid);
}

#[test]
fn owner_service_wraps_repository_calls() {
    let conn = open_db_in_memory().unwrap();
    let pets = SqlitePetRepository::try_new(&conn).unwrap();

    let choco = pets
        .create_pet(&NewPet::with_owner("Choco", 5, "Aspin", "Angelo"))
        .unwrap();

    let service = OwnerService::new(SqliteOwnerRepository::try_new(&conn).unwrap());
    let listed = service.list_owners().unwrap();
    assert_eq!(listed.len(), 1);

    let renamed = service.rename_owner(choco.owner.unwrap(), "Angela").unwrap();
    assert_eq!(renamed.name, "Angela");
    assert_eq!(
        service.list_owner_pets(renamed.uuid).unwrap()[0].uuid,
        choco.uuid
    );
}
