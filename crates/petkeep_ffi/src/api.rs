//! FFI use-case API for the mobile UI.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Map repository outcomes to the snackbar strings the UI shows.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every mutation returns an envelope with `ok` and a user-facing
//!   `message`.
//! - The empty-string "unowned" sentinel exists only in this layer; core
//!   code uses `Option`.

use log::warn;
use petkeep_core::db::{open_db, seed_demo_data as seed_demo_data_inner};
use petkeep_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    OwnerService, PetListQuery, PetRecord, PetService, RepoError, SqliteOwnerRepository,
    SqlitePetRepository,
};
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const DB_FILE_NAME: &str = "petkeep.sqlite3";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pet list item shaped for the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetListItem {
    /// Stable pet ID in string form.
    pub pet_id: String,
    pub name: String,
    pub age: i64,
    pub species: String,
    /// Owner display name; empty string means unowned.
    pub owner_name: String,
}

/// Pet list response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetListResponse {
    pub items: Vec<PetListItem>,
    /// Human-readable response message for the snackbar.
    pub message: String,
}

/// Owner list item shaped for the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerListItem {
    /// Stable owner ID in string form.
    pub owner_id: String,
    pub name: String,
    /// Count of pets currently referencing this owner.
    pub total_pets: i64,
    /// Cumulative adoption events credited to this owner.
    pub adopted_count: i64,
}

/// Owner list response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerListResponse {
    pub items: Vec<OwnerListItem>,
    pub message: String,
}

/// Generic action response envelope for mutation flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Stable ID of the affected record, when one exists.
    pub record_id: Option<String>,
    /// Human-readable response message for the snackbar.
    pub message: String,
}

impl StoreActionResponse {
    fn success(message: impl Into<String>, record_id: Option<String>) -> Self {
        Self {
            ok: true,
            record_id,
            message: message.into(),
        }
    }

    fn failure(op: &'static str, err: &RepoError) -> Self {
        warn!("event=ffi_action module=ffi status=error op={op} error={err}");
        Self {
            ok: false,
            record_id: None,
            message: snackbar_message(err),
        }
    }

    fn invalid_id(kind: &'static str, raw: &str) -> Self {
        Self {
            ok: false,
            record_id: None,
            message: format!("invalid {kind} id: {raw}"),
        }
    }
}

/// Lists pets, optionally filtered by a name-substring search.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Empty result carries the "No pets found" snackbar message.
#[flutter_rust_bridge::frb(sync)]
pub fn list_pets(search: Option<String>) -> PetListResponse {
    let query = PetListQuery {
        name_contains: search.filter(|term| !term.trim().is_empty()),
        ..PetListQuery::default()
    };

    match with_pet_service(|service| service.list_pets(&query)) {
        Ok(records) => {
            let items: Vec<PetListItem> = records.into_iter().map(to_pet_list_item).collect();
            let message = if items.is_empty() {
                "No pets found".to_string()
            } else {
                format!("Loaded {} pet(s)", items.len())
            };
            PetListResponse { items, message }
        }
        Err(err) => {
            warn!("event=ffi_action module=ffi status=error op=list_pets error={err}");
            PetListResponse {
                items: Vec::new(),
                message: snackbar_message(&err),
            }
        }
    }
}

/// Creates a pet from the add-flow form fields.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - `owner_name` is only honored when `has_owner` is true.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn add_pet(
    name: String,
    age: i64,
    has_owner: bool,
    species: String,
    owner_name: String,
) -> StoreActionResponse {
    match with_pet_service(|service| service.add_pet(&name, age, has_owner, &species, &owner_name))
    {
        Ok(record) => StoreActionResponse::success(
            format!("Added {}", record.name),
            Some(record.uuid.to_string()),
        ),
        Err(err) => StoreActionResponse::failure("add_pet", &err),
    }
}

/// Replaces a pet's name/age/species.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - The owner link is never touched by this call.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn update_pet(
    pet_id: String,
    new_name: String,
    new_age: i64,
    new_species: String,
) -> StoreActionResponse {
    let Some(id) = parse_id(&pet_id) else {
        return StoreActionResponse::invalid_id("pet", &pet_id);
    };

    match with_pet_service(|service| service.update_pet(id, &new_name, new_age, &new_species)) {
        Ok(record) => StoreActionResponse::success(
            format!("Updated {}", record.name),
            Some(record.uuid.to_string()),
        ),
        Err(err) => StoreActionResponse::failure("update_pet", &err),
    }
}

/// Deletes an unowned pet.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Refused with the "Cannot delete pet with owner" message while the pet
///   references an owner.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_pet(pet_id: String) -> StoreActionResponse {
    let Some(id) = parse_id(&pet_id) else {
        return StoreActionResponse::invalid_id("pet", &pet_id);
    };

    match with_pet_service(|service| {
        let record = service.get_pet(id)?;
        service.delete_pet(id)?;
        Ok(record)
    }) {
        Ok(record) => {
            let name = record.map_or_else(|| "pet".to_string(), |record| record.name);
            StoreActionResponse::success(format!("Removed {name}"), None)
        }
        Err(err) => StoreActionResponse::failure("delete_pet", &err),
    }
}

/// Reassigns a pet to the named owner, creating the owner when absent.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn adopt_pet(pet_id: String, new_owner_name: String) -> StoreActionResponse {
    let Some(id) = parse_id(&pet_id) else {
        return StoreActionResponse::invalid_id("pet", &pet_id);
    };

    match with_pet_service(|service| service.adopt_pet(id, &new_owner_name)) {
        Ok(record) => {
            let owner = record
                .owner_name
                .clone()
                .unwrap_or_else(|| new_owner_name.trim().to_string());
            StoreActionResponse::success(
                format!("{} adopted by {owner}", record.name),
                Some(record.uuid.to_string()),
            )
        }
        Err(err) => StoreActionResponse::failure("adopt_pet", &err),
    }
}

/// Lists all owners with derived pet totals.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn list_owners() -> OwnerListResponse {
    match with_owner_service(|service| service.list_owners()) {
        Ok(records) => {
            let items: Vec<OwnerListItem> = records
                .into_iter()
                .map(|record| OwnerListItem {
                    owner_id: record.uuid.to_string(),
                    name: record.name,
                    total_pets: record.total_pets,
                    adopted_count: record.adopted_count,
                })
                .collect();
            let message = if items.is_empty() {
                "No owners found".to_string()
            } else {
                format!("Loaded {} owner(s)", items.len())
            };
            OwnerListResponse { items, message }
        }
        Err(err) => {
            warn!("event=ffi_action module=ffi status=error op=list_owners error={err}");
            OwnerListResponse {
                items: Vec::new(),
                message: snackbar_message(&err),
            }
        }
    }
}

/// Renames an owner; pets resolve the new name on their next read.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn rename_owner(owner_id: String, new_name: String) -> StoreActionResponse {
    let Some(id) = parse_id(&owner_id) else {
        return StoreActionResponse::invalid_id("owner", &owner_id);
    };

    match with_owner_service(|service| service.rename_owner(id, &new_name)) {
        Ok(record) => StoreActionResponse::success(
            format!("Updated owner name to {}", record.name),
            Some(record.uuid.to_string()),
        ),
        Err(err) => StoreActionResponse::failure("rename_owner", &err),
    }
}

/// Deletes an owner with zero pets.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Refused while any pet references the owner.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_owner(owner_id: String) -> StoreActionResponse {
    let Some(id) = parse_id(&owner_id) else {
        return StoreActionResponse::invalid_id("owner", &owner_id);
    };

    match with_owner_service(|service| {
        let record = service.get_owner(id)?;
        service.delete_owner(id)?;
        Ok(record)
    }) {
        Ok(record) => {
            let name = record.map_or_else(|| "owner".to_string(), |record| record.name);
            StoreActionResponse::success(format!("Removed owner {name}"), None)
        }
        Err(err) => StoreActionResponse::failure("delete_owner", &err),
    }
}

/// Applies the demo seed records (idempotent).
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn seed_demo_data() -> StoreActionResponse {
    match with_connection(|conn| seed_demo_data_inner(conn).map_err(Into::into)) {
        Ok(()) => StoreActionResponse::success("Demo data ready", None),
        Err(err) => StoreActionResponse::failure("seed_demo_data", &err),
    }
}

/// Maps repository errors to the snackbar strings the UI shows.
fn snackbar_message(err: &RepoError) -> String {
    match err {
        RepoError::DuplicatePetName(name) => format!("Pet with name {name} already exists"),
        RepoError::DuplicateOwnerName(name) => format!("Owner named {name} already exists"),
        RepoError::PetHasOwner { .. } => "Cannot delete pet with owner".to_string(),
        RepoError::OwnerHasPets { owner, .. } => {
            format!("Cannot delete owner {owner} because they have pets")
        }
        RepoError::PetNotFound(_) => "Pet not found".to_string(),
        RepoError::OwnerNotFound(_) => "Owner not found".to_string(),
        other => other.to_string(),
    }
}

fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

fn to_pet_list_item(record: PetRecord) -> PetListItem {
    PetListItem {
        pet_id: record.uuid.to_string(),
        name: record.name,
        age: record.age,
        species: record.species,
        owner_name: record.owner_name.unwrap_or_default(),
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("PETKEEP_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_connection<T>(
    f: impl FnOnce(&rusqlite::Connection) -> Result<T, RepoError>,
) -> Result<T, RepoError> {
    let conn = open_db(resolve_db_path())?;
    f(&conn)
}

fn with_pet_service<T>(
    f: impl FnOnce(&PetService<SqlitePetRepository<'_>>) -> Result<T, RepoError>,
) -> Result<T, RepoError> {
    with_connection(|conn| {
        let repo = SqlitePetRepository::try_new(conn)?;
        f(&PetService::new(repo))
    })
}

fn with_owner_service<T>(
    f: impl FnOnce(&OwnerService<SqliteOwnerRepository<'_>>) -> Result<T, RepoError>,
) -> Result<T, RepoError> {
    with_connection(|conn| {
        let repo = SqliteOwnerRepository::try_new(conn)?;
        f(&OwnerService::new(repo))
    })
}
