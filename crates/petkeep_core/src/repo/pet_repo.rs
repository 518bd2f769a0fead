//! Pet repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD + adoption APIs over `pets` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate fields before SQL mutations.
//! - A failed write leaves the store unchanged (single transaction per
//!   operation).
//! - Pet names stay unique; duplicate writes are rejected before insert.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::{migrations, DbError};
use crate::model::owner::{OwnerId, OwnerValidationError};
use crate::model::pet::{
    validate_pet_age, validate_pet_name, NewPet, PetId, PetRecord, PetValidationError,
};
use crate::repo::owner_repo::ensure_owner;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PET_SELECT_SQL: &str = "SELECT
    p.uuid,
    p.name,
    p.age,
    p.species,
    p.owner_uuid,
    o.name AS owner_name,
    p.updated_at
FROM pets AS p
LEFT JOIN owners AS o ON o.uuid = p.owner_uuid";

pub(crate) const PETS_REQUIRED_COLUMNS: &[&str] =
    &["uuid", "name", "age", "species", "owner_uuid", "updated_at"];
pub(crate) const OWNERS_REQUIRED_COLUMNS: &[&str] = &["uuid", "name", "adopted_count", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for pet/owner persistence and query operations.
///
/// Every user-visible failure of the sample app maps to a distinct variant
/// so callers and tests can match on behavior instead of message text.
#[derive(Debug)]
pub enum RepoError {
    Validation(PetValidationError),
    OwnerValidation(OwnerValidationError),
    Db(DbError),
    PetNotFound(PetId),
    OwnerNotFound(OwnerId),
    DuplicatePetName(String),
    DuplicateOwnerName(String),
    PetHasOwner { pet: String, owner: String },
    OwnerHasPets { owner: String, pet_count: i64 },
    UninitializedConnection { expected_version: u32, actual_version: u32 },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn { table: &'static str, column: &'static str },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::OwnerValidation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::PetNotFound(id) => write!(f, "pet not found: {id}"),
            Self::OwnerNotFound(id) => write!(f, "owner not found: {id}"),
            Self::DuplicatePetName(name) => write!(f, "a pet named `{name}` already exists"),
            Self::DuplicateOwnerName(name) => write!(f, "an owner named `{name}` already exists"),
            Self::PetHasOwner { pet, owner } => {
                write!(f, "cannot delete pet `{pet}` while owned by `{owner}`")
            }
            Self::OwnerHasPets { owner, pet_count } => write!(
                f,
                "cannot delete owner `{owner}` while {pet_count} pet(s) reference them"
            ),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match required {expected_version}; apply migrations first"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::OwnerValidation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PetValidationError> for RepoError {
    fn from(value: PetValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<OwnerValidationError> for RepoError {
    fn from(value: OwnerValidationError) -> Self {
        Self::OwnerValidation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing pets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetListQuery {
    /// Case-insensitive name-substring filter (the UI search box).
    pub name_contains: Option<String>,
    /// Restrict results to one owner's pets.
    pub owner: Option<OwnerId>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for pet CRUD and adoption operations.
pub trait PetRepository {
    /// Creates one pet, resolving or creating its owner in the same
    /// transaction when an owner name is supplied.
    fn create_pet(&self, new_pet: &NewPet) -> RepoResult<PetRecord>;
    fn get_pet(&self, id: PetId) -> RepoResult<Option<PetRecord>>;
    fn find_pet_by_name(&self, name: &str) -> RepoResult<Option<PetRecord>>;
    fn list_pets(&self, query: &PetListQuery) -> RepoResult<Vec<PetRecord>>;
    /// Replaces name/age/species. The owner link is never touched here.
    fn update_pet_profile(
        &self,
        id: PetId,
        new_name: &str,
        new_age: i64,
        new_species: &str,
    ) -> RepoResult<PetRecord>;
    /// Hard-deletes an unowned pet; refuses while an owner is referenced.
    fn delete_pet(&self, id: PetId) -> RepoResult<()>;
    /// Reassigns the pet's owner link and credits the gaining owner with
    /// one adoption event. Re-adoption by the current owner is a no-op.
    fn adopt_pet(&self, id: PetId, new_owner_name: &str) -> RepoResult<PetRecord>;
}

/// SQLite-backed pet repository.
pub struct SqlitePetRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePetRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "pets", PETS_REQUIRED_COLUMNS)?;
        ensure_connection_ready(conn, "owners", OWNERS_REQUIRED_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl PetRepository for SqlitePetRepository<'_> {
    fn create_pet(&self, new_pet: &NewPet) -> RepoResult<PetRecord> {
        new_pet.validate()?;
        let name = new_pet.name.trim();
        let species = new_pet.species.trim();

        let tx = self.conn.unchecked_transaction()?;
        if pet_name_exists(&tx, name, None)? {
            return Err(RepoError::DuplicatePetName(name.to_string()));
        }

        let owner_uuid = match new_pet.owner_name.as_deref() {
            Some(owner_name) => Some(ensure_owner(&tx, owner_name)?),
            None => None,
        };

        let uuid = Uuid::new_v4();
        tx.execute(
            "INSERT INTO pets (uuid, name, age, species, owner_uuid)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                uuid.to_string(),
                name,
                new_pet.age,
                species,
                owner_uuid.map(|owner| owner.to_string()),
            ],
        )?;
        tx.commit()?;

        self.get_pet(uuid)?
            .ok_or_else(|| RepoError::InvalidData("created pet missing on read-back".to_string()))
    }

    fn get_pet(&self, id: PetId) -> RepoResult<Option<PetRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PET_SELECT_SQL} WHERE p.uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_pet_row(row)?));
        }

        Ok(None)
    }

    fn find_pet_by_name(&self, name: &str) -> RepoResult<Option<PetRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PET_SELECT_SQL} WHERE p.name = ?1;"))?;

        let mut rows = stmt.query([name.trim()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_pet_row(row)?));
        }

        Ok(None)
    }

    fn list_pets(&self, query: &PetListQuery) -> RepoResult<Vec<PetRecord>> {
        let mut sql = format!("{PET_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(term) = &query.name_contains {
            sql.push_str(" AND instr(lower(p.name), lower(?)) > 0");
            bind_values.push(Value::Text(term.trim().to_string()));
        }

        if let Some(owner) = query.owner {
            sql.push_str(" AND p.owner_uuid = ?");
            bind_values.push(Value::Text(owner.to_string()));
        }

        sql.push_str(" ORDER BY p.updated_at DESC, p.uuid ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut pets = Vec::new();

        while let Some(row) = rows.next()? {
            pets.push(parse_pet_row(row)?);
        }

        Ok(pets)
    }

    fn update_pet_profile(
        &self,
        id: PetId,
        new_name: &str,
        new_age: i64,
        new_species: &str,
    ) -> RepoResult<PetRecord> {
        validate_pet_name(new_name)?;
        validate_pet_age(new_age)?;
        let name = new_name.trim();

        let tx = self.conn.unchecked_transaction()?;
        if pet_name_exists(&tx, name, Some(id))? {
            return Err(RepoError::DuplicatePetName(name.to_string()));
        }

        let changed = tx.execute(
            "UPDATE pets
             SET
                name = ?2,
                age = ?3,
                species = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![id.to_string(), name, new_age, new_species.trim()],
        )?;

        if changed == 0 {
            return Err(RepoError::PetNotFound(id));
        }
        tx.commit()?;

        self.get_pet(id)?
            .ok_or_else(|| RepoError::InvalidData("updated pet missing on read-back".to_string()))
    }

    fn delete_pet(&self, id: PetId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM pets WHERE uuid = ?1 AND owner_uuid IS NULL;",
            [id.to_string()],
        )?;

        if changed == 1 {
            return Ok(());
        }

        // The guarded delete matched nothing: either the pet is owned or
        // it never existed.
        match self.get_pet(id)? {
            Some(record) => {
                let owner = record
                    .owner_name
                    .unwrap_or_else(|| "unknown owner".to_string());
                Err(RepoError::PetHasOwner {
                    pet: record.name,
                    owner,
                })
            }
            None => Err(RepoError::PetNotFound(id)),
        }
    }

    fn adopt_pet(&self, id: PetId, new_owner_name: &str) -> RepoResult<PetRecord> {
        let tx = self.conn.unchecked_transaction()?;

        let current_owner: Option<Option<String>> = tx
            .query_row(
                "SELECT owner_uuid FROM pets WHERE uuid = ?1;",
                [id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        let Some(current_owner) = current_owner else {
            return Err(RepoError::PetNotFound(id));
        };

        let gaining = ensure_owner(&tx, new_owner_name)?;

        if current_owner.as_deref() == Some(gaining.to_string().as_str()) {
            // Already theirs; do not credit another adoption event.
            drop(tx);
        } else {
            tx.execute(
                "UPDATE pets
                 SET
                    owner_uuid = ?2,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?1;",
                params![id.to_string(), gaining.to_string()],
            )?;
            tx.execute(
                "UPDATE owners
                 SET
                    adopted_count = adopted_count + 1,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?1;",
                [gaining.to_string()],
            )?;
            tx.commit()?;
        }

        self.get_pet(id)?
            .ok_or_else(|| RepoError::InvalidData("adopted pet missing on read-back".to_string()))
    }
}

/// Verifies that the connection has been migrated and carries the schema
/// objects a repository relies on.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    table: &'static str,
    required_columns: &[&'static str],
) -> RepoResult<()> {
    let expected_version = migrations::latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(RepoError::MissingRequiredTable(table));
    }

    for &column in required_columns {
        let column_exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM pragma_table_info(?1)
                WHERE name = ?2
            );",
            params![table, column],
            |row| row.get(0),
        )?;
        if column_exists == 0 {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

fn pet_name_exists(conn: &Connection, name: &str, exclude: Option<PetId>) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM pets
            WHERE name = ?1
              AND (?2 IS NULL OR uuid <> ?2)
        );",
        params![name, exclude.map(|id| id.to_string())],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_pet_row(row: &Row<'_>) -> RepoResult<PetRecord> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in pets.uuid"))
    })?;

    let owner = match row.get::<_, Option<String>>("owner_uuid")? {
        Some(owner_text) => Some(Uuid::parse_str(&owner_text).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid uuid value `{owner_text}` in pets.owner_uuid"
            ))
        })?),
        None => None,
    };

    Ok(PetRecord {
        uuid,
        name: row.get("name")?,
        age: row.get("age")?,
        species: row.get("species")?,
        owner,
        owner_name: row.get("owner_name")?,
        updated_at: row.get("updated_at")?,
    })
}
