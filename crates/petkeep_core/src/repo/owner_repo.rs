//! Owner repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide owner list/rename/delete APIs with derived pet totals.
//! - Own the find-or-create owner helper used by pet transactions.
//!
//! # Invariants
//! - `total_pets` is computed from pet rows per read; it is never stored.
//! - Owner names stay unique; rename conflicts are rejected before update.
//! - An owner referencing pets cannot be deleted.

use crate::model::owner::{validate_owner_name, OwnerId, OwnerRecord};
use crate::model::pet::PetRecord;
use crate::repo::pet_repo::{
    ensure_connection_ready, PetListQuery, PetRepository, RepoError, RepoResult,
    SqlitePetRepository, OWNERS_REQUIRED_COLUMNS, PETS_REQUIRED_COLUMNS,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const OWNER_SELECT_SQL: &str = "SELECT
    o.uuid,
    o.name,
    (SELECT COUNT(*) FROM pets AS p WHERE p.owner_uuid = o.uuid) AS total_pets,
    o.adopted_count,
    o.updated_at
FROM owners AS o";

/// Repository interface for owner operations.
pub trait OwnerRepository {
    fn get_owner(&self, id: OwnerId) -> RepoResult<Option<OwnerRecord>>;
    fn find_owner_by_name(&self, name: &str) -> RepoResult<Option<OwnerRecord>>;
    /// Lists all owners with derived pet totals, ordered by name.
    fn list_owners(&self) -> RepoResult<Vec<OwnerRecord>>;
    /// Lists the pets currently referencing one owner.
    fn list_owner_pets(&self, id: OwnerId) -> RepoResult<Vec<PetRecord>>;
    /// Renames the owner. Every pet's resolved owner name reflects the
    /// rename immediately because pets reference owners by id.
    fn rename_owner(&self, id: OwnerId, new_name: &str) -> RepoResult<OwnerRecord>;
    /// Hard-deletes an owner with zero pets; refuses otherwise.
    fn delete_owner(&self, id: OwnerId) -> RepoResult<()>;
}

/// SQLite-backed owner repository.
pub struct SqliteOwnerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOwnerRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "owners", OWNERS_REQUIRED_COLUMNS)?;
        ensure_connection_ready(conn, "pets", PETS_REQUIRED_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl OwnerRepository for SqliteOwnerRepository<'_> {
    fn get_owner(&self, id: OwnerId) -> RepoResult<Option<OwnerRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{OWNER_SELECT_SQL} WHERE o.uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_owner_row(row)?));
        }

        Ok(None)
    }

    fn find_owner_by_name(&self, name: &str) -> RepoResult<Option<OwnerRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{OWNER_SELECT_SQL} WHERE o.name = ?1;"))?;

        let mut rows = stmt.query([name.trim()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_owner_row(row)?));
        }

        Ok(None)
    }

    fn list_owners(&self) -> RepoResult<Vec<OwnerRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{OWNER_SELECT_SQL} ORDER BY o.name ASC, o.uuid ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut owners = Vec::new();

        while let Some(row) = rows.next()? {
            owners.push(parse_owner_row(row)?);
        }

        Ok(owners)
    }

    fn list_owner_pets(&self, id: OwnerId) -> RepoResult<Vec<PetRecord>> {
        let repo = SqlitePetRepository::try_new(self.conn)?;
        repo.list_pets(&PetListQuery {
            owner: Some(id),
            ..PetListQuery::default()
        })
    }

    fn rename_owner(&self, id: OwnerId, new_name: &str) -> RepoResult<OwnerRecord> {
        validate_owner_name(new_name)?;
        let name = new_name.trim();

        let tx = self.conn.unchecked_transaction()?;
        if owner_name_exists(&tx, name, Some(id))? {
            return Err(RepoError::DuplicateOwnerName(name.to_string()));
        }

        let changed = tx.execute(
            "UPDATE owners
             SET
                name = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![id.to_string(), name],
        )?;

        if changed == 0 {
            return Err(RepoError::OwnerNotFound(id));
        }
        tx.commit()?;

        self.get_owner(id)?
            .ok_or_else(|| RepoError::InvalidData("renamed owner missing on read-back".to_string()))
    }

    fn delete_owner(&self, id: OwnerId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM owners
             WHERE uuid = ?1
               AND NOT EXISTS (SELECT 1 FROM pets WHERE owner_uuid = ?1);",
            [id.to_string()],
        )?;

        if changed == 1 {
            return Ok(());
        }

        match self.get_owner(id)? {
            Some(record) => Err(RepoError::OwnerHasPets {
                owner: record.name,
                pet_count: record.total_pets,
            }),
            None => Err(RepoError::OwnerNotFound(id)),
        }
    }
}

/// Finds an owner id by display name, creating the owner when absent.
///
/// Used inside pet create/adopt transactions; the caller owns transaction
/// boundaries.
pub(crate) fn ensure_owner(conn: &Connection, name: &str) -> RepoResult<OwnerId> {
    validate_owner_name(name)?;
    let trimmed = name.trim();

    let existing: Option<String> = conn
        .query_row(
            "SELECT uuid FROM owners WHERE name = ?1;",
            [trimmed],
            |row| row.get(0),
        )
        .optional()?;

    if let Some(uuid_text) = existing {
        return Uuid::parse_str(&uuid_text).map_err(|_| {
            RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in owners.uuid"))
        });
    }

    let uuid = Uuid::new_v4();
    conn.execute(
        "INSERT INTO owners (uuid, name) VALUES (?1, ?2);",
        params![uuid.to_string(), trimmed],
    )?;
    Ok(uuid)
}

fn owner_name_exists(conn: &Connection, name: &str, exclude: Option<OwnerId>) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM owners
            WHERE name = ?1
              AND (?2 IS NULL OR uuid <> ?2)
        );",
        params![name, exclude.map(|id| id.to_string())],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_owner_row(row: &Row<'_>) -> RepoResult<OwnerRecord> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in owners.uuid"))
    })?;

    Ok(OwnerRecord {
        uuid,
        name: row.get("name")?,
        total_pets: row.get("total_pets")?,
        adopted_count: row.get("adopted_count")?,
        updated_at: row.get("updated_at")?,
    })
}
