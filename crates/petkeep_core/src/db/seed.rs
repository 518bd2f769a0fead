//! Demo seed data for the sample application.
//!
//! # Responsibility
//! - Insert the sample records the mobile app ships with on first launch:
//!   an unowned pet "Browny" and an owner "Angelo" holding "Choco".
//!
//! # Invariants
//! - Seeding is idempotent; records are existence-checked by name.
//! - All inserts run in a single transaction.

use super::DbResult;
use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

/// Applies the demo seed on a migrated connection.
pub fn seed_demo_data(conn: &Connection) -> DbResult<()> {
    let tx = conn.unchecked_transaction()?;
    let mut inserted = 0usize;

    if !pet_exists(&tx, "Browny")? {
        insert_pet(&tx, "Browny", 5, "Aspin", None)?;
        inserted += 1;
    }

    if !pet_exists(&tx, "Choco")? {
        let angelo = ensure_seed_owner(&tx, "Angelo")?;
        insert_pet(&tx, "Choco", 5, "Aspin", Some(angelo.as_str()))?;
        inserted += 1;
    }

    tx.commit()?;
    info!("event=demo_seed module=db status=ok inserted={inserted}");
    Ok(())
}

fn pet_exists(conn: &Connection, name: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM pets WHERE name = ?1);",
        [name],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn ensure_seed_owner(conn: &Connection, name: &str) -> DbResult<String> {
    let existing: Option<String> = conn
        .query_row("SELECT uuid FROM owners WHERE name = ?1;", [name], |row| {
            row.get(0)
        })
        .optional()?;

    if let Some(uuid_text) = existing {
        return Ok(uuid_text);
    }

    let uuid_text = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO owners (uuid, name) VALUES (?1, ?2);",
        params![uuid_text, name],
    )?;
    Ok(uuid_text)
}

fn insert_pet(
    conn: &Connection,
    name: &str,
    age: i64,
    species: &str,
    owner_uuid: Option<&str>,
) -> DbResult<()> {
    conn.execute(
        "INSERT INTO pets (uuid, name, age, species, owner_uuid)
         VALUES (?1, ?2, ?3, ?4, ?5);",
        params![Uuid::new_v4().to_string(), name, age, species, owner_uuid],
    )?;
    Ok(())
}
