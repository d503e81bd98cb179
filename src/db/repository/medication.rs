use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Medication;

use super::parse_uuid;

pub fn insert_medication(conn: &Connection, medication: &Medication) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medications (id, name, quantity, min_quantity, expiry_date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            medication.id.to_string(),
            medication.name,
            medication.quantity,
            medication.min_quantity,
            medication.expiry_date,
        ],
    )?;
    Ok(())
}

fn from_row(
    row: (String, String, i64, Option<i64>, Option<String>),
) -> Result<Medication, DatabaseError> {
    let (id, name, quantity, min_quantity, expiry_date) = row;
    Ok(Medication {
        id: parse_uuid(&id)?,
        name,
        quantity,
        min_quantity,
        expiry_date,
    })
}

fn map_row(
    row: &rusqlite::Row<'_>,
) -> rusqlite::Result<(String, String, i64, Option<i64>, Option<String>)> {
    Ok((
        row.get::<_, String>(0)?,
        row.get::<_, String>(1)?,
        row.get::<_, i64>(2)?,
        row.get::<_, Option<i64>>(3)?,
        row.get::<_, Option<String>>(4)?,
    ))
}

pub fn get_medication(conn: &Connection, id: &Uuid) -> Result<Option<Medication>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, name, quantity, min_quantity, expiry_date
             FROM medications WHERE id = ?1",
            params![id.to_string()],
            map_row,
        )
        .optional()?;

    row.map(from_row).transpose()
}

pub fn list_medications(conn: &Connection) -> Result<Vec<Medication>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, quantity, min_quantity, expiry_date FROM medications ORDER BY name",
    )?;
    let rows = stmt.query_map([], map_row)?;

    let mut medications = Vec::new();
    for row in rows {
        medications.push(from_row(row?)?);
    }
    Ok(medications)
}

pub fn update_medication(conn: &Connection, medication: &Medication) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE medications SET name = ?2, quantity = ?3, min_quantity = ?4, expiry_date = ?5
         WHERE id = ?1",
        params![
            medication.id.to_string(),
            medication.name,
            medication.quantity,
            medication.min_quantity,
            medication.expiry_date,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "medication".into(),
            id: medication.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_medication(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM medications WHERE id = ?1",
        params![id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "medication".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}
