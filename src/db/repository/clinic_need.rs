use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::{NeedPriority, NeedStatus};
use crate::models::ClinicNeed;

use super::{parse_datetime, parse_uuid, DATETIME_FMT};

type NeedRow = (
    String,
    String,
    i64,
    f64,
    Option<String>,
    String,
    String,
    String,
);

pub fn insert_clinic_need(conn: &Connection, need: &ClinicNeed) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO clinic_needs
         (id, need_name, quantity, price, supplier, status, priority, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            need.id.to_string(),
            need.need_name,
            need.quantity,
            need.price,
            need.supplier,
            need.status.as_str(),
            need.priority.as_str(),
            need.created_at.format(DATETIME_FMT).to_string(),
        ],
    )?;
    Ok(())
}

fn from_row(row: NeedRow) -> Result<ClinicNeed, DatabaseError> {
    let (id, need_name, quantity, price, supplier, status, priority, created_at) = row;
    Ok(ClinicNeed {
        id: parse_uuid(&id)?,
        need_name,
        quantity,
        price,
        supplier,
        status: NeedStatus::from_str(&status)?,
        priority: NeedPriority::from_str(&priority)?,
        created_at: parse_datetime(&created_at)?,
    })
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<NeedRow> {
    Ok((
        row.get::<_, String>(0)?,
        row.get::<_, String>(1)?,
        row.get::<_, i64>(2)?,
        row.get::<_, f64>(3)?,
        row.get::<_, Option<String>>(4)?,
        row.get::<_, String>(5)?,
        row.get::<_, String>(6)?,
        row.get::<_, String>(7)?,
    ))
}

pub fn get_clinic_need(conn: &Connection, id: &Uuid) -> Result<Option<ClinicNeed>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, need_name, quantity, price, supplier, status, priority, created_at
             FROM clinic_needs WHERE id = ?1",
            params![id.to_string()],
            map_row,
        )
        .optional()?;

    row.map(from_row).transpose()
}

pub fn list_clinic_needs(conn: &Connection) -> Result<Vec<ClinicNeed>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, need_name, quantity, price, supplier, status, priority, created_at
         FROM clinic_needs ORDER BY created_at",
    )?;
    let rows = stmt.query_map([], map_row)?;

    let mut needs = Vec::new();
    for row in rows {
        needs.push(from_row(row?)?);
    }
    Ok(needs)
}

pub fn update_clinic_need(conn: &Connection, need: &ClinicNeed) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE clinic_needs SET need_name = ?2, quantity = ?3, price = ?4, supplier = ?5,
                status = ?6, priority = ?7
         WHERE id = ?1",
        params![
            need.id.to_string(),
            need.need_name,
            need.quantity,
            need.price,
            need.supplier,
            need.status.as_str(),
            need.priority.as_str(),
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "clinic_need".into(),
            id: need.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_clinic_need(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM clinic_needs WHERE id = ?1",
        params![id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "clinic_need".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}
