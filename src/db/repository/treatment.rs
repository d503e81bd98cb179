use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::TreatmentStatus;
use crate::models::Treatment;

use super::{parse_datetime, parse_opt_uuid, parse_uuid, DATETIME_FMT};

type TreatmentRow = (
    String,
    String,
    Option<String>,
    i32,
    String,
    String,
    Option<String>,
    String,
    Option<String>,
);

pub fn insert_treatment(conn: &Connection, treatment: &Treatment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO tooth_treatments
         (id, patient_id, appointment_id, tooth_number, treatment_type, status, notes,
          created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            treatment.id.to_string(),
            treatment.patient_id.to_string(),
            treatment.appointment_id.map(|id| id.to_string()),
            treatment.tooth_number,
            treatment.treatment_type,
            treatment.status.as_str(),
            treatment.notes,
            treatment.created_at.format(DATETIME_FMT).to_string(),
            treatment
                .updated_at
                .map(|dt| dt.format(DATETIME_FMT).to_string()),
        ],
    )?;
    Ok(())
}

fn from_row(row: TreatmentRow) -> Result<Treatment, DatabaseError> {
    let (id, patient_id, appointment_id, tooth_number, treatment_type, status, notes, created, updated) =
        row;
    Ok(Treatment {
        id: parse_uuid(&id)?,
        patient_id: parse_uuid(&patient_id)?,
        appointment_id: parse_opt_uuid(appointment_id)?,
        tooth_number,
        treatment_type,
        status: TreatmentStatus::from_str(&status)?,
        notes,
        created_at: parse_datetime(&created)?,
        updated_at: updated.as_deref().map(parse_datetime).transpose()?,
    })
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TreatmentRow> {
    Ok((
        row.get::<_, String>(0)?,
        row.get::<_, String>(1)?,
        row.get::<_, Option<String>>(2)?,
        row.get::<_, i32>(3)?,
        row.get::<_, String>(4)?,
        row.get::<_, String>(5)?,
        row.get::<_, Option<String>>(6)?,
        row.get::<_, String>(7)?,
        row.get::<_, Option<String>>(8)?,
    ))
}

pub fn get_treatment(conn: &Connection, id: &Uuid) -> Result<Option<Treatment>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, patient_id, appointment_id, tooth_number, treatment_type, status,
                    notes, created_at, updated_at
             FROM tooth_treatments WHERE id = ?1",
            params![id.to_string()],
            map_row,
        )
        .optional()?;

    row.map(from_row).transpose()
}

pub fn list_treatments(conn: &Connection) -> Result<Vec<Treatment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, appointment_id, tooth_number, treatment_type, status,
                notes, created_at, updated_at
         FROM tooth_treatments ORDER BY created_at",
    )?;
    let rows = stmt.query_map([], map_row)?;

    let mut treatments = Vec::new();
    for row in rows {
        treatments.push(from_row(row?)?);
    }
    Ok(treatments)
}

pub fn update_treatment(conn: &Connection, treatment: &Treatment) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE tooth_treatments SET appointment_id = ?2, tooth_number = ?3,
                treatment_type = ?4, status = ?5, notes = ?6, updated_at = ?7
         WHERE id = ?1",
        params![
            treatment.id.to_string(),
            treatment.appointment_id.map(|id| id.to_string()),
            treatment.tooth_number,
            treatment.treatment_type,
            treatment.status.as_str(),
            treatment.notes,
            treatment
                .updated_at
                .map(|dt| dt.format(DATETIME_FMT).to_string()),
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "treatment".into(),
            id: treatment.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_treatment(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM tooth_treatments WHERE id = ?1",
        params![id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "treatment".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}
