use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::Prescription;

use super::{parse_date, parse_opt_uuid, parse_uuid, DATE_FMT};

type PrescriptionRow = (
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    String,
    Option<String>,
);

pub fn insert_prescription(
    conn: &Connection,
    prescription: &Prescription,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO prescriptions
         (id, patient_id, appointment_id, treatment_id, prescription_date, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            prescription.id.to_string(),
            prescription.patient_id.map(|id| id.to_string()),
            prescription.appointment_id.map(|id| id.to_string()),
            prescription.treatment_id.map(|id| id.to_string()),
            prescription.prescription_date.format(DATE_FMT).to_string(),
            prescription.notes,
        ],
    )?;
    Ok(())
}

fn from_row(row: PrescriptionRow) -> Result<Prescription, DatabaseError> {
    let (id, patient_id, appointment_id, treatment_id, date, notes) = row;
    Ok(Prescription {
        id: parse_uuid(&id)?,
        patient_id: parse_opt_uuid(patient_id)?,
        appointment_id: parse_opt_uuid(appointment_id)?,
        treatment_id: parse_opt_uuid(treatment_id)?,
        prescription_date: parse_date(&date)?,
        notes,
    })
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PrescriptionRow> {
    Ok((
        row.get::<_, String>(0)?,
        row.get::<_, Option<String>>(1)?,
        row.get::<_, Option<String>>(2)?,
        row.get::<_, Option<String>>(3)?,
        row.get::<_, String>(4)?,
        row.get::<_, Option<String>>(5)?,
    ))
}

pub fn get_prescription(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<Prescription>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, patient_id, appointment_id, treatment_id, prescription_date, notes
             FROM prescriptions WHERE id = ?1",
            params![id.to_string()],
            map_row,
        )
        .optional()?;

    row.map(from_row).transpose()
}

pub fn list_prescriptions(conn: &Connection) -> Result<Vec<Prescription>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, appointment_id, treatment_id, prescription_date, notes
         FROM prescriptions ORDER BY prescription_date DESC",
    )?;
    let rows = stmt.query_map([], map_row)?;

    let mut prescriptions = Vec::new();
    for row in rows {
        prescriptions.push(from_row(row?)?);
    }
    Ok(prescriptions)
}

pub fn update_prescription(
    conn: &Connection,
    prescription: &Prescription,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE prescriptions SET patient_id = ?2, appointment_id = ?3, treatment_id = ?4,
                prescription_date = ?5, notes = ?6
         WHERE id = ?1",
        params![
            prescription.id.to_string(),
            prescription.patient_id.map(|id| id.to_string()),
            prescription.appointment_id.map(|id| id.to_string()),
            prescription.treatment_id.map(|id| id.to_string()),
            prescription.prescription_date.format(DATE_FMT).to_string(),
            prescription.notes,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "prescription".into(),
            id: prescription.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_prescription(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM prescriptions WHERE id = ?1",
        params![id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "prescription".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}
