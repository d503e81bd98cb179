use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::AppointmentStatus;
use crate::models::Appointment;

use super::{parse_opt_uuid, parse_uuid};

pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, patient_id, title, start_time, status)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            appt.id.to_string(),
            appt.patient_id.map(|id| id.to_string()),
            appt.title,
            appt.start_time,
            appt.status.as_str(),
        ],
    )?;
    Ok(())
}

fn from_row(
    row: (String, Option<String>, String, String, String),
) -> Result<Appointment, DatabaseError> {
    let (id, patient_id, title, start_time, status) = row;
    Ok(Appointment {
        id: parse_uuid(&id)?,
        patient_id: parse_opt_uuid(patient_id)?,
        title,
        start_time,
        status: AppointmentStatus::from_str(&status)?,
    })
}

pub fn get_appointment(conn: &Connection, id: &Uuid) -> Result<Option<Appointment>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, patient_id, title, start_time, status
             FROM appointments WHERE id = ?1",
            params![id.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        )
        .optional()?;

    row.map(from_row).transpose()
}

pub fn list_appointments(conn: &Connection) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, title, start_time, status
         FROM appointments ORDER BY start_time",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, Option<String>>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
        ))
    })?;

    let mut appointments = Vec::new();
    for row in rows {
        appointments.push(from_row(row?)?);
    }
    Ok(appointments)
}

pub fn update_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE appointments SET patient_id = ?2, title = ?3, start_time = ?4, status = ?5
         WHERE id = ?1",
        params![
            appt.id.to_string(),
            appt.patient_id.map(|id| id.to_string()),
            appt.title,
            appt.start_time,
            appt.status.as_str(),
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "appointment".into(),
            id: appt.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_appointment(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM appointments WHERE id = ?1",
        params![id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "appointment".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}
