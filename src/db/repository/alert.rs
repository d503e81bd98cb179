use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::enums::{AlertKind, AlertPriority};
use crate::models::{Alert, AlertReference};

use super::{parse_datetime, parse_opt_uuid, DATETIME_FMT};

type AlertRow = (
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    String,
    i32,
    Option<String>,
    String,
    i32,
    i32,
    Option<String>,
);

/// Insert an alert, replacing any stored record with the same id. Generated
/// alert ids are content-derived, so re-inserting an unchanged condition is a
/// no-op overwrite rather than a duplicate.
pub fn insert_alert(conn: &Connection, alert: &Alert) -> Result<(), DatabaseError> {
    let reference_json = serde_json::to_string(&alert.reference)
        .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?;

    conn.execute(
        "INSERT OR REPLACE INTO smart_alerts
         (id, type, priority, title, description, patient_id, patient_name,
          reference_json, action_required, due_date, created_at, is_read,
          is_dismissed, snoozed_until)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            alert.id,
            alert.kind.as_str(),
            alert.priority.as_str(),
            alert.title,
            alert.description,
            alert.patient_id.map(|id| id.to_string()),
            alert.patient_name,
            reference_json,
            alert.action_required as i32,
            alert
                .due_date
                .map(|dt| dt.format(DATETIME_FMT).to_string()),
            alert.created_at.format(DATETIME_FMT).to_string(),
            alert.is_read as i32,
            alert.is_dismissed as i32,
            alert
                .snoozed_until
                .map(|dt| dt.format(DATETIME_FMT).to_string()),
        ],
    )?;
    Ok(())
}

fn from_row(row: AlertRow) -> Result<Alert, DatabaseError> {
    let (
        id,
        kind,
        priority,
        title,
        description,
        patient_id,
        patient_name,
        reference_json,
        action_required,
        due_date,
        created_at,
        is_read,
        is_dismissed,
        snoozed_until,
    ) = row;

    let reference: AlertReference = serde_json::from_str(&reference_json)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("Invalid alert reference: {e}")))?;

    Ok(Alert {
        id,
        kind: AlertKind::from_str(&kind)?,
        priority: AlertPriority::from_str(&priority)?,
        title,
        description,
        patient_id: parse_opt_uuid(patient_id)?,
        patient_name,
        reference,
        action_required: action_required != 0,
        due_date: due_date.as_deref().map(parse_datetime).transpose()?,
        created_at: parse_datetime(&created_at)?,
        is_read: is_read != 0,
        is_dismissed: is_dismissed != 0,
        snoozed_until: snoozed_until.as_deref().map(parse_datetime).transpose()?,
    })
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AlertRow> {
    Ok((
        row.get::<_, String>(0)?,
        row.get::<_, String>(1)?,
        row.get::<_, String>(2)?,
        row.get::<_, String>(3)?,
        row.get::<_, String>(4)?,
        row.get::<_, Option<String>>(5)?,
        row.get::<_, Option<String>>(6)?,
        row.get::<_, String>(7)?,
        row.get::<_, i32>(8)?,
        row.get::<_, Option<String>>(9)?,
        row.get::<_, String>(10)?,
        row.get::<_, i32>(11)?,
        row.get::<_, i32>(12)?,
        row.get::<_, Option<String>>(13)?,
    ))
}

const ALERT_COLUMNS: &str = "id, type, priority, title, description, patient_id, patient_name,
       reference_json, action_required, due_date, created_at, is_read, is_dismissed,
       snoozed_until";

pub fn get_alert(conn: &Connection, id: &str) -> Result<Option<Alert>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {ALERT_COLUMNS} FROM smart_alerts WHERE id = ?1"),
            params![id],
            map_row,
        )
        .optional()?;

    row.map(from_row).transpose()
}

pub fn list_alerts(conn: &Connection) -> Result<Vec<Alert>, DatabaseError> {
    let mut stmt =
        conn.prepare(&format!("SELECT {ALERT_COLUMNS} FROM smart_alerts"))?;
    let rows = stmt.query_map([], map_row)?;

    let mut alerts = Vec::new();
    for row in rows {
        alerts.push(from_row(row?)?);
    }
    Ok(alerts)
}

/// Full-row update; the caller loads, mutates, and writes back.
pub fn update_alert(conn: &Connection, alert: &Alert) -> Result<(), DatabaseError> {
    let reference_json = serde_json::to_string(&alert.reference)
        .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?;

    let changed = conn.execute(
        "UPDATE smart_alerts SET type = ?2, priority = ?3, title = ?4, description = ?5,
                patient_id = ?6, patient_name = ?7, reference_json = ?8, action_required = ?9,
                due_date = ?10, is_read = ?11, is_dismissed = ?12, snoozed_until = ?13
         WHERE id = ?1",
        params![
            alert.id,
            alert.kind.as_str(),
            alert.priority.as_str(),
            alert.title,
            alert.description,
            alert.patient_id.map(|id| id.to_string()),
            alert.patient_name,
            reference_json,
            alert.action_required as i32,
            alert
                .due_date
                .map(|dt| dt.format(DATETIME_FMT).to_string()),
            alert.is_read as i32,
            alert.is_dismissed as i32,
            alert
                .snoozed_until
                .map(|dt| dt.format(DATETIME_FMT).to_string()),
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "alert".into(),
            id: alert.id.clone(),
        });
    }
    Ok(())
}

pub fn delete_alert(conn: &Connection, id: &str) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM smart_alerts WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "alert".into(),
            id: id.into(),
        });
    }
    Ok(())
}

/// Drop every dismissed alert. Returns the number of rows removed.
pub fn clear_dismissed(conn: &Connection) -> Result<usize, DatabaseError> {
    let removed = conn.execute("DELETE FROM smart_alerts WHERE is_dismissed = 1", [])?;
    Ok(removed)
}

/// Null out snoozes that have lapsed so the alerts surface again.
/// Returns the number of alerts woken up.
pub fn clear_expired_snoozed(
    conn: &Connection,
    now: NaiveDateTime,
) -> Result<usize, DatabaseError> {
    let woken = conn.execute(
        "UPDATE smart_alerts SET snoozed_until = NULL
         WHERE snoozed_until IS NOT NULL AND snoozed_until <= ?1",
        params![now.format(DATETIME_FMT).to_string()],
    )?;
    Ok(woken)
}
