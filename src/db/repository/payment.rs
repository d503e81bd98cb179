use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::PaymentStatus;
use crate::models::Payment;

use super::{parse_opt_uuid, parse_uuid};

type PaymentRow = (
    String,
    Option<String>,
    Option<String>,
    f64,
    Option<f64>,
    String,
    Option<String>,
    Option<String>,
);

pub fn insert_payment(conn: &Connection, payment: &Payment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO payments
         (id, patient_id, appointment_id, amount, remaining_balance, status, payment_date, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            payment.id.to_string(),
            payment.patient_id.map(|id| id.to_string()),
            payment.appointment_id.map(|id| id.to_string()),
            payment.amount,
            payment.remaining_balance,
            payment.status.as_str(),
            payment.payment_date,
            payment.notes,
        ],
    )?;
    Ok(())
}

fn from_row(row: PaymentRow) -> Result<Payment, DatabaseError> {
    let (id, patient_id, appointment_id, amount, remaining_balance, status, payment_date, notes) =
        row;
    Ok(Payment {
        id: parse_uuid(&id)?,
        patient_id: parse_opt_uuid(patient_id)?,
        appointment_id: parse_opt_uuid(appointment_id)?,
        amount,
        remaining_balance,
        status: PaymentStatus::from_str(&status)?,
        payment_date,
        notes,
    })
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PaymentRow> {
    Ok((
        row.get::<_, String>(0)?,
        row.get::<_, Option<String>>(1)?,
        row.get::<_, Option<String>>(2)?,
        row.get::<_, f64>(3)?,
        row.get::<_, Option<f64>>(4)?,
        row.get::<_, String>(5)?,
        row.get::<_, Option<String>>(6)?,
        row.get::<_, Option<String>>(7)?,
    ))
}

pub fn get_payment(conn: &Connection, id: &Uuid) -> Result<Option<Payment>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, patient_id, appointment_id, amount, remaining_balance, status,
                    payment_date, notes
             FROM payments WHERE id = ?1",
            params![id.to_string()],
            map_row,
        )
        .optional()?;

    row.map(from_row).transpose()
}

pub fn list_payments(conn: &Connection) -> Result<Vec<Payment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, appointment_id, amount, remaining_balance, status,
                payment_date, notes
         FROM payments ORDER BY payment_date",
    )?;
    let rows = stmt.query_map([], map_row)?;

    let mut payments = Vec::new();
    for row in rows {
        payments.push(from_row(row?)?);
    }
    Ok(payments)
}

pub fn update_payment(conn: &Connection, payment: &Payment) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE payments SET patient_id = ?2, appointment_id = ?3, amount = ?4,
                remaining_balance = ?5, status = ?6, payment_date = ?7, notes = ?8
         WHERE id = ?1",
        params![
            payment.id.to_string(),
            payment.patient_id.map(|id| id.to_string()),
            payment.appointment_id.map(|id| id.to_string()),
            payment.amount,
            payment.remaining_balance,
            payment.status.as_str(),
            payment.payment_date,
            payment.notes,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "payment".into(),
            id: payment.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_payment(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM payments WHERE id = ?1", params![id.to_string()])?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "payment".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}
