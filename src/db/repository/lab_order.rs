use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::LabOrderStatus;
use crate::models::LabOrder;

use super::{parse_opt_uuid, parse_uuid};

type OrderRow = (
    String,
    String,
    Option<String>,
    Option<String>,
    String,
    Option<String>,
    f64,
);

pub fn insert_lab_order(conn: &Connection, order: &LabOrder) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO lab_orders
         (id, service_name, patient_id, lab_id, status, expected_delivery_date,
          remaining_balance)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            order.id.to_string(),
            order.service_name,
            order.patient_id.map(|id| id.to_string()),
            order.lab_id.map(|id| id.to_string()),
            order.status.as_str(),
            order.expected_delivery_date,
            order.remaining_balance,
        ],
    )?;
    Ok(())
}

fn from_row(row: OrderRow) -> Result<LabOrder, DatabaseError> {
    let (id, service_name, patient_id, lab_id, status, expected, balance) = row;
    Ok(LabOrder {
        id: parse_uuid(&id)?,
        service_name,
        patient_id: parse_opt_uuid(patient_id)?,
        lab_id: parse_opt_uuid(lab_id)?,
        status: LabOrderStatus::from_str(&status)?,
        expected_delivery_date: expected,
        remaining_balance: balance,
    })
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<OrderRow> {
    Ok((
        row.get::<_, String>(0)?,
        row.get::<_, String>(1)?,
        row.get::<_, Option<String>>(2)?,
        row.get::<_, Option<String>>(3)?,
        row.get::<_, String>(4)?,
        row.get::<_, Option<String>>(5)?,
        row.get::<_, f64>(6)?,
    ))
}

pub fn get_lab_order(conn: &Connection, id: &Uuid) -> Result<Option<LabOrder>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, service_name, patient_id, lab_id, status, expected_delivery_date,
                    remaining_balance
             FROM lab_orders WHERE id = ?1",
            params![id.to_string()],
            map_row,
        )
        .optional()?;

    row.map(from_row).transpose()
}

pub fn list_lab_orders(conn: &Connection) -> Result<Vec<LabOrder>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, service_name, patient_id, lab_id, status, expected_delivery_date,
                remaining_balance
         FROM lab_orders ORDER BY expected_delivery_date",
    )?;
    let rows = stmt.query_map([], map_row)?;

    let mut orders = Vec::new();
    for row in rows {
        orders.push(from_row(row?)?);
    }
    Ok(orders)
}

pub fn update_lab_order(conn: &Connection, order: &LabOrder) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE lab_orders SET service_name = ?2, patient_id = ?3, lab_id = ?4, status = ?5,
                expected_delivery_date = ?6, remaining_balance = ?7
         WHERE id = ?1",
        params![
            order.id.to_string(),
            order.service_name,
            order.patient_id.map(|id| id.to_string()),
            order.lab_id.map(|id| id.to_string()),
            order.status.as_str(),
            order.expected_delivery_date,
            order.remaining_balance,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "lab_order".into(),
            id: order.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_lab_order(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM lab_orders WHERE id = ?1",
        params![id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "lab_order".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}
