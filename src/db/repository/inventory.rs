use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::InventoryItem;

use super::parse_uuid;

type ItemRow = (
    String,
    String,
    i64,
    Option<i64>,
    Option<String>,
    Option<f64>,
    Option<String>,
);

pub fn insert_inventory_item(conn: &Connection, item: &InventoryItem) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO inventory_items
         (id, name, quantity, min_quantity, expiry_date, usage_rate, last_used_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            item.id.to_string(),
            item.name,
            item.quantity,
            item.min_quantity,
            item.expiry_date,
            item.usage_rate,
            item.last_used_date,
        ],
    )?;
    Ok(())
}

fn from_row(row: ItemRow) -> Result<InventoryItem, DatabaseError> {
    let (id, name, quantity, min_quantity, expiry_date, usage_rate, last_used_date) = row;
    Ok(InventoryItem {
        id: parse_uuid(&id)?,
        name,
        quantity,
        min_quantity,
        expiry_date,
        usage_rate,
        last_used_date,
    })
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ItemRow> {
    Ok((
        row.get::<_, String>(0)?,
        row.get::<_, String>(1)?,
        row.get::<_, i64>(2)?,
        row.get::<_, Option<i64>>(3)?,
        row.get::<_, Option<String>>(4)?,
        row.get::<_, Option<f64>>(5)?,
        row.get::<_, Option<String>>(6)?,
    ))
}

pub fn get_inventory_item(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<InventoryItem>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, name, quantity, min_quantity, expiry_date, usage_rate, last_used_date
             FROM inventory_items WHERE id = ?1",
            params![id.to_string()],
            map_row,
        )
        .optional()?;

    row.map(from_row).transpose()
}

pub fn list_inventory_items(conn: &Connection) -> Result<Vec<InventoryItem>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, quantity, min_quantity, expiry_date, usage_rate, last_used_date
         FROM inventory_items ORDER BY name",
    )?;
    let rows = stmt.query_map([], map_row)?;

    let mut items = Vec::new();
    for row in rows {
        items.push(from_row(row?)?);
    }
    Ok(items)
}

pub fn update_inventory_item(conn: &Connection, item: &InventoryItem) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE inventory_items SET name = ?2, quantity = ?3, min_quantity = ?4,
                expiry_date = ?5, usage_rate = ?6, last_used_date = ?7
         WHERE id = ?1",
        params![
            item.id.to_string(),
            item.name,
            item.quantity,
            item.min_quantity,
            item.expiry_date,
            item.usage_rate,
            item.last_used_date,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "inventory_item".into(),
            id: item.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_inventory_item(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM inventory_items WHERE id = ?1",
        params![id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "inventory_item".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}
