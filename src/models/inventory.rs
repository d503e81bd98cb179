use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,
    pub quantity: i64,
    pub min_quantity: Option<i64>,
    /// Raw "%Y-%m-%d" date, validated at use.
    pub expiry_date: Option<String>,
    /// Average consumption in units per day, when tracked.
    pub usage_rate: Option<f64>,
    /// Raw "%Y-%m-%d" date of last recorded use.
    pub last_used_date: Option<String>,
}
