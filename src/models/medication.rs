use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pharmacy stock entry backing the prescription workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    pub id: Uuid,
    pub name: String,
    pub quantity: i64,
    pub min_quantity: Option<i64>,
    /// Raw "%Y-%m-%d" date, validated at use.
    pub expiry_date: Option<String>,
}
