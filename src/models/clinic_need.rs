use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{NeedPriority, NeedStatus};

/// Equipment or supply purchase request raised by clinic staff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicNeed {
    pub id: Uuid,
    pub need_name: String,
    pub quantity: i64,
    pub price: f64,
    pub supplier: Option<String>,
    pub status: NeedStatus,
    pub priority: NeedPriority,
    pub created_at: NaiveDateTime,
}
