use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::LabOrderStatus;

/// Work sent out to an external dental lab (crowns, dentures, aligners).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabOrder {
    pub id: Uuid,
    pub service_name: String,
    pub patient_id: Option<Uuid>,
    pub lab_id: Option<Uuid>,
    pub status: LabOrderStatus,
    /// Raw "%Y-%m-%d" date, validated at use.
    pub expected_delivery_date: Option<String>,
    pub remaining_balance: f64,
}
