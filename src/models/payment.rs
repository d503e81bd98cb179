use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::PaymentStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub patient_id: Option<Uuid>,
    pub appointment_id: Option<Uuid>,
    pub amount: f64,
    pub remaining_balance: Option<f64>,
    pub status: PaymentStatus,
    /// Raw "%Y-%m-%d %H:%M:%S" timestamp, validated at use.
    pub payment_date: Option<String>,
    pub notes: Option<String>,
}
