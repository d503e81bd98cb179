use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::AppointmentStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Option<Uuid>,
    pub title: String,
    /// "%Y-%m-%d %H:%M:%S" as entered by the scheduling UI. Kept raw because
    /// imported records may carry unparseable values; consumers validate and
    /// skip bad dates rather than rejecting the whole row.
    pub start_time: String,
    pub status: AppointmentStatus,
}
