//! Per-domain alert generators.
//!
//! Each generator is a pure scan of one entity collection against "now":
//! it computes date deltas in whole days (hours for same-day reminders) and
//! emits candidate alerts when a threshold is crossed. Generators never touch
//! the alert store; the engine owns persistence and failure isolation.

pub mod appointment;
pub mod clinic_need;
pub mod follow_up;
pub mod inventory;
pub mod lab_order;
pub mod payment;
pub mod prescription;
pub mod treatment;

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::{repository, DatabaseError};
use crate::models::Alert;

/// One per entity domain. Self-contained, independently testable.
pub trait AlertGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Scan the database and return candidate alerts for `now`.
    fn generate(
        &self,
        conn: &Connection,
        now: NaiveDateTime,
    ) -> Result<Vec<Alert>, DatabaseError>;
}

/// The full generator set, in the order the engine runs them.
pub fn all_generators() -> Vec<Box<dyn AlertGenerator>> {
    vec![
        Box::new(appointment::AppointmentAlertGenerator),
        Box::new(payment::PaymentAlertGenerator),
        Box::new(treatment::TreatmentAlertGenerator),
        Box::new(prescription::PrescriptionAlertGenerator),
        Box::new(follow_up::FollowUpAlertGenerator),
        Box::new(inventory::InventoryAlertGenerator),
        Box::new(lab_order::LabOrderAlertGenerator),
        Box::new(clinic_need::ClinicNeedAlertGenerator),
    ]
}

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FMT: &str = "%Y-%m-%d";

/// Parse a raw entity timestamp; a missing or malformed value is logged and
/// the record is skipped rather than aborting the scan.
pub(crate) fn parse_entity_datetime(raw: &str, entity: &str, id: &Uuid) -> Option<NaiveDateTime> {
    match NaiveDateTime::parse_from_str(raw, DATETIME_FMT) {
        Ok(dt) => Some(dt),
        Err(_) => {
            tracing::warn!(%id, raw, "invalid {entity} timestamp, skipping record");
            None
        }
    }
}

pub(crate) fn parse_entity_date(raw: &str, entity: &str, id: &Uuid) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw, DATE_FMT) {
        Ok(d) => Some(d),
        Err(_) => {
            tracing::warn!(%id, raw, "invalid {entity} date, skipping record");
            None
        }
    }
}

/// Snapshot of patient display names, fetched once per generator run.
pub(crate) fn patient_names(conn: &Connection) -> Result<HashMap<Uuid, String>, DatabaseError> {
    let patients = repository::list_patients(conn)?;
    Ok(patients.into_iter().map(|p| (p.id, p.full_name)).collect())
}

pub(crate) fn patient_label(names: &HashMap<Uuid, String>, patient_id: Option<Uuid>) -> String {
    patient_id
        .and_then(|id| names.get(&id).cloned())
        .unwrap_or_else(|| "Unknown patient".into())
}
