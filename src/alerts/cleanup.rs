//! Removal of alerts whose underlying condition has lapsed.
//!
//! Runs at the top of every refresh, before generation, so stale rows never
//! reach the caller. Entity collections are snapshotted once per pass; a
//! failed per-alert delete is logged and the pass moves on.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};
use rusqlite::Connection;
use uuid::Uuid;

use crate::config;
use crate::db::{repository, DatabaseError};
use crate::models::enums::{AppointmentStatus, PaymentStatus};
use crate::models::{Alert, Appointment, Payment};

/// Delete outdated alerts and return how many were removed.
pub fn remove_outdated(conn: &Connection, now: NaiveDateTime) -> Result<usize, DatabaseError> {
    let appointments: HashMap<Uuid, Appointment> = repository::list_appointments(conn)?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();
    let payments: HashMap<Uuid, Payment> = repository::list_payments(conn)?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let mut removed = 0;
    for alert in repository::list_alerts(conn)? {
        if !is_outdated(&alert, &appointments, &payments, now) {
            continue;
        }
        match repository::delete_alert(conn, &alert.id) {
            Ok(()) => removed += 1,
            Err(err) => {
                tracing::warn!(id = %alert.id, %err, "failed to remove outdated alert");
            }
        }
    }
    if removed > 0 {
        tracing::debug!(removed, "cleaned up outdated alerts");
    }
    Ok(removed)
}

fn is_outdated(
    alert: &Alert,
    appointments: &HashMap<Uuid, Appointment>,
    payments: &HashMap<Uuid, Payment>,
    now: NaiveDateTime,
) -> bool {
    if alert.is_dismissed
        && (now - alert.created_at).num_days() > config::DISMISSED_ALERT_RETENTION_DAYS
    {
        return true;
    }

    if let Some(appointment_id) = alert.reference.appointment_id() {
        if let Some(appt) = appointments.get(&appointment_id) {
            if matches!(
                appt.status,
                AppointmentStatus::Completed | AppointmentStatus::Cancelled
            ) {
                return true;
            }
            if let Ok(start) =
                NaiveDateTime::parse_from_str(&appt.start_time, "%Y-%m-%d %H:%M:%S")
            {
                if start + Duration::days(config::APPOINTMENT_ALERT_RETENTION_DAYS) < now {
                    return true;
                }
            }
        }
    }

    if let Some(payment_id) = alert.reference.payment_id() {
        if let Some(payment) = payments.get(&payment_id) {
            if payment.status == PaymentStatus::Completed
                || payment.remaining_balance.unwrap_or(0.0) <= 0.0
            {
                return true;
            }
        }
    }

    false
}
