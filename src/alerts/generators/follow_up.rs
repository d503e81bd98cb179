use std::collections::HashMap;

use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::config;
use crate::db::{repository, DatabaseError};
use crate::models::enums::{AlertKind, AlertPriority, AppointmentStatus};
use crate::models::{Alert, AlertReference};

use super::{parse_entity_datetime, AlertGenerator};

/// Patients who have not been seen since the recall window lapsed.
///
/// Keyed on the patient rather than any single visit, so one recall alert
/// stands per patient no matter how many completed appointments they have.
pub struct FollowUpAlertGenerator;

impl AlertGenerator for FollowUpAlertGenerator {
    fn name(&self) -> &'static str {
        "follow_ups"
    }

    fn generate(
        &self,
        conn: &Connection,
        now: NaiveDateTime,
    ) -> Result<Vec<Alert>, DatabaseError> {
        let mut last_visit: HashMap<uuid::Uuid, NaiveDateTime> = HashMap::new();
        for appt in repository::list_appointments(conn)? {
            if appt.status != AppointmentStatus::Completed {
                continue;
            }
            let Some(patient_id) = appt.patient_id else {
                continue;
            };
            let Some(start) = parse_entity_datetime(&appt.start_time, "appointment", &appt.id)
            else {
                continue;
            };
            last_visit
                .entry(patient_id)
                .and_modify(|latest| {
                    if start > *latest {
                        *latest = start;
                    }
                })
                .or_insert(start);
        }

        let mut alerts = Vec::new();
        for (patient_id, visited) in last_visit {
            let days_since = (now - visited).num_days();
            if days_since < config::FOLLOW_UP_RECALL_DAYS {
                continue;
            }
            // Patient may have been deleted since the visit.
            let Some(patient) = repository::get_patient(conn, &patient_id)? else {
                continue;
            };
            alerts.push(Alert {
                id: format!("follow_up_{patient_id}"),
                kind: AlertKind::FollowUp,
                priority: AlertPriority::Low,
                title: format!("Recall due - {}", patient.full_name),
                description: format!("Last visit was {days_since} days ago"),
                patient_id: Some(patient_id),
                patient_name: Some(patient.full_name),
                reference: AlertReference::None,
                action_required: false,
                due_date: None,
                created_at: now,
                is_read: false,
                is_dismissed: false,
                snoozed_until: None,
            });
        }
        Ok(alerts)
    }
}
