use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::config;
use crate::db::{repository, DatabaseError};
use crate::models::enums::{AlertKind, AlertPriority, TreatmentStatus};
use crate::models::{Alert, AlertReference};

use super::{patient_label, patient_names, AlertGenerator};

/// Stalled plans, follow-up notes and long-running complex work.
pub struct TreatmentAlertGenerator;

impl AlertGenerator for TreatmentAlertGenerator {
    fn name(&self) -> &'static str {
        "treatments"
    }

    fn generate(
        &self,
        conn: &Connection,
        now: NaiveDateTime,
    ) -> Result<Vec<Alert>, DatabaseError> {
        let names = patient_names(conn)?;

        let mut alerts = Vec::new();
        for treatment in repository::list_treatments(conn)? {
            let label = patient_label(&names, Some(treatment.patient_id));
            let base = |id: String, priority, title, description, action_required| Alert {
                id,
                kind: AlertKind::Treatment,
                priority,
                title,
                description,
                patient_id: Some(treatment.patient_id),
                patient_name: Some(label.clone()),
                reference: AlertReference::Treatment {
                    treatment_id: treatment.id,
                    appointment_id: treatment.appointment_id,
                },
                action_required,
                due_date: None,
                created_at: now,
                is_read: false,
                is_dismissed: false,
                snoozed_until: None,
            };

            let days_open = (now - treatment.created_at).num_days();

            if matches!(
                treatment.status,
                TreatmentStatus::Planned | TreatmentStatus::InProgress
            ) && days_open > config::TREATMENT_PENDING_DAYS
            {
                let priority = if days_open > config::TREATMENT_PENDING_HIGH_DAYS {
                    AlertPriority::High
                } else {
                    AlertPriority::Medium
                };
                alerts.push(base(
                    format!("treatment_pending_{}", treatment.id),
                    priority,
                    format!("Stalled treatment - {label}"),
                    format!(
                        "{} on tooth {} open for {days_open} days without completion",
                        treatment.treatment_type, treatment.tooth_number
                    ),
                    true,
                ));
            }

            if treatment.status == TreatmentStatus::Completed {
                let flagged = treatment
                    .notes
                    .as_deref()
                    .is_some_and(|n| config::contains_keyword(n, config::FOLLOW_UP_KEYWORDS));
                let since_done =
                    (now - treatment.updated_at.unwrap_or(treatment.created_at)).num_days();
                if flagged && since_done > config::TREATMENT_FOLLOW_UP_DAYS {
                    alerts.push(base(
                        format!("treatment_followup_{}", treatment.id),
                        AlertPriority::Medium,
                        format!("Treatment follow-up due - {label}"),
                        format!(
                            "{} finished {since_done} days ago with a follow-up note",
                            treatment.treatment_type
                        ),
                        true,
                    ));
                }
            }

            if treatment.status != TreatmentStatus::Completed
                && config::contains_keyword(
                    &treatment.treatment_type,
                    config::COMPLEX_TREATMENT_KEYWORDS,
                )
                && days_open > config::TREATMENT_COMPLEX_DAYS
            {
                alerts.push(base(
                    format!("treatment_complex_{}", treatment.id),
                    AlertPriority::Medium,
                    format!("Long-running complex treatment - {label}"),
                    format!(
                        "{} started {days_open} days ago and may need a progress check",
                        treatment.treatment_type
                    ),
                    false,
                ));
            }
        }
        Ok(alerts)
    }
}
