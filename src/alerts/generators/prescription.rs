use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::config;
use crate::db::{repository, DatabaseError};
use crate::models::enums::{AlertKind, AlertPriority};
use crate::models::{Alert, AlertReference};

use super::{parse_entity_date, patient_label, patient_names, AlertGenerator};

/// Ageing prescriptions plus the medication stock that backs them.
pub struct PrescriptionAlertGenerator;

impl AlertGenerator for PrescriptionAlertGenerator {
    fn name(&self) -> &'static str {
        "prescriptions"
    }

    fn generate(
        &self,
        conn: &Connection,
        now: NaiveDateTime,
    ) -> Result<Vec<Alert>, DatabaseError> {
        let names = patient_names(conn)?;
        let today = now.date();

        let mut alerts = Vec::new();
        for rx in repository::list_prescriptions(conn)? {
            let label = patient_label(&names, rx.patient_id);
            let base = |id: String, priority, title, description, action_required| Alert {
                id,
                kind: AlertKind::Prescription,
                priority,
                title,
                description,
                patient_id: rx.patient_id,
                patient_name: rx.patient_id.map(|_| label.clone()),
                reference: AlertReference::Prescription {
                    prescription_id: rx.id,
                    appointment_id: rx.appointment_id,
                    treatment_id: rx.treatment_id,
                },
                action_required,
                due_date: None,
                created_at: now,
                is_read: false,
                is_dismissed: false,
                snoozed_until: None,
            };

            let days_old = (today - rx.prescription_date).num_days();
            let notes = rx.notes.as_deref().unwrap_or("");

            if days_old > config::PRESCRIPTION_RENEWAL_DAYS {
                alerts.push(base(
                    format!("prescription_old_{}", rx.id),
                    AlertPriority::Medium,
                    format!("Prescription may need renewal - {label}"),
                    format!("Issued {days_old} days ago"),
                    false,
                ));
            }

            if config::contains_keyword(notes, config::FOLLOW_UP_KEYWORDS)
                && days_old > config::PRESCRIPTION_FOLLOW_UP_DAYS
            {
                alerts.push(base(
                    format!("prescription_followup_{}", rx.id),
                    AlertPriority::Medium,
                    format!("Prescription follow-up due - {label}"),
                    format!("Follow-up noted on prescription issued {days_old} days ago"),
                    true,
                ));
            }

            if config::contains_keyword(notes, config::IMPORTANT_MEDICATION_KEYWORDS)
                && days_old > config::PRESCRIPTION_IMPORTANT_MED_DAYS
            {
                alerts.push(base(
                    format!("prescription_important_med_{}", rx.id),
                    AlertPriority::Medium,
                    format!("Review controlled medication - {label}"),
                    format!("Prescription with a monitored medication is {days_old} days old"),
                    true,
                ));
            }

            if notes.trim().is_empty() {
                alerts.push(base(
                    format!("prescription_no_notes_{}", rx.id),
                    AlertPriority::Low,
                    format!("Prescription missing notes - {label}"),
                    "No dosage or instruction notes recorded".into(),
                    false,
                ));
            }
        }

        // Pharmacy stock rides in the prescription scan so renewal and
        // availability problems surface together.
        for med in repository::list_medications(conn)? {
            let med_base = |id: String, priority, title, description, due_date| Alert {
                id,
                kind: AlertKind::Prescription,
                priority,
                title,
                description,
                patient_id: None,
                patient_name: None,
                reference: AlertReference::Medication {
                    medication_id: med.id,
                },
                action_required: true,
                due_date,
                created_at: now,
                is_read: false,
                is_dismissed: false,
                snoozed_until: None,
            };

            if let Some(raw) = &med.expiry_date {
                if let Some(expiry) = parse_entity_date(raw, "medication", &med.id) {
                    let days_until = (expiry - today).num_days();
                    if (0..=config::EXPIRY_WARNING_DAYS).contains(&days_until) {
                        let priority = if days_until <= config::EXPIRY_URGENT_DAYS {
                            AlertPriority::High
                        } else {
                            AlertPriority::Medium
                        };
                        alerts.push(med_base(
                            format!("medication_expiry_warning_{}", med.id),
                            priority,
                            format!("Medication expiring - {}", med.name),
                            format!("{} expires in {days_until} days", med.name),
                            expiry.and_hms_opt(0, 0, 0),
                        ));
                    }
                }
            }

            let min = med
                .min_quantity
                .unwrap_or(config::MEDICATION_DEFAULT_MIN_QUANTITY);
            if med.quantity <= min {
                let priority = if med.quantity == 0 {
                    AlertPriority::High
                } else {
                    AlertPriority::Medium
                };
                alerts.push(med_base(
                    format!("medication_low_stock_{}", med.id),
                    priority,
                    format!("Medication low in stock - {}", med.name),
                    format!("{} units left (minimum {min})", med.quantity),
                    None,
                ));
            }
        }
        Ok(alerts)
    }
}
