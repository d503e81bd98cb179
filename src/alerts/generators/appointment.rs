use chrono::{Duration, NaiveDateTime};
use rusqlite::Connection;

use crate::config;
use crate::db::{repository, DatabaseError};
use crate::models::enums::{AlertKind, AlertPriority, AppointmentStatus};
use crate::models::{Alert, AlertReference};

use super::{parse_entity_datetime, patient_label, patient_names, AlertGenerator};

/// Same-day, upcoming and missed appointments.
pub struct AppointmentAlertGenerator;

impl AlertGenerator for AppointmentAlertGenerator {
    fn name(&self) -> &'static str {
        "appointments"
    }

    fn generate(
        &self,
        conn: &Connection,
        now: NaiveDateTime,
    ) -> Result<Vec<Alert>, DatabaseError> {
        let names = patient_names(conn)?;
        let today = now.date();
        let tomorrow = today + Duration::days(1);

        let mut alerts = Vec::new();
        for appt in repository::list_appointments(conn)? {
            let Some(start) = parse_entity_datetime(&appt.start_time, "appointment", &appt.id)
            else {
                continue;
            };

            let label = patient_label(&names, appt.patient_id);
            let reference = AlertReference::Appointment {
                appointment_id: appt.id,
            };
            let base = |id: String, priority, title, description, action_required| Alert {
                id,
                kind: AlertKind::Appointment,
                priority,
                title,
                description,
                patient_id: appt.patient_id,
                patient_name: appt.patient_id.map(|_| label.clone()),
                reference: reference.clone(),
                action_required,
                due_date: Some(start),
                created_at: now,
                is_read: false,
                is_dismissed: false,
                snoozed_until: None,
            };

            if appt.status == AppointmentStatus::Scheduled {
                if start.date() == today {
                    alerts.push(base(
                        format!("appointment_today_{}", appt.id),
                        AlertPriority::High,
                        format!("Appointment today - {label}"),
                        format!(
                            "{} scheduled today at {}",
                            appt.title,
                            start.format("%H:%M")
                        ),
                        true,
                    ));
                } else if start.date() == tomorrow {
                    alerts.push(base(
                        format!("appointment_tomorrow_{}", appt.id),
                        AlertPriority::Medium,
                        format!("Appointment tomorrow - {label}"),
                        format!(
                            "{} scheduled tomorrow at {}",
                            appt.title,
                            start.format("%H:%M")
                        ),
                        false,
                    ));
                }

                if start < now {
                    let days_late = (now - start).num_days();
                    alerts.push(base(
                        format!("appointment_overdue_{}", appt.id),
                        AlertPriority::High,
                        format!("Missed appointment - {label}"),
                        format!(
                            "{} was due {} and is still marked scheduled ({days_late} days late)",
                            appt.title,
                            start.format("%Y-%m-%d %H:%M")
                        ),
                        true,
                    ));
                }
            }

            // Short-horizon reminder for today's confirmed or scheduled visits.
            if matches!(
                appt.status,
                AppointmentStatus::Scheduled | AppointmentStatus::Confirmed
            ) && start.date() == today
                && start > now
            {
                let hours_until = (start - now).num_minutes() as f64 / 60.0;
                if (config::APPOINTMENT_REMINDER_MIN_HOURS..=config::APPOINTMENT_REMINDER_MAX_HOURS)
                    .contains(&hours_until)
                {
                    alerts.push(base(
                        format!("appointment_reminder_{}", appt.id),
                        AlertPriority::Medium,
                        format!("Upcoming appointment - {label}"),
                        format!(
                            "{} starts at {} (in about {:.0} hours)",
                            appt.title,
                            start.format("%H:%M"),
                            hours_until
                        ),
                        false,
                    ));
                }
            }
        }
        Ok(alerts)
    }
}
