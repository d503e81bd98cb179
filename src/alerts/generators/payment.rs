use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::config;
use crate::db::{repository, DatabaseError};
use crate::models::enums::{AlertKind, AlertPriority, PaymentStatus};
use crate::models::{Alert, AlertReference, Payment};

use super::{parse_entity_datetime, patient_label, patient_names, AlertGenerator};

/// Overdue, partial and rejected payments.
pub struct PaymentAlertGenerator;

impl AlertGenerator for PaymentAlertGenerator {
    fn name(&self) -> &'static str {
        "payments"
    }

    fn generate(
        &self,
        conn: &Connection,
        now: NaiveDateTime,
    ) -> Result<Vec<Alert>, DatabaseError> {
        let names = patient_names(conn)?;

        let mut alerts = Vec::new();
        for payment in repository::list_payments(conn)? {
            let label = patient_label(&names, payment.patient_id);
            let remaining = payment.remaining_balance.unwrap_or(0.0);
            let base = |id: String, priority, title, description, due_date| Alert {
                id,
                kind: AlertKind::Payment,
                priority,
                title,
                description,
                patient_id: payment.patient_id,
                patient_name: payment.patient_id.map(|_| label.clone()),
                reference: AlertReference::Payment {
                    payment_id: payment.id,
                    appointment_id: payment.appointment_id,
                },
                action_required: true,
                due_date,
                created_at: now,
                is_read: false,
                is_dismissed: false,
                snoozed_until: None,
            };

            match payment.status {
                PaymentStatus::Pending if remaining > 0.0 => {
                    let Some(since) = payment_date(&payment) else {
                        continue;
                    };
                    let days_overdue = (now - since).num_days();
                    if days_overdue > 0 {
                        let priority = if days_overdue > config::PAYMENT_OVERDUE_HIGH_DAYS {
                            AlertPriority::High
                        } else {
                            AlertPriority::Medium
                        };
                        alerts.push(base(
                            format!("payment_overdue_{}", payment.id),
                            priority,
                            format!("Overdue payment - {label}"),
                            format!(
                                "Payment pending for {days_overdue} days, outstanding balance {remaining}$"
                            ),
                            Some(since),
                        ));
                    }
                }
                PaymentStatus::Partial if remaining > 0.0 => {
                    alerts.push(base(
                        format!("payment_partial_{}", payment.id),
                        AlertPriority::Medium,
                        format!("Partial payment - {label}"),
                        format!(
                            "Paid {}$ so far, {remaining}$ still due",
                            payment.amount
                        ),
                        payment_date(&payment),
                    ));
                }
                PaymentStatus::Failed | PaymentStatus::Rejected => {
                    let note = payment
                        .notes
                        .clone()
                        .unwrap_or_else(|| "needs review".into());
                    alerts.push(base(
                        format!("payment_failed_{}", payment.id),
                        AlertPriority::High,
                        format!("Failed payment - {label}"),
                        format!("Payment of {}$ did not go through: {note}", payment.amount),
                        payment_date(&payment),
                    ));
                }
                _ => {}
            }
        }
        Ok(alerts)
    }
}

/// Missing payment dates are logged and treated as not-yet-due.
fn payment_date(payment: &Payment) -> Option<NaiveDateTime> {
    match &payment.payment_date {
        Some(raw) => parse_entity_datetime(raw, "payment", &payment.id),
        None => {
            tracing::warn!(id = %payment.id, "payment has no payment_date, skipping");
            None
        }
    }
}
