use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::config;
use crate::db::{repository, DatabaseError};
use crate::models::enums::{AlertKind, AlertPriority, LabOrderStatus};
use crate::models::{Alert, AlertReference};

use super::{parse_entity_date, patient_label, patient_names, AlertGenerator};

/// External lab work: late deliveries, imminent deliveries, open balances.
///
/// The balance condition is emitted under the payment kind so it lands in the
/// finance view, but both alerts carry the same lab order reference.
pub struct LabOrderAlertGenerator;

impl AlertGenerator for LabOrderAlertGenerator {
    fn name(&self) -> &'static str {
        "lab_orders"
    }

    fn generate(
        &self,
        conn: &Connection,
        now: NaiveDateTime,
    ) -> Result<Vec<Alert>, DatabaseError> {
        let names = patient_names(conn)?;
        let today = now.date();

        let mut alerts = Vec::new();
        for order in repository::list_lab_orders(conn)? {
            let label = patient_label(&names, order.patient_id);
            let reference = AlertReference::LabOrder {
                lab_order_id: order.id,
                lab_id: order.lab_id,
            };
            let base = |id: String, kind, priority, title, description, action_required, due_date| {
                Alert {
                    id,
                    kind,
                    priority,
                    title,
                    description,
                    patient_id: order.patient_id,
                    patient_name: order.patient_id.map(|_| label.clone()),
                    reference: reference.clone(),
                    action_required,
                    due_date,
                    created_at: now,
                    is_read: false,
                    is_dismissed: false,
                    snoozed_until: None,
                }
            };

            if order.status == LabOrderStatus::Pending {
                if let Some(raw) = &order.expected_delivery_date {
                    if let Some(expected) = parse_entity_date(raw, "lab order", &order.id) {
                        let days_late = (today - expected).num_days();
                        if days_late > 0 {
                            let priority = if days_late > config::LAB_ORDER_OVERDUE_HIGH_DAYS {
                                AlertPriority::High
                            } else {
                                AlertPriority::Medium
                            };
                            alerts.push(base(
                                format!("lab_order_overdue_{}", order.id),
                                AlertKind::LabOrder,
                                priority,
                                format!("Lab work overdue - {}", order.service_name),
                                format!(
                                    "{} was expected {days_late} days ago",
                                    order.service_name
                                ),
                                true,
                                expected.and_hms_opt(0, 0, 0),
                            ));
                        } else if -days_late <= config::LAB_ORDER_DUE_SOON_DAYS {
                            alerts.push(base(
                                format!("lab_order_due_soon_{}", order.id),
                                AlertKind::LabOrder,
                                AlertPriority::Low,
                                format!("Lab work arriving - {}", order.service_name),
                                format!(
                                    "{} is expected within {} days",
                                    order.service_name,
                                    -days_late
                                ),
                                false,
                                expected.and_hms_opt(0, 0, 0),
                            ));
                        }
                    }
                }
            }

            if order.remaining_balance > 0.0 {
                alerts.push(base(
                    format!("lab_order_payment_{}", order.id),
                    AlertKind::Payment,
                    AlertPriority::Medium,
                    format!("Lab balance open - {}", order.service_name),
                    format!(
                        "{}$ still owed to the lab for {}",
                        order.remaining_balance, order.service_name
                    ),
                    true,
                    None,
                ));
            }
        }
        Ok(alerts)
    }
}
