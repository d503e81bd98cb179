use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::config;
use crate::db::{repository, DatabaseError};
use crate::models::enums::{AlertKind, AlertPriority, NeedPriority, NeedStatus};
use crate::models::{Alert, AlertReference};

use super::AlertGenerator;

/// Purchase requests: urgent asks, stuck orders, big-ticket approvals.
/// Filed under the inventory kind alongside the stock alerts.
pub struct ClinicNeedAlertGenerator;

impl AlertGenerator for ClinicNeedAlertGenerator {
    fn name(&self) -> &'static str {
        "clinic_needs"
    }

    fn generate(
        &self,
        conn: &Connection,
        now: NaiveDateTime,
    ) -> Result<Vec<Alert>, DatabaseError> {
        let mut alerts = Vec::new();
        for need in repository::list_clinic_needs(conn)? {
            let base = |id: String, priority, title, description, action_required| Alert {
                id,
                kind: AlertKind::Inventory,
                priority,
                title,
                description,
                patient_id: None,
                patient_name: None,
                reference: AlertReference::ClinicNeed { need_id: need.id },
                action_required,
                due_date: None,
                created_at: now,
                is_read: false,
                is_dismissed: false,
                snoozed_until: None,
            };

            if need.status == NeedStatus::Pending && need.priority == NeedPriority::Urgent {
                alerts.push(base(
                    format!("clinic_need_urgent_{}", need.id),
                    AlertPriority::High,
                    format!("Urgent purchase request - {}", need.need_name),
                    format!("{} is marked urgent and still unordered", need.need_name),
                    true,
                ));
            }

            if need.status == NeedStatus::Ordered {
                let days_ordered = (now - need.created_at).num_days();
                if days_ordered > config::CLINIC_NEED_DELAYED_DAYS {
                    let priority = if need.priority == NeedPriority::Urgent {
                        AlertPriority::High
                    } else {
                        AlertPriority::Medium
                    };
                    alerts.push(base(
                        format!("clinic_need_delayed_{}", need.id),
                        priority,
                        format!("Order not received - {}", need.need_name),
                        format!(
                            "{} was ordered {days_ordered} days ago and has not arrived",
                            need.need_name
                        ),
                        true,
                    ));
                }
            }

            if need.status == NeedStatus::Pending && need.price > config::CLINIC_NEED_APPROVAL_PRICE
            {
                alerts.push(base(
                    format!("clinic_need_expensive_{}", need.id),
                    AlertPriority::Medium,
                    format!("Purchase needs approval - {}", need.need_name),
                    format!(
                        "{} is priced at {}$ and needs sign-off before ordering",
                        need.need_name, need.price
                    ),
                    true,
                ));
            }
        }
        Ok(alerts)
    }
}
