use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::config;
use crate::db::{repository, DatabaseError};
use crate::models::enums::{AlertKind, AlertPriority};
use crate::models::{Alert, AlertReference};

use super::{parse_entity_date, AlertGenerator};

/// Clinic consumables: expiry, stock level, burn rate and shelf rot.
pub struct InventoryAlertGenerator;

impl AlertGenerator for InventoryAlertGenerator {
    fn name(&self) -> &'static str {
        "inventory"
    }

    fn generate(
        &self,
        conn: &Connection,
        now: NaiveDateTime,
    ) -> Result<Vec<Alert>, DatabaseError> {
        let today = now.date();

        let mut alerts = Vec::new();
        for item in repository::list_inventory_items(conn)? {
            let base = |id: String, priority, title, description, action_required, due_date| Alert {
                id,
                kind: AlertKind::Inventory,
                priority,
                title,
                description,
                patient_id: None,
                patient_name: None,
                reference: AlertReference::Inventory {
                    inventory_id: item.id,
                },
                action_required,
                due_date,
                created_at: now,
                is_read: false,
                is_dismissed: false,
                snoozed_until: None,
            };

            if let Some(raw) = &item.expiry_date {
                if let Some(expiry) = parse_entity_date(raw, "inventory item", &item.id) {
                    let days_until = (expiry - today).num_days();
                    if days_until < 0 {
                        alerts.push(base(
                            format!("inventory_expired_{}", item.id),
                            AlertPriority::High,
                            format!("Expired stock - {}", item.name),
                            format!("{} expired {} days ago", item.name, -days_until),
                            true,
                            expiry.and_hms_opt(0, 0, 0),
                        ));
                    } else if days_until <= config::EXPIRY_WARNING_DAYS {
                        let priority = if days_until <= config::EXPIRY_URGENT_DAYS {
                            AlertPriority::High
                        } else {
                            AlertPriority::Medium
                        };
                        alerts.push(base(
                            format!("inventory_expiry_{}", item.id),
                            priority,
                            format!("Stock expiring - {}", item.name),
                            format!("{} expires in {days_until} days", item.name),
                            true,
                            expiry.and_hms_opt(0, 0, 0),
                        ));
                    }
                }
            }

            let min = item
                .min_quantity
                .unwrap_or(config::INVENTORY_DEFAULT_MIN_QUANTITY);
            if item.quantity <= min {
                let priority = if item.quantity == 0 {
                    AlertPriority::High
                } else {
                    AlertPriority::Medium
                };
                alerts.push(base(
                    format!("inventory_low_{}", item.id),
                    priority,
                    format!("Low stock - {}", item.name),
                    format!("{} units left (minimum {min})", item.quantity),
                    true,
                    None,
                ));
            }

            // Projected stock-out from the tracked burn rate.
            if let Some(rate) = item.usage_rate {
                if rate > 0.0 && item.quantity > 0 {
                    let days_until_empty = (item.quantity as f64 / rate).floor() as i64;
                    if days_until_empty <= config::STOCK_OUT_WARNING_DAYS {
                        let priority = if days_until_empty <= config::STOCK_OUT_URGENT_DAYS {
                            AlertPriority::High
                        } else {
                            AlertPriority::Medium
                        };
                        alerts.push(base(
                            format!("inventory_high_usage_{}", item.id),
                            priority,
                            format!("Stock running out - {}", item.name),
                            format!(
                                "At the current usage rate {} will run out in about {days_until_empty} days",
                                item.name
                            ),
                            true,
                            None,
                        ));
                    }
                }
            }

            if let Some(raw) = &item.last_used_date {
                if let Some(last_used) = parse_entity_date(raw, "inventory item", &item.id) {
                    let idle_days = (today - last_used).num_days();
                    if idle_days > config::INVENTORY_UNUSED_DAYS {
                        alerts.push(base(
                            format!("inventory_unused_{}", item.id),
                            AlertPriority::Low,
                            format!("Unused stock - {}", item.name),
                            format!("{} has not been used for {idle_days} days", item.name),
                            false,
                            None,
                        ));
                    }
                }
            }
        }
        Ok(alerts)
    }
}
