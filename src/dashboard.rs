//! Clinic dashboard — aggregated counters for the landing screen.
//!
//! Single fetch for everything the dashboard shows, computed with SQL
//! aggregates so no entity collection is materialized just to be counted.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::db::{repository, DatabaseError};
use crate::models::Appointment;

/// Outstanding money across payments and lab orders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub pending_payments: f64,
    pub lab_order_balance: f64,
}

/// Alert counters for the dashboard badge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertCounts {
    pub total: u32,
    pub unread: u32,
    pub high_priority: u32,
    pub action_required: u32,
}

/// Dashboard data — single fetch for all landing-screen content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_patients: u32,
    pub total_appointments: u32,
    pub todays_appointments: Vec<Appointment>,
    pub balances: BalanceSummary,
    pub low_stock_items: u32,
    pub alerts: AlertCounts,
}

fn count(conn: &Connection, sql: &str) -> Result<u32, DatabaseError> {
    Ok(conn.query_row(sql, [], |row| row.get::<_, u32>(0))?)
}

/// Assemble the full dashboard for the day containing `now`.
pub fn fetch_dashboard_summary(
    conn: &Connection,
    now: NaiveDateTime,
) -> Result<DashboardSummary, DatabaseError> {
    let total_patients = count(conn, "SELECT COUNT(*) FROM patients")?;
    let total_appointments = count(conn, "SELECT COUNT(*) FROM appointments")?;

    // start_time is stored as "%Y-%m-%d %H:%M:%S" text, so a day is a prefix
    // range scan. Rows with unparseable dates simply fall outside the range.
    let day_prefix = now.date().format("%Y-%m-%d").to_string();
    let todays_appointments = repository::list_appointments(conn)?
        .into_iter()
        .filter(|appt| appt.start_time.starts_with(&day_prefix))
        .collect();

    let pending_payments: f64 = conn.query_row(
        "SELECT COALESCE(SUM(remaining_balance), 0.0) FROM payments
         WHERE status IN ('pending', 'partial') AND remaining_balance > 0",
        [],
        |row| row.get(0),
    )?;
    let lab_order_balance: f64 = conn.query_row(
        "SELECT COALESCE(SUM(remaining_balance), 0.0) FROM lab_orders
         WHERE remaining_balance > 0",
        [],
        |row| row.get(0),
    )?;

    let low_stock_items: u32 = conn.query_row(
        "SELECT COUNT(*) FROM inventory_items
         WHERE quantity <= COALESCE(min_quantity, ?1)",
        params![config::INVENTORY_DEFAULT_MIN_QUANTITY],
        |row| row.get(0),
    )?;

    let alerts = conn.query_row(
        "SELECT COUNT(*),
                COALESCE(SUM(is_read = 0), 0),
                COALESCE(SUM(priority = 'high'), 0),
                COALESCE(SUM(action_required = 1), 0)
         FROM smart_alerts WHERE is_dismissed = 0",
        [],
        |row| {
            Ok(AlertCounts {
                total: row.get(0)?,
                unread: row.get(1)?,
                high_priority: row.get(2)?,
                action_required: row.get(3)?,
            })
        },
    )?;

    Ok(DashboardSummary {
        total_patients,
        total_appointments,
        todays_appointments,
        balances: BalanceSummary {
            pending_payments,
            lab_order_balance,
        },
        low_stock_items,
        alerts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::enums::*;
    use crate::models::*;
    use uuid::Uuid;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn empty_database_yields_zeroed_summary() {
        let conn = open_memory_database().unwrap();
        let summary = fetch_dashboard_summary(&conn, ts("2025-06-10 09:00:00")).unwrap();

        assert_eq!(summary.total_patients, 0);
        assert_eq!(summary.todays_appointments.len(), 0);
        assert_eq!(summary.balances.pending_payments, 0.0);
        assert_eq!(summary.alerts.total, 0);
    }

    #[test]
    fn counters_reflect_seeded_clinic() {
        let conn = open_memory_database().unwrap();
        let patient = Uuid::new_v4();
        repository::insert_patient(
            &conn,
            &Patient {
                id: patient,
                full_name: "Lina Haddad".into(),
                phone: None,
                email: None,
                date_added: ts("2025-01-01 08:00:00"),
            },
        )
        .unwrap();

        for (start, status) in [
            ("2025-06-10 09:30:00", AppointmentStatus::Scheduled),
            ("2025-06-10 14:00:00", AppointmentStatus::Confirmed),
            ("2025-06-12 10:00:00", AppointmentStatus::Scheduled),
        ] {
            repository::insert_appointment(
                &conn,
                &Appointment {
                    id: Uuid::new_v4(),
                    patient_id: Some(patient),
                    title: "Visit".into(),
                    start_time: start.into(),
                    status,
                },
            )
            .unwrap();
        }

        repository::insert_payment(
            &conn,
            &Payment {
                id: Uuid::new_v4(),
                patient_id: Some(patient),
                appointment_id: None,
                amount: 100.0,
                remaining_balance: Some(150.0),
                status: PaymentStatus::Pending,
                payment_date: Some("2025-06-01 10:00:00".into()),
                notes: None,
            },
        )
        .unwrap();
        repository::insert_lab_order(
            &conn,
            &LabOrder {
                id: Uuid::new_v4(),
                service_name: "Crown".into(),
                patient_id: None,
                lab_id: None,
                status: LabOrderStatus::Pending,
                expected_delivery_date: None,
                remaining_balance: 80.0,
            },
        )
        .unwrap();
        repository::insert_inventory_item(
            &conn,
            &InventoryItem {
                id: Uuid::new_v4(),
                name: "Gloves".into(),
                quantity: 2,
                min_quantity: None,
                expiry_date: None,
                usage_rate: None,
                last_used_date: None,
            },
        )
        .unwrap();

        let summary = fetch_dashboard_summary(&conn, ts("2025-06-10 09:00:00")).unwrap();

        assert_eq!(summary.total_patients, 1);
        assert_eq!(summary.total_appointments, 3);
        assert_eq!(summary.todays_appointments.len(), 2);
        assert_eq!(summary.balances.pending_payments, 150.0);
        assert_eq!(summary.balances.lab_order_balance, 80.0);
        assert_eq!(summary.low_stock_items, 1);
    }

    #[test]
    fn alert_counters_exclude_dismissed() {
        let conn = open_memory_database().unwrap();
        for (id, priority, is_read, is_dismissed, action_required) in [
            ("a", AlertPriority::High, false, false, true),
            ("b", AlertPriority::Low, true, false, false),
            ("c", AlertPriority::High, false, true, true),
        ] {
            repository::insert_alert(
                &conn,
                &Alert {
                    id: id.into(),
                    kind: AlertKind::Inventory,
                    priority,
                    title: id.into(),
                    description: "".into(),
                    patient_id: None,
                    patient_name: None,
                    reference: AlertReference::None,
                    action_required,
                    due_date: None,
                    created_at: ts("2025-06-10 08:00:00"),
                    is_read,
                    is_dismissed,
                    snoozed_until: None,
                },
            )
            .unwrap();
        }

        let summary = fetch_dashboard_summary(&conn, ts("2025-06-10 09:00:00")).unwrap();

        assert_eq!(summary.alerts.total, 2);
        assert_eq!(summary.alerts.unread, 1);
        assert_eq!(summary.alerts.high_priority, 1);
        assert_eq!(summary.alerts.action_required, 1);
    }
}
