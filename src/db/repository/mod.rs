//! Repository layer — entity-scoped database operations.
//!
//! One sub-module per clinic entity plus the persisted alert store. All
//! public functions are re-exported here.

mod alert;
mod appointment;
mod clinic_need;
mod inventory;
mod lab_order;
mod medication;
mod patient;
mod payment;
mod prescription;
mod treatment;

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use super::DatabaseError;

pub use alert::*;
pub use appointment::*;
pub use clinic_need::*;
pub use inventory::*;
pub use lab_order::*;
pub use medication::*;
pub use patient::*;
pub use payment::*;
pub use prescription::*;
pub use treatment::*;

pub(crate) const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";
pub(crate) const DATE_FMT: &str = "%Y-%m-%d";

pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(s).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))
}

pub(crate) fn parse_opt_uuid(s: Option<String>) -> Result<Option<Uuid>, DatabaseError> {
    s.as_deref().map(parse_uuid).transpose()
}

pub(crate) fn parse_datetime(s: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("Invalid timestamp {s:?}: {e}")))
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(s, DATE_FMT)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("Invalid date {s:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::enums::*;
    use crate::models::*;
    use chrono::NaiveDate;
    use rusqlite::Connection;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn ts(s: &str) -> NaiveDateTime {
        parse_datetime(s).unwrap()
    }

    fn make_patient(conn: &Connection, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        insert_patient(
            conn,
            &Patient {
                id,
                full_name: name.into(),
                phone: Some("0933-555-123".into()),
                email: None,
                date_added: ts("2025-01-10 09:00:00"),
            },
        )
        .unwrap();
        id
    }

    #[test]
    fn patient_insert_and_retrieve() {
        let conn = test_db();
        let id = make_patient(&conn, "Lina Haddad");
        let patient = get_patient(&conn, &id).unwrap().unwrap();
        assert_eq!(patient.full_name, "Lina Haddad");
        assert_eq!(patient.phone.as_deref(), Some("0933-555-123"));
        assert_eq!(patient.date_added, ts("2025-01-10 09:00:00"));
    }

    #[test]
    fn patient_update_and_delete() {
        let conn = test_db();
        let id = make_patient(&conn, "Omar Said");

        let mut patient = get_patient(&conn, &id).unwrap().unwrap();
        patient.email = Some("omar@example.com".into());
        update_patient(&conn, &patient).unwrap();
        let updated = get_patient(&conn, &id).unwrap().unwrap();
        assert_eq!(updated.email.as_deref(), Some("omar@example.com"));

        delete_patient(&conn, &id).unwrap();
        assert!(get_patient(&conn, &id).unwrap().is_none());
        assert!(delete_patient(&conn, &id).is_err());
    }

    #[test]
    fn appointment_round_trip() {
        let conn = test_db();
        let patient_id = make_patient(&conn, "Lina Haddad");
        let id = Uuid::new_v4();

        insert_appointment(
            &conn,
            &Appointment {
                id,
                patient_id: Some(patient_id),
                title: "Crown fitting".into(),
                start_time: "2025-06-02 14:00:00".into(),
                status: AppointmentStatus::Scheduled,
            },
        )
        .unwrap();

        let mut appt = get_appointment(&conn, &id).unwrap().unwrap();
        assert_eq!(appt.title, "Crown fitting");
        assert_eq!(appt.status, AppointmentStatus::Scheduled);

        appt.status = AppointmentStatus::Completed;
        update_appointment(&conn, &appt).unwrap();
        let updated = get_appointment(&conn, &id).unwrap().unwrap();
        assert_eq!(updated.status, AppointmentStatus::Completed);
    }

    #[test]
    fn appointment_foreign_key_enforced() {
        let conn = test_db();
        let result = insert_appointment(
            &conn,
            &Appointment {
                id: Uuid::new_v4(),
                patient_id: Some(Uuid::new_v4()), // Non-existent patient
                title: "Orphan".into(),
                start_time: "2025-06-02 14:00:00".into(),
                status: AppointmentStatus::Scheduled,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn payment_round_trip() {
        let conn = test_db();
        let patient_id = make_patient(&conn, "Omar Said");
        let id = Uuid::new_v4();

        insert_payment(
            &conn,
            &Payment {
                id,
                patient_id: Some(patient_id),
                appointment_id: None,
                amount: 250.0,
                remaining_balance: Some(150.0),
                status: PaymentStatus::Partial,
                payment_date: Some("2025-05-20 11:30:00".into()),
                notes: None,
            },
        )
        .unwrap();

        let payment = get_payment(&conn, &id).unwrap().unwrap();
        assert_eq!(payment.status, PaymentStatus::Partial);
        assert_eq!(payment.remaining_balance, Some(150.0));
    }

    #[test]
    fn treatment_requires_existing_patient() {
        let conn = test_db();
        let result = insert_treatment(
            &conn,
            &Treatment {
                id: Uuid::new_v4(),
                patient_id: Uuid::new_v4(), // Non-existent patient
                appointment_id: None,
                tooth_number: 36,
                treatment_type: "Root canal".into(),
                status: TreatmentStatus::Planned,
                notes: None,
                created_at: ts("2025-05-01 10:00:00"),
                updated_at: None,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn treatment_cascades_on_patient_delete() {
        let conn = test_db();
        let patient_id = make_patient(&conn, "Lina Haddad");
        let treatment_id = Uuid::new_v4();

        insert_treatment(
            &conn,
            &Treatment {
                id: treatment_id,
                patient_id,
                appointment_id: None,
                tooth_number: 36,
                treatment_type: "Root canal".into(),
                status: TreatmentStatus::InProgress,
                notes: Some("second session booked".into()),
                created_at: ts("2025-05-01 10:00:00"),
                updated_at: None,
            },
        )
        .unwrap();

        delete_patient(&conn, &patient_id).unwrap();
        assert!(get_treatment(&conn, &treatment_id).unwrap().is_none());
    }

    #[test]
    fn prescription_round_trip() {
        let conn = test_db();
        let patient_id = make_patient(&conn, "Omar Said");
        let id = Uuid::new_v4();

        insert_prescription(
            &conn,
            &Prescription {
                id,
                patient_id: Some(patient_id),
                appointment_id: None,
                treatment_id: None,
                prescription_date: NaiveDate::from_ymd_opt(2025, 5, 2).unwrap(),
                notes: Some("antibiotic course, follow up in a week".into()),
            },
        )
        .unwrap();

        let rx = get_prescription(&conn, &id).unwrap().unwrap();
        assert_eq!(rx.prescription_date, NaiveDate::from_ymd_opt(2025, 5, 2).unwrap());
        assert!(rx.notes.unwrap().contains("antibiotic"));
    }

    #[test]
    fn medication_and_inventory_round_trip() {
        let conn = test_db();
        let med_id = Uuid::new_v4();
        insert_medication(
            &conn,
            &Medication {
                id: med_id,
                name: "Amoxicillin 500mg".into(),
                quantity: 3,
                min_quantity: Some(20),
                expiry_date: Some("2025-09-01".into()),
            },
        )
        .unwrap();

        let item_id = Uuid::new_v4();
        insert_inventory_item(
            &conn,
            &InventoryItem {
                id: item_id,
                name: "Composite resin A2".into(),
                quantity: 0,
                min_quantity: Some(5),
                expiry_date: None,
                usage_rate: Some(0.5),
                last_used_date: Some("2025-04-01".into()),
            },
        )
        .unwrap();

        let med = get_medication(&conn, &med_id).unwrap().unwrap();
        assert_eq!(med.quantity, 3);
        let item = get_inventory_item(&conn, &item_id).unwrap().unwrap();
        assert_eq!(item.usage_rate, Some(0.5));
    }

    #[test]
    fn lab_order_and_clinic_need_round_trip() {
        let conn = test_db();
        let order_id = Uuid::new_v4();
        insert_lab_order(
            &conn,
            &LabOrder {
                id: order_id,
                service_name: "Zirconia crown".into(),
                patient_id: None,
                lab_id: Some(Uuid::new_v4()),
                status: LabOrderStatus::Pending,
                expected_delivery_date: Some("2025-06-10".into()),
                remaining_balance: 80.0,
            },
        )
        .unwrap();

        let need_id = Uuid::new_v4();
        insert_clinic_need(
            &conn,
            &ClinicNeed {
                id: need_id,
                need_name: "Autoclave".into(),
                quantity: 1,
                price: 4200.0,
                supplier: Some("MedSupply Co".into()),
                status: NeedStatus::Pending,
                priority: NeedPriority::Urgent,
                created_at: ts("2025-05-15 08:00:00"),
            },
        )
        .unwrap();

        let order = get_lab_order(&conn, &order_id).unwrap().unwrap();
        assert_eq!(order.status, LabOrderStatus::Pending);
        let need = get_clinic_need(&conn, &need_id).unwrap().unwrap();
        assert_eq!(need.priority, NeedPriority::Urgent);
    }

    fn make_alert(id: &str, created_at: &str) -> Alert {
        Alert {
            id: id.into(),
            kind: AlertKind::Inventory,
            priority: AlertPriority::Medium,
            title: "Low stock - Composite resin A2".into(),
            description: "Remaining quantity: 2".into(),
            patient_id: None,
            patient_name: None,
            reference: AlertReference::Inventory {
                inventory_id: Uuid::new_v4(),
            },
            action_required: true,
            due_date: None,
            created_at: ts(created_at),
            is_read: false,
            is_dismissed: false,
            snoozed_until: None,
        }
    }

    #[test]
    fn alert_insert_is_idempotent_per_id() {
        let conn = test_db();
        let alert = make_alert("inventory_low_abc", "2025-06-01 08:00:00");
        insert_alert(&conn, &alert).unwrap();
        insert_alert(&conn, &alert).unwrap();

        let stored = list_alerts(&conn).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, "inventory_low_abc");
    }

    #[test]
    fn alert_reference_survives_round_trip() {
        let conn = test_db();
        let alert = make_alert("inventory_low_xyz", "2025-06-01 08:00:00");
        insert_alert(&conn, &alert).unwrap();

        let stored = get_alert(&conn, "inventory_low_xyz").unwrap().unwrap();
        assert_eq!(stored.reference, alert.reference);
        assert!(stored.action_required);
    }

    #[test]
    fn alert_update_flags() {
        let conn = test_db();
        let mut alert = make_alert("inventory_low_upd", "2025-06-01 08:00:00");
        insert_alert(&conn, &alert).unwrap();

        alert.is_read = true;
        alert.is_dismissed = true;
        update_alert(&conn, &alert).unwrap();

        let stored = get_alert(&conn, "inventory_low_upd").unwrap().unwrap();
        assert!(stored.is_read);
        assert!(stored.is_dismissed);
    }

    #[test]
    fn alert_update_unknown_id_is_not_found() {
        let conn = test_db();
        let alert = make_alert("inventory_low_missing", "2025-06-01 08:00:00");
        assert!(matches!(
            update_alert(&conn, &alert),
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[test]
    fn clear_dismissed_removes_only_dismissed() {
        let conn = test_db();
        let mut dismissed = make_alert("inventory_low_a", "2025-06-01 08:00:00");
        dismissed.is_dismissed = true;
        insert_alert(&conn, &dismissed).unwrap();
        insert_alert(&conn, &make_alert("inventory_low_b", "2025-06-01 08:00:00")).unwrap();

        let removed = clear_dismissed(&conn).unwrap();
        assert_eq!(removed, 1);
        let remaining = list_alerts(&conn).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "inventory_low_b");
    }

    #[test]
    fn clear_expired_snoozed_wakes_lapsed_alerts() {
        let conn = test_db();
        let mut lapsed = make_alert("inventory_low_s1", "2025-06-01 08:00:00");
        lapsed.snoozed_until = Some(ts("2025-06-02 08:00:00"));
        insert_alert(&conn, &lapsed).unwrap();

        let mut active = make_alert("inventory_low_s2", "2025-06-01 08:00:00");
        active.snoozed_until = Some(ts("2025-06-09 08:00:00"));
        insert_alert(&conn, &active).unwrap();

        let woken = clear_expired_snoozed(&conn, ts("2025-06-03 00:00:00")).unwrap();
        assert_eq!(woken, 1);

        let s1 = get_alert(&conn, "inventory_low_s1").unwrap().unwrap();
        assert!(s1.snoozed_until.is_none());
        let s2 = get_alert(&conn, "inventory_low_s2").unwrap().unwrap();
        assert!(s2.snoozed_until.is_some());
    }
}
