use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{AlertKind, AlertPriority};

/// Typed back-reference from an alert to the entity that raised it.
///
/// Each variant carries exactly the ids relevant to that condition, so
/// cleanup and cascade deletion never have to probe an untyped bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum AlertReference {
    None,
    Appointment {
        appointment_id: Uuid,
    },
    Payment {
        payment_id: Uuid,
        appointment_id: Option<Uuid>,
    },
    Treatment {
        treatment_id: Uuid,
        appointment_id: Option<Uuid>,
    },
    Prescription {
        prescription_id: Uuid,
        appointment_id: Option<Uuid>,
        treatment_id: Option<Uuid>,
    },
    Medication {
        medication_id: Uuid,
    },
    Inventory {
        inventory_id: Uuid,
    },
    LabOrder {
        lab_order_id: Uuid,
        lab_id: Option<Uuid>,
    },
    ClinicNeed {
        need_id: Uuid,
    },
}

impl AlertReference {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Appointment this alert points at, directly or through another entity.
    pub fn appointment_id(&self) -> Option<Uuid> {
        match self {
            Self::Appointment { appointment_id } => Some(*appointment_id),
            Self::Payment { appointment_id, .. }
            | Self::Treatment { appointment_id, .. }
            | Self::Prescription { appointment_id, .. } => *appointment_id,
            _ => None,
        }
    }

    pub fn payment_id(&self) -> Option<Uuid> {
        match self {
            Self::Payment { payment_id, .. } => Some(*payment_id),
            _ => None,
        }
    }

    pub fn lab_order_id(&self) -> Option<Uuid> {
        match self {
            Self::LabOrder { lab_order_id, .. } => Some(*lab_order_id),
            _ => None,
        }
    }
}

/// A synthesized reminder surfaced to clinic staff.
///
/// Generated alerts use a deterministic id of the form
/// `<condition>_<sourceEntityId>` so an unchanged condition always re-maps to
/// the same row; user-created alerts get a randomized `custom_<uuid>` id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub priority: AlertPriority,
    pub title: String,
    pub description: String,
    pub patient_id: Option<Uuid>,
    pub patient_name: Option<String>,
    pub reference: AlertReference,
    pub action_required: bool,
    pub due_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub is_read: bool,
    pub is_dismissed: bool,
    pub snoozed_until: Option<NaiveDateTime>,
}

impl Alert {
    /// Weighted count of populated optional fields, used as the dedup
    /// tie-break when two colliding alerts share a timestamp.
    pub fn completeness_score(&self) -> u32 {
        let mut score = 0;
        if self.patient_id.is_some() {
            score += 2;
        }
        if self.patient_name.is_some() {
            score += 1;
        }
        if !self.reference.is_none() {
            score += 3;
        }
        if self.due_date.is_some() {
            score += 1;
        }
        if self.action_required {
            score += 1;
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn base_alert() -> Alert {
        Alert {
            id: "appointment_today_x".into(),
            kind: AlertKind::Appointment,
            priority: AlertPriority::High,
            title: "Appointment today".into(),
            description: "".into(),
            patient_id: None,
            patient_name: None,
            reference: AlertReference::None,
            action_required: false,
            due_date: None,
            created_at: NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            is_read: false,
            is_dismissed: false,
            snoozed_until: None,
        }
    }

    #[test]
    fn completeness_counts_populated_fields() {
        let mut alert = base_alert();
        assert_eq!(alert.completeness_score(), 0);

        alert.patient_id = Some(Uuid::new_v4());
        alert.patient_name = Some("Lina Haddad".into());
        alert.reference = AlertReference::Appointment {
            appointment_id: Uuid::new_v4(),
        };
        alert.action_required = true;
        assert_eq!(alert.completeness_score(), 7);

        alert.due_date = alert.created_at.into();
        assert_eq!(alert.completeness_score(), 8);
    }

    #[test]
    fn reference_exposes_indirect_appointment() {
        let appt = Uuid::new_v4();
        let via_payment = AlertReference::Payment {
            payment_id: Uuid::new_v4(),
            appointment_id: Some(appt),
        };
        assert_eq!(via_payment.appointment_id(), Some(appt));
        assert_eq!(AlertReference::None.appointment_id(), None);
    }

    #[test]
    fn reference_serializes_tagged() {
        let lab = Uuid::new_v4();
        let json = serde_json::to_string(&AlertReference::LabOrder {
            lab_order_id: lab,
            lab_id: None,
        })
        .unwrap();
        assert!(json.contains("\"entity\":\"lab_order\""));
        assert!(json.contains(&lab.to_string()));
    }
}
