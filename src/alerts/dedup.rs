//! Duplicate collapse and presentation ordering.
//!
//! Dedup runs in two passes. The id pass catches the same condition
//! regenerated across runs; the content pass catches distinct ids that would
//! read identically to staff (same kind, patient, title and back-reference).
//! On a collision the newer alert wins, and a timestamp tie falls back to
//! whichever copy carries more information.

use std::collections::HashMap;

use crate::models::Alert;

pub fn remove_duplicates(alerts: Vec<Alert>) -> Vec<Alert> {
    let first_pass = collapse(alerts, |alert| alert.id.clone());
    collapse(first_pass, content_key)
}

fn collapse(alerts: Vec<Alert>, key_of: impl Fn(&Alert) -> String) -> Vec<Alert> {
    let mut order: Vec<String> = Vec::new();
    let mut kept: HashMap<String, Alert> = HashMap::new();
    for alert in alerts {
        let key = key_of(&alert);
        match kept.get(&key) {
            Some(existing) if !wins_over(&alert, existing) => {}
            Some(_) => {
                kept.insert(key, alert);
            }
            None => {
                order.push(key.clone());
                kept.insert(key, alert);
            }
        }
    }
    order
        .into_iter()
        .map(|key| kept.remove(&key).expect("key recorded on first sight"))
        .collect()
}

/// Newer wins; a timestamp tie goes to the more complete copy.
fn wins_over(candidate: &Alert, existing: &Alert) -> bool {
    match candidate.created_at.cmp(&existing.created_at) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Equal => {
            candidate.completeness_score() > existing.completeness_score()
        }
        std::cmp::Ordering::Less => false,
    }
}

fn content_key(alert: &Alert) -> String {
    let patient = alert
        .patient_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "no-patient".into());
    let title: String = alert
        .title
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    // The reference serialization is stable per variant, so two alerts only
    // collide here when they point at the same entity.
    let reference = serde_json::to_string(&alert.reference).unwrap_or_default();
    format!("{}|{}|{}|{}", alert.kind.as_str(), patient, title, reference)
}

/// High before medium before low; newest first within a priority band.
pub fn sort_by_priority(alerts: &mut [Alert]) {
    alerts.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then(b.created_at.cmp(&a.created_at))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{AlertKind, AlertPriority};
    use crate::models::AlertReference;
    use chrono::NaiveDateTime;
    use uuid::Uuid;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn alert(id: &str, title: &str, created_at: &str) -> Alert {
        Alert {
            id: id.into(),
            kind: AlertKind::Appointment,
            priority: AlertPriority::Medium,
            title: title.into(),
            description: "".into(),
            patient_id: None,
            patient_name: None,
            reference: AlertReference::None,
            action_required: false,
            due_date: None,
            created_at: ts(created_at),
            is_read: false,
            is_dismissed: false,
            snoozed_until: None,
        }
    }

    #[test]
    fn same_id_keeps_the_newest_copy() {
        let stale = alert("appointment_today_x", "A", "2025-06-01 08:00:00");
        let fresh = alert("appointment_today_x", "B", "2025-06-02 08:00:00");

        let kept = remove_duplicates(vec![stale, fresh]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "B");
    }

    #[test]
    fn title_comparison_ignores_case_and_spacing() {
        let a = alert("a", "Appointment Today - Lina", "2025-06-02 08:00:00");
        let b = alert("b", "appointment today -lina", "2025-06-01 08:00:00");

        let kept = remove_duplicates(vec![a, b]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "a");
    }

    #[test]
    fn timestamp_tie_goes_to_the_more_complete_copy() {
        let sparse = alert("a", "Appointment today", "2025-06-01 08:00:00");
        let mut rich = alert("b", "Appointment today", "2025-06-01 08:00:00");
        rich.patient_name = Some("Lina Haddad".into());
        rich.action_required = true;

        let kept = remove_duplicates(vec![rich.clone(), sparse]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "b");
    }

    #[test]
    fn different_references_never_collide() {
        let mut a = alert("a", "Appointment today", "2025-06-01 08:00:00");
        a.reference = AlertReference::Appointment {
            appointment_id: Uuid::new_v4(),
        };
        let mut b = alert("b", "Appointment today", "2025-06-01 08:00:00");
        b.reference = AlertReference::Appointment {
            appointment_id: Uuid::new_v4(),
        };

        assert_eq!(remove_duplicates(vec![a, b]).len(), 2);
    }

    #[test]
    fn different_patients_never_collide() {
        let mut a = alert("a", "Appointment today", "2025-06-01 08:00:00");
        a.patient_id = Some(Uuid::new_v4());
        let mut b = alert("b", "Appointment today", "2025-06-01 08:00:00");
        b.patient_id = Some(Uuid::new_v4());

        assert_eq!(remove_duplicates(vec![a, b]).len(), 2);
    }

    #[test]
    fn display_order_is_priority_then_recency() {
        let mut old_high = alert("a", "A", "2025-06-01 08:00:00");
        old_high.priority = AlertPriority::High;
        let mut new_low = alert("b", "B", "2025-06-05 08:00:00");
        new_low.priority = AlertPriority::Low;
        let mut new_high = alert("c", "C", "2025-06-03 08:00:00");
        new_high.priority = AlertPriority::High;

        let mut alerts = vec![new_low, old_high, new_high];
        sort_by_priority(&mut alerts);

        let ids: Vec<&str> = alerts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }
}
