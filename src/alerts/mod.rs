//! The smart-alert pipeline.
//!
//! `AlertEngine` ties the pieces together: cleanup of lapsed alerts, a
//! resilient sweep over the per-domain generators, persistence of newly seen
//! conditions, duplicate collapse and priority ordering. Every mutation goes
//! out through the injected `AlertNotifier`.

pub mod cleanup;
pub mod dedup;
pub mod generators;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::{repository, DatabaseError};
use crate::events::{AlertEvent, AlertNotifier};
use crate::models::enums::{AlertKind, AlertPriority};
use crate::models::{Alert, AlertReference};

use generators::{all_generators, AlertGenerator};

/// Fields staff supply when raising an alert by hand.
#[derive(Debug, Clone)]
pub struct AlertDraft {
    pub kind: AlertKind,
    pub priority: AlertPriority,
    pub title: String,
    pub description: String,
    pub patient_id: Option<Uuid>,
    pub patient_name: Option<String>,
    pub reference: AlertReference,
    pub action_required: bool,
    pub due_date: Option<NaiveDateTime>,
}

/// Partial update applied over the stored alert; `None` leaves a field as is.
/// `snoozed_until` is doubly optional so a snooze can be cleared explicitly.
#[derive(Debug, Clone, Default)]
pub struct AlertChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<AlertPriority>,
    pub is_read: Option<bool>,
    pub is_dismissed: Option<bool>,
    pub snoozed_until: Option<Option<NaiveDateTime>>,
}

pub struct AlertEngine {
    notifier: Arc<AlertNotifier>,
    generators: Vec<Box<dyn AlertGenerator>>,
}

impl AlertEngine {
    pub fn new(notifier: Arc<AlertNotifier>) -> Self {
        Self {
            notifier,
            generators: all_generators(),
        }
    }

    /// Engine over a custom generator set, mainly for tests.
    pub fn with_generators(
        notifier: Arc<AlertNotifier>,
        generators: Vec<Box<dyn AlertGenerator>>,
    ) -> Self {
        Self {
            notifier,
            generators,
        }
    }

    pub fn notifier(&self) -> &AlertNotifier {
        &self.notifier
    }

    pub fn get_all_alerts(&self, conn: &Connection) -> Vec<Alert> {
        self.get_all_alerts_at(conn, Local::now().naive_local())
    }

    /// Refresh and return the full alert list for `now`.
    ///
    /// Every stage is failure-isolated: a broken generator contributes no
    /// alerts, a failed persist keeps the alert in-memory for this call, and
    /// the worst outcome of a storage fault is a partial list.
    pub fn get_all_alerts_at(&self, conn: &Connection, now: NaiveDateTime) -> Vec<Alert> {
        if let Err(err) = cleanup::remove_outdated(conn, now) {
            tracing::warn!(%err, "alert cleanup failed, continuing with stale entries");
        }

        let stored = match repository::list_alerts(conn) {
            Ok(alerts) => alerts,
            Err(err) => {
                tracing::error!(%err, "failed to load stored alerts");
                Vec::new()
            }
        };
        let known: HashSet<String> = stored.iter().map(|a| a.id.clone()).collect();

        let mut merged = stored;
        for generator in &self.generators {
            let generated = match generator.generate(conn, now) {
                Ok(alerts) => alerts,
                Err(err) => {
                    tracing::warn!(
                        generator = generator.name(),
                        %err,
                        "generator failed, contributing no alerts"
                    );
                    continue;
                }
            };
            for alert in generated {
                // The stored copy keeps its read/dismissed/snoozed flags.
                if known.contains(&alert.id) {
                    continue;
                }
                if let Err(err) = repository::insert_alert(conn, &alert) {
                    tracing::warn!(id = %alert.id, %err, "failed to persist generated alert");
                }
                merged.push(alert);
            }
        }

        let mut alerts = dedup::remove_duplicates(merged);

        if let Err(err) = repository::clear_expired_snoozed(conn, now) {
            tracing::warn!(%err, "failed to clear expired snoozes");
        }
        for alert in &mut alerts {
            if alert.snoozed_until.is_some_and(|until| until <= now) {
                alert.snoozed_until = None;
            }
        }

        dedup::sort_by_priority(&mut alerts);
        alerts
    }

    pub fn create_alert(
        &self,
        conn: &Connection,
        draft: AlertDraft,
    ) -> Result<Alert, DatabaseError> {
        let alert = Alert {
            id: format!("custom_{}", Uuid::new_v4()),
            kind: draft.kind,
            priority: draft.priority,
            title: draft.title,
            description: draft.description,
            patient_id: draft.patient_id,
            patient_name: draft.patient_name,
            reference: draft.reference,
            action_required: draft.action_required,
            due_date: draft.due_date,
            created_at: Local::now().naive_local(),
            is_read: false,
            is_dismissed: false,
            snoozed_until: None,
        };
        repository::insert_alert(conn, &alert)?;
        self.notifier.emit(AlertEvent::Created(alert.clone()));
        self.notifier.emit(AlertEvent::Changed);
        Ok(alert)
    }

    pub fn update_alert(
        &self,
        conn: &Connection,
        id: &str,
        changes: AlertChanges,
    ) -> Result<Alert, DatabaseError> {
        let mut alert =
            repository::get_alert(conn, id)?.ok_or_else(|| DatabaseError::NotFound {
                entity_type: "alert".into(),
                id: id.into(),
            })?;

        if let Some(title) = changes.title {
            alert.title = title;
        }
        if let Some(description) = changes.description {
            alert.description = description;
        }
        if let Some(priority) = changes.priority {
            alert.priority = priority;
        }
        if let Some(is_read) = changes.is_read {
            alert.is_read = is_read;
        }
        if let Some(is_dismissed) = changes.is_dismissed {
            alert.is_dismissed = is_dismissed;
        }
        if let Some(snoozed_until) = changes.snoozed_until {
            alert.snoozed_until = snoozed_until;
        }

        repository::update_alert(conn, &alert)?;
        self.notifier.emit(AlertEvent::Updated { id: id.into() });
        self.notifier.emit(AlertEvent::Changed);
        Ok(alert)
    }

    /// Hide an alert until `until` without losing it.
    pub fn snooze_alert(
        &self,
        conn: &Connection,
        id: &str,
        until: NaiveDateTime,
    ) -> Result<Alert, DatabaseError> {
        self.update_alert(
            conn,
            id,
            AlertChanges {
                snoozed_until: Some(Some(until)),
                ..AlertChanges::default()
            },
        )
    }

    pub fn delete_alert(&self, conn: &Connection, id: &str) -> Result<(), DatabaseError> {
        repository::delete_alert(conn, id)?;
        self.notifier.emit(AlertEvent::Deleted { id: id.into() });
        self.notifier.emit(AlertEvent::Changed);
        Ok(())
    }

    /// Drop every alert pointing at `appointment_id`, directly or through a
    /// payment, treatment or prescription reference.
    pub fn delete_appointment_alerts(
        &self,
        conn: &Connection,
        appointment_id: Uuid,
    ) -> Result<usize, DatabaseError> {
        self.delete_matching(conn, |alert| {
            alert.reference.appointment_id() == Some(appointment_id)
        })
    }

    pub fn delete_payment_alerts(
        &self,
        conn: &Connection,
        payment_id: Uuid,
    ) -> Result<usize, DatabaseError> {
        self.delete_matching(conn, |alert| {
            alert.reference.payment_id() == Some(payment_id)
        })
    }

    fn delete_matching(
        &self,
        conn: &Connection,
        matches: impl Fn(&Alert) -> bool,
    ) -> Result<usize, DatabaseError> {
        let mut removed = 0;
        for alert in repository::list_alerts(conn)? {
            if !matches(&alert) {
                continue;
            }
            match repository::delete_alert(conn, &alert.id) {
                Ok(()) => removed += 1,
                Err(err) => {
                    tracing::warn!(id = %alert.id, %err, "cascade delete failed for alert");
                }
            }
        }
        if removed > 0 {
            self.notifier.emit(AlertEvent::Changed);
        }
        Ok(removed)
    }
}
