use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Dentara";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}

/// Get the application data directory
/// ~/Dentara/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Dentara")
}

/// Default location of the clinic database file.
pub fn database_path() -> PathBuf {
    app_data_dir().join("clinic.db")
}

// ---------------------------------------------------------------------------
// Alert thresholds
// ---------------------------------------------------------------------------

/// Pending payments escalate from medium to high past this many days overdue.
pub const PAYMENT_OVERDUE_HIGH_DAYS: i64 = 7;

/// Planned/in-progress treatments raise a pending alert past this age.
pub const TREATMENT_PENDING_DAYS: i64 = 14;
/// Pending treatments escalate to high priority past this age.
pub const TREATMENT_PENDING_HIGH_DAYS: i64 = 30;
/// Completed treatments whose notes ask for follow-up alert past this age.
pub const TREATMENT_FOLLOW_UP_DAYS: i64 = 7;
/// Multi-session procedures still open past this age get a progress reminder.
pub const TREATMENT_COMPLEX_DAYS: i64 = 21;

/// Prescriptions older than this may need renewal.
pub const PRESCRIPTION_RENEWAL_DAYS: i64 = 30;
/// Prescriptions flagged for follow-up alert past this age.
pub const PRESCRIPTION_FOLLOW_UP_DAYS: i64 = 7;
/// Prescriptions mentioning important medications alert past this age.
pub const PRESCRIPTION_IMPORTANT_MED_DAYS: i64 = 14;

/// Patients with no completed visit for this long get a recall alert.
pub const FOLLOW_UP_RECALL_DAYS: i64 = 90;

/// Expiry warnings start this many days before an item expires.
pub const EXPIRY_WARNING_DAYS: i64 = 30;
/// Expiry warnings become high priority inside this window.
pub const EXPIRY_URGENT_DAYS: i64 = 7;
/// Projected stock-out within this many days raises a usage alert.
pub const STOCK_OUT_WARNING_DAYS: i64 = 7;
/// Projected stock-out inside this window is high priority.
pub const STOCK_OUT_URGENT_DAYS: i64 = 3;
/// Items untouched for this long are flagged as unused.
pub const INVENTORY_UNUSED_DAYS: i64 = 90;
/// Fallback minimum stock when an inventory item has no configured minimum.
pub const INVENTORY_DEFAULT_MIN_QUANTITY: i64 = 5;
/// Fallback minimum stock for pharmacy medications.
pub const MEDICATION_DEFAULT_MIN_QUANTITY: i64 = 10;

/// Lab orders this many days past expected delivery become high priority.
pub const LAB_ORDER_OVERDUE_HIGH_DAYS: i64 = 7;
/// Lab orders due within this many days get a heads-up.
pub const LAB_ORDER_DUE_SOON_DAYS: i64 = 2;

/// Clinic needs sitting in "ordered" past this age are considered delayed.
pub const CLINIC_NEED_DELAYED_DAYS: i64 = 14;
/// Pending clinic needs above this price need explicit approval.
pub const CLINIC_NEED_APPROVAL_PRICE: f64 = 1000.0;

/// Dismissed alerts older than this are garbage-collected.
pub const DISMISSED_ALERT_RETENTION_DAYS: i64 = 3;
/// Appointment alerts are dropped this long after the appointment started.
pub const APPOINTMENT_ALERT_RETENTION_DAYS: i64 = 7;

/// Same-day appointment reminders fire between these two lead times.
pub const APPOINTMENT_REMINDER_MIN_HOURS: f64 = 2.0;
pub const APPOINTMENT_REMINDER_MAX_HOURS: f64 = 6.0;

/// Treatment types that usually span several sessions.
pub const COMPLEX_TREATMENT_KEYWORDS: &[&str] =
    &["orthodontic", "implant", "root canal", "crown", "bridge"];

/// Note keywords marking a prescription's medications as worth tracking.
pub const IMPORTANT_MEDICATION_KEYWORDS: &[&str] =
    &["antibiotic", "strong analgesic", "opioid"];

/// Note keywords asking for a follow-up visit.
pub const FOLLOW_UP_KEYWORDS: &[&str] = &["follow-up", "follow up"];

/// Case-insensitive check of `text` against a keyword set.
pub fn contains_keyword(text: &str, keywords: &[&str]) -> bool {
    let lowered = text.to_lowercase();
    keywords.iter().any(|k| lowered.contains(k))
}
