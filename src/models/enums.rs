use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(AppointmentStatus {
    Scheduled => "scheduled",
    Confirmed => "confirmed",
    Completed => "completed",
    Cancelled => "cancelled",
    NoShow => "no_show",
});

str_enum!(PaymentStatus {
    Pending => "pending",
    Partial => "partial",
    Completed => "completed",
    Failed => "failed",
    Rejected => "rejected",
});

str_enum!(TreatmentStatus {
    Planned => "planned",
    InProgress => "in_progress",
    Completed => "completed",
    Cancelled => "cancelled",
});

str_enum!(LabOrderStatus {
    Pending => "pending",
    Completed => "completed",
    Cancelled => "cancelled",
});

str_enum!(NeedStatus {
    Pending => "pending",
    Ordered => "ordered",
    Received => "received",
    Cancelled => "cancelled",
});

str_enum!(NeedPriority {
    Urgent => "urgent",
    High => "high",
    Medium => "medium",
    Low => "low",
});

str_enum!(AlertKind {
    Appointment => "appointment",
    Payment => "payment",
    Treatment => "treatment",
    Prescription => "prescription",
    FollowUp => "follow_up",
    Inventory => "inventory",
    LabOrder => "lab_order",
});

str_enum!(AlertPriority {
    High => "high",
    Medium => "medium",
    Low => "low",
});

impl AlertPriority {
    /// Numeric display rank: high sorts before medium before low.
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn appointment_status_round_trip() {
        for (variant, s) in [
            (AppointmentStatus::Scheduled, "scheduled"),
            (AppointmentStatus::Confirmed, "confirmed"),
            (AppointmentStatus::Completed, "completed"),
            (AppointmentStatus::Cancelled, "cancelled"),
            (AppointmentStatus::NoShow, "no_show"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(AppointmentStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn payment_status_round_trip() {
        for (variant, s) in [
            (PaymentStatus::Pending, "pending"),
            (PaymentStatus::Partial, "partial"),
            (PaymentStatus::Completed, "completed"),
            (PaymentStatus::Failed, "failed"),
            (PaymentStatus::Rejected, "rejected"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(PaymentStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn alert_kind_round_trip() {
        for (variant, s) in [
            (AlertKind::Appointment, "appointment"),
            (AlertKind::Payment, "payment"),
            (AlertKind::Treatment, "treatment"),
            (AlertKind::Prescription, "prescription"),
            (AlertKind::FollowUp, "follow_up"),
            (AlertKind::Inventory, "inventory"),
            (AlertKind::LabOrder, "lab_order"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(AlertKind::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn priority_rank_is_total_order() {
        assert!(AlertPriority::High.rank() < AlertPriority::Medium.rank());
        assert!(AlertPriority::Medium.rank() < AlertPriority::Low.rank());
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(AlertKind::from_str("invalid").is_err());
        assert!(PaymentStatus::from_str("unknown").is_err());
        assert!(AlertPriority::from_str("").is_err());
    }
}
