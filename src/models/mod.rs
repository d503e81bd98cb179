pub mod alert;
pub mod appointment;
pub mod clinic_need;
pub mod enums;
pub mod inventory;
pub mod lab_order;
pub mod medication;
pub mod patient;
pub mod payment;
pub mod prescription;
pub mod treatment;

pub use alert::{Alert, AlertReference};
pub use appointment::Appointment;
pub use clinic_need::ClinicNeed;
pub use inventory::InventoryItem;
pub use lab_order::LabOrder;
pub use medication::Medication;
pub use patient::Patient;
pub use payment::Payment;
pub use prescription::Prescription;
pub use treatment::Treatment;
