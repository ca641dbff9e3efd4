//! Domain services

pub mod due_checker;
pub mod scheduler;

pub use due_checker::{check_due, generate_due_report, DueCheckResult};
pub use scheduler::{
    apply_preset, classify_urgency, format_miles, miles_remaining, remaining_label,
    sorted_by_due, vehicle_schedule, MaintenanceStatus, Urgency, DUE_SOON_MILES,
};
