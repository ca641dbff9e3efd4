//! Export maintenance schedules to external formats

mod excel;

pub use excel::export_schedule_to_excel;
