//! Fleet-wide due check

use serde::Serialize;
use uuid::Uuid;

use carbook_types::Vehicle;

use super::scheduler::{format_miles, remaining_label, vehicle_schedule, MaintenanceStatus, Urgency};

/// One tracked maintenance item and the vehicle it belongs to
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueCheckResult {
    pub vehicle_id: Uuid,
    pub vehicle_name: String,
    pub mileage: u64,
    pub status: MaintenanceStatus,
}

/// Collect every record with a due mileage across `vehicles`
pub fn check_due(vehicles: &[&Vehicle]) -> Vec<DueCheckResult> {
    vehicles
        .iter()
        .flat_map(|v| {
            vehicle_schedule(v)
                .into_iter()
                .filter(|s| s.record.due_miles > 0)
                .map(move |status| DueCheckResult {
                    vehicle_id: v.id,
                    vehicle_name: v.display_name(),
                    mileage: v.mileage,
                    status,
                })
        })
        .collect()
}

pub fn generate_due_report(results: &[DueCheckResult]) -> String {
    let total = results.len();
    let overdue: Vec<_> = results
        .iter()
        .filter(|r| r.status.urgency == Urgency::Overdue)
        .collect();
    let due_soon: Vec<_> = results
        .iter()
        .filter(|r| r.status.urgency == Urgency::DueSoon)
        .collect();
    let unknown = results
        .iter()
        .filter(|r| r.status.urgency == Urgency::Unknown)
        .count();

    let mut report = String::new();
    report.push_str("==================================================\n");
    report.push_str("              Maintenance Due Report              \n");
    report.push_str("==================================================\n\n");
    report.push_str("[Summary]\n");
    report.push_str(&format!("  Tracked items:        {}\n", total));
    report.push_str(&format!("  Overdue:              {}\n", overdue.len()));
    report.push_str(&format!("  Due soon:             {}\n", due_soon.len()));
    report.push_str(&format!("  No odometer reading:  {}\n", unknown));
    report.push('\n');

    if overdue.is_empty() && due_soon.is_empty() {
        report.push_str("[Nothing Due]\n");
        report.push_str("  All tracked maintenance is more than 500 mi away.\n\n");
    } else {
        push_section(&mut report, "[Overdue]", &overdue);
        push_section(&mut report, "[Due Soon]", &due_soon);
    }

    report.push_str("==================================================\n");
    report
}

fn push_section(report: &mut String, title: &str, rows: &[&DueCheckResult]) {
    if rows.is_empty() {
        return;
    }
    report.push_str(title);
    report.push('\n');
    report.push_str("-".repeat(72).as_str());
    report.push('\n');
    report.push_str(&format!(
        "{:<22} {:<20} {:>12} {:>14}\n",
        "Vehicle", "Type", "Due @", "Remaining"
    ));
    report.push_str("-".repeat(72).as_str());
    report.push('\n');
    for row in rows {
        report.push_str(&format!(
            "{:<22} {:<20} {:>12} {:>14}\n",
            truncate_str(&row.vehicle_name, 21),
            truncate_str(&row.status.record.kind, 19),
            format_miles(row.status.record.due_miles),
            remaining_label(row.status.remaining),
        ));
    }
    report.push('\n');
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(2)).collect();
        format!("{}..", truncated)
    } else {
        s.to_string()
    }
}
