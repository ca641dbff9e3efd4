//! Maintenance scheduling: distance to due, urgency, and preset records
//!
//! Everything here is derived on read from `mileage` and `dueMiles` and is
//! never persisted.

use chrono::NaiveDate;
use serde::Serialize;

use carbook_types::{MaintenanceRecord, NewMaintenance, Vehicle};

use crate::model::MaintenancePreset;

/// Remaining distance at or below which a record is "due soon"
pub const DUE_SOON_MILES: i64 = 500;

/// How close a maintenance record is to its due mileage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Urgency {
    /// Not enough data (no due mileage or no odometer reading)
    Unknown,
    /// Past the due mileage
    Overdue,
    /// Within [`DUE_SOON_MILES`] of the due mileage
    DueSoon,
    Ok,
}

impl Urgency {
    pub fn from_remaining(remaining: Option<i64>) -> Self {
        match remaining {
            None => Urgency::Unknown,
            Some(r) if r < 0 => Urgency::Overdue,
            Some(r) if r <= DUE_SOON_MILES => Urgency::DueSoon,
            Some(_) => Urgency::Ok,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Urgency::Unknown => "-",
            Urgency::Overdue => "OVERDUE",
            Urgency::DueSoon => "due soon",
            Urgency::Ok => "ok",
        }
    }

    /// Machine name, identical to the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Unknown => "unknown",
            Urgency::Overdue => "overdue",
            Urgency::DueSoon => "dueSoon",
            Urgency::Ok => "ok",
        }
    }
}

/// Miles left until `due_miles`, negative when overdue.
///
/// Returns `None` when either reading is zero, which is distinct from
/// `Some(0)` (due right now).
pub fn miles_remaining(due_miles: u64, current_miles: u64) -> Option<i64> {
    if due_miles == 0 || current_miles == 0 {
        return None;
    }
    let due = i64::try_from(due_miles).unwrap_or(i64::MAX);
    let current = i64::try_from(current_miles).unwrap_or(i64::MAX);
    Some(due.saturating_sub(current))
}

pub fn classify_urgency(remaining: Option<i64>) -> Urgency {
    Urgency::from_remaining(remaining)
}

/// Build a record from a preset, due one interval past the current odometer
pub fn apply_preset(vehicle: &Vehicle, preset: &MaintenancePreset, today: NaiveDate) -> NewMaintenance {
    NewMaintenance {
        kind: preset.kind.to_string(),
        due_miles: vehicle.mileage.saturating_add(preset.interval_miles),
        last_done: Some(today),
        notes: format!("Preset interval {} mi", format_miles(preset.interval_miles)),
    }
}

/// Records in display order: ascending due mileage, untracked (0) first.
/// Ties keep their stored order.
pub fn sorted_by_due(records: &[MaintenanceRecord]) -> Vec<&MaintenanceRecord> {
    let mut sorted: Vec<_> = records.iter().collect();
    sorted.sort_by_key(|m| m.due_miles);
    sorted
}

/// A record together with its derived scheduling state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceStatus {
    #[serde(flatten)]
    pub record: MaintenanceRecord,
    pub remaining: Option<i64>,
    pub urgency: Urgency,
}

impl MaintenanceStatus {
    pub fn for_record(record: &MaintenanceRecord, current_miles: u64) -> Self {
        let remaining = miles_remaining(record.due_miles, current_miles);
        Self {
            record: record.clone(),
            remaining,
            urgency: classify_urgency(remaining),
        }
    }
}

/// The vehicle's maintenance records in display order with derived state
pub fn vehicle_schedule(vehicle: &Vehicle) -> Vec<MaintenanceStatus> {
    sorted_by_due(&vehicle.maintenance)
        .into_iter()
        .map(|m| MaintenanceStatus::for_record(m, vehicle.mileage))
        .collect()
}

/// "1,200 mi left", "300 mi OVER", or "—" when unknown
pub fn remaining_label(remaining: Option<i64>) -> String {
    match remaining {
        None => "—".to_string(),
        Some(r) if r < 0 => format!("{} mi OVER", format_miles(r.unsigned_abs())),
        Some(r) => format!("{} mi left", format_miles(r.unsigned_abs())),
    }
}

/// Group digits in threes: 35000 -> "35,000"
pub fn format_miles(miles: u64) -> String {
    let digits = miles.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{find_preset, PRESETS};
    use carbook_types::VehicleDraft;
    use chrono::Utc;
    use uuid::Uuid;

    fn vehicle_with_mileage(mileage: &str) -> Vehicle {
        let draft = VehicleDraft {
            make: "Honda".to_string(),
            model: "Civic".to_string(),
            mileage: mileage.to_string(),
            ..Default::default()
        };
        Vehicle::from_draft(&draft, Uuid::new_v4(), Utc::now())
    }

    fn record(due: u64) -> MaintenanceRecord {
        NewMaintenance {
            kind: format!("Item {due}"),
            due_miles: due,
            last_done: None,
            notes: String::new(),
        }
        .into_record(Uuid::new_v4())
    }

    #[test]
    fn test_miles_remaining_insufficient_data() {
        assert_eq!(miles_remaining(0, 100), None);
        assert_eq!(miles_remaining(5000, 0), None);
        assert_eq!(miles_remaining(0, 0), None);
    }

    #[test]
    fn test_miles_remaining_values() {
        assert_eq!(miles_remaining(5000, 4800), Some(200));
        assert_eq!(miles_remaining(4800, 5000), Some(-200));
        assert_eq!(miles_remaining(5000, 5000), Some(0));
    }

    #[test]
    fn test_classify_urgency_boundaries() {
        assert_eq!(classify_urgency(None), Urgency::Unknown);
        assert_eq!(classify_urgency(Some(-1)), Urgency::Overdue);
        assert_eq!(classify_urgency(Some(0)), Urgency::DueSoon);
        assert_eq!(classify_urgency(Some(500)), Urgency::DueSoon);
        assert_eq!(classify_urgency(Some(501)), Urgency::Ok);
    }

    #[test]
    fn test_apply_preset_from_current_mileage() {
        let v = vehicle_with_mileage("30000");
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let oil = find_preset("Oil Change").unwrap();

        let m = apply_preset(&v, oil, today);
        assert_eq!(m.kind, "Oil Change");
        assert_eq!(m.due_miles, 35000);
        assert_eq!(m.last_done, Some(today));
        assert_eq!(m.notes, "Preset interval 5,000 mi");
    }

    #[test]
    fn test_apply_preset_without_mileage() {
        let v = vehicle_with_mileage("");
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let m = apply_preset(&v, &PRESETS[2], today);
        assert_eq!(m.due_miles, 12000);
        assert_eq!(m.notes, "Preset interval 12,000 mi");
    }

    #[test]
    fn test_sorted_by_due_ignores_insertion_order() {
        let records = vec![record(12000), record(5000)];
        let dues: Vec<_> = sorted_by_due(&records).iter().map(|m| m.due_miles).collect();
        assert_eq!(dues, vec![5000, 12000]);
    }

    #[test]
    fn test_untracked_records_sort_first() {
        let records = vec![record(8000), record(0), record(3000)];
        let dues: Vec<_> = sorted_by_due(&records).iter().map(|m| m.due_miles).collect();
        assert_eq!(dues, vec![0, 3000, 8000]);
    }

    #[test]
    fn test_vehicle_schedule_derives_state() {
        let mut v = vehicle_with_mileage("10000");
        v.maintenance = vec![record(20000), record(9000), record(10400), record(0)];

        let schedule = vehicle_schedule(&v);
        let summary: Vec<_> = schedule
            .iter()
            .map(|s| (s.record.due_miles, s.remaining, s.urgency))
            .collect();
        assert_eq!(
            summary,
            vec![
                (0, None, Urgency::Unknown),
                (9000, Some(-1000), Urgency::Overdue),
                (10400, Some(400), Urgency::DueSoon),
                (20000, Some(10000), Urgency::Ok),
            ]
        );
    }

    #[test]
    fn test_urgency_names_match_json() {
        for urgency in [Urgency::Unknown, Urgency::Overdue, Urgency::DueSoon, Urgency::Ok] {
            let json = serde_json::to_value(urgency).unwrap();
            assert_eq!(json, urgency.as_str());
        }
        assert_eq!(Urgency::DueSoon.as_str(), "dueSoon");
    }

    #[test]
    fn test_remaining_label() {
        assert_eq!(remaining_label(None), "—");
        assert_eq!(remaining_label(Some(1200)), "1,200 mi left");
        assert_eq!(remaining_label(Some(-300)), "300 mi OVER");
        assert_eq!(remaining_label(Some(0)), "0 mi left");
    }

    #[test]
    fn test_format_miles() {
        assert_eq!(format_miles(0), "0");
        assert_eq!(format_miles(999), "999");
        assert_eq!(format_miles(1000), "1,000");
        assert_eq!(format_miles(35000), "35,000");
        assert_eq!(format_miles(1234567), "1,234,567");
    }
}
