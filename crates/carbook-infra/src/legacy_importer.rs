//! Import data from the legacy browser version of the car manager
//!
//! Reads the `car.vehicles` local-storage document, either as the bare JSON
//! array or inside a local-storage dump object. The browser version used
//! millisecond timestamps as ids and did not always store numbers as numbers,
//! so every field is read loosely.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use carbook_domain::repository::{SlotStorage, VEHICLES_KEY};
use carbook_store::VehicleStore;
use carbook_types::{parse_date, parse_miles, Error, NewMaintenance, Result, Vehicle};

/// Legacy vehicle
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyVehicle {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub make: Value,
    #[serde(default)]
    pub model: Value,
    #[serde(default)]
    pub year: Value,
    #[serde(default)]
    pub vin: Value,
    #[serde(default)]
    pub mileage: Value,
    #[serde(default)]
    pub maintenance: Vec<LegacyMaintenance>,
    #[serde(default)]
    pub created_at: Value,
}

/// Legacy maintenance item
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyMaintenance {
    #[serde(default)]
    pub id: Value,
    #[serde(rename = "type", default)]
    pub kind: Value,
    #[serde(default)]
    pub due_miles: Value,
    #[serde(default)]
    pub last_done: Value,
    #[serde(default)]
    pub notes: Value,
}

/// Import mode for legacy data import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Keep existing vehicles and skip ones already imported
    #[default]
    Append,
    /// Clear existing vehicles before importing
    Refresh,
}

/// Import result
#[derive(Debug, Default)]
pub struct ImportResult {
    pub vehicles_imported: usize,
    pub records_imported: usize,
    pub skipped: usize,
    pub cleared: usize,
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn miles(value: &Value) -> u64 {
    match value {
        Value::Number(n) => match (n.as_u64(), n.as_f64()) {
            (Some(u), _) => u,
            (None, Some(f)) if f.is_finite() && f > 0.0 => f.trunc() as u64,
            _ => 0,
        },
        Value::String(s) => parse_miles(s),
        _ => 0,
    }
}

/// Parse the content of an exported file.
///
/// Accepts `[...]`, `{"car.vehicles": [...]}` and
/// `{"car.vehicles": "[...]"}` (local storage keeps values as strings).
pub fn parse_legacy_document(content: &str) -> Result<Vec<LegacyVehicle>> {
    let root: Value = serde_json::from_str(content)
        .map_err(|e| Error::Import(format!("Failed to parse legacy JSON: {}", e)))?;

    let array = match root {
        v @ Value::Array(_) => v,
        Value::Object(mut map) => match map.remove(VEHICLES_KEY) {
            Some(Value::String(inner)) => serde_json::from_str(&inner).map_err(|e| {
                Error::Import(format!("Failed to parse embedded {} value: {}", VEHICLES_KEY, e))
            })?,
            Some(v @ Value::Array(_)) => v,
            Some(Value::Null) | None => {
                return Err(Error::Import(format!("No {} document found", VEHICLES_KEY)))
            }
            Some(other) => {
                return Err(Error::Import(format!(
                    "Unexpected {} value: {}",
                    VEHICLES_KEY, other
                )))
            }
        },
        other => return Err(Error::Import(format!("Unexpected document: {}", other))),
    };

    serde_json::from_value(array)
        .map_err(|e| Error::Import(format!("Invalid legacy vehicle data: {}", e)))
}

/// Load legacy export data from JSON file
pub fn load_legacy_export(path: &Path) -> Result<Vec<LegacyVehicle>> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::FileNotFound(format!("Failed to read legacy export file {}: {}", path.display(), e))
    })?;
    parse_legacy_document(&content)
}

/// Convert a legacy vehicle. Returns `None` when it has neither make nor model.
///
/// Ids are replaced with fresh UUIDs; maintenance items with neither a type
/// nor a due mileage are dropped.
pub fn convert_to_vehicle(legacy: &LegacyVehicle, imported_at: DateTime<Utc>) -> Option<Vehicle> {
    let make = text(&legacy.make);
    let model = text(&legacy.model);
    if make.is_empty() && model.is_empty() {
        return None;
    }

    let created_at = legacy
        .created_at
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or(imported_at);

    let maintenance = legacy
        .maintenance
        .iter()
        .map(|m| {
            let last_done = text(&m.last_done);
            NewMaintenance {
                kind: text(&m.kind),
                due_miles: miles(&m.due_miles),
                last_done: parse_date(last_done.get(..10).unwrap_or(last_done.as_str())),
                notes: text(&m.notes),
            }
            .normalized()
        })
        .filter(NewMaintenance::is_valid)
        .map(|m| m.into_record(Uuid::new_v4()))
        .collect();

    Some(Vehicle {
        id: Uuid::new_v4(),
        make,
        model,
        year: text(&legacy.year),
        vin: text(&legacy.vin),
        mileage: miles(&legacy.mileage),
        maintenance,
        created_at,
    })
}

fn is_same_vehicle(a: &Vehicle, b: &Vehicle) -> bool {
    a.created_at == b.created_at && a.make == b.make && a.model == b.model
}

/// Import legacy vehicles into `store`
///
/// # Import Modes
/// * `ImportMode::Append` - Keep existing vehicles; skip any with the same
///   creation time, make and model as one already stored
/// * `ImportMode::Refresh` - Replace all existing vehicles with the import
///
/// Either mode writes the store once. A failed write is returned as an
/// error and leaves the store at its previous collection.
pub fn import_legacy_data<S: SlotStorage>(
    legacy: &[LegacyVehicle],
    store: &mut VehicleStore<S>,
    mode: ImportMode,
) -> Result<ImportResult> {
    let mut result = ImportResult::default();
    let now = Utc::now();

    let mut batch: Vec<Vehicle> = Vec::new();
    for (index, item) in legacy.iter().enumerate() {
        let Some(vehicle) = convert_to_vehicle(item, now) else {
            warn!(index, id = %item.id, "skipping legacy vehicle without make or model");
            result.skipped += 1;
            continue;
        };

        if mode == ImportMode::Append {
            let duplicate = store.list().iter().any(|v| is_same_vehicle(v, &vehicle))
                || batch.iter().any(|v| is_same_vehicle(v, &vehicle));
            if duplicate {
                result.skipped += 1;
                continue;
            }
        }

        batch.push(vehicle);
    }

    let records: usize = batch.iter().map(|v| v.maintenance.len()).sum();
    let inserted = batch.len();
    match mode {
        ImportMode::Append => {
            result.vehicles_imported = store.insert_vehicles(batch)?;
        }
        ImportMode::Refresh => {
            result.cleared = store.replace_all(batch)?;
            result.vehicles_imported = inserted;
        }
    }
    result.records_imported = records;

    info!(
        imported = result.vehicles_imported,
        records,
        skipped = result.skipped,
        cleared = result.cleared,
        "imported legacy vehicles"
    );
    Ok(result)
}

/// Import data from a legacy export file
pub fn import_from_backup<S: SlotStorage>(
    path: &Path,
    store: &mut VehicleStore<S>,
    mode: ImportMode,
) -> Result<ImportResult> {
    let legacy = load_legacy_export(path)?;
    import_legacy_data(&legacy, store, mode)
}

/// Generate summary report of legacy data
pub fn summarize_legacy_export(legacy: &[LegacyVehicle]) -> String {
    let mut report = String::new();
    let records: usize = legacy.iter().map(|v| v.maintenance.len()).sum();

    report.push_str("=== Legacy Car Manager Data ===\n");
    report.push_str(&format!("Vehicles: {}\n", legacy.len()));
    report.push_str(&format!("Maintenance records: {}\n", records));

    if !legacy.is_empty() {
        report.push_str("\n=== Sample Vehicles ===\n");
        for (i, v) in legacy.iter().take(5).enumerate() {
            let name = [text(&v.year), text(&v.make), text(&v.model)]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            report.push_str(&format!(
                "{}. {} ({} mi, {} records)\n",
                i + 1,
                if name.is_empty() { "-" } else { name.as_str() },
                miles(&v.mileage),
                v.maintenance.len()
            ));
        }

        if legacy.len() > 5 {
            report.push_str(&format!("... and {} more\n", legacy.len() - 5));
        }
    }

    report
}
