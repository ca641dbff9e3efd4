//! Vehicle and maintenance record definitions

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::miles::parse_miles;

/// Category used when a record has a due mileage but no type
pub const DEFAULT_MAINTENANCE_TYPE: &str = "Maintenance";

/// A tracked vehicle and the maintenance records it owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub vin: String,
    /// Current odometer reading
    #[serde(default)]
    pub mileage: u64,
    /// Newest first, in the order records were added
    #[serde(default)]
    pub maintenance: Vec<MaintenanceRecord>,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    /// Build a vehicle from raw form input. Text is trimmed and mileage coerced.
    pub fn from_draft(draft: &VehicleDraft, id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            make: draft.make.trim().to_string(),
            model: draft.model.trim().to_string(),
            year: draft.year.trim().to_string(),
            vin: draft.vin.trim().to_string(),
            mileage: parse_miles(&draft.mileage),
            maintenance: Vec::new(),
            created_at,
        }
    }

    /// "2019 Honda Civic", or "Honda Civic" when no year is recorded
    pub fn display_name(&self) -> String {
        [self.year.as_str(), self.make.as_str(), self.model.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn find_record(&self, record_id: Uuid) -> Option<&MaintenanceRecord> {
        self.maintenance.iter().find(|m| m.id == record_id)
    }
}

/// A single maintenance item belonging to one vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    pub id: Uuid,
    /// Category, e.g. "Oil Change"
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Odometer value at which this becomes due; 0 means not tracked
    #[serde(default)]
    pub due_miles: u64,
    #[serde(default, with = "blank_date")]
    pub last_done: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
}

/// Raw vehicle form input
#[derive(Debug, Clone, Default)]
pub struct VehicleDraft {
    pub make: String,
    pub model: String,
    pub year: String,
    pub vin: String,
    pub mileage: String,
}

impl VehicleDraft {
    /// A vehicle needs at least a make or a model
    pub fn is_blank(&self) -> bool {
        self.make.trim().is_empty() && self.model.trim().is_empty()
    }
}

/// Raw maintenance form input
#[derive(Debug, Clone, Default)]
pub struct MaintenanceDraft {
    pub kind: String,
    pub due_miles: String,
    pub last_done: String,
    pub notes: String,
}

/// A maintenance record waiting for its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMaintenance {
    pub kind: String,
    pub due_miles: u64,
    pub last_done: Option<NaiveDate>,
    pub notes: String,
}

impl NewMaintenance {
    pub fn from_draft(draft: &MaintenanceDraft) -> Self {
        Self {
            kind: draft.kind.clone(),
            due_miles: parse_miles(&draft.due_miles),
            last_done: parse_date(&draft.last_done),
            notes: draft.notes.clone(),
        }
        .normalized()
    }

    /// Trim text and fill in the default type when only a due mileage was given
    pub fn normalized(mut self) -> Self {
        self.kind = self.kind.trim().to_string();
        self.notes = self.notes.trim().to_string();
        if self.kind.is_empty() && self.due_miles > 0 {
            self.kind = DEFAULT_MAINTENANCE_TYPE.to_string();
        }
        self
    }

    /// A record needs a type or a due mileage
    pub fn is_valid(&self) -> bool {
        !self.kind.trim().is_empty() || self.due_miles > 0
    }

    pub fn into_record(self, id: Uuid) -> MaintenanceRecord {
        MaintenanceRecord {
            id,
            kind: self.kind,
            due_miles: self.due_miles,
            last_done: self.last_done,
            notes: self.notes,
        }
    }
}

/// Parse a `YYYY-MM-DD` date. Blank or malformed input yields `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// `Option<NaiveDate>` stored as `"YYYY-MM-DD"`, with `""` for none
mod blank_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.collect_str(&d.format("%Y-%m-%d")),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        Ok(raw.as_deref().and_then(super::parse_date))
    }
}
