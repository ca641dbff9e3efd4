//! Vehicle store with write-through persistence
//!
//! Every mutation builds a new snapshot of the whole collection, writes it to
//! the slot, and only then replaces the in-memory collection. A failed write
//! leaves the store at the last persisted snapshot.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use carbook_domain::repository::{SlotStorage, VEHICLES_KEY};
use carbook_types::{Error, MaintenanceRecord, NewMaintenance, Result, Vehicle, VehicleDraft};

/// Persistent store for vehicles
pub struct VehicleStore<S: SlotStorage> {
    storage: S,
    /// Storage order: newest additions first
    vehicles: Vec<Vehicle>,
}

impl<S: SlotStorage> VehicleStore<S> {
    /// Load the collection from `storage`. A missing document is an empty collection.
    pub fn open(storage: S) -> Result<Self> {
        let vehicles: Vec<Vehicle> = match storage.get(VEHICLES_KEY)? {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)?,
            _ => Vec::new(),
        };
        debug!(count = vehicles.len(), key = VEHICLES_KEY, "loaded vehicle collection");
        Ok(Self { storage, vehicles })
    }

    /// Persist `snapshot`, then make it the current collection
    fn commit(&mut self, snapshot: Vec<Vehicle>) -> Result<()> {
        let json = serde_json::to_string(&snapshot)?;
        self.storage
            .set(VEHICLES_KEY, &json)
            .map_err(|e| Error::Persistence(e.to_string()))?;
        debug!(count = snapshot.len(), bytes = json.len(), "persisted vehicle collection");
        self.vehicles = snapshot;
        Ok(())
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.vehicles.iter().position(|v| v.id == id)
    }

    /// Add a vehicle from raw form input.
    ///
    /// Returns `None` without writing when both make and model are blank.
    pub fn add_vehicle(&mut self, draft: &VehicleDraft) -> Result<Option<Vehicle>> {
        if draft.is_blank() {
            debug!("rejected vehicle without make or model");
            return Ok(None);
        }

        let vehicle = Vehicle::from_draft(draft, Uuid::new_v4(), Utc::now());
        let mut snapshot = Vec::with_capacity(self.vehicles.len() + 1);
        snapshot.push(vehicle.clone());
        snapshot.extend(self.vehicles.iter().cloned());
        self.commit(snapshot)?;

        info!(id = %vehicle.id, name = %vehicle.display_name(), "added vehicle");
        Ok(Some(vehicle))
    }

    /// Replace a vehicle's odometer reading. Unparsable input stores 0.
    pub fn update_mileage(&mut self, id: Uuid, raw_value: &str) -> Result<bool> {
        let Some(index) = self.position(id) else {
            debug!(%id, "mileage update for unknown vehicle");
            return Ok(false);
        };

        let mileage = carbook_types::parse_miles(raw_value);
        let mut snapshot = self.vehicles.clone();
        snapshot[index].mileage = mileage;
        self.commit(snapshot)?;

        info!(%id, mileage, "updated mileage");
        Ok(true)
    }

    /// Remove a vehicle together with all of its maintenance records
    pub fn remove_vehicle(&mut self, id: Uuid) -> Result<bool> {
        if self.position(id).is_none() {
            debug!(%id, "remove for unknown vehicle");
            return Ok(false);
        }

        let snapshot = self.vehicles.iter().filter(|v| v.id != id).cloned().collect();
        self.commit(snapshot)?;

        info!(%id, "removed vehicle");
        Ok(true)
    }

    /// Prepend a maintenance record to a vehicle.
    ///
    /// Returns `None` without writing when the vehicle is unknown or the
    /// record has neither a type nor a due mileage.
    pub fn add_maintenance(
        &mut self,
        vehicle_id: Uuid,
        record: NewMaintenance,
    ) -> Result<Option<MaintenanceRecord>> {
        let record = record.normalized();
        if !record.is_valid() {
            debug!(%vehicle_id, "rejected maintenance without type or due mileage");
            return Ok(None);
        }
        let Some(index) = self.position(vehicle_id) else {
            debug!(%vehicle_id, "maintenance for unknown vehicle");
            return Ok(None);
        };

        let record = record.into_record(Uuid::new_v4());
        let mut snapshot = self.vehicles.clone();
        snapshot[index].maintenance.insert(0, record.clone());
        self.commit(snapshot)?;

        info!(%vehicle_id, record_id = %record.id, kind = %record.kind, due = record.due_miles, "added maintenance");
        Ok(Some(record))
    }

    pub fn remove_maintenance(&mut self, vehicle_id: Uuid, record_id: Uuid) -> Result<bool> {
        let Some(index) = self.position(vehicle_id) else {
            debug!(%vehicle_id, "maintenance removal for unknown vehicle");
            return Ok(false);
        };
        if self.vehicles[index].find_record(record_id).is_none() {
            debug!(%vehicle_id, %record_id, "maintenance removal for unknown record");
            return Ok(false);
        }

        let mut snapshot = self.vehicles.clone();
        snapshot[index].maintenance.retain(|m| m.id != record_id);
        self.commit(snapshot)?;

        info!(%vehicle_id, %record_id, "removed maintenance");
        Ok(true)
    }

    /// All vehicles, newest created first. Equal timestamps keep storage order.
    pub fn list(&self) -> Vec<&Vehicle> {
        let mut vehicles: Vec<_> = self.vehicles.iter().collect();
        vehicles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        vehicles
    }

    pub fn get(&self, id: Uuid) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    /// Vehicles whose id starts with `prefix` (case-insensitive)
    pub fn find_by_prefix(&self, prefix: &str) -> Vec<&Vehicle> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() {
            return Vec::new();
        }
        self.vehicles
            .iter()
            .filter(|v| v.id.to_string().starts_with(&prefix))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.vehicles.len()
    }

    /// Prepend already-built vehicles in one write. Ids already present are skipped.
    pub fn insert_vehicles(&mut self, vehicles: Vec<Vehicle>) -> Result<usize> {
        let mut fresh: Vec<Vehicle> = Vec::with_capacity(vehicles.len());
        for v in vehicles {
            if self.position(v.id).is_none() && !fresh.iter().any(|f| f.id == v.id) {
                fresh.push(v);
            }
        }
        if fresh.is_empty() {
            return Ok(0);
        }

        let inserted = fresh.len();
        let mut snapshot = fresh;
        snapshot.extend(self.vehicles.iter().cloned());
        self.commit(snapshot)?;

        info!(inserted, "inserted vehicles");
        Ok(inserted)
    }

    /// Swap the whole collection for `vehicles` in one write, returning how
    /// many vehicles were dropped. Duplicate ids keep the first occurrence.
    pub fn replace_all(&mut self, vehicles: Vec<Vehicle>) -> Result<usize> {
        let mut snapshot: Vec<Vehicle> = Vec::with_capacity(vehicles.len());
        for v in vehicles {
            if !snapshot.iter().any(|s| s.id == v.id) {
                snapshot.push(v);
            }
        }

        let replaced = self.vehicles.len();
        let count = snapshot.len();
        self.commit(snapshot)?;

        info!(replaced, count, "replaced vehicle collection");
        Ok(replaced)
    }
}
