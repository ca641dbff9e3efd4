//! Vehicle and maintenance use cases

use chrono::NaiveDate;
use uuid::Uuid;

use carbook_domain::model::{find_preset, PRESETS};
use carbook_domain::repository::SlotStorage;
use carbook_domain::service::apply_preset;
use carbook_store::VehicleStore;
use carbook_types::{Error, MaintenanceRecord, Result, Vehicle};

/// Add the named preset to a vehicle, due one interval past its current mileage.
///
/// An unknown preset name is an error; an unknown vehicle is a no-op (`None`).
pub fn add_preset<S: SlotStorage>(
    store: &mut VehicleStore<S>,
    vehicle_id: Uuid,
    preset_name: &str,
    today: NaiveDate,
) -> Result<Option<MaintenanceRecord>> {
    let preset = find_preset(preset_name).ok_or_else(|| {
        let known: Vec<_> = PRESETS.iter().map(|p| p.kind).collect();
        Error::NotFound(format!(
            "preset {:?} (known: {})",
            preset_name,
            known.join(", ")
        ))
    })?;

    let Some(vehicle) = store.get(vehicle_id) else {
        return Ok(None);
    };
    let record = apply_preset(vehicle, preset, today);
    store.add_maintenance(vehicle_id, record)
}

/// Resolve a full id or an unambiguous id prefix to a stored vehicle
pub fn resolve_vehicle<S: SlotStorage>(store: &VehicleStore<S>, query: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(query.trim()) {
        if store.get(id).is_some() {
            return Ok(id);
        }
    }

    let matches = store.find_by_prefix(query);
    match matches.as_slice() {
        [] => Err(Error::NotFound(format!("vehicle {:?}", query))),
        [only] => Ok(only.id),
        many => Err(Error::Ambiguous(format!(
            "{:?} matches {} vehicles",
            query,
            many.len()
        ))),
    }
}

/// Resolve a full id or an unambiguous id prefix to one of `vehicle`'s records
pub fn resolve_record(vehicle: &Vehicle, query: &str) -> Result<Uuid> {
    let prefix = query.trim().to_lowercase();
    if prefix.is_empty() {
        return Err(Error::NotFound("empty record id".to_string()));
    }

    let matches: Vec<_> = vehicle
        .maintenance
        .iter()
        .filter(|m| m.id.to_string().starts_with(&prefix))
        .collect();
    match matches.as_slice() {
        [] => Err(Error::NotFound(format!(
            "record {:?} on {}",
            query,
            vehicle.display_name()
        ))),
        [only] => Ok(only.id),
        many => Err(Error::Ambiguous(format!(
            "{:?} matches {} records",
            query,
            many.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbook_infra::persistence::MemorySlotStorage;
    use carbook_types::{NewMaintenance, VehicleDraft};

    fn store_with_civic(mileage: &str) -> (VehicleStore<MemorySlotStorage>, Uuid) {
        let mut store = VehicleStore::open(MemorySlotStorage::new()).unwrap();
        let id = store
            .add_vehicle(&VehicleDraft {
                make: "Honda".to_string(),
                model: "Civic".to_string(),
                mileage: mileage.to_string(),
                ..Default::default()
            })
            .unwrap()
            .unwrap()
            .id;
        (store, id)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_add_preset() {
        let (mut store, id) = store_with_civic("30000");
        let record = add_preset(&mut store, id, "oil-change", today()).unwrap().unwrap();
        assert_eq!(record.due_miles, 35000);
        assert_eq!(record.last_done, Some(today()));
        assert_eq!(store.get(id).unwrap().maintenance.len(), 1);
    }

    #[test]
    fn test_add_preset_unknown_name() {
        let (mut store, id) = store_with_civic("30000");
        let err = add_preset(&mut store, id, "Transmission", today()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(err.to_string().contains("Oil Change"));
    }

    #[test]
    fn test_add_preset_unknown_vehicle_is_noop() {
        let (mut store, _) = store_with_civic("30000");
        let result = add_preset(&mut store, Uuid::new_v4(), "Oil Change", today()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_resolve_vehicle() {
        let (store, id) = store_with_civic("0");
        let full = id.to_string();

        assert_eq!(resolve_vehicle(&store, &full).unwrap(), id);
        assert_eq!(resolve_vehicle(&store, &full[..6]).unwrap(), id);
        assert!(matches!(
            resolve_vehicle(&store, "zzzz"),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            resolve_vehicle(&store, &Uuid::new_v4().to_string()),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_resolve_vehicle_ambiguous() {
        let (mut store, _) = store_with_civic("0");
        for i in 0..40 {
            store
                .add_vehicle(&VehicleDraft {
                    make: format!("Make {i}"),
                    ..Default::default()
                })
                .unwrap();
        }
        // 41 uuids over 16 leading hex digits: at least one prefix repeats
        let first_chars: Vec<_> = store
            .list()
            .iter()
            .map(|v| v.id.to_string()[..1].to_string())
            .collect();
        let repeated = first_chars
            .iter()
            .find(|c| first_chars.iter().filter(|d| d == c).count() > 1)
            .unwrap();
        assert!(matches!(
            resolve_vehicle(&store, repeated),
            Err(Error::Ambiguous(_))
        ));
    }

    #[test]
    fn test_resolve_record() {
        let (mut store, id) = store_with_civic("1000");
        let record = store
            .add_maintenance(
                id,
                NewMaintenance {
                    kind: "Oil Change".to_string(),
                    due_miles: 6000,
                    last_done: None,
                    notes: String::new(),
                },
            )
            .unwrap()
            .unwrap();
        let vehicle = store.get(id).unwrap();

        assert_eq!(resolve_record(vehicle, &record.id.to_string()[..8]).unwrap(), record.id);
        assert!(resolve_record(vehicle, "").is_err());
        assert!(matches!(resolve_record(vehicle, "xyz"), Err(Error::NotFound(_))));
    }
}
