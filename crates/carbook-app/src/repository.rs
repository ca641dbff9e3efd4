//! Store adapters for the persistence layer

use std::path::PathBuf;

use carbook_infra::persistence::FileSlotStorage;
use carbook_store::VehicleStore;
use carbook_types::Result;
use tracing::debug;

use crate::config::Config;

/// Open the vehicle store in the configured data directory
pub fn open_vehicle_store(config: &Config) -> Result<VehicleStore<FileSlotStorage>> {
    let data_dir = config.data_dir()?;
    open_vehicle_store_at(data_dir)
}

/// Open the vehicle store at a custom directory
pub fn open_vehicle_store_at(data_dir: PathBuf) -> Result<VehicleStore<FileSlotStorage>> {
    debug!(dir = %data_dir.display(), "opening vehicle store");
    let storage = FileSlotStorage::open(data_dir)?;
    VehicleStore::open(storage)
}
