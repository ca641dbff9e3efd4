//! Repository trait definitions for data persistence

use carbook_types::Error;

/// Namespace key of the vehicle collection document
pub const VEHICLES_KEY: &str = "car.vehicles";

/// A durable key-value slot holding whole serialized documents.
///
/// Values are written in full on every call to [`SlotStorage::set`]; there
/// are no partial writes or versions.
pub trait SlotStorage {
    /// Read the document stored under `key`, or `None` if nothing was ever written
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Replace the document stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;
}

impl<T: SlotStorage + ?Sized> SlotStorage for &T {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        (**self).set(key, value)
    }
}
