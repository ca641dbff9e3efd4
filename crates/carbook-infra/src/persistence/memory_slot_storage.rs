//! In-process slot storage, used for dry runs and tests

use std::cell::RefCell;
use std::collections::HashMap;

use carbook_domain::repository::SlotStorage;
use carbook_types::Result;

#[derive(Debug, Default)]
pub struct MemorySlotStorage {
    values: RefCell<HashMap<String, String>>,
}

impl MemorySlotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with one document
    pub fn with_value(key: &str, value: String) -> Self {
        let storage = Self::default();
        storage.values.borrow_mut().insert(key.to_string(), value);
        storage
    }
}

impl SlotStorage for MemorySlotStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
