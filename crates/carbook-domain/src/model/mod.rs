//! Domain model types

pub mod preset;

pub use preset::{find_preset, MaintenancePreset, PRESETS};
