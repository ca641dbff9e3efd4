//! Infrastructure layer - slot storage implementations, legacy import

pub mod legacy_importer;
pub mod persistence;
