//! Use-case services shared by the CLI commands

pub mod import_service;
pub mod maintenance_service;

pub use import_service::{import_file, ImportOutcome};
pub use maintenance_service::{add_preset, resolve_record, resolve_vehicle};
