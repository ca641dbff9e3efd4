//! Persistent store for vehicles and their maintenance records

pub mod vehicles;

pub use vehicles::VehicleStore;
