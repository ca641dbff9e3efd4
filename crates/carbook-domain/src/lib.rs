//! Domain layer: maintenance presets, scheduling services, repository traits

pub mod model;
pub mod repository;
pub mod service;
