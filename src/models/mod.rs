//! Domain models for the Activo services

pub mod equipment;
pub mod maintenance;
pub mod provider;
pub mod report;
pub mod user;
