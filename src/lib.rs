pub mod configuration;
pub mod controller;
pub mod domain;
pub mod preference_store;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod utils;
