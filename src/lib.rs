// Library for tests to access modules

pub mod config;
pub mod error;
pub mod generator;
pub mod hub;
pub mod ingest;
pub mod models;
pub mod routes;
pub mod stats;
pub mod worker;
