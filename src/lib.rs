//! HTTP adapter for the Nimbus weather service.

pub mod routes;
