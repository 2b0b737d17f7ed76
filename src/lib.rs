//! Kiosk News - RSS/Atom news aggregation for the table kiosk
//!
//! A stateless endpoint that resolves a per-language set of upstream
//! feeds, fetches them with per-source failure isolation, normalizes
//! everything into one item model, and serves a capped, de-duplicated
//! JSON list for the kiosk's news tab.

pub mod classify;
pub mod config;
pub mod fetcher;
pub mod model;
pub mod parser;
pub mod routes;
pub mod sources;
