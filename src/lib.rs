pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod ledger;
pub mod mail;
pub mod model;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod uploads;
pub mod utils;

use actix_web::web;

use crate::{routes::RateLimits, state::Services};

/// Shared state plus every API route, mounted under the configured prefix.
pub fn configure_app(cfg: &mut web::ServiceConfig, services: &Services, limits: &RateLimits) {
    services.register(cfg);
    routes::configure(cfg, &services.config.api_prefix, limits);
}
