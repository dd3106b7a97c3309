//! # Quill Server
//!
//! actix-web application: configuration, shared state, session extractors,
//! HTML views and route handlers. `main.rs` only wires these together.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;
pub mod views;

use actix_web::web;

use state::AppState;

/// Register the state, the token service for the session extractor, the
/// path error mapping, and every route.
pub fn configure_app(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state.tokens.clone()))
            .app_data(web::Data::new(state))
            .app_data(web::PathConfig::default().error_handler(middleware::error::path_error))
            .configure(handlers::configure_routes);
    }
}
