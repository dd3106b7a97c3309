//! Quill blog server binary.

use actix_web::{App, HttpServer};
use tracing_actix_web::TracingLogger;

use quill_server::config::AppConfig;
use quill_server::configure_app;
use quill_server::state::AppState;
use quill_server::telemetry::{LogFormat, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    init_telemetry(LogFormat::from_env());

    let config = AppConfig::from_env();

    tracing::info!("Starting Quill on {}:{}", config.host, config.port);

    let state = AppState::new(&config).await?;

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .configure(configure_app(state.clone()))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
