use crate::app::App;
use crate::config::AppConfig;
use crate::db::init_db;
use crate::router::handle;
use astra::Server;
use std::net::SocketAddr;

mod app;
mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod handlers;
mod responses;
mod router;
mod spreadsheets;
mod templates;


fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn main() {
    let config_path = AppConfig::path_from_env();
    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    config.apply_env_overrides();

    init_logging(&config.logging.level);
    if let Some(e) = load_error {
        log::warn!("Config load failed from {config_path}: {e}. Using defaults.");
    }
    if !config.admin_enabled() {
        log::warn!("No admin password configured; the admin panel is disabled");
    }

    let addr: SocketAddr = match config.server.addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            log::error!("Invalid server address '{}': {e}", config.server.addr);
            std::process::exit(1);
        }
    };

    let app = App::new(config);

    if let Err(e) = init_db(&app.db, &app.config.database.schema_path) {
        log::error!("Database initialization failed: {e}");
        std::process::exit(1);
    }

    log::info!("Starting server at http://{addr}");

    let server = Server::bind(&addr).max_workers(app.config.server.max_workers);

    let result = server.serve(move |req, _info| match handle(req, &app) {
        Ok(resp) => resp,
        Err(err) => responses::html_error_response(err),
    });

    if let Err(e) = result {
        log::error!("Server ended with error: {e}");
    }

    log::info!("Server shut down cleanly.");
}
