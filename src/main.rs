use std::io;

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::info;

use vietmap_trip_api::config::AppConfig;
use vietmap_trip_api::middleware::cors::build_cors;
use vietmap_trip_api::routes;
use vietmap_trip_api::state::AppState;

#[actix_web::main]
async fn main() -> io::Result<()> {
    println!("Application starting...");

    dotenv::dotenv().ok();

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    println!("Logger initialized");

    let config =
        AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let host = config.host.clone();
    let port = config.port;
    let allowed_origins = config.allowed_origins.clone();

    let state = AppState::from_config(config).map_err(io::Error::other)?;
    let state = web::Data::new(state);
    info!("Allowed origins: {}", allowed_origins.join(", "));

    println!("Attempting to bind to {}:{}", host, port);
    println!("Starting HTTP server...");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(build_cors(&allowed_origins))
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
