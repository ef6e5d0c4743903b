use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use backend::config::AppConfig;
use backend::state::AppState;
use env_logger::Env;
use log::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };
    let host = config.server.host.clone();
    let port = config.server.port;

    let state = match AppState::from_config(config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            error!("{}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    info!(
        "Server running at http://{}:{} ({} surveyors)",
        host,
        port,
        state.config.surveyors.len()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(backend::configure_app(state.clone()))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
