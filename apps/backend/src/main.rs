use actix_web::{web, App, HttpServer};
use blue_auth::auth::rotation::RotationScheduler;
use blue_auth::config::auth::AuthConfig;
use blue_auth::config::db::DbConfig;
use blue_auth::infra::state::build_state;
use blue_auth::middleware::request_trace::RequestTrace;
use blue_auth::routes;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = match std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
    {
        Ok(port) => port,
        Err(_) => {
            error!("BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        }
    };

    let (auth_config, db_config) = match AuthConfig::from_env().and_then(|auth| {
        let db = DbConfig::from_env()?;
        Ok((auth, db))
    }) {
        Ok(configs) => configs,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };
    let rotation_interval = auth_config.rotation_interval;

    // Create application state using unified builder
    let app_state = match build_state()
        .with_auth_config(auth_config)
        .with_db(db_config)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    let rotation = RotationScheduler::new(app_state.secrets.clone(), rotation_interval).spawn();

    info!(%host, port, "starting blue-auth");

    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(app_state);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await;

    rotation.shutdown().await;
    server
}
