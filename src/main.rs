/*!
Binary entry point: logging, configuration, routes.
*/
use std::sync::Arc;

use axum::{
    extract::Extension,
    middleware,
    Router,
    routing::{get, post},
};
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use tower_http::services::fs::ServeDir;

use aduni::{config, inter};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let log_cfg = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("aduni")
        .build();
    TermLogger::init(
        aduni::log_level_from_env(),
        log_cfg,
        TerminalMode::Stdout,
        ColorChoice::Auto
    ).unwrap();
    log::info!("Logging started.");

    let config_path = std::env::var("ADUNI_CONFIG")
        .unwrap_or_else(|_| "aduni.toml".to_owned());
    let glob = match config::load_configuration(&config_path) {
        Ok(g) => Arc::new(g),
        Err(e) => {
            log::error!("Unable to load configuration: {}", &e);
            std::process::exit(1);
        },
    };
    let addr = glob.addr;

    let app = Router::new()
        .route("/dashboard", get(inter::dashboard::dashboard))
        .route("/register", post(inter::registration::submit))
        .route("/upload/:modality", post(inter::upload::submit))
        .route_layer(middleware::from_fn(inter::require_session))
        .route("/", get(inter::login::root))
        .route("/login", get(inter::login::form).post(inter::login::submit))
        .route("/logout", post(inter::login::logout))
        .nest_service("/static", ServeDir::new("static"))
        .layer(Extension(glob));

    log::info!("Listening on {}", &addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
