use crate::config::ServerConfig;
use crate::error::Result;
use axum::http::StatusCode;
use axum::{response::IntoResponse, routing::get, Router};
use figures_app::state::{AppConfig, AppState};
use figures_dal::character::CharacterRepository;
use futures::FutureExt;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

pub async fn run(args: ServerConfig) -> Result<()> {
    let state = build_state(&args).await?;
    run_with_state(args, state).await
}

pub async fn run_with_state(args: ServerConfig, state: AppState) -> Result<()> {
    let shutdown = tokio::signal::ctrl_c().map(|_| ());
    run_graceful_with_state(args, state, shutdown).await
}

pub async fn run_graceful_with_state<S>(
    args: ServerConfig,
    state: AppState,
    shutdown_signal: S,
) -> Result<()>
where
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let mut app = main_router(state);

    if !args.no_cors {
        app = app.layer(tower_http::cors::CorsLayer::very_permissive());
    }

    let ip: std::net::IpAddr = args.listen_address.parse()?;
    let addr = std::net::SocketAddr::from((ip, args.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    debug!("Server stopped");
    Ok(())
}

pub fn main_router(state: AppState) -> Router<()> {
    Router::new()
        .nest("/api/character", figures_app::rest_api::character::router())
        .nest("/api/dashboard", figures_app::rest_api::dashboard::router())
        .nest("/api/labels", figures_app::rest_api::labels::router())
        .nest("/api/draft", figures_app::draft::rest_api::router())
        .nest("/events", figures_app::events::router())
        .with_state(state)
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn build_state(config: &ServerConfig) -> Result<AppState> {
    let characters = match &config.seed_file {
        Some(path) => {
            let data = tokio::fs::read_to_string(path).await?;
            let repository = CharacterRepository::from_json(&data)?;
            info!(
                "Loaded {} characters from {}",
                repository.count().await,
                path.display()
            );
            repository
        }
        None => {
            info!("Using built in demo characters");
            CharacterRepository::with_seed()
        }
    };
    let app_config: AppConfig = config.into();
    let state = AppState::new(app_config, characters);
    state.drafts().spawn_expiry();
    Ok(state)
}
