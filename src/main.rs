mod actors;
mod config;
mod db;
mod docs;
mod entities;
mod error;
mod extract;
mod geocode;
mod models;
mod movies;
mod routes;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{actors::ActorCatalog, config::Config, geocode::GeocodeClient, movies::MovieCatalog};

pub struct AppState {
    pub actors: ActorCatalog,
    pub movies: MovieCatalog,
    pub geocoder: GeocodeClient,
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/hello/{name}", get(routes::say_hello))
        .route("/sum", get(routes::sum))
        .route("/geocode", get(routes::geocode))
        .route("/actors", get(routes::list_actors).post(routes::create_actor))
        .route("/actors/batch", delete(routes::delete_actors))
        .route(
            "/actors/{id}",
            get(routes::get_actor).put(routes::update_actor).delete(routes::delete_actor),
        )
        .route("/movies", get(routes::list_movies).post(routes::create_movie))
        .route("/movies/batch", delete(routes::delete_movies))
        .route(
            "/movies/{id}",
            get(routes::get_movie).put(routes::update_movie).delete(routes::delete_movie),
        )
        .merge(docs::swagger_ui())
        .fallback(routes::not_found)
        .method_not_allowed_fallback(routes::method_not_allowed)
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any).allow_methods(Any))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,moviedb=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let http = reqwest::Client::builder().user_agent("moviedb/0.1").build()?;

    let db = db::connect_and_migrate(&config.database_url).await?;

    let geocoder = GeocodeClient::new(
        http,
        config.geocode_base_url.clone(),
        config.geocode_user_agent.clone(),
        config.geocode_timeout,
    );

    let state = Arc::new(AppState {
        actors: ActorCatalog::new(db.clone()),
        movies: MovieCatalog::new(db),
        geocoder,
    });

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, database = %config.database_url, "listening");
    axum::serve(listener, app(state)).await?;

    Ok(())
}
