use axum::http::HeaderValue;
use axum::{middleware as layers, routing::get, Router};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use automax_api::config::{self, Environment};
use automax_api::middleware::{gate_middleware, session_middleware};
use automax_api::store::Db;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting AutoMax API in {:?} mode", config.environment);

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("AutoMax API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Storefront reads
        .merge(storefront_routes())
        // Session endpoints; login and register sit behind the gate
        .merge(auth_routes())
        // Back office, gated
        .merge(admin_routes())
        .fallback(not_found)
        // Global middleware: session resolution must wrap every route so
        // the per-group gate always finds a resolved state
        .layer(layers::from_fn(session_middleware))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn storefront_routes() -> Router {
    use automax_api::handlers::public;

    Router::new()
        .route("/api/tienda", get(public::tienda::get))
        .route("/api/marcas", get(public::marcas::get))
        .route("/api/modelos", get(public::modelos::get))
        .route("/api/destacados", get(public::destacados::get))
}

fn auth_routes() -> Router {
    use automax_api::handlers::auth;
    use axum::routing::post;

    // The gate bounces already-authenticated callers off the login surface.
    // Session probe and logout stay reachable in every session state.
    let gated = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .layer(layers::from_fn(gate_middleware));

    Router::new()
        .merge(gated)
        .route("/auth/session", get(auth::session))
        .route("/auth/logout", post(auth::logout))
}

fn admin_routes() -> Router {
    use automax_api::handlers::admin::{brands, dashboard, models};
    use axum::routing::put;

    Router::new()
        .route("/api/admin/dashboard", get(dashboard::get))
        .route("/api/admin/marcas", get(brands::list).post(brands::create))
        .route(
            "/api/admin/marcas/:id",
            put(brands::update).delete(brands::delete),
        )
        .route("/api/admin/modelos", get(models::list).post(models::create))
        .route(
            "/api/admin/modelos/:id",
            put(models::update).delete(models::delete),
        )
        .layer(layers::from_fn(gate_middleware))
}

fn cors_layer() -> CorsLayer {
    let config = config::config();
    if matches!(config.environment, Environment::Development) {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "AutoMax API",
            "version": version,
            "description": "Vehicle dealership storefront and admin back office",
            "endpoints": {
                "home": "/ (public)",
                "storefront": "/api/tienda, /api/marcas, /api/modelos, /api/destacados (public)",
                "auth": "/auth/login, /auth/register, /auth/session, /auth/logout",
                "admin": "/api/admin/* (requires session)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match Db::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}

async fn not_found() -> impl axum::response::IntoResponse {
    (
        axum::http::StatusCode::NOT_FOUND,
        axum::response::Json(json!({
            "error": true,
            "message": "Página no encontrada",
            "code": "NOT_FOUND",
        })),
    )
}
