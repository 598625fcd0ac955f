use axum::{
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod auth;
mod config;
mod database;
mod documents;
mod error;
mod handlers;
mod middleware;
mod services;
mod sync;

use crate::middleware::auth::jwt_auth_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = crate::config::config();
    tracing::info!("Starting Dealdesk API in {:?} mode", config.environment);

    tracing_subscriber::fmt::init();

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("DEALDESK_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Dealdesk API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth + seller upload routes
        .merge(auth_public_routes())
        .merge(upload_public_routes())
        // Protected back-office API
        .merge(api_routes())
        // Global middleware
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn auth_public_routes() -> Router {
    use handlers::public::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

fn upload_public_routes() -> Router {
    use handlers::public::upload;

    // Authenticated by the capability token in the path, not by JWT
    Router::new().route("/upload/:token", post(upload::upload_post))
}

fn api_routes() -> Router {
    Router::new()
        .merge(deal_routes())
        .merge(sales_routes())
        .merge(dealer_routes())
        .merge(sync_routes())
        .merge(document_routes())
        .route("/api/auth/whoami", get(handlers::protected::auth::whoami))
        .layer(axum_middleware::from_fn(jwt_auth_middleware))
}

fn deal_routes() -> Router {
    use handlers::protected::{deals, tokens};

    Router::new()
        // Collection + record CRUD
        .route("/api/deals", get(deals::list).post(deals::create))
        .route(
            "/api/deals/:id",
            get(deals::get).put(deals::update).delete(deals::delete),
        )
        // Finance workflow transition
        .route("/api/deals/:id/stage", patch(deals::set_stage))
        // Seller upload capability tokens
        .route("/api/deals/:id/upload-token", post(tokens::issue))
        .route("/api/deals/:id/upload-tokens", get(tokens::list_for_deal))
        .route("/api/upload-tokens/:id", delete(tokens::deactivate))
}

fn sales_routes() -> Router {
    use handlers::protected::sales;

    Router::new()
        .route("/api/sales", get(sales::list))
        .route("/api/sales/:id", get(sales::get))
        // Pipeline transition appends to the stage history log
        .route("/api/sales/:id/stage", post(sales::transition))
}

fn dealer_routes() -> Router {
    use handlers::protected::dealers;

    Router::new()
        .route("/api/dealers", get(dealers::list).post(dealers::create))
        .route(
            "/api/dealers/:id",
            get(dealers::get).put(dealers::update).delete(dealers::delete),
        )
        .route("/api/dealers/recompute", post(dealers::recompute))
}

fn sync_routes() -> Router {
    use handlers::protected::sync;

    Router::new()
        .route("/api/sync/status", get(sync::status))
        .route("/api/sync/run", post(sync::run))
}

fn document_routes() -> Router {
    use handlers::protected::documents;

    Router::new()
        .route("/api/deals/:id/documents", post(documents::generate))
        .route("/api/documents", get(documents::list))
        .route("/api/documents/generate-all", post(documents::generate_all))
        .route("/api/documents/:id/download", get(documents::download))
}

fn cors_layer() -> CorsLayer {
    use axum::http::HeaderValue;
    use tower_http::cors::{AllowOrigin, Any};

    let security = &crate::config::config().security;
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Dealdesk API (Rust)",
            "version": version,
            "description": "Dealership back-office API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/register, /auth/login (public - token acquisition)",
                "upload": "/upload/:token (public - seller uploads)",
                "deals": "/api/deals[/:id] (protected)",
                "sales": "/api/sales[/:id] (protected)",
                "dealers": "/api/dealers[/:id] (protected)",
                "sync": "/api/sync/status, /api/sync/run (protected)",
                "documents": "/api/documents, /api/deals/:id/documents (protected)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
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
