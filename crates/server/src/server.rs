use axum::{
    Extension, Router,
    http::StatusCode,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{catalogs, records, subcategories};
use engine::{CatalogKind, Engine};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// Routes of one flat catalog mounted under `base`.
fn catalog_routes(base: &str, kind: CatalogKind) -> Router<ServerState> {
    Router::new()
        .route(
            &format!("{base}/"),
            get(catalogs::list).post(catalogs::create),
        )
        .route(
            &format!("{base}/{{id}}/"),
            get(catalogs::retrieve)
                .put(catalogs::replace)
                .patch(catalogs::update)
                .delete(catalogs::deactivate),
        )
        .route(&format!("{base}/{{id}}/enable/"), post(catalogs::enable))
        .route_layer(Extension(kind))
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(catalog_routes("/api/statuses", CatalogKind::Status))
        .merge(catalog_routes(
            "/api/transaction-types",
            CatalogKind::TransactionType,
        ))
        .merge(catalog_routes("/api/categories", CatalogKind::Category))
        .route(
            "/api/subcategories/",
            get(subcategories::list).post(subcategories::create),
        )
        .route(
            "/api/subcategories/by_category/",
            get(subcategories::by_category),
        )
        .route(
            "/api/subcategories/{id}/",
            get(subcategories::retrieve)
                .put(subcategories::replace)
                .patch(subcategories::update)
                .delete(subcategories::deactivate),
        )
        .route("/api/subcategories/{id}/enable/", post(subcategories::enable))
        .route(
            "/api/cash-flow-records/",
            get(records::list).post(records::create),
        )
        .route(
            "/api/cash-flow-records/{id}/",
            get(records::retrieve)
                .put(records::replace)
                .patch(records::update)
                .delete(records::soft_delete),
        )
        .route("/api/cash-flow-records/{id}/enable/", post(records::enable))
        .with_state(state)
}

/// Build the application router around an engine.
pub fn app(engine: Engine) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
    })
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine)).await
}
