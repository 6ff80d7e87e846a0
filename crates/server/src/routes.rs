use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::person::{repository::PersonRepository, PersonMapper, PersonService};

use crate::openapi::ApiDoc;

pub mod persons;

/// Shared handler state; cheap to clone.
#[derive(Clone)]
pub struct ServerState {
    pub persons: Arc<PersonService<dyn PersonRepository>>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn PersonRepository>) -> Self {
        Self { persons: Arc::new(PersonService::new(repo, PersonMapper)) }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: health, OpenAPI document and the Person resource.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let persons = Router::new()
        .route("/Persons", get(persons::list_persons).post(persons::add_person))
        .route(
            "/Persons/:id",
            get(persons::get_person)
                .put(persons::update_person)
                .delete(persons::delete_person),
        );

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(persons)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        // one INFO span per request with method and path
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        // status code and latency
                        .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                        .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
                )
                .layer(cors),
        )
}
