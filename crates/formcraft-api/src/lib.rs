//! Formcraft HTTP API
//!
//! Owner-scoped form management and builder sessions under `/api`, plus the
//! unauthenticated fill-and-submit path under `/api/public`.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use formcraft_core::infrastructure::{HttpTextGenerator, InMemoryFormStore, TracingEventPublisher};
use formcraft_core::{
    BuilderSessions, BuilderUseCases, FormGenerator, FormService, FormUseCases,
    SubmissionPolicy, SubmissionService, SubmissionUseCases, TextGenerator,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use models::*;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub forms: Arc<dyn FormUseCases>,
    pub submissions: Arc<dyn SubmissionUseCases>,
    pub builder: Arc<dyn BuilderUseCases>,
}

impl AppState {
    /// Wire the in-memory store and the configured text generator
    pub fn from_config(config: &AppConfig) -> Self {
        let generator = Arc::new(HttpTextGenerator::new(
            config.llm.base_url.clone(),
            config.llm.model.clone(),
            config.llm.api_key.clone(),
        ));
        Self::with_generator(generator, config.llm.timeout(), config.submissions)
    }

    pub fn with_generator(
        text_generator: Arc<dyn TextGenerator>,
        timeout: Duration,
        policy: SubmissionPolicy,
    ) -> Self {
        let store = Arc::new(InMemoryFormStore::new());
        let events = Arc::new(TracingEventPublisher);
        let generator = Arc::new(FormGenerator::new(text_generator, timeout));

        let forms: Arc<dyn FormUseCases> = Arc::new(FormService::new(
            store.clone(),
            store.clone(),
            generator,
            events.clone(),
        ));
        let submissions = Arc::new(SubmissionService::new(
            store.clone(),
            store,
            events,
            policy,
        ));
        let builder = Arc::new(BuilderSessions::new(forms.clone()));

        Self {
            forms,
            submissions,
            builder,
        }
    }
}

/// Build the API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/forms", routes::forms::router().merge(routes::sessions::router()))
        .nest("/public/forms", routes::public::router())
        .route("/dashboard/stats", get(routes::forms::dashboard_stats))
        .route("/palette", get(routes::sessions::palette))
}
