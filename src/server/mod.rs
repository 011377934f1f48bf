use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::data::effect::load_effect_catalog;
use crate::data::validate::{validate_catalog, ValidationSeverity};
use crate::error::SeedError;
use crate::roll::SeededRoller;

pub mod api;
pub mod routes;
pub mod state;

pub use state::AppState;

/// Load the catalog, start building the seed index in the background and serve until shutdown.
pub fn run_server(settings: &Settings) -> Result<(), SeedError> {
    let catalog = load_effect_catalog(&settings.catalog_path)?;
    let report = validate_catalog(&catalog);
    for diagnostic in &report.diagnostics {
        if diagnostic.severity == ValidationSeverity::Warning {
            warn!(context = %diagnostic.context, "{}", diagnostic.message);
        }
    }
    if report.has_errors() {
        for diagnostic in report.diagnostics.iter().filter(|d| d.severity == ValidationSeverity::Error) {
            error!(context = %diagnostic.context, "{}", diagnostic.message);
        }
        return Err(SeedError::Validation(report.error_count()));
    }

    let state = Arc::new(AppState::new(
        catalog,
        SeededRoller::new(settings.roll_seed),
        settings.worker_pool(),
    ));

    let runtime = tokio::runtime::Runtime::new().map_err(|err| SeedError::io("tokio runtime", err))?;
    runtime.block_on(serve(state, settings))
}

async fn serve(state: Arc<AppState>, settings: &Settings) -> Result<(), SeedError> {
    let builder = Arc::clone(&state);
    tokio::spawn(run_index_build(move || {
        builder.build_views();
    }));

    let app = router(state, &settings.static_dir);
    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .map_err(|err| SeedError::io(settings.bind_addr.clone(), err))?;
    info!("seedfinder server listening on http://{}", settings.bind_addr);
    axum::serve(listener, app)
        .await
        .map_err(|err| SeedError::io(settings.bind_addr.clone(), err))
}

/// Run the index build on the blocking pool. Returns false, after logging, when the build panicked;
/// the state then stays in `loading`.
async fn run_index_build<F>(build: F) -> bool
where
    F: FnOnce() + Send + 'static,
{
    match tokio::task::spawn_blocking(build).await {
        Ok(()) => true,
        Err(err) => {
            error!(error = %err, "seed index build failed, search stays unavailable");
            false
        }
    }
}

/// Static assets under `/assets`, everything else through [routes::route_request].
pub fn router(state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .nest_service("/assets", ServeDir::new(static_dir))
        .fallback(dispatch)
        .with_state(state)
}

async fn dispatch(State(state): State<Arc<AppState>>, method: Method, uri: Uri, body: String) -> Response {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    // Result views can be large; keep them off the async workers.
    let routed = tokio::task::spawn_blocking(move || {
        routes::route_request(method.as_str(), &path, &body, &state)
    })
    .await;

    match routed {
        Ok(response) => {
            let status = StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            Response::builder()
                .status(status)
                .header(header::CONTENT_TYPE, response.content_type)
                .body(Body::from(response.body))
                .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
        Err(err) => {
            error!(error = %err, "request handler failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn index_build_reports_completion() {
        assert!(run_index_build(|| {}).await);
    }

    #[tokio::test]
    async fn panicking_index_build_is_reported() {
        let state = Arc::new(AppState::new(
            crate::data::EffectCatalog::new(vec![crate::data::Effect::new("a", "Alpha")]),
            SeededRoller::new(0),
            crate::parallel::WorkerPool::default(),
        ));
        let builder = Arc::clone(&state);
        let finished = run_index_build(move || {
            let _keep = builder;
            panic!("index build exploded");
        })
        .await;
        assert!(!finished);
        assert!(state.is_loading());
    }
}
