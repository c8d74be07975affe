use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    auth::{self, guard::require_session},
    notes,
    routes::{pages, speech},
    state::AppState,
};

pub fn build_app(state: AppState) -> Router {
    let gated = Router::new()
        .merge(pages::gated_routes())
        .merge(notes::router(state.config.max_upload_bytes))
        .merge(speech::speech_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/", get(pages::home))
        .route("/health", get(|| async { "ok" }))
        .merge(auth::router())
        .merge(gated)
        .nest_service("/static/audio", ServeDir::new(&state.config.audio_dir))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}
