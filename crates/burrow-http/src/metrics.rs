use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Builds the `/metrics` router (`SPEC_FULL.md` §6), matching the teacher's own
/// `metrics_server` pattern of a separate tiny router carrying just the Prometheus handle as
/// state.
pub fn router() -> Router {
    let handle = PrometheusBuilder::new().install_recorder().expect("failed to install prometheus recorder");
    Router::new().route("/metrics", get(render)).with_state(handle)
}

async fn render(axum::extract::State(handle): axum::extract::State<PrometheusHandle>) -> (StatusCode, String) {
    (StatusCode::OK, handle.render())
}
