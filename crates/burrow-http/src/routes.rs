use axum::extract::{Path, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use burrow_eval::evaluate_group;
use burrow_model::{ClusterId, GroupId, Severity, TopicName};

use crate::envelope::{Envelope, RequestInfo};
use crate::error::ApiError;
use crate::state::SharedState;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/v3/kafka", get(list_clusters))
        .route("/v3/kafka/:cluster", get(cluster_status))
        .route("/v3/kafka/:cluster/topic", get(topic_list))
        .route("/v3/kafka/:cluster/topic/:topic", get(topic_offsets))
        .route("/v3/kafka/:cluster/topic/:topic/consumers", get(topic_consumers))
        .route("/v3/kafka/:cluster/consumer", get(group_list))
        .route("/v3/kafka/:cluster/consumer/:group", get(group_rings).delete(delete_group))
        .route("/v3/kafka/:cluster/consumer/:group/status", get(group_status))
        .route("/v3/kafka/:cluster/consumer/:group/lag", get(group_lag))
        .fallback(not_found)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

fn info(state: &SharedState, uri: &Uri) -> RequestInfo {
    RequestInfo { uri: uri.to_string(), host: state.host.clone() }
}

fn known_cluster(state: &SharedState, cluster: &ClusterId) -> Result<(), ApiError> {
    if state.clusters.contains(cluster) {
        Ok(())
    } else {
        Err(ApiError::NotFound)
    }
}

async fn list_clusters(State(state): State<SharedState>, uri: Uri) -> Response {
    let names: Vec<String> = state.clusters.iter().map(|c| c.to_string()).collect();
    Envelope::ok(info(&state, &uri), names).into_response()
}

async fn cluster_status(State(state): State<SharedState>, uri: Uri, Path(cluster): Path<String>) -> Response {
    let cluster = ClusterId::from(cluster);
    let req = info(&state, &uri);
    let result: Result<_, ApiError> = async {
        known_cluster(&state, &cluster)?;
        Ok(state.bus.fetch_cluster_status(cluster).await?)
    }
    .await;
    match result {
        Ok(status) => Envelope::ok(req, status).into_response(),
        Err(err) => err.into_response_with(req),
    }
}

async fn topic_list(State(state): State<SharedState>, uri: Uri, Path(cluster): Path<String>) -> Response {
    let cluster = ClusterId::from(cluster);
    let req = info(&state, &uri);
    let result: Result<Vec<TopicName>, ApiError> = async {
        known_cluster(&state, &cluster)?;
        Ok(state.bus.fetch_topic_list(cluster).await?)
    }
    .await;
    match result {
        Ok(topics) => {
            let names: Vec<String> = topics.iter().map(|t| t.to_string()).collect();
            Envelope::ok(req, names).into_response()
        }
        Err(err) => err.into_response_with(req),
    }
}

#[derive(serde::Serialize)]
struct PartitionOffset {
    partition: i32,
    leo: i64,
    timestamp: i64,
}

async fn topic_offsets(
    State(state): State<SharedState>,
    uri: Uri,
    Path((cluster, topic)): Path<(String, String)>,
) -> Response {
    let cluster = ClusterId::from(cluster);
    let req = info(&state, &uri);
    let result: Result<Vec<PartitionOffset>, ApiError> = async {
        known_cluster(&state, &cluster)?;
        let offsets = state.bus.fetch_topic_offsets(cluster, TopicName::from(topic)).await?;
        let offsets = offsets.ok_or(ApiError::NotFound)?;
        Ok(offsets.into_iter().map(|(partition, o)| PartitionOffset { partition, leo: o.leo, timestamp: o.timestamp }).collect())
    }
    .await;
    match result {
        Ok(offsets) => Envelope::ok(req, offsets).into_response(),
        Err(err) => err.into_response_with(req),
    }
}

async fn topic_consumers(
    State(state): State<SharedState>,
    uri: Uri,
    Path((cluster, topic)): Path<(String, String)>,
) -> Response {
    let cluster = ClusterId::from(cluster);
    let req = info(&state, &uri);
    if let Err(err) = known_cluster(&state, &cluster) {
        return err.into_response_with(req);
    }
    let groups = state.bus.fetch_consumers_for_topic(cluster, TopicName::from(topic)).await;
    let names: Vec<String> = groups.iter().map(|g| g.to_string()).collect();
    Envelope::ok(req, names).into_response()
}

async fn group_list(State(state): State<SharedState>, uri: Uri, Path(cluster): Path<String>) -> Response {
    let cluster = ClusterId::from(cluster);
    let req = info(&state, &uri);
    if let Err(err) = known_cluster(&state, &cluster) {
        return err.into_response_with(req);
    }
    let groups = state.bus.fetch_group_list(cluster).await;
    let names: Vec<String> = groups.iter().map(|g| g.to_string()).collect();
    Envelope::ok(req, names).into_response()
}

async fn group_rings(
    State(state): State<SharedState>,
    uri: Uri,
    Path((cluster, group)): Path<(String, String)>,
) -> Response {
    let cluster = ClusterId::from(cluster);
    let req = info(&state, &uri);
    let result: Result<_, ApiError> = async {
        known_cluster(&state, &cluster)?;
        let snapshot = state.bus.fetch_consumer(cluster, GroupId::from(group)).await?;
        snapshot.ok_or(ApiError::NotFound)
    }
    .await;
    match result {
        Ok(snapshot) => Envelope::ok(req, snapshot).into_response(),
        Err(err) => err.into_response_with(req),
    }
}

async fn delete_group(
    State(state): State<SharedState>,
    uri: Uri,
    Path((cluster, group)): Path<(String, String)>,
) -> Response {
    let cluster = ClusterId::from(cluster);
    let req = info(&state, &uri);
    let result: Result<bool, ApiError> = async {
        known_cluster(&state, &cluster)?;
        Ok(state.bus.delete_group(cluster, GroupId::from(group)).await?)
    }
    .await;
    match result {
        Ok(true) => Envelope::ok(req, serde_json::json!({})).into_response(),
        Ok(false) => ApiError::NotFound.into_response_with(req),
        Err(err) => err.into_response_with(req),
    }
}

/// Shared by `.../status` and `.../lag`: fetches and evaluates, `omit_ok_partitions` controls
/// whether an overall-OK group's partition detail is dropped (`spec.md` §6: `status` "omits
/// per-partition detail when OK", `lag` returns "full per-partition status including all
/// partitions").
async fn group_status_common(
    state: &SharedState,
    cluster: String,
    group: String,
    omit_ok_partitions: bool,
) -> Result<serde_json::Value, ApiError> {
    let cluster = ClusterId::from(cluster);
    known_cluster(state, &cluster)?;
    let snapshot = state.bus.fetch_consumer(cluster.clone(), GroupId::from(group.clone())).await?;
    let snapshot = snapshot.ok_or(ApiError::NotFound)?;
    let mut status = evaluate_group(cluster.as_str(), &group, &snapshot, &state.eval_cfg);
    if omit_ok_partitions && status.status == Severity::Ok {
        status.partitions.clear();
    }
    serde_json::to_value(status).map_err(|_| ApiError::Encoding)
}

async fn group_status(
    State(state): State<SharedState>,
    uri: Uri,
    Path((cluster, group)): Path<(String, String)>,
) -> Response {
    let req = info(&state, &uri);
    match group_status_common(&state, cluster, group, true).await {
        Ok(value) => Envelope::ok(req, value).into_response(),
        Err(err) => err.into_response_with(req),
    }
}

async fn group_lag(
    State(state): State<SharedState>,
    uri: Uri,
    Path((cluster, group)): Path<(String, String)>,
) -> Response {
    let req = info(&state, &uri);
    match group_status_common(&state, cluster, group, false).await {
        Ok(value) => Envelope::ok(req, value).into_response(),
        Err(err) => err.into_response_with(req),
    }
}

async fn not_found(uri: Uri) -> Response {
    ApiError::InvalidRequest.into_response_with(RequestInfo { uri: uri.to_string(), host: String::new() })
}
