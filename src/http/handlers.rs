//! Request handlers for the `/_cluster` API.
//!
//! # Responsibilities
//! - Reject unrecognised query parameters
//! - Fill in the configured default `metric` for reroutes
//! - Validate rendering parameters before any command runs
//! - Turn deprecation warnings into `Warning` headers

use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::cluster::{MetricSet, StateView};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::reroute::{DeprecationRecorder, RenderMode, RerouteBody, RerouteRequest};
use crate::xcontent::{self, Params};

const REROUTE_PARAMS: &[&str] = &[
    "dry_run",
    "explain",
    "flat_settings",
    "metric",
    "pretty",
    "settings_filter",
];

const STATE_PARAMS: &[&str] = &["flat_settings", "pretty", "settings_filter"];

/// Agent name used in `Warning` headers.
const WARNING_AGENT: &str = "cluster-reroute";

/// `POST /_cluster/reroute`
pub async fn reroute(
    State(state): State<AppState>,
    Query(query): Query<BTreeMap<String, String>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    check_params("/_cluster/reroute", &query, REROUTE_PARAMS)?;

    let mut params = Params::from(query);
    if !params.contains("metric") {
        params.insert("metric", &*state.default_metric);
    }
    let mode = RenderMode::from_params(&params)?;
    let dry_run = params.param_as_bool("dry_run", false)?;
    let pretty = params.param_as_bool("pretty", false)?;

    let body = if body.iter().all(u8::is_ascii_whitespace) {
        RerouteBody::default()
    } else {
        serde_json::from_slice::<RerouteBody>(&body)?
    };

    tracing::debug!(
        commands = body.commands.len(),
        dry_run,
        mode = mode.name(),
        "Handling reroute"
    );

    let response = state
        .service
        .reroute(RerouteRequest {
            commands: body.commands,
            dry_run,
            explain: mode.explain(),
        })
        .await?;

    let recorder = DeprecationRecorder::forwarding(state.deprecation_log.clone());
    let document = response.render_mode(&mode, &recorder);
    Ok(json_response(&document, pretty, &recorder.messages()))
}

/// `GET /_cluster/state`
pub async fn cluster_state(
    State(state): State<AppState>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Result<Response, ApiError> {
    render_state(&state, MetricSet::all(), query, "/_cluster/state")
}

/// `GET /_cluster/state/{metric}`
pub async fn cluster_state_metric(
    State(state): State<AppState>,
    Path(metric): Path<String>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Result<Response, ApiError> {
    let metrics = MetricSet::parse(&metric)?;
    render_state(&state, metrics, query, &format!("/_cluster/state/{metric}"))
}

/// `GET /`
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let current = state.service.state();
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "cluster_name": current.cluster_name(),
        "cluster_uuid": current.metadata().cluster_uuid(),
        "state_version": current.version(),
        "version": {
            "number": env!("CARGO_PKG_VERSION"),
        },
    }))
}

fn render_state(
    state: &AppState,
    metrics: MetricSet,
    query: BTreeMap<String, String>,
    path: &str,
) -> Result<Response, ApiError> {
    check_params(path, &query, STATE_PARAMS)?;

    let params = Params::from(query);
    let view = StateView::from_params(&params)?;
    let pretty = params.param_as_bool("pretty", false)?;

    let document = state.service.state().to_xcontent(&metrics, &view);
    Ok(json_response(&document, pretty, &[]))
}

fn check_params(
    path: &str,
    query: &BTreeMap<String, String>,
    allowed: &[&str],
) -> Result<(), ApiError> {
    match query.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(param) => Err(ApiError::UnrecognizedParameter {
            path: path.to_string(),
            param: param.clone(),
        }),
        None => Ok(()),
    }
}

fn json_response(document: &Value, pretty: bool, warnings: &[String]) -> Response {
    let mut response = (
        [(header::CONTENT_TYPE, "application/json")],
        xcontent::to_string(document, pretty),
    )
        .into_response();

    for message in warnings {
        match HeaderValue::from_str(&format!("299 {WARNING_AGENT} \"{message}\"")) {
            Ok(value) => {
                response.headers_mut().append(header::WARNING, value);
            }
            Err(e) => tracing::warn!(error = %e, "Dropping warning that is not a valid header"),
        }
    }
    response
}
