//! The cluster reroute response and its parameter-driven rendering.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::allocation::RoutingExplanations;
use crate::cluster::{ClusterState, MetricSet, StateView};
use crate::observability::metrics;
use crate::reroute::deprecation::DeprecationSink;
use crate::reroute::mode::RenderMode;
use crate::xcontent::{self, Object, ParamError, Params, ToXContent};

pub const STATE_FIELD_DEPRECATION_KEY: &str = "reroute_cluster_state";

pub const STATE_FIELD_DEPRECATION_MESSAGE: &str = "The [state] field in the response to the reroute API is deprecated and will be removed in a future version. Specify ?metric=none to adopt the future behaviour.";

/// Result of a reroute: acknowledgement, resulting state, explanations.
#[derive(Debug, Clone)]
pub struct ClusterRerouteResponse {
    acknowledged: bool,
    state: Arc<ClusterState>,
    explanations: RoutingExplanations,
}

impl ClusterRerouteResponse {
    pub fn new(
        acknowledged: bool,
        state: impl Into<Arc<ClusterState>>,
        explanations: RoutingExplanations,
    ) -> Self {
        Self {
            acknowledged,
            state: state.into(),
            explanations,
        }
    }

    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged
    }

    pub fn state(&self) -> &ClusterState {
        &self.state
    }

    pub fn explanations(&self) -> &RoutingExplanations {
        &self.explanations
    }

    /// Render according to `params`.
    pub fn render(
        &self,
        params: &Params,
        deprecation: &dyn DeprecationSink,
    ) -> Result<Value, ParamError> {
        let mode = RenderMode::from_params(params)?;
        Ok(self.render_mode(&mode, deprecation))
    }

    /// Render as JSON text according to `params`.
    pub fn to_json(
        &self,
        params: &Params,
        deprecation: &dyn DeprecationSink,
        pretty: bool,
    ) -> Result<String, ParamError> {
        let document = self.render(params, deprecation)?;
        Ok(xcontent::to_string(&document, pretty))
    }

    /// Render an already selected mode.
    ///
    /// `acknowledged` is always the first key. Writing `state` raises one
    /// deprecation warning.
    pub fn render_mode(&self, mode: &RenderMode, deprecation: &dyn DeprecationSink) -> Value {
        metrics::record_render(mode.name());

        let mut doc = Object::new();
        doc.insert("acknowledged".into(), json!(self.acknowledged));

        match mode {
            RenderMode::Acknowledged => {}
            RenderMode::WithExplanations => {
                self.write_explanations(&mut doc);
            }
            RenderMode::WithFullState { explain, view } => {
                if *explain {
                    self.write_explanations(&mut doc);
                }
                self.write_state(&mut doc, &MetricSet::all(), view, deprecation);
            }
            RenderMode::WithFilteredMetadata {
                explain,
                metrics,
                view,
            } => {
                if *explain {
                    self.write_explanations(&mut doc);
                }
                self.write_state(&mut doc, metrics, view, deprecation);
            }
        }
        Value::Object(doc)
    }

    fn write_explanations(&self, doc: &mut Object) {
        doc.insert("explanations".into(), self.explanations.to_xcontent());
    }

    fn write_state(
        &self,
        doc: &mut Object,
        metrics: &MetricSet,
        view: &StateView,
        deprecation: &dyn DeprecationSink,
    ) {
        deprecation.warn(STATE_FIELD_DEPRECATION_KEY, STATE_FIELD_DEPRECATION_MESSAGE);
        doc.insert("state".into(), self.state.to_xcontent(metrics, view));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::{AllocationCommand, Decision, RerouteExplanation};
    use crate::reroute::deprecation::DeprecationRecorder;

    fn response() -> ClusterRerouteResponse {
        ClusterRerouteResponse::new(
            true,
            ClusterState::builder("test").build(),
            RoutingExplanations::new().add(RerouteExplanation::new(
                AllocationCommand::AllocateReplica {
                    index: "index".into(),
                    shard: 0,
                    node: "node0".into(),
                },
                Decision::YES,
            )),
        )
    }

    #[test]
    fn test_acknowledged_is_always_first() {
        let recorder = DeprecationRecorder::new();
        for params in [
            Params::empty(),
            Params::empty().with("metric", "none"),
            Params::empty().with("explain", "true"),
            Params::empty().with("metric", "nodes"),
        ] {
            let doc = response().render(&params, &recorder).unwrap();
            let first = doc.as_object().unwrap().keys().next().cloned();
            assert_eq!(first.as_deref(), Some("acknowledged"));
        }
    }

    #[test]
    fn test_explain_with_state_renders_both_in_order() {
        let recorder = DeprecationRecorder::new();
        let doc = response()
            .render(&Params::empty().with("explain", "true"), &recorder)
            .unwrap();
        let keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["acknowledged", "explanations", "state"]);
        assert_eq!(recorder.len(), 1);
    }

    #[test]
    fn test_explanations_without_commands_is_empty_array() {
        let response = ClusterRerouteResponse::new(
            false,
            ClusterState::builder("test").build(),
            RoutingExplanations::new(),
        );
        let recorder = DeprecationRecorder::new();
        let json = response
            .to_json(
                &Params::empty().with("metric", "none").with("explain", "true"),
                &recorder,
                false,
            )
            .unwrap();
        assert_eq!(json, r#"{"acknowledged":false,"explanations":[]}"#);
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_invalid_params_are_reported() {
        let recorder = DeprecationRecorder::new();
        let result = response().render(&Params::empty().with("metric", "bogus"), &recorder);
        assert!(matches!(result, Err(ParamError::UnknownMetric(_))));
        assert!(recorder.is_empty());
    }
}
