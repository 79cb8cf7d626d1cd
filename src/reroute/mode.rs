//! Selection of the response shape from rendering parameters.

use crate::cluster::{MetricSet, StateView};
use crate::xcontent::{ParamError, Params};

/// What a reroute response renders, decided once per request.
#[derive(Debug, Clone)]
pub enum RenderMode {
    /// `{"acknowledged": ...}` only (`metric=none`).
    Acknowledged,
    /// Acknowledgement plus the explanations (`explain=true&metric=none`).
    WithExplanations,
    /// Legacy shape: the whole cluster state under `state`.
    WithFullState { explain: bool, view: StateView },
    /// The cluster state restricted to the selected sections, typically
    /// `metric=metadata`.
    WithFilteredMetadata {
        explain: bool,
        metrics: MetricSet,
        view: StateView,
    },
}

impl RenderMode {
    /// Interpret `explain`, `metric`, `settings_filter` and `flat_settings`.
    ///
    /// A missing `metric` selects every section. Other keys are ignored.
    pub fn from_params(params: &Params) -> Result<Self, ParamError> {
        let explain = params.param_as_bool("explain", false)?;
        let metrics = match params.get("metric") {
            Some(list) => MetricSet::parse(list)?,
            None => MetricSet::all(),
        };
        let view = StateView::from_params(params)?;

        let mode = if metrics.is_empty() {
            if explain {
                RenderMode::WithExplanations
            } else {
                RenderMode::Acknowledged
            }
        } else if metrics.is_all() {
            RenderMode::WithFullState { explain, view }
        } else {
            RenderMode::WithFilteredMetadata {
                explain,
                metrics,
                view,
            }
        };
        Ok(mode)
    }

    pub fn explain(&self) -> bool {
        match self {
            RenderMode::Acknowledged => false,
            RenderMode::WithExplanations => true,
            RenderMode::WithFullState { explain, .. }
            | RenderMode::WithFilteredMetadata { explain, .. } => *explain,
        }
    }

    /// Whether the deprecated `state` field is written.
    pub fn renders_state(&self) -> bool {
        matches!(
            self,
            RenderMode::WithFullState { .. } | RenderMode::WithFilteredMetadata { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            RenderMode::Acknowledged => "acknowledged",
            RenderMode::WithExplanations => "with_explanations",
            RenderMode::WithFullState { .. } => "with_full_state",
            RenderMode::WithFilteredMetadata { .. } => "with_filtered_metadata",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::Metric;

    fn mode(pairs: &[(&str, &str)]) -> Result<RenderMode, ParamError> {
        RenderMode::from_params(&pairs.iter().copied().collect())
    }

    #[test]
    fn test_mode_selection() {
        assert!(matches!(mode(&[("metric", "none")]), Ok(RenderMode::Acknowledged)));
        assert!(matches!(
            mode(&[("metric", "none"), ("explain", "true")]),
            Ok(RenderMode::WithExplanations)
        ));
        assert!(matches!(
            mode(&[]),
            Ok(RenderMode::WithFullState { explain: false, .. })
        ));
        assert!(matches!(
            mode(&[("metric", "_all"), ("explain", "true")]),
            Ok(RenderMode::WithFullState { explain: true, .. })
        ));

        let Ok(RenderMode::WithFilteredMetadata { metrics, view, .. }) = mode(&[
            ("metric", "metadata"),
            ("settings_filter", "index.number*"),
        ]) else {
            panic!("expected filtered metadata mode");
        };
        assert!(metrics.contains(Metric::Metadata));
        assert!(!metrics.contains(Metric::Nodes));
        assert!(view.settings_filter.excludes("index.number_of_replicas"));
    }

    #[test]
    fn test_malformed_values_fail_closed() {
        assert!(matches!(
            mode(&[("explain", "yes")]),
            Err(ParamError::InvalidBoolean { .. })
        ));
        assert!(matches!(
            mode(&[("metric", "shards")]),
            Err(ParamError::UnknownMetric(_))
        ));
        assert!(mode(&[("unrelated", "whatever")]).is_ok());
    }

    #[test]
    fn test_mode_flags() {
        let full = mode(&[]).unwrap();
        assert!(full.renders_state());
        assert!(!full.explain());
        assert_eq!(full.name(), "with_full_state");

        let ack = mode(&[("metric", "none")]).unwrap();
        assert!(!ack.renders_state());
    }
}
