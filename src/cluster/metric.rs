//! Cluster state section selection (`metric` parameter).

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::xcontent::ParamError;

/// A renderable section of the cluster state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    Version,
    MasterNode,
    Blocks,
    Nodes,
    Metadata,
    RoutingTable,
    RoutingNodes,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::Version,
        Metric::MasterNode,
        Metric::Blocks,
        Metric::Nodes,
        Metric::Metadata,
        Metric::RoutingTable,
        Metric::RoutingNodes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::Version => "version",
            Metric::MasterNode => "master_node",
            Metric::Blocks => "blocks",
            Metric::Nodes => "nodes",
            Metric::Metadata => "metadata",
            Metric::RoutingTable => "routing_table",
            Metric::RoutingNodes => "routing_nodes",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| ParamError::UnknownMetric(s.to_string()))
    }
}

/// The set of sections to render.
///
/// An empty set means `none`: the state is not rendered at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricSet {
    metrics: BTreeSet<Metric>,
}

impl MetricSet {
    pub fn all() -> Self {
        Self {
            metrics: Metric::ALL.into_iter().collect(),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    /// Parse a comma separated list: `_all`, `none`, or metric names.
    pub fn parse(list: &str) -> Result<Self, ParamError> {
        let names: Vec<&str> = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if names.is_empty() {
            return Ok(Self::all());
        }
        if names.contains(&"none") {
            if names.len() > 1 {
                return Err(ParamError::NoneCombined(list.to_string()));
            }
            return Ok(Self::none());
        }
        if names.contains(&"_all") {
            return Ok(Self::all());
        }

        let metrics = names
            .into_iter()
            .map(Metric::from_str)
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self { metrics })
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.metrics.contains(&metric)
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn is_all(&self) -> bool {
        self.metrics.len() == Metric::ALL.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Metric> + '_ {
        self.metrics.iter().copied()
    }
}

impl FromIterator<Metric> for MetricSet {
    fn from_iter<I: IntoIterator<Item = Metric>>(iter: I) -> Self {
        Self {
            metrics: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for MetricSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        if self.is_all() {
            return f.write_str("_all");
        }
        let names: Vec<&str> = self.iter().map(Metric::name).collect();
        f.write_str(&names.join(","))
    }
}
