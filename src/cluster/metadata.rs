//! Cluster metadata: index definitions, coordination, templates, graveyard.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{json, Value};

use crate::cluster::settings::{Settings, SettingsFilter};
use crate::cluster::{ClusterError, UNKNOWN_UUID};
use crate::xcontent::{empty_object, object, Object};

pub const SETTING_NUMBER_OF_SHARDS: &str = "index.number_of_shards";
pub const SETTING_NUMBER_OF_REPLICAS: &str = "index.number_of_replicas";
pub const SETTING_VERSION_CREATED: &str = "index.version.created";

/// Upper bound on primaries per index.
pub const MAX_NUMBER_OF_SHARDS: u32 = 1024;
/// Upper bound on replicas per shard.
pub const MAX_NUMBER_OF_REPLICAS: u32 = 64;

/// Data format version stamped into `index.version.created`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(pub u32);

impl Version {
    pub const CURRENT: Version = Version(8_090_099);

    pub fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexState {
    #[default]
    Open,
    Close,
}

impl IndexState {
    pub fn name(self) -> &'static str {
        match self {
            IndexState::Open => "open",
            IndexState::Close => "close",
        }
    }
}

/// Definition of a single index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexMetadata {
    index: String,
    version: u64,
    mapping_version: u64,
    settings_version: u64,
    aliases_version: u64,
    routing_num_shards: u32,
    number_of_shards: u32,
    number_of_replicas: u32,
    state: IndexState,
    settings: Settings,
    mappings: Object,
    aliases: Vec<String>,
    primary_terms: Vec<u64>,
    in_sync_allocations: BTreeMap<u32, Vec<String>>,
    rollover_info: BTreeMap<String, u64>,
    system: bool,
}

impl IndexMetadata {
    pub fn builder(index: impl Into<String>) -> IndexMetadataBuilder {
        IndexMetadataBuilder {
            index: index.into(),
            settings: Settings::default(),
            state: IndexState::Open,
            mappings: Object::new(),
            aliases: Vec::new(),
            rollover_info: BTreeMap::new(),
            system: false,
        }
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn number_of_shards(&self) -> u32 {
        self.number_of_shards
    }

    pub fn number_of_replicas(&self) -> u32 {
        self.number_of_replicas
    }

    pub fn state(&self) -> IndexState {
        self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn primary_term(&self, shard: u32) -> Option<u64> {
        self.primary_terms.get(shard as usize).copied()
    }

    pub fn to_xcontent(&self, filter: &SettingsFilter, flat_settings: bool) -> Value {
        let primary_terms: Object = self
            .primary_terms
            .iter()
            .enumerate()
            .map(|(shard, term)| (shard.to_string(), json!(term)))
            .collect();
        let in_sync: Object = self
            .in_sync_allocations
            .iter()
            .map(|(shard, ids)| (shard.to_string(), json!(ids)))
            .collect();
        let rollover: Object = self
            .rollover_info
            .iter()
            .map(|(alias, time)| {
                (
                    alias.clone(),
                    object([("met_conditions", empty_object()), ("time", json!(time))]),
                )
            })
            .collect();

        object([
            ("version", json!(self.version)),
            ("mapping_version", json!(self.mapping_version)),
            ("settings_version", json!(self.settings_version)),
            ("aliases_version", json!(self.aliases_version)),
            ("routing_num_shards", json!(self.routing_num_shards)),
            ("state", json!(self.state.name())),
            ("settings", self.settings.to_xcontent(filter, flat_settings)),
            ("mappings", Value::Object(self.mappings.clone())),
            ("aliases", json!(self.aliases)),
            ("primary_terms", Value::Object(primary_terms)),
            ("in_sync_allocations", Value::Object(in_sync)),
            ("rollover_info", Value::Object(rollover)),
            ("system", json!(self.system)),
            ("timestamp_range", object([("shards", json!([]))])),
        ])
    }
}

#[derive(Debug)]
pub struct IndexMetadataBuilder {
    index: String,
    settings: Settings,
    state: IndexState,
    mappings: Object,
    aliases: Vec<String>,
    rollover_info: BTreeMap<String, u64>,
    system: bool,
}

impl IndexMetadataBuilder {
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn state(mut self, state: IndexState) -> Self {
        self.state = state;
        self
    }

    pub fn mappings(mut self, mappings: Object) -> Self {
        self.mappings = mappings;
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Record that `alias` rolled over onto this index at `time` (millis).
    pub fn rollover(mut self, alias: impl Into<String>, time: u64) -> Self {
        self.rollover_info.insert(alias.into(), time);
        self
    }

    pub fn system(mut self, system: bool) -> Self {
        self.system = system;
        self
    }

    /// Derive shard counts from the settings and freeze the index.
    ///
    /// Shard count defaults to 1 and replica count to 1 when unset. Counts
    /// above the per-index limits are rejected before anything is allocated.
    pub fn build(mut self) -> Result<IndexMetadata, ClusterError> {
        let number_of_shards =
            read_u32(&self.settings, SETTING_NUMBER_OF_SHARDS, 1, MAX_NUMBER_OF_SHARDS)?;
        let number_of_replicas =
            read_u32(&self.settings, SETTING_NUMBER_OF_REPLICAS, 1, MAX_NUMBER_OF_REPLICAS)?;
        if number_of_shards == 0 {
            return Err(ClusterError::NoShards(self.index));
        }

        self.aliases.sort();
        self.aliases.dedup();

        Ok(IndexMetadata {
            version: 1,
            mapping_version: 1,
            settings_version: 1,
            aliases_version: 1,
            routing_num_shards: number_of_shards,
            number_of_shards,
            number_of_replicas,
            state: self.state,
            primary_terms: vec![0; number_of_shards as usize],
            in_sync_allocations: (0..number_of_shards).map(|s| (s, Vec::new())).collect(),
            rollover_info: self.rollover_info,
            system: self.system,
            mappings: self.mappings,
            aliases: self.aliases,
            settings: self.settings,
            index: self.index,
        })
    }
}

fn read_u32(settings: &Settings, key: &str, default: u32, max: u32) -> Result<u32, ClusterError> {
    let Some(raw) = settings.get(key) else {
        return Ok(default);
    };
    let value: u32 = raw.parse().map_err(|_| ClusterError::InvalidSetting {
        key: key.to_string(),
        value: raw.to_string(),
    })?;
    if value > max {
        return Err(ClusterError::SettingOutOfRange {
            key: key.to_string(),
            value,
            max,
        });
    }
    Ok(value)
}

/// Voting configuration and election term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinationMetadata {
    pub term: u64,
    pub last_committed_config: Vec<String>,
    pub last_accepted_config: Vec<String>,
    pub voting_config_exclusions: Vec<String>,
}

impl CoordinationMetadata {
    fn to_xcontent(&self) -> Value {
        object([
            ("term", json!(self.term)),
            ("last_committed_config", json!(self.last_committed_config)),
            ("last_accepted_config", json!(self.last_accepted_config)),
            ("voting_config_exclusions", json!(self.voting_config_exclusions)),
        ])
    }
}

/// Legacy index template.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexTemplateMetadata {
    pub order: i32,
    pub index_patterns: Vec<String>,
    pub settings: Settings,
}

impl IndexTemplateMetadata {
    fn to_xcontent(&self, filter: &SettingsFilter, flat_settings: bool) -> Value {
        object([
            ("order", json!(self.order)),
            ("index_patterns", json!(self.index_patterns)),
            ("settings", self.settings.to_xcontent(filter, flat_settings)),
            ("mappings", empty_object()),
            ("aliases", empty_object()),
        ])
    }
}

/// Record of a deleted index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tombstone {
    pub index_name: String,
    pub index_uuid: String,
    pub delete_date_in_millis: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexGraveyard {
    pub tombstones: Vec<Tombstone>,
}

impl IndexGraveyard {
    fn to_xcontent(&self) -> Value {
        let tombstones: Vec<Value> = self
            .tombstones
            .iter()
            .map(|t| {
                object([
                    (
                        "index",
                        object([
                            ("index_name", json!(t.index_name)),
                            ("index_uuid", json!(t.index_uuid)),
                        ]),
                    ),
                    ("delete_date_in_millis", json!(t.delete_date_in_millis)),
                ])
            })
            .collect();
        object([("tombstones", Value::Array(tombstones))])
    }
}

/// Cluster-wide metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    cluster_uuid: String,
    cluster_uuid_committed: bool,
    coordination: CoordinationMetadata,
    templates: BTreeMap<String, IndexTemplateMetadata>,
    indices: BTreeMap<String, IndexMetadata>,
    index_graveyard: IndexGraveyard,
    reserved_state: BTreeMap<String, u64>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            cluster_uuid: UNKNOWN_UUID.to_string(),
            cluster_uuid_committed: false,
            coordination: CoordinationMetadata::default(),
            templates: BTreeMap::new(),
            indices: BTreeMap::new(),
            index_graveyard: IndexGraveyard::default(),
            reserved_state: BTreeMap::new(),
        }
    }
}

impl Metadata {
    pub fn builder() -> MetadataBuilder {
        MetadataBuilder {
            metadata: Metadata::default(),
        }
    }

    pub fn cluster_uuid(&self) -> &str {
        &self.cluster_uuid
    }

    pub fn index(&self, name: &str) -> Option<&IndexMetadata> {
        self.indices.get(name)
    }

    pub fn indices(&self) -> impl Iterator<Item = &IndexMetadata> {
        self.indices.values()
    }

    pub fn coordination(&self) -> &CoordinationMetadata {
        &self.coordination
    }

    pub fn to_xcontent(&self, filter: &SettingsFilter, flat_settings: bool) -> Value {
        let templates: Object = self
            .templates
            .iter()
            .map(|(name, t)| (name.clone(), t.to_xcontent(filter, flat_settings)))
            .collect();
        let indices: Object = self
            .indices
            .iter()
            .map(|(name, index)| (name.clone(), index.to_xcontent(filter, flat_settings)))
            .collect();
        let reserved: Object = self
            .reserved_state
            .iter()
            .map(|(ns, version)| (ns.clone(), object([("version", json!(version))])))
            .collect();

        object([
            ("cluster_uuid", json!(self.cluster_uuid)),
            ("cluster_uuid_committed", json!(self.cluster_uuid_committed)),
            ("cluster_coordination", self.coordination.to_xcontent()),
            ("templates", Value::Object(templates)),
            ("indices", Value::Object(indices)),
            ("index-graveyard", self.index_graveyard.to_xcontent()),
            ("reserved_state", Value::Object(reserved)),
        ])
    }
}

#[derive(Debug)]
pub struct MetadataBuilder {
    metadata: Metadata,
}

impl MetadataBuilder {
    pub fn cluster_uuid(mut self, uuid: impl Into<String>, committed: bool) -> Self {
        self.metadata.cluster_uuid = uuid.into();
        self.metadata.cluster_uuid_committed = committed;
        self
    }

    pub fn coordination(mut self, coordination: CoordinationMetadata) -> Self {
        self.metadata.coordination = coordination;
        self
    }

    /// Add or replace an index definition.
    pub fn put(mut self, index: IndexMetadata) -> Self {
        self.metadata.indices.insert(index.index.clone(), index);
        self
    }

    pub fn put_template(mut self, name: impl Into<String>, template: IndexTemplateMetadata) -> Self {
        self.metadata.templates.insert(name.into(), template);
        self
    }

    pub fn tombstone(mut self, tombstone: Tombstone) -> Self {
        self.metadata.index_graveyard.tombstones.push(tombstone);
        self
    }

    pub fn reserved_state(mut self, namespace: impl Into<String>, version: u64) -> Self {
        self.metadata.reserved_state.insert(namespace.into(), version);
        self
    }

    pub fn build(self) -> Metadata {
        self.metadata
    }
}
