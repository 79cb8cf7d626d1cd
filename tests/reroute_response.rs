//! Rendering of the reroute response for the documented parameter sets.

use cluster_reroute::allocation::{AllocationCommand, Decision, RerouteExplanation, RoutingExplanations};
use cluster_reroute::cluster::{
    ClusterState, DiscoveryNode, DiscoveryNodes, IndexMetadata, Metadata, Settings, Version,
    SETTING_NUMBER_OF_REPLICAS, SETTING_NUMBER_OF_SHARDS, SETTING_VERSION_CREATED,
};
use cluster_reroute::reroute::{
    ClusterRerouteResponse, DeprecationRecorder, STATE_FIELD_DEPRECATION_MESSAGE,
};
use cluster_reroute::xcontent::{self, Params};

fn create_cluster_state() -> ClusterState {
    let node0 = DiscoveryNode::new("node0", "0.0.0.0:9000".parse().unwrap());
    let settings = Settings::builder()
        .put("index.shard.check_on_startup", true)
        .put("index.max_script_fields", 10)
        .put(SETTING_NUMBER_OF_SHARDS, 1)
        .put(SETTING_NUMBER_OF_REPLICAS, 0)
        .put(SETTING_VERSION_CREATED, Version::CURRENT)
        .build();

    ClusterState::builder("test")
        .nodes(
            DiscoveryNodes::builder()
                .add(node0)
                .master_node_id("node0")
                .build()
                .unwrap(),
        )
        .metadata(
            Metadata::builder()
                .put(IndexMetadata::builder("index").settings(settings).build().unwrap())
                .build(),
        )
        .build()
}

fn create_response(state: ClusterState) -> ClusterRerouteResponse {
    ClusterRerouteResponse::new(
        true,
        state,
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

fn render(response: &ClusterRerouteResponse, params: &Params) -> (String, DeprecationRecorder) {
    let recorder = DeprecationRecorder::new();
    let json = response.to_json(params, &recorder, false).unwrap();
    (json, recorder)
}

fn compact(pretty: &str) -> String {
    xcontent::normalize(pretty).unwrap()
}

#[test]
fn test_metric_none_renders_acknowledged_only() {
    let response = create_response(create_cluster_state());
    let (json, warnings) = render(&response, &Params::empty().with("metric", "none"));

    assert_eq!(json, compact(r#"{ "acknowledged": true }"#));
    assert!(warnings.is_empty());
}

#[test]
fn test_explain_with_metric_none() {
    let response = create_response(create_cluster_state());
    let (json, warnings) = render(
        &response,
        &Params::empty().with("explain", "true").with("metric", "none"),
    );

    assert_eq!(
        json,
        compact(
            r#"{
              "acknowledged": true,
              "explanations": [
                {
                  "command": "allocate_replica",
                  "parameters": {
                    "index": "index",
                    "shard": 0,
                    "node": "node0"
                  },
                  "decisions": [
                    {
                      "decider": null,
                      "decision": "YES",
                      "explanation": "none"
                    }
                  ]
                }
              ]
            }"#
        )
    );
    assert!(warnings.is_empty());
}

#[test]
fn test_no_params_renders_deprecated_full_state() {
    let state = create_cluster_state();
    let state_uuid = state.state_uuid().to_string();
    let ephemeral_id = state.nodes().get("node0").unwrap().ephemeral_id().to_string();
    let response = create_response(state);

    let (json, warnings) = render(&response, &Params::empty());

    let expected = format!(
        r#"{{
          "acknowledged": true,
          "state": {{
            "cluster_uuid": "_na_",
            "version": 0,
            "state_uuid": "{state_uuid}",
            "master_node": "node0",
            "blocks": {{}},
            "nodes": {{
              "node0": {{
                "name": "",
                "ephemeral_id": "{ephemeral_id}",
                "transport_address": "0.0.0.0:9000",
                "external_id": "",
                "attributes": {{}},
                "roles": [
                  "data",
                  "data_cold",
                  "data_content",
                  "data_frozen",
                  "data_hot",
                  "data_warm",
                  "index",
                  "ingest",
                  "master",
                  "ml",
                  "remote_cluster_client",
                  "search",
                  "transform",
                  "voting_only"
                ]
              }}
            }},
            "metadata": {{
              "cluster_uuid": "_na_",
              "cluster_uuid_committed": false,
              "cluster_coordination": {{
                "term": 0,
                "last_committed_config": [],
                "last_accepted_config": [],
                "voting_config_exclusions": []
              }},
              "templates": {{}},
              "indices": {{
                "index": {{
                  "version": 1,
                  "mapping_version": 1,
                  "settings_version": 1,
                  "aliases_version": 1,
                  "routing_num_shards": 1,
                  "state": "open",
                  "settings": {{
                    "index": {{
                      "max_script_fields": "10",
                      "number_of_replicas": "0",
                      "number_of_shards": "1",
                      "shard": {{
                        "check_on_startup": "true"
                      }},
                      "version": {{
                        "created": "{version}"
                      }}
                    }}
                  }},
                  "mappings": {{}},
                  "aliases": [],
                  "primary_terms": {{
                    "0": 0
                  }},
                  "in_sync_allocations": {{
                    "0": []
                  }},
                  "rollover_info": {{}},
                  "system": false,
                  "timestamp_range": {{
                    "shards": []
                  }}
                }}
              }},
              "index-graveyard": {{
                "tombstones": []
              }},
              "reserved_state": {{}}
            }},
            "routing_table": {{
              "indices": {{}}
            }},
            "routing_nodes": {{
              "unassigned": [],
              "nodes": {{
                "node0": []
              }}
            }}
          }}
        }}"#,
        version = Version::CURRENT.id(),
    );

    assert_eq!(json, compact(&expected));
    assert_eq!(warnings.messages(), vec![STATE_FIELD_DEPRECATION_MESSAGE.to_string()]);
}

#[test]
fn test_metadata_metric_with_settings_filter() {
    let response = create_response(create_cluster_state());
    let (json, warnings) = render(
        &response,
        &Params::empty()
            .with("metric", "metadata")
            .with("settings_filter", "index.number*,index.version.created"),
    );

    assert_eq!(
        json,
        compact(
            r#"{
              "acknowledged" : true,
              "state" : {
                "cluster_uuid" : "_na_",
                "metadata" : {
                  "cluster_uuid" : "_na_",
                  "cluster_uuid_committed" : false,
                  "cluster_coordination" : {
                    "term" : 0,
                    "last_committed_config" : [ ],
                    "last_accepted_config" : [ ],
                    "voting_config_exclusions" : [ ]
                  },
                  "templates" : { },
                  "indices" : {
                    "index" : {
                      "version" : 1,
                      "mapping_version" : 1,
                      "settings_version" : 1,
                      "aliases_version" : 1,
                      "routing_num_shards" : 1,
                      "state" : "open",
                      "settings" : {
                        "index" : {
                          "max_script_fields" : "10",
                          "shard" : {
                            "check_on_startup" : "true"
                          }
                        }
                      },
                      "mappings" : { },
                      "aliases" : [ ],
                      "primary_terms" : {
                        "0" : 0
                      },
                      "in_sync_allocations" : {
                        "0" : [ ]
                      },
                      "rollover_info" : { },
                      "system" : false,
                      "timestamp_range" : {
                        "shards" : [ ]
                      }
                    }
                  },
                  "index-graveyard" : {
                    "tombstones" : [ ]
                  },
                  "reserved_state" : { }
                }
              }
            }"#
        )
    );
    assert_eq!(warnings.len(), 1);
}

#[test]
fn test_rendering_is_idempotent() {
    let response = create_response(create_cluster_state());
    for params in [
        Params::empty(),
        Params::empty().with("metric", "none"),
        Params::empty().with("explain", "true"),
        Params::empty().with("metric", "metadata").with("flat_settings", "true"),
    ] {
        let (first, _) = render(&response, &params);
        let (second, _) = render(&response, &params);
        assert_eq!(first, second);
    }
}

#[test]
fn test_output_survives_parse_and_reserialize() {
    let response = create_response(create_cluster_state());
    for params in [
        Params::empty(),
        Params::empty().with("explain", "true").with("metric", "none"),
        Params::empty().with("metric", "nodes,routing_nodes"),
    ] {
        let (json, _) = render(&response, &params);
        assert_eq!(xcontent::normalize(&json).unwrap(), json);
    }
}

#[test]
fn test_flat_settings_keep_full_keys() {
    let response = create_response(create_cluster_state());
    let recorder = DeprecationRecorder::new();
    let doc = response
        .render(
            &Params::empty()
                .with("metric", "metadata")
                .with("flat_settings", "true"),
            &recorder,
        )
        .unwrap();

    let settings = &doc["state"]["metadata"]["indices"]["index"]["settings"];
    assert_eq!(settings["index.number_of_shards"], "1");
    assert_eq!(settings["index.shard.check_on_startup"], "true");
    assert!(settings.get("index").is_none());
}

#[test]
fn test_metric_subset_renders_only_selected_sections() {
    let response = create_response(create_cluster_state());
    let recorder = DeprecationRecorder::new();
    let doc = response
        .render(&Params::empty().with("metric", "routing_nodes,master_node"), &recorder)
        .unwrap();

    let keys: Vec<&str> = doc["state"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["cluster_uuid", "master_node", "routing_nodes"]);
}

#[test]
fn test_malformed_recognised_params_fail() {
    let response = create_response(create_cluster_state());
    let recorder = DeprecationRecorder::new();

    for params in [
        Params::empty().with("explain", "yes"),
        Params::empty().with("flat_settings", "1"),
        Params::empty().with("metric", "shards"),
        Params::empty().with("metric", "none,nodes"),
    ] {
        assert!(response.render(&params, &recorder).is_err());
    }
    assert!(recorder.is_empty());
}

#[test]
fn test_unknown_params_are_ignored() {
    let response = create_response(create_cluster_state());
    let (json, _) = render(
        &response,
        &Params::empty().with("metric", "none").with("human", "true"),
    );
    assert_eq!(json, r#"{"acknowledged":true}"#);
}
