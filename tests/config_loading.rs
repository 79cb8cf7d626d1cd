//! Loading service configuration from disk.

use std::io::Write;

use cluster_reroute::cluster::DiscoveryNodeRole;
use cluster_reroute::config::{load_config, ConfigError, ValidationError};

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_full_config() {
    let file = write_config(
        r#"
        [listener]
        bind_address = "0.0.0.0:9200"

        [admin]
        api_key = "secret"

        [render]
        default_metric = "none"

        [cluster]
        name = "prod"
        master_node = "n1"

        [[cluster.nodes]]
        id = "n1"
        name = "node-1"
        address = "10.0.0.1:9300"
        roles = ["master", "data"]

        [cluster.nodes.attributes]
        zone = "a"

        [[cluster.nodes]]
        id = "n2"
        address = "10.0.0.2:9300"

        [[cluster.indices]]
        name = "logs"
        number_of_shards = 3

        [cluster.indices.settings]
        "index.max_script_fields" = "10"
        "#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.admin.api_key.as_deref(), Some("secret"));
    assert_eq!(config.render.default_metric, "none");
    assert_eq!(config.cluster.nodes.len(), 2);
    assert_eq!(
        config.cluster.nodes[0].roles,
        Some(vec![DiscoveryNodeRole::Master, DiscoveryNodeRole::Data])
    );
    assert_eq!(config.cluster.indices[0].number_of_replicas, 1);

    let state = config.cluster.build_state().unwrap();
    assert_eq!(state.cluster_name(), "prod");
    let node = state.nodes().get("n1").unwrap();
    assert_eq!(node.name(), "node-1");
    assert_eq!(state.metadata().index("logs").unwrap().number_of_shards(), 3);
    assert_eq!(state.routing_table().copies().count(), 6);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_invalid_config_reports_every_problem() {
    let file = write_config(
        r#"
        [cluster]
        master_node = "ghost"

        [[cluster.nodes]]
        id = "n1"
        address = "nowhere"
        "#,
    );

    match load_config(file.path()) {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(errors.len(), 2);
            assert!(errors.contains(&ValidationError::UnknownMaster("ghost".into())));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}
