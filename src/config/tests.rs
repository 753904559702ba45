use super::*;
use serial_test::serial;

#[test]
fn test_toml_default_values() {
    let config = Config::default();
    assert_eq!(
        from_toml(&config, "BUCKET_NAME").as_deref(),
        Some("cloud-run-am4")
    );
    assert_eq!(
        from_toml(&config, "FUEL_LOG_FILE").as_deref(),
        Some("fuel_log.json")
    );
    assert_eq!(from_toml(&config, "PORT").as_deref(), Some("8080"));
    assert_eq!(from_toml(&config, "FUEL_LOG_SOURCE").as_deref(), Some("gcs"));
    assert_eq!(from_toml(&config, "UNKNOWN_KEY"), None);
}

#[test]
fn test_parse_toml_sections() {
    let content = r#"
        [storage]
        bucket_name = "my-bucket"
        source = "file"

        [server]
        port = 9090
    "#;
    let config: Config = toml::from_str(content).unwrap();
    assert_eq!(config.storage.bucket_name, "my-bucket");
    assert_eq!(config.storage.source, "file");
    assert_eq!(config.storage.fuel_log_file, "fuel_log.json");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.logging.rust_log_format, "term");
}

fn merged(base: &str, local: &str) -> Config {
    let mut table: toml::Table = base.parse().unwrap();
    merge_tables(&mut table, local.parse().unwrap());
    toml::Value::Table(table).try_into().unwrap()
}

#[test]
fn test_merge_local_overrides_base() {
    let config = merged(
        r#"
        [storage]
        bucket_name = "base-bucket"
        fuel_log_file = "base.json"
    "#,
        r#"
        [storage]
        bucket_name = "local-bucket"

        [logging]
        log_level = "DEBUG"
    "#,
    );

    assert_eq!(config.storage.bucket_name, "local-bucket");
    // keys absent from the local file keep their base values
    assert_eq!(config.storage.fuel_log_file, "base.json");
    assert_eq!(config.logging.log_level, "DEBUG");
    assert_eq!(config.server.port, 8080);
}

#[test]
fn test_merge_local_can_restore_default_value() {
    let config = merged(
        r#"
        [storage]
        source = "file"

        [server]
        port = 9090
    "#,
        r#"
        [storage]
        source = "gcs"

        [server]
        port = 8080
    "#,
    );

    assert_eq!(config.storage.source, "gcs");
    assert_eq!(config.server.port, 8080);
}

#[test]
fn test_merge_into_empty_base() {
    let config = merged("", "[server]\nport = 7070\n");
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.storage.source, "gcs");
}

#[test]
#[serial]
fn test_env_var_overrides_toml() {
    unsafe {
        std::env::set_var("FUEL_LOG_FILE", "env_log.json");
    }
    let result = get("FUEL_LOG_FILE").unwrap();
    assert_eq!(result, "env_log.json");
    unsafe {
        std::env::remove_var("FUEL_LOG_FILE");
    }
}

#[test]
#[serial]
fn test_config_store_priority() {
    const TEST_KEY: &str = "RUST_LOG_FORMAT";
    unsafe {
        std::env::set_var(TEST_KEY, "env-value");
    }
    set(TEST_KEY, "store-value");
    let result = get(TEST_KEY).unwrap();
    assert_eq!(result, "store-value");

    unset(TEST_KEY);
    let result = get(TEST_KEY).unwrap();
    assert_eq!(result, "env-value");
    unsafe {
        std::env::remove_var(TEST_KEY);
    }
}

#[test]
#[serial]
fn test_empty_store_value_is_error() {
    const TEST_KEY: &str = "STORAGE_ACCESS_TOKEN";
    set(TEST_KEY, "");
    assert!(get(TEST_KEY).is_err());
    unset(TEST_KEY);
}

#[test]
#[serial]
fn test_unknown_key_is_error() {
    let err = get("NO_SUCH_FUEL_STATS_KEY").unwrap_err();
    assert!(err.to_string().contains("NO_SUCH_FUEL_STATS_KEY"));
}
