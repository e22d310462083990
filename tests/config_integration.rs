use nextstop_widget::config::{AppConfig, DEFAULT_BACKEND_URL};
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;
use std::time::Duration;

const BIN: &str = "nextstop-widget";

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("WIDGET_SERVER__PORT");
        env::remove_var("WIDGET_BACKEND__BASE_URL");
        env::remove_var("WIDGET_WIDGET__QUICK_ACTIONS");
        env::remove_var("CONFIG_FILE");
        env::remove_var("HOST");
        env::remove_var("PORT");
        env::remove_var("BACKEND_URL");
        env::remove_var("STATUS_POLL_INTERVAL_SECS");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args([BIN]).expect("defaults should load");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.backend.base_url, DEFAULT_BACKEND_URL);
    assert_eq!(config.status.poll_interval(), Duration::from_secs(10));
    assert_eq!(config.widget.title, "Next Stop");
    assert_eq!(config.widget.quick_actions.len(), 2);
    assert!(config.widget.recent_searches.is_empty());
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("WIDGET_SERVER__PORT", "9090");
        env::set_var("WIDGET_BACKEND__BASE_URL", "http://bridge:9001");
    }

    let config = AppConfig::load_from_args([BIN]).expect("Failed to load config");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.backend.base_url, "http://bridge:9001");

    clear_env_vars();
}

#[test]
#[serial]
fn test_env_list_override() {
    clear_env_vars();
    unsafe {
        env::set_var(
            "WIDGET_WIDGET__QUICK_ACTIONS",
            "Show me accepted places,Get notification 2",
        );
    }

    let config = AppConfig::load_from_args([BIN]).expect("Failed to load config");
    assert_eq!(
        config.widget.quick_actions,
        ["Show me accepted places", "Get notification 2"]
    );

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    clear_env_vars();
    unsafe {
        env::set_var("WIDGET_SERVER__PORT", "9090");
    }

    let config = AppConfig::load_from_args([
        BIN,
        "--port",
        "4000",
        "--backend-url",
        "http://10.0.0.5:9001",
        "--poll-interval-secs",
        "3",
    ])
    .expect("Failed to load config");
    assert_eq!(config.server.port, 4000);
    assert_eq!(config.backend.base_url, "http://10.0.0.5:9001");
    assert_eq!(config.status.poll_interval(), Duration::from_secs(3));
    assert_eq!(config.bind_address(), "127.0.0.1:4000");

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("Failed to create temp config");
    writeln!(
        file,
        r#"
server:
  port: 7070
widget:
  title: "Next Stop Users"
  recent_searches:
    - "Accepted places"
"#
    )
    .expect("Failed to write temp config");

    let path = file.path().to_string_lossy().to_string();
    let config =
        AppConfig::load_from_args([BIN, "--config", &path]).expect("Failed to load config from file");
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.widget.title, "Next Stop Users");
    assert_eq!(config.widget.recent_searches, ["Accepted places"]);

    clear_env_vars();
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env_vars();

    let result = AppConfig::load_from_args([BIN, "--config", "/nonexistent/widget.yaml"]);
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_cwd_config_fallback() {
    clear_env_vars();

    let config_content = r#"
server:
  port: 6060
    "#;
    let cwd_path = "config.yaml";
    fs::write(cwd_path, config_content).expect("Failed to write ./config.yaml");

    let config = AppConfig::load_from_args([BIN]);

    fs::remove_file(cwd_path).expect("Failed to remove ./config.yaml");

    assert_eq!(config.expect("Failed to load config").server.port, 6060);
}
