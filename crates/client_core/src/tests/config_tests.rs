use super::{load_settings_from, normalize_backend_url, Settings, DEFAULT_BACKEND_URL};

use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn normalizes_host_without_scheme() {
    assert_eq!(
        normalize_backend_url("backend.local:8000/"),
        "http://backend.local:8000"
    );
}

#[test]
fn empty_backend_url_falls_back_to_default() {
    assert_eq!(normalize_backend_url("   "), DEFAULT_BACKEND_URL);
}

#[test]
fn missing_file_and_env_yield_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings_from(&dir.path().join("absent.toml"), env_from(&[]));
    assert_eq!(settings, Settings::default());
}

#[test]
fn file_values_are_applied() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("case_client.toml");
    fs::write(
        &path,
        "backend_url = \"https://casos.example.org/\"\nexport_dir = \"/tmp/casos\"\nrequest_timeout_seconds = 30\n",
    )
    .expect("write settings");

    let settings = load_settings_from(&path, env_from(&[]));
    assert_eq!(settings.backend_url, "https://casos.example.org");
    assert_eq!(settings.export_dir, PathBuf::from("/tmp/casos"));
    assert_eq!(settings.request_timeout, Some(Duration::from_secs(30)));
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("case_client.toml");
    fs::write(&path, "backend_url = \"http://from-file:8000\"\n").expect("write settings");

    let settings = load_settings_from(
        &path,
        env_from(&[
            ("CASE_BACKEND_URL", "http://from-env:8000"),
            ("APP__BACKEND_URL", "http://from-app-env:8000"),
            ("CASE_EXPORT_DIR", "/srv/exports"),
        ]),
    );
    assert_eq!(settings.backend_url, "http://from-app-env:8000");
    assert_eq!(settings.export_dir, PathBuf::from("/srv/exports"));
}

#[test]
fn malformed_file_and_invalid_timeout_are_ignored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("case_client.toml");
    fs::write(&path, "backend_url = [not toml").expect("write settings");

    let settings = load_settings_from(
        &path,
        env_from(&[("APP__REQUEST_TIMEOUT_SECONDS", "soon")]),
    );
    assert_eq!(settings.backend_url, DEFAULT_BACKEND_URL);
    assert_eq!(settings.request_timeout, None);
}
