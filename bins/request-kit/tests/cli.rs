use assert_cmd::Command;
use predicates::prelude::*;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("request-kit").unwrap();
    cmd.env_clear()
        .env("SERVICE_BASE_URL", "https://api.example.com")
        .env("OTHER_SERVICE_BASE_URL", "{demo: 'https://demo.example.com'}")
        .env("REQUEST_KIT_ENV", "development");
    cmd
}

#[test]
fn urls_lists_primary_and_alternates() {
    cli()
        .args(["urls", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://api.example.com"))
        .stdout(predicate::str::contains("https://demo.example.com"));
}

#[test]
fn urls_with_proxy_uses_patterns() {
    cli()
        .args(["urls", "--proxy", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/proxy-default"))
        .stdout(predicate::str::contains("/proxy-demo"))
        .stdout(predicate::str::contains("https://").not());
}

#[test]
fn proxy_env_flag_applies_in_development() {
    cli()
        .env("SERVICE_HTTP_PROXY", "Y")
        .args(["urls", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/proxy-default"));
}

#[test]
fn post_rejects_invalid_body() {
    cli()
        .args(["post", "/items", "--body", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--body is not valid JSON"));
}

#[test]
fn unknown_service_fails() {
    cli()
        .args(["get", "/items", "--service", "files"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("files"));
}

#[test]
fn unreachable_backend_reports_network_error() {
    cli()
        .env("SERVICE_BASE_URL", "http://127.0.0.1:9")
        .args(["get", "/items", "--format", "json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("ERR_NETWORK"));
}

#[test]
fn system_proxy_variable_is_not_the_proxy_switch() {
    cli()
        .env("HTTP_PROXY", "Y")
        .args(["urls", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/proxy-default").not());
}
